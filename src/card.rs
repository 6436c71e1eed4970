// 💳 Card Record - the single entity of the catalog
// One secured credit card, as loaded from the bundled dataset

use serde::{Deserialize, Serialize};

// ============================================================================
// CARD ORIENTATION
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardOrientation {
    /// Landscape card art (fits width)
    #[default]
    Horizontal,

    /// Portrait card art (fits height)
    Vertical,
}

// ============================================================================
// CARD
// ============================================================================

/// Secured credit card record
///
/// Records are read-only once loaded. Views over the catalog hold `&Card`,
/// never clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    /// Stable identifier, also the detail route key
    pub id: String,

    #[serde(default)]
    pub bank_name: String,

    /// Display title
    #[serde(default)]
    pub card_name: String,

    /// Payment networks, e.g. ["VISA", "RuPay"]
    #[serde(default)]
    pub network: Vec<String>,

    // ========================================================================
    // TERMS (whole rupees)
    // ========================================================================
    /// Minimum fixed deposit required to get the card
    #[serde(rename = "minFD")]
    pub min_fd: u64,

    /// 0 means no joining fee
    #[serde(default)]
    pub joining_fee: u64,

    /// 0 means no annual fee
    #[serde(default)]
    pub annual_fee: u64,

    /// Percent of the FD usable as credit limit (0-100)
    #[serde(default)]
    pub credit_limit: u8,

    // ========================================================================
    // CO-BRANDING
    // ========================================================================
    #[serde(default)]
    pub is_cobranded: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cobrand_partner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cobrand_partner_icon: Option<String>,

    // ========================================================================
    // CONTENT
    // ========================================================================
    #[serde(default)]
    pub best_for_you: Vec<String>,

    #[serde(default)]
    pub highlights: Vec<String>,

    #[serde(default)]
    pub website_url: String,

    // Presentation-only, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_image: Option<String>,

    #[serde(default)]
    pub card_orientation: CardOrientation,
}

impl Card {
    /// Minimal record, mostly useful for fixtures
    pub fn new(id: &str, bank_name: &str, card_name: &str, min_fd: u64) -> Self {
        Card {
            id: id.to_string(),
            bank_name: bank_name.to_string(),
            card_name: card_name.to_string(),
            network: Vec::new(),
            min_fd,
            joining_fee: 0,
            annual_fee: 0,
            credit_limit: 0,
            is_cobranded: false,
            bank_icon: None,
            cobrand_partner: None,
            cobrand_partner_icon: None,
            best_for_you: Vec::new(),
            highlights: Vec::new(),
            website_url: String::new(),
            card_image: None,
            card_orientation: CardOrientation::Horizontal,
        }
    }

    pub fn with_network(mut self, networks: &[&str]) -> Self {
        self.network = networks.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_fees(mut self, joining_fee: u64, annual_fee: u64) -> Self {
        self.joining_fee = joining_fee;
        self.annual_fee = annual_fee;
        self
    }

    /// Both joining and annual fee are zero
    pub fn is_zero_fee(&self) -> bool {
        self.joining_fee == 0 && self.annual_fee == 0
    }

    /// Partner name, only for co-branded cards
    pub fn partner(&self) -> Option<&str> {
        if self.is_cobranded {
            self.cobrand_partner.as_deref()
        } else {
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_record() {
        let json = r#"{
            "id": "idfc-wow",
            "bankName": "IDFC FIRST Bank",
            "cardName": "WOW! Credit Card",
            "network": ["VISA"],
            "minFD": 2000,
            "joiningFee": 0,
            "annualFee": 0,
            "creditLimit": 100,
            "isCobranded": false,
            "bestForYou": ["You want a lifetime free card"],
            "highlights": ["Up to 7.5% interest on FD"],
            "websiteUrl": "https://www.idfcfirstbank.com",
            "cardOrientation": "vertical"
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, "idfc-wow");
        assert_eq!(card.bank_name, "IDFC FIRST Bank");
        assert_eq!(card.min_fd, 2000);
        assert_eq!(card.credit_limit, 100);
        assert_eq!(card.card_orientation, CardOrientation::Vertical);
        assert!(card.is_zero_fee());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id": "bare", "minFD": 5000}"#;
        let card: Card = serde_json::from_str(json).unwrap();

        assert_eq!(card.bank_name, "");
        assert!(card.network.is_empty());
        assert!(!card.is_cobranded);
        assert_eq!(card.card_orientation, CardOrientation::Horizontal);
    }

    #[test]
    fn test_partner_only_for_cobranded() {
        let mut card = Card::new("x", "SBM Bank", "Zet", 1000);
        card.cobrand_partner = Some("Zet".to_string());
        assert_eq!(card.partner(), None);

        card.is_cobranded = true;
        assert_eq!(card.partner(), Some("Zet"));
    }

    #[test]
    fn test_serialize_uses_camel_case_field_names() {
        let card = Card::new("a", "Bank", "Card", 5000).with_fees(500, 0);
        let value = serde_json::to_value(&card).unwrap();

        assert_eq!(value["minFD"], 5000);
        assert_eq!(value["joiningFee"], 500);
        assert_eq!(value["bankName"], "Bank");
        assert!(value.get("cardImage").is_none());
    }
}

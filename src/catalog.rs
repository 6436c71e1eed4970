// 📚 Catalog - loading and checking the card dataset
//
// The dataset is loaded once at startup and never mutated afterwards.
// Loading does not deduplicate or repair records; `validate` reports what
// looks wrong and leaves the decision to the caller.

use crate::card::Card;
use crate::detail::{self, CardDetail, LookupError};
use crate::query;
use crate::view::{self, ComposedView, ViewState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Dataset compiled into the binary
const BUNDLED_CARDS: &str = include_str!("../data/cards.json");

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read card dataset {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse card dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<Card>,
}

impl Catalog {
    pub fn new(cards: Vec<Card>) -> Self {
        Catalog { cards }
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CARDS)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        tracing::debug!(count = cards.len(), "parsed card dataset");
        Ok(Catalog { cards })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), count = catalog.len(), "loaded card dataset");
        Ok(catalog)
    }

    /// External file when given, bundled dataset otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::bundled(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The browsing list for a given state
    pub fn compose(&self, state: &ViewState) -> ComposedView<'_> {
        view::compose(&self.cards, state)
    }

    pub fn find(&self, id: &str) -> Option<&Card> {
        query::find_by_id(&query::all(&self.cards), id)
    }

    pub fn detail(&self, id: &str) -> Result<CardDetail<'_>, LookupError> {
        detail::lookup(&self.cards, id)
    }

    /// Distinct networks in first-seen order
    pub fn networks(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut networks = Vec::new();
        for network in self.cards.iter().flat_map(|c| c.network.iter()) {
            if seen.insert(network.to_lowercase()) {
                networks.push(network.as_str());
            }
        }
        networks
    }

    pub fn validate(&self) -> QualityReport {
        let mut issues = Vec::new();
        let mut seen_ids = HashSet::new();

        for card in &self.cards {
            if card.id.is_empty() {
                issues.push(QualityIssue::new(Severity::Critical, card, "id", "card has an empty id"));
            } else if !seen_ids.insert(card.id.as_str()) {
                issues.push(QualityIssue::new(Severity::Critical, card, "id", "duplicate card id"));
            }

            if card.bank_name.trim().is_empty() {
                issues.push(QualityIssue::new(Severity::Warning, card, "bankName", "bank name is empty"));
            }

            if card.card_name.trim().is_empty() {
                issues.push(QualityIssue::new(Severity::Warning, card, "cardName", "card name is empty"));
            }

            if card.credit_limit > 100 {
                issues.push(QualityIssue::new(
                    Severity::Critical,
                    card,
                    "creditLimit",
                    &format!("credit limit {}% is above 100%", card.credit_limit),
                ));
            }

            if card.network.is_empty() {
                issues.push(QualityIssue::new(Severity::Warning, card, "network", "no payment network listed"));
            }

            if card.is_cobranded {
                if card.cobrand_partner.as_deref().map_or(true, str::is_empty) {
                    issues.push(QualityIssue::new(
                        Severity::Warning,
                        card,
                        "cobrandPartner",
                        "co-branded card without a partner name",
                    ));
                }
                if card.cobrand_partner_icon.as_deref().map_or(true, str::is_empty) {
                    issues.push(QualityIssue::new(
                        Severity::Warning,
                        card,
                        "cobrandPartnerIcon",
                        "co-branded card without a partner icon",
                    ));
                }
            }

            if card.website_url.trim().is_empty() {
                issues.push(QualityIssue::new(Severity::Info, card, "websiteUrl", "no website link"));
            }
        }

        for issue in &issues {
            match issue.severity {
                Severity::Critical => tracing::warn!(card = %issue.card_id, field = %issue.field, "{}", issue.issue),
                _ => tracing::debug!(card = %issue.card_id, field = %issue.field, "{}", issue.issue),
            }
        }

        QualityReport {
            card_count: self.cards.len(),
            issues,
        }
    }
}

// ============================================================================
// DATA QUALITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Breaks lookups or filtering
    Warning,  // Card renders incompletely
    Info,     // Cosmetic
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub card_id: String,
    pub field: String,
    pub issue: String,
}

impl QualityIssue {
    fn new(severity: Severity, card: &Card, field: &str, issue: &str) -> Self {
        QualityIssue {
            severity,
            card_id: card.id.clone(),
            field: field.to_string(),
            issue: issue.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub card_count: usize,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.count(Severity::Critical) > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} cards, {} issues ({} critical, {} warnings)",
            self.card_count,
            self.issues.len(),
            self.count(Severity::Critical),
            self.count(Severity::Warning)
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(id: &str) -> Card {
        let mut card = Card::new(id, "Test Bank", "Test Card", 5000).with_network(&["VISA"]);
        card.credit_limit = 90;
        card.website_url = "https://example.com".to_string();
        card
    }

    #[test]
    fn test_bundled_dataset_loads_and_is_clean() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.is_empty());

        let report = catalog.validate();
        assert!(!report.has_critical_issues(), "{:?}", report.issues);
    }

    #[test]
    fn test_bundled_ids_are_unique() {
        let catalog = Catalog::bundled().unwrap();
        let ids: HashSet<&str> = catalog.cards().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_parse_error() {
        let err = Catalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Catalog::from_path("/definitely/not/here/cards.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_load_keeps_duplicates() {
        let catalog = Catalog::new(vec![complete("dup"), complete("dup")]);
        assert_eq!(catalog.len(), 2);

        let report = catalog.validate();
        assert_eq!(report.count(Severity::Critical), 1);
        assert_eq!(report.issues[0].field, "id");
    }

    #[test]
    fn test_validate_flags_credit_limit_and_cobrand() {
        let mut over = complete("over");
        over.credit_limit = 120;

        let mut cobranded = complete("cobranded");
        cobranded.is_cobranded = true;
        cobranded.cobrand_partner = Some("Partner".to_string());

        let report = Catalog::new(vec![over, cobranded]).validate();
        let fields: Vec<&str> = report.issues.iter().map(|i| i.field.as_str()).collect();

        assert_eq!(fields, vec!["creditLimit", "cobrandPartnerIcon"]);
        assert!(report.has_critical_issues());
    }

    #[test]
    fn test_validate_minimal_record() {
        let bare = Card::new("bare", "", "", 1000);
        let report = Catalog::new(vec![bare]).validate();

        assert_eq!(report.count(Severity::Critical), 0);
        assert_eq!(report.count(Severity::Warning), 3);
        assert_eq!(report.count(Severity::Info), 1);
        assert_eq!(report.summary(), "1 cards, 4 issues (0 critical, 3 warnings)");
    }

    #[test]
    fn test_networks_first_seen_order() {
        let catalog = Catalog::new(vec![
            Card::new("a", "A", "A", 1).with_network(&["RuPay"]),
            Card::new("b", "B", "B", 1).with_network(&["VISA", "RUPAY"]),
            Card::new("c", "C", "C", 1).with_network(&["Mastercard"]),
        ]);
        assert_eq!(catalog.networks(), vec!["RuPay", "VISA", "Mastercard"]);
    }

    #[test]
    fn test_find_and_detail() {
        let catalog = Catalog::new(vec![complete("one"), complete("two")]);
        assert_eq!(catalog.find("two").map(|c| c.id.as_str()), Some("two"));
        assert!(catalog.detail("three").is_err());
    }
}

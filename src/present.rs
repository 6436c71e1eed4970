// 🎨 Presentation helpers
// Money formatting, fee labels, style lookup tables and USP highlighting.
// Shared by the terminal UI and the HTTP API; nothing here touches the
// query semantics.

use crate::card::Card;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

// ============================================================================
// MONEY
// ============================================================================

/// Indian digit grouping: 100000 → "1,00,000"
pub fn group_indian(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

pub fn format_inr(amount: u64) -> String {
    format!("₹{}", group_indian(amount))
}

/// "None" for the zero-fee sentinel, rupees otherwise
pub fn fee_label(fee: u64) -> String {
    if fee == 0 {
        "None".to_string()
    } else {
        format_inr(fee)
    }
}

/// Credit limits at or above this percent are shown emphasized
pub const GENEROUS_CREDIT_LIMIT: u8 = 90;

pub fn is_generous_credit_limit(percent: u8) -> bool {
    percent >= GENEROUS_CREDIT_LIMIT
}

/// "IDFC FIRST BANK X PARTNER" for co-branded cards, bank name otherwise
pub fn issuer_line(card: &Card) -> String {
    match card.partner() {
        Some(partner) => format!("{} X {}", card.bank_name, partner).to_uppercase(),
        None => card.bank_name.clone(),
    }
}

// ============================================================================
// STYLE TABLE
// ============================================================================

/// Maps a card to a style token.
///
/// Precedence: exact card id, then the first bank-name substring rule in
/// table order, then the default token. Bank matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct StyleTable {
    by_card_id: Vec<(&'static str, &'static str)>,
    by_bank: Vec<(&'static str, &'static str)>,
    default: &'static str,
}

impl StyleTable {
    pub fn new(default: &'static str) -> Self {
        StyleTable {
            by_card_id: Vec::new(),
            by_bank: Vec::new(),
            default,
        }
    }

    pub fn card(mut self, card_id: &'static str, token: &'static str) -> Self {
        self.by_card_id.push((card_id, token));
        self
    }

    pub fn bank(mut self, bank_fragment: &'static str, token: &'static str) -> Self {
        self.by_bank.push((bank_fragment, token));
        self
    }

    pub fn resolve(&self, card: &Card) -> &'static str {
        if let Some((_, token)) = self.by_card_id.iter().find(|(id, _)| *id == card.id) {
            return token;
        }
        self.resolve_bank(&card.bank_name)
    }

    pub fn resolve_bank(&self, bank_name: &str) -> &'static str {
        self.by_bank
            .iter()
            .find(|(fragment, _)| bank_name.contains(fragment))
            .map(|(_, token)| *token)
            .unwrap_or(self.default)
    }

    /// Background accent behind each card, as "from-to" colour pairs
    pub fn card_accents() -> &'static StyleTable {
        static TABLE: OnceLock<StyleTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            StyleTable::new("gray-slate")
                .card("supercard-utkarsh", "purple-pink")
                .card("zet-sbm", "blue-cyan")
                .card("fi-federal", "emerald-teal")
                .card("kotak-dreamdifferent", "pink-rose")
                .card("phonepe-wish", "purple-indigo")
                .card("idfc-wow", "red-orange")
                .card("idfc-earn", "amber-yellow")
                .card("kreditpe-sbm", "violet-purple")
                .card("sbi-unnati", "blue-indigo")
                .card("ssfb-rupay", "sky-blue")
                .card("axis-myzone", "purple-fuchsia")
                .card("mobikwik-first", "red-pink")
                .card("novio-credilio", "slate-gray")
                .bank("IDFC", "red-orange")
                .bank("KOTAK", "pink-rose")
                .bank("HDFC", "orange-amber")
                .bank("AXIS", "purple-violet")
                .bank("SBI", "blue-indigo")
                .bank("Federal", "emerald-teal")
        })
    }

    /// Placeholder logo colour for banks without an icon
    pub fn bank_logo_colors() -> &'static StyleTable {
        static TABLE: OnceLock<StyleTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            StyleTable::new("#1F2937")
                .bank("IDFC", "#D32F2F")
                .bank("KOTAK", "#E91E63")
                .bank("HDFC", "#1565C0")
                .bank("AXIS", "#7B1FA2")
                .bank("SBI", "#1976D2")
                .bank("SBM", "#FF6600")
        })
    }
}

// ============================================================================
// USP HIGHLIGHTING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Segment {
            text: text.to_string(),
            emphasized: false,
        }
    }

    fn strong(text: &str) -> Self {
        Segment {
            text: text.to_string(),
            emphasized: true,
        }
    }
}

// Longer phrases come first so "FD from ₹5,000" or "100% approval" are
// emphasized whole instead of just their number.
const USP_PATTERN: &str = r"(?i)FD from ₹[\d,]+|FD of ₹[\d,]+|FD ₹[\d,]+|up to [\d.]+% interest|100% approval|interest on FD|lifetime[- ]free|joining fee|annual fee|no fee|cashback|instant|\d+\.?\d*%|₹[\d,]+";

fn usp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(USP_PATTERN).expect("USP pattern is valid"))
}

/// Split bullet text into plain and emphasized segments.
///
/// Concatenating the segment texts gives back the input.
pub fn highlight(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in usp_regex().find_iter(text) {
        if m.start() > last {
            segments.push(Segment::plain(&text[last..m.start()]));
        }
        segments.push(Segment::strong(m.as_str()));
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::plain(&text[last..]));
    }

    segments
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(5000), "5,000");
        assert_eq!(group_indian(25000), "25,000");
        assert_eq!(group_indian(100000), "1,00,000");
        assert_eq!(group_indian(12345678), "1,23,45,678");
    }

    #[test]
    fn test_fee_label() {
        assert_eq!(fee_label(0), "None");
        assert_eq!(fee_label(1500), "₹1,500");
    }

    #[test]
    fn test_issuer_line() {
        let mut card = Card::new("zet-sbm", "SBM Bank", "Zet Card", 2000);
        assert_eq!(issuer_line(&card), "SBM Bank");

        card.is_cobranded = true;
        card.cobrand_partner = Some("Zet".to_string());
        assert_eq!(issuer_line(&card), "SBM BANK X ZET");
    }

    #[test]
    fn test_style_precedence_card_id_first() {
        // Card id rule wins over the IDFC bank rule
        let card = Card::new("idfc-earn", "IDFC FIRST Bank", "EARN", 5000);
        assert_eq!(StyleTable::card_accents().resolve(&card), "amber-yellow");
    }

    #[test]
    fn test_style_bank_fallback_then_default() {
        let table = StyleTable::card_accents();
        let hdfc = Card::new("hdfc-unknown", "HDFC Bank", "Anything", 1000);
        assert_eq!(table.resolve(&hdfc), "orange-amber");

        let other = Card::new("other", "Some Bank", "Anything", 1000);
        assert_eq!(table.resolve(&other), "gray-slate");

        // Bank rules are case-sensitive
        let lower = Card::new("lower", "hdfc bank", "Anything", 1000);
        assert_eq!(table.resolve(&lower), "gray-slate");
    }

    #[test]
    fn test_bank_rules_follow_table_order() {
        let table = StyleTable::new("none").bank("SBI", "first").bank("SBI Card", "second");
        assert_eq!(table.resolve_bank("SBI Card"), "first");
    }

    #[test]
    fn test_bank_logo_colors() {
        let table = StyleTable::bank_logo_colors();
        assert_eq!(table.resolve_bank("SBM Bank India"), "#FF6600");
        assert_eq!(table.resolve_bank("Utkarsh Small Finance Bank"), "#1F2937");
    }

    #[test]
    fn test_highlight_segments() {
        let segments = highlight("Get 5% cashback with FD from ₹2,000");
        assert_eq!(
            segments,
            vec![
                Segment::plain("Get "),
                Segment::strong("5%"),
                Segment::plain(" "),
                Segment::strong("cashback"),
                Segment::plain(" with "),
                Segment::strong("FD from ₹2,000"),
            ]
        );
    }

    #[test]
    fn test_highlight_prefers_whole_phrases() {
        let segments = highlight("100% approval, up to 7.5% interest");
        let strong: Vec<&str> = segments
            .iter()
            .filter(|s| s.emphasized)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(strong, vec!["100% approval", "up to 7.5% interest"]);
    }

    #[test]
    fn test_highlight_round_trips_text() {
        let text = "Lifetime free card with no fee and Instant issuance";
        let joined: String = highlight(text).into_iter().map(|s| s.text).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_highlight_plain_text() {
        assert_eq!(highlight("Build your credit"), vec![Segment::plain("Build your credit")]);
        assert!(highlight("").is_empty());
    }
}

// 🧭 View Composer - browsing state → ordered list of cards
//
// The browsing page keeps three pieces of state (threshold mode, threshold
// amount, search text). They live in one immutable `ViewState`; every change
// produces a new state and the list is recomposed from scratch.

use crate::card::Card;
use crate::query::{self, ThresholdMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// THRESHOLD MODE (UI side)
// ============================================================================

impl ThresholdMode {
    pub fn toggle(self) -> Self {
        match self {
            ThresholdMode::AtMostUserBudget => ThresholdMode::AtLeastAmount,
            ThresholdMode::AtLeastAmount => ThresholdMode::AtMostUserBudget,
        }
    }

    /// Label shown on the toggle button.
    ///
    /// "Maximum" selects cards with `min_fd >= amount`. The label reads
    /// backwards but the behavior is what users of the catalog rely on.
    pub fn label(&self) -> &'static str {
        match self {
            ThresholdMode::AtMostUserBudget => "Minimum",
            ThresholdMode::AtLeastAmount => "Maximum",
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown threshold mode '{0}' (expected 'minimum' or 'maximum')")]
pub struct ParseModeError(pub String);

impl FromStr for ThresholdMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimum" | "min" | "at-most" => Ok(ThresholdMode::AtMostUserBudget),
            "maximum" | "max" | "at-least" => Ok(ThresholdMode::AtLeastAmount),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Turn raw amount input into a threshold.
///
/// Non-digit characters are dropped (so "₹10,000" reads as 10000). Empty or
/// overflowing input becomes 0, the "no threshold" sentinel.
pub fn normalize_amount(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

// ============================================================================
// VIEW STATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewState {
    pub mode: ThresholdMode,

    /// 0 = no threshold
    pub amount: u64,

    pub search: String,
}

impl ViewState {
    pub fn new(mode: ThresholdMode, amount: u64, search: &str) -> Self {
        ViewState {
            mode,
            amount,
            search: search.to_string(),
        }
    }

    pub fn with_mode(&self, mode: ThresholdMode) -> Self {
        ViewState { mode, ..self.clone() }
    }

    pub fn with_amount(&self, amount: u64) -> Self {
        ViewState { amount, ..self.clone() }
    }

    pub fn with_search(&self, search: &str) -> Self {
        ViewState {
            search: search.to_string(),
            ..self.clone()
        }
    }

    pub fn toggled(&self) -> Self {
        self.with_mode(self.mode.toggle())
    }

    /// Threshold or search currently narrows the list
    pub fn is_filtering(&self) -> bool {
        self.amount > 0 || !self.search.trim().is_empty()
    }
}

// ============================================================================
// COMPOSED VIEW
// ============================================================================

/// Ordered cards to display for one `ViewState`
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedView<'a> {
    pub cards: Vec<&'a Card>,
}

impl<'a> ComposedView<'a> {
    /// Nothing matched; the surface shows its own "no results" message
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Card> + '_ {
        self.cards.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<&'a Card> {
        self.cards.get(index).copied()
    }
}

/// Threshold, then search, then ascending sort by minimum FD.
///
/// The sort is always ascending, whatever the threshold mode.
pub fn compose<'a>(dataset: &'a [Card], state: &ViewState) -> ComposedView<'a> {
    let mut cards = query::all(dataset);

    if state.amount > 0 {
        cards = query::threshold_filter(&cards, state.amount, state.mode);
    }

    if !state.search.trim().is_empty() {
        cards = query::text_search(&cards, &state.search);
    }

    let cards = query::sort_by_min_fd(&cards, true);

    tracing::debug!(
        mode = ?state.mode,
        amount = state.amount,
        search = %state.search,
        shown = cards.len(),
        total = dataset.len(),
        "composed card view"
    );

    ComposedView { cards }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Vec<Card> {
        vec![
            Card::new("a", "Alpha Bank", "Visa Signature", 5000).with_network(&["Mastercard"]),
            Card::new("b", "Beta Bank", "Beta Card", 2000).with_network(&["VISA"]),
            Card::new("c", "Gamma Bank", "Gamma Card", 2000).with_network(&["RuPay"]),
            Card::new("d", "Delta Bank", "Delta Card", 4000).with_network(&["VISA", "RuPay"]),
            Card::new("e", "Epsilon Bank", "Epsilon", 8000).with_network(&["RuPay"]),
        ]
    }

    fn ids(view: &ComposedView<'_>) -> Vec<String> {
        view.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_default_state_shows_everything_sorted() {
        let ds = dataset();
        let view = compose(&ds, &ViewState::default());
        assert_eq!(ids(&view), vec!["b", "c", "d", "a", "e"]);
    }

    #[test]
    fn test_at_least_amount_with_search() {
        let ds = dataset();
        let state = ViewState::new(ThresholdMode::AtLeastAmount, 4000, "visa");
        let view = compose(&ds, &state);
        // "a" matches on card name, "d" on network; "e" has no "visa"
        assert_eq!(ids(&view), vec!["d", "a"]);
    }

    #[test]
    fn test_sort_is_ascending_in_both_modes() {
        let ds = dataset();
        let view = compose(&ds, &ViewState::new(ThresholdMode::AtLeastAmount, 3000, ""));
        assert_eq!(ids(&view), vec!["d", "a", "e"]);

        let view = compose(&ds, &ViewState::new(ThresholdMode::AtMostUserBudget, 5000, ""));
        assert_eq!(ids(&view), vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let ds = dataset();
        let view = compose(&ds, &ViewState::default().with_search("   "));
        assert_eq!(view.len(), ds.len());
    }

    #[test]
    fn test_empty_result_is_signalled() {
        let ds = dataset();
        let view = compose(&ds, &ViewState::default().with_search("no such bank"));
        assert!(view.is_empty());
        assert!(view.get(0).is_none());
    }

    #[test]
    fn test_compose_is_pure() {
        let ds = dataset();
        let state = ViewState::new(ThresholdMode::AtMostUserBudget, 4000, "bank");
        assert_eq!(compose(&ds, &state), compose(&ds, &state));
    }

    #[test]
    fn test_builders_do_not_mutate() {
        let base = ViewState::default();
        let next = base.with_amount(1000).with_search("hdfc").toggled();

        assert_eq!(base, ViewState::default());
        assert_eq!(next.mode, ThresholdMode::AtLeastAmount);
        assert_eq!(next.amount, 1000);
        assert!(next.is_filtering());
        assert!(!base.is_filtering());
    }

    #[test]
    fn test_mode_toggle_and_labels() {
        assert_eq!(ThresholdMode::default().label(), "Minimum");
        assert_eq!(ThresholdMode::default().toggle().label(), "Maximum");
        assert_eq!(ThresholdMode::AtLeastAmount.toggle(), ThresholdMode::AtMostUserBudget);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("minimum".parse::<ThresholdMode>(), Ok(ThresholdMode::AtMostUserBudget));
        assert_eq!("MAX".parse::<ThresholdMode>(), Ok(ThresholdMode::AtLeastAmount));
        assert!("sideways".parse::<ThresholdMode>().is_err());
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount("10000"), 10000);
        assert_eq!(normalize_amount("₹10,000"), 10000);
        assert_eq!(normalize_amount(""), 0);
        assert_eq!(normalize_amount("abc"), 0);
        assert_eq!(normalize_amount("99999999999999999999999"), 0);
    }
}

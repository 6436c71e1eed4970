// 🔎 Query Module - filters, sort and lookup over card views
//
// Every function takes a view (`&[&Card]`) and returns a new view.
// Inputs are never touched, filters keep relative order, and nothing here
// errors: an empty view in gives an empty view out.

use crate::card::Card;
use serde::{Deserialize, Serialize};

// ============================================================================
// THRESHOLD MODE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// Cards the user can afford: `min_fd <= amount` (UI label "Minimum")
    #[default]
    AtMostUserBudget,

    /// Cards requiring at least this deposit: `min_fd >= amount` (UI label "Maximum")
    AtLeastAmount,
}

/// Identity view over a dataset
pub fn all(cards: &[Card]) -> Vec<&Card> {
    cards.iter().collect()
}

// ============================================================================
// FILTERS
// ============================================================================

/// Filter by FD amount. `amount == 0` means "no threshold set".
pub fn threshold_filter<'a>(cards: &[&'a Card], amount: u64, mode: ThresholdMode) -> Vec<&'a Card> {
    if amount == 0 {
        return cards.to_vec();
    }

    cards
        .iter()
        .copied()
        .filter(|card| match mode {
            ThresholdMode::AtMostUserBudget => card.min_fd <= amount,
            ThresholdMode::AtLeastAmount => card.min_fd >= amount,
        })
        .collect()
}

/// Case-insensitive substring search over bank name, card name and networks.
/// Blank queries are a no-op. Otherwise the query is matched as typed,
/// surrounding whitespace included.
pub fn text_search<'a>(cards: &[&'a Card], query: &str) -> Vec<&'a Card> {
    if query.trim().is_empty() {
        return cards.to_vec();
    }

    let needle = query.to_lowercase();
    cards
        .iter()
        .copied()
        .filter(|card| {
            contains_ignore_case(&card.bank_name, &needle)
                || contains_ignore_case(&card.card_name, &needle)
                || card.network.iter().any(|n| contains_ignore_case(n, &needle))
        })
        .collect()
}

/// Exact (case-insensitive) network match, not substring
pub fn network_filter<'a>(cards: &[&'a Card], network: &str) -> Vec<&'a Card> {
    if network.is_empty() {
        return cards.to_vec();
    }

    let wanted = network.to_lowercase();
    cards
        .iter()
        .copied()
        .filter(|card| card.network.iter().any(|n| n.to_lowercase() == wanted))
        .collect()
}

/// Cards with neither joining nor annual fee
pub fn zero_fee_filter<'a>(cards: &[&'a Card]) -> Vec<&'a Card> {
    cards.iter().copied().filter(|card| card.is_zero_fee()).collect()
}

pub fn bank_filter<'a>(cards: &[&'a Card], bank_name: &str) -> Vec<&'a Card> {
    if bank_name.is_empty() {
        return cards.to_vec();
    }

    let needle = bank_name.to_lowercase();
    cards
        .iter()
        .copied()
        .filter(|card| contains_ignore_case(&card.bank_name, &needle))
        .collect()
}

// ============================================================================
// SORT & LOOKUP
// ============================================================================

/// Stable sort by minimum FD. Equal deposits keep their input order in both
/// directions.
pub fn sort_by_min_fd<'a>(cards: &[&'a Card], ascending: bool) -> Vec<&'a Card> {
    let mut sorted = cards.to_vec();
    if ascending {
        sorted.sort_by(|a, b| a.min_fd.cmp(&b.min_fd));
    } else {
        sorted.sort_by(|a, b| b.min_fd.cmp(&a.min_fd));
    }
    sorted
}

/// First card whose id equals `id` exactly (case-sensitive)
pub fn find_by_id<'a>(cards: &[&'a Card], id: &str) -> Option<&'a Card> {
    cards.iter().copied().find(|card| card.id == id)
}

/// `needle` must already be lowercase
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

// ============================================================================
// TESTS
// ============================================================================

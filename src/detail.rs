// 🪪 Detail Lookup - one card by id, ready for the detail page
//
// The id comes from navigation state and is matched exactly. A miss is a
// plain `LookupError::NotFound`; the caller chooses where to send the user.

use crate::card::Card;
use crate::present::{self, Segment, StyleTable};
use crate::query;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("card not found: {id}")]
    NotFound { id: String },
}

/// Card plus the derived fields the detail page shows
#[derive(Debug, Clone, Serialize)]
pub struct CardDetail<'a> {
    pub card: &'a Card,
    pub issuer_line: String,
    pub min_fd_label: String,
    pub joining_fee_label: String,
    pub annual_fee_label: String,
    pub credit_limit_label: String,
    pub credit_limit_emphasized: bool,
    pub network_label: String,
    pub best_for_you: Vec<Vec<Segment>>,
    pub highlights: Vec<Vec<Segment>>,
    pub accent: &'static str,
}

impl<'a> CardDetail<'a> {
    pub fn new(card: &'a Card) -> Self {
        CardDetail {
            card,
            issuer_line: present::issuer_line(card),
            min_fd_label: present::format_inr(card.min_fd),
            joining_fee_label: present::fee_label(card.joining_fee),
            annual_fee_label: present::fee_label(card.annual_fee),
            credit_limit_label: format!("{}%", card.credit_limit),
            credit_limit_emphasized: present::is_generous_credit_limit(card.credit_limit),
            network_label: card.network.join(", "),
            best_for_you: card.best_for_you.iter().map(|b| present::highlight(b)).collect(),
            highlights: card.highlights.iter().map(|h| present::highlight(h)).collect(),
            accent: StyleTable::card_accents().resolve(card),
        }
    }
}

pub fn lookup<'a>(cards: &'a [Card], id: &str) -> Result<CardDetail<'a>, LookupError> {
    match query::find_by_id(&query::all(cards), id) {
        Some(card) => Ok(CardDetail::new(card)),
        None => {
            tracing::debug!(id, "card lookup missed");
            Err(LookupError::NotFound { id: id.to_string() })
        }
    }
}

// SeCards - Secured Card Catalog Library
// Exposes the catalog core for the CLI, TUI, API server, and tests

pub mod card;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod present;
pub mod query;
pub mod view;

// Re-export commonly used types
pub use card::{Card, CardOrientation};
pub use catalog::{Catalog, CatalogError, QualityIssue, QualityReport, Severity};
pub use config::Config;
pub use detail::{lookup, CardDetail, LookupError};
pub use present::{format_inr, highlight, Segment, StyleTable};
pub use query::{
    bank_filter, find_by_id, network_filter, sort_by_min_fd, text_search, threshold_filter,
    zero_fee_filter, ThresholdMode,
};
pub use view::{compose, normalize_amount, ComposedView, ParseModeError, ViewState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

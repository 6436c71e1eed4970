// SeCards - Web Server
// Read-only JSON API over the card catalog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use secards::config::{self, Config};
use secards::query;
use secards::{normalize_amount, Card, CardDetail, Catalog, LookupError, ThresholdMode, ViewState};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Where the client should navigate instead
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            redirect: None,
        }
    }

    fn not_found(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            redirect: Some("/"),
        }
    }
}

/// Query string for the list view
#[derive(Debug, Default, Deserialize)]
struct CardsQuery {
    mode: Option<String>,
    amount: Option<String>,
    q: Option<String>,
    network: Option<String>,
    bank: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    zero_fee: bool,
}

/// Query-string flag: true/false, 1/0, yes/no, on/off (case-insensitive, empty is false)
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(de::Error::invalid_value(Unexpected::Str(&raw), &"a boolean flag")),
    }
}

impl CardsQuery {
    /// Unknown modes fall back to the default ("minimum")
    fn view_state(&self) -> ViewState {
        let mode = self
            .mode
            .as_deref()
            .and_then(|m| m.parse::<ThresholdMode>().ok())
            .unwrap_or_default();
        let amount = self.amount.as_deref().map(normalize_amount).unwrap_or(0);

        ViewState::new(mode, amount, self.q.as_deref().unwrap_or(""))
    }

    /// Composed view, then the extra stable filters (sort order survives)
    fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Card> {
        let mut cards = catalog.compose(&self.view_state()).cards;

        if let Some(network) = self.network.as_deref() {
            cards = query::network_filter(&cards, network);
        }
        if let Some(bank) = self.bank.as_deref() {
            cards = query::bank_filter(&cards, bank);
        }
        if self.zero_fee {
            cards = query::zero_fee_filter(&cards);
        }

        cards
    }
}

#[derive(Serialize)]
struct CardsResponse<'a> {
    total: usize,
    shown: usize,
    mode_label: &'static str,
    cards: Vec<&'a Card>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/cards - Composed list view
async fn list_cards(State(state): State<AppState>, Query(params): Query<CardsQuery>) -> Response {
    let cards = params.apply(&state.catalog);
    tracing::info!(?params, shown = cards.len(), "list cards");

    let body = CardsResponse {
        total: state.catalog.len(),
        shown: cards.len(),
        mode_label: params.view_state().mode.label(),
        cards,
    };

    (StatusCode::OK, Json(ApiResponse::ok(body))).into_response()
}

/// GET /api/cards/:id - Card detail
async fn get_card(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.detail(&id) {
        Ok(detail) => (StatusCode::OK, Json(ApiResponse::ok(detail))).into_response(),
        Err(err @ LookupError::NotFound { .. }) => {
            tracing::info!(%id, "card not found");
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<CardDetail>::not_found(err.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/networks - Distinct payment networks
async fn list_networks(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(state.catalog.networks()))).into_response()
}

fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/cards", get(list_cards))
        .route("/cards/:id", get(get_card))
        .route("/networks", get(list_networks))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::init_logging();

    let config = Config::from_env();
    let catalog = Catalog::load(config.data_path.as_deref())?;

    let report = catalog.validate();
    if report.has_critical_issues() {
        tracing::warn!("{}", report.summary());
    }
    tracing::info!(cards = catalog.len(), "catalog loaded");

    let state = AppState {
        catalog: Arc::new(catalog),
    };
    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on http://{}", addr);
    tracing::info!("  API: http://{}/api/cards", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

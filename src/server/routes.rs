use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};

use crate::provider::MarketDataProvider;
use crate::symbol::to_provider_ticker;
use crate::window::{clean_history, AnalysisResponse};

use super::error::ApiError;
use super::page::INDEX_HTML;
use super::AppState;

// ── Query params ─────────────────────────────────────────────────────────

/// Raw `/api` query pairs. A repeated `symbol` is not a rejection: the first
/// one wins and the rest are ignored.
type AnalyzeQuery = Vec<(String, String)>;

fn first_param<'a>(pairs: &'a AnalyzeQuery, key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

// ── Route definitions ────────────────────────────────────────────────────

pub fn routes<P: MarketDataProvider + 'static>() -> Router<Arc<AppState<P>>> {
    Router::new()
        .route("/", get(index))
        .route("/api", get(api_analyze::<P>))
        .route("/ping", get(ping))
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn ping() -> &'static str {
    "ok"
}

async fn api_analyze<P: MarketDataProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(q): Query<AnalyzeQuery>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let symbol = first_param(&q, "symbol").unwrap_or_default().trim();
    if symbol.is_empty() {
        return Err(ApiError::MissingSymbol);
    }

    let ticker = to_provider_ticker(symbol);
    let lookback_days = state.config.lookback_days();

    let bars = state
        .provider
        .fetch_daily(&ticker, lookback_days)
        .await
        .map_err(|e| {
            tracing::warn!(%symbol, %ticker, error = %e, "data fetch failed");
            ApiError::Fetch(e)
        })?;
    let bars = clean_history(bars);

    let response = AnalysisResponse::build(symbol, ticker, &bars, &state.config);
    tracing::info!(
        symbol = %response.symbol,
        ticker = %response.ticker,
        bars = bars.len(),
        "analysis complete"
    );

    Ok(Json(response))
}

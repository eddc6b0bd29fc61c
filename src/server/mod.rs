//! HTTP surface: analyzer page, JSON API and liveness probe
//!
//! - `GET /` - analyzer page
//! - `GET /api?symbol=<code market>` - trailing-window candle counts
//! - `GET /ping` - `ok`

pub mod config;
pub mod error;
pub mod page;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::params::AnalyzerConfig;
use crate::provider::MarketDataProvider;

pub use config::ServerConfig;
pub use error::ApiError;

/// Read-only state shared by all handlers
pub struct AppState<P> {
    pub config: AnalyzerConfig,
    pub provider: P,
}

impl<P: MarketDataProvider> AppState<P> {
    pub fn new(config: AnalyzerConfig, provider: P) -> Arc<Self> {
        Arc::new(Self { config, provider })
    }
}

/// Assemble the application router.
pub fn router<P: MarketDataProvider + 'static>(state: Arc<AppState<P>>) -> Router {
    routes::routes::<P>()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use std::net::SocketAddr;

use candlestat::params::Thresholds;
use candlestat::provider::YahooChartProvider;
use candlestat::server::{self, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = ServerConfig::from_env()?;
    let addr: SocketAddr = format!("{}:{}", cfg.bind, cfg.port).parse()?;
    let provider = YahooChartProvider::new(&cfg.data_url, &cfg.user_agent)?;

    tracing::info!(
        periods = ?cfg.analyzer.periods().iter().map(|p| p.get()).collect::<Vec<_>>(),
        lookback_days = cfg.analyzer.lookback_days(),
        data_url = %cfg.data_url,
        "analyzer configured"
    );
    let thresholds = cfg.analyzer.thresholds();
    for meta in Thresholds::param_meta() {
        tracing::info!(
            param = meta.name,
            value = thresholds.get(meta.name).map(|r| r.get()),
            default = meta.default,
            "{}",
            meta.description
        );
    }

    let app = server::router(AppState::new(cfg.analyzer, provider));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("candlestat listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping");
}

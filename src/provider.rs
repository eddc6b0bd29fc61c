//! Daily price history from an external market-data provider
//!
//! The default provider is Yahoo's chart endpoint
//! (`/v8/finance/chart/{ticker}?range=Nd&interval=1d`). One request per
//! analysis, no retries and no client-side timeout: a failure surfaces to the
//! caller immediately.

use std::future::Future;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::Bar;

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// The chart endpoint rejects requests without a browser-like agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; candlestat)";

// ============================================================
// ERRORS
// ============================================================

/// Failure to obtain price history. The Display text is shown to API clients.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status} for {ticker}")]
    Status { ticker: String, status: u16 },

    #[error("{code}: {description}")]
    Provider { code: String, description: String },

    #[error("no chart data returned for {0}")]
    MissingResult(String),

    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid provider URL {0}")]
    InvalidUrl(String),
}

// ============================================================
// PROVIDER TRAIT
// ============================================================

/// Source of daily OHLC bars, oldest first, rows with missing fields removed
pub trait MarketDataProvider: Send + Sync {
    fn fetch_daily(
        &self,
        ticker: &str,
        lookback_days: usize,
    ) -> impl Future<Output = Result<Vec<Bar>, FetchError>> + Send;
}

// ============================================================
// YAHOO CHART PROVIDER
// ============================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance chart API client
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    base_url: Url,
    http: Client,
}

impl YahooChartProvider {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, FetchError> {
        let http = Client::builder().user_agent(user_agent).build()?;
        Self::with_client(base_url, http)
    }

    /// Use a preconfigured client, e.g. one with its own proxy settings
    pub fn with_client(base_url: &str, http: Client) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { base_url, http })
    }

    fn chart_url(&self, ticker: &str) -> Url {
        let mut url = self.base_url.clone();
        // checked in new(): the base always has path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(ticker);
        }
        url
    }
}

impl MarketDataProvider for YahooChartProvider {
    async fn fetch_daily(&self, ticker: &str, lookback_days: usize) -> Result<Vec<Bar>, FetchError> {
        let url = self.chart_url(ticker);
        tracing::debug!(%url, lookback_days, "requesting daily chart");

        let response = self
            .http
            .get(url)
            .query(&[("range", format!("{lookback_days}d")), ("interval", "1d".to_string())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Unknown tickers come back as 404 with a JSON error body
        match serde_json::from_str::<ChartResponse>(&body) {
            Ok(chart) if chart.chart.error.is_some() || status.is_success() => {
                parse_chart(ticker, chart)
            }
            Err(e) if status.is_success() => Err(FetchError::Decode(e)),
            _ => Err(FetchError::Status {
                ticker: ticker.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

/// Turn a chart payload into bars, dropping rows with any missing field.
///
/// Volume is not part of a [`Bar`], but a row without it is still incomplete
/// and is dropped like one with a missing price.
fn parse_chart(ticker: &str, response: ChartResponse) -> Result<Vec<Bar>, FetchError> {
    let chart = response.chart;
    if let Some(error) = chart.error {
        return Err(FetchError::Provider {
            code: error.code,
            description: error.description,
        });
    }

    let data = chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| FetchError::MissingResult(ticker.to_string()))?;

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    fn at(series: &[Option<f64>], i: usize) -> Option<f64> {
        series.get(i).copied().flatten()
    }

    let bars: Vec<Bar> = data
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let open = at(&quote.open, i)?;
            let high = at(&quote.high, i)?;
            let low = at(&quote.low, i)?;
            let close = at(&quote.close, i)?;
            at(&quote.volume, i)?;
            Some(Bar::new(open, high, low, close).with_timestamp(ts))
        })
        .collect();

    tracing::debug!(
        ticker,
        rows = data.timestamp.len(),
        bars = bars.len(),
        "parsed daily chart"
    );

    Ok(bars)
}

// ============================================================
// TESTS
// ============================================================

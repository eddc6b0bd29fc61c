//! Trailing-window selection and the per-symbol analysis report

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    classify::{classify, CandleCounts},
    params::{AnalyzerConfig, Thresholds},
    OHLCExt, Period, OHLC,
};

/// The last `period` bars, or None when the history is shorter than the period
#[inline]
pub fn trailing<T>(bars: &[T], period: Period) -> Option<&[T]> {
    bars.len()
        .checked_sub(period.get())
        .map(|start| &bars[start..])
}

/// Counts over the last `period` bars.
///
/// Insufficient history yields all zeros rather than a partial window.
pub fn analyze_window<T: OHLC>(bars: &[T], period: Period, thresholds: &Thresholds) -> CandleCounts {
    trailing(bars, period)
        .map(|window| classify(window, thresholds))
        .unwrap_or_default()
}

/// Counts for every configured period, keyed in ascending period order
pub fn analyze_windows<T: OHLC>(bars: &[T], config: &AnalyzerConfig) -> BTreeMap<Period, CandleCounts> {
    config
        .periods()
        .iter()
        .map(|&period| (period, analyze_window(bars, period, config.thresholds())))
        .collect()
}

/// Drop bars with non-finite prices, keeping order.
///
/// Bars that are finite but break `low <= body <= high` are kept; the
/// provider occasionally reports adjusted opens slightly outside the range
/// and dropping them would shift every window by a day.
pub fn clean_history<T: OHLC>(mut bars: Vec<T>) -> Vec<T> {
    let before = bars.len();
    bars.retain(|bar| bar.is_finite());

    let dropped = before - bars.len();
    let inconsistent = bars.iter().filter(|bar| bar.validate().is_err()).count();
    if dropped > 0 || inconsistent > 0 {
        tracing::debug!(dropped, inconsistent, kept = bars.len(), "cleaned price history");
    }

    bars
}

// ============================================================
// ANALYSIS REPORT
// ============================================================

/// JSON body returned by `GET /api`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Symbol as entered by the user (trimmed)
    pub symbol: String,
    /// Provider ticker the symbol was normalized to
    pub ticker: String,
    pub periods: Vec<Period>,
    pub results: BTreeMap<Period, CandleCounts>,
}

impl AnalysisResponse {
    pub fn build<T: OHLC>(
        symbol: impl Into<String>,
        ticker: impl Into<String>,
        bars: &[T],
        config: &AnalyzerConfig,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            ticker: ticker.into(),
            periods: config.periods().to_vec(),
            results: analyze_windows(bars, config),
        }
    }
}

// ============================================================
// TESTS
// ============================================================

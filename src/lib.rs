//! # candlestat - trailing-window candlestick statistics
//!
//! Counts simple candle categories (bullish, bearish, doji, long upper shadow,
//! long lower shadow) over a fixed set of trailing windows of daily bars, and
//! serves the result over a small HTTP API.
//!
//! ## Quick Start
//!
//! ```rust
//! use candlestat::prelude::*;
//!
//! let config = AnalyzerConfig::default();
//! let bars = vec![Bar::new(10.0, 12.5, 9.5, 12.0); 30];
//!
//! let results = analyze_windows(&bars, &config);
//! let p5 = Period::new(5).unwrap();
//! assert_eq!(results[&p5].bullish, 5);
//!
//! // 60-bar window has insufficient history
//! let p60 = Period::new(60).unwrap();
//! assert_eq!(results[&p60], CandleCounts::default());
//! ```

pub mod classify;
pub mod params;
pub mod provider;
pub mod server;
pub mod symbol;
pub mod window;

pub mod prelude {
    pub use crate::{
        // Classification
        classify::{classify, classify_bar, BarClass, CandleCounts},
        // Configuration
        params::{get_ratio, AnalyzerConfig, ParamMeta, Thresholds},
        // Data source
        provider::{FetchError, MarketDataProvider, YahooChartProvider},
        // Symbols
        symbol::{to_provider_ticker, Market},
        // Windows
        window::{analyze_window, analyze_windows, clean_history, trailing, AnalysisResponse},
        // Types
        Bar,
        // Errors
        CandleError,
        OHLCExt,
        Period,
        Ratio,
        Result,
        OHLC,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, CandleError>;

/// Errors raised while building configuration or validating bars
#[derive(Debug, Clone, thiserror::Error)]
pub enum CandleError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid OHLC at index {index}: {reason}")]
    InvalidOHLC { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(CandleError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(CandleError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

/// Trailing window length in bars (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(CandleError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Serializes as a bare integer; as a JSON map key this becomes "5", "10", ...
impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLC TRAITS
// ============================================================

/// Core OHLC data trait
pub trait OHLC {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLC data
pub trait OHLCExt: OHLC {
    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Upper + lower shadow as ratio of range. Returns None for a zero-range bar
    #[inline]
    fn shadow_ratio(&self) -> Option<f64> {
        let range = self.range();
        (range > 0.0).then(|| (self.upper_shadow() + self.lower_shadow()) / range)
    }

    #[inline]
    fn upper_shadow_ratio(&self) -> Option<f64> {
        let range = self.range();
        (range > 0.0).then(|| self.upper_shadow() / range)
    }

    #[inline]
    fn lower_shadow_ratio(&self) -> Option<f64> {
        let range = self.range();
        (range > 0.0).then(|| self.lower_shadow() / range)
    }

    /// All four prices are finite numbers
    #[inline]
    fn is_finite(&self) -> bool {
        self.open().is_finite()
            && self.high().is_finite()
            && self.low().is_finite()
            && self.close().is_finite()
    }

    /// Validate OHLC data consistency
    fn validate(&self) -> Result<()> {
        if !self.is_finite() {
            return Err(CandleError::InvalidOHLC {
                index: 0,
                reason: "non-finite value in OHLC",
            });
        }
        if self.high() < self.low() {
            return Err(CandleError::InvalidOHLC {
                index: 0,
                reason: "high < low",
            });
        }
        if self.open().max(self.close()) > self.high() {
            return Err(CandleError::InvalidOHLC {
                index: 0,
                reason: "body above high",
            });
        }
        if self.open().min(self.close()) < self.low() {
            return Err(CandleError::InvalidOHLC {
                index: 0,
                reason: "body below low",
            });
        }
        Ok(())
    }
}

impl<T: OHLC> OHLCExt for T {}

// ============================================================
// BAR
// ============================================================

/// One trading day's prices as delivered by a market-data provider
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    /// Unix seconds of the session open, when the provider supplies it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp: None,
            open,
            high,
            low,
            close,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl OHLC for Bar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_validation() {
        assert!(Ratio::new(0.0).is_ok());
        assert!(Ratio::new(1.0).is_ok());
        assert!(Ratio::new(0.8).is_ok());
        assert!(Ratio::new(-0.1).is_err());
        assert!(Ratio::new(1.1).is_err());
        assert!(Ratio::new(f64::NAN).is_err());
        assert!(Ratio::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(60).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_period_serializes_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Period::new_const(10), 1);
        map.insert(Period::new_const(5), 2);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"5":2,"10":1}"#);
    }

    #[test]
    fn test_ohlc_ext() {
        let bar = Bar::new(100.0, 110.0, 90.0, 105.0);
        assert_eq!(bar.range(), 20.0);
        assert_eq!(bar.upper_shadow(), 5.0);
        assert_eq!(bar.lower_shadow(), 10.0);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
        assert!((bar.upper_shadow_ratio().unwrap() - 0.25).abs() < 1e-12);
        assert!((bar.lower_shadow_ratio().unwrap() - 0.5).abs() < 1e-12);
        assert!((bar.shadow_ratio().unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_zero_range_has_no_ratios() {
        let bar = Bar::new(7.0, 7.0, 7.0, 7.0);
        assert_eq!(bar.range(), 0.0);
        assert!(bar.shadow_ratio().is_none());
        assert!(bar.upper_shadow_ratio().is_none());
        assert!(bar.lower_shadow_ratio().is_none());
        assert!(!bar.is_bullish());
        assert!(!bar.is_bearish());
    }

    #[test]
    fn test_validate() {
        assert!(Bar::new(100.0, 110.0, 90.0, 105.0).validate().is_ok());
        assert!(Bar::new(100.0, 90.0, 110.0, 105.0).validate().is_err());
        assert!(Bar::new(100.0, 104.0, 90.0, 105.0).validate().is_err());
        assert!(Bar::new(89.0, 110.0, 90.0, 105.0).validate().is_err());
        assert!(Bar::new(f64::NAN, 110.0, 90.0, 105.0).validate().is_err());
    }

    #[test]
    fn test_bar_json_skips_missing_timestamp() {
        let json = serde_json::to_value(Bar::new(1.0, 2.0, 0.5, 1.5)).unwrap();
        assert!(json.get("timestamp").is_none());

        let stamped = serde_json::to_value(Bar::new(1.0, 2.0, 0.5, 1.5).with_timestamp(42)).unwrap();
        assert_eq!(stamped["timestamp"], 42);
    }
}

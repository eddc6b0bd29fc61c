//! Analyzer configuration: trailing periods and classification thresholds
//!
//! Built once at start-up and passed explicitly to the classifier and the
//! window selector. Nothing here is mutated after construction.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use candlestat::params::{AnalyzerConfig, Thresholds};
//!
//! let mut overrides = HashMap::new();
//! overrides.insert("doji_ratio", 0.75);
//!
//! let thresholds = Thresholds::with_params(&overrides).unwrap();
//! let config = AnalyzerConfig::new([5, 10, 20], thresholds).unwrap();
//! assert_eq!(config.lookback_days(), 40);
//! ```

use std::collections::HashMap;

use crate::{CandleError, Period, Ratio, Result};

// ============================================================
// DEFAULTS
// ============================================================

/// Trailing windows reported by default, in trading days
pub const DEFAULT_PERIODS: [usize; 5] = [5, 10, 20, 30, 60];
/// Doji: upper + lower shadow >= DOJI_RATIO of the range
pub const DOJI_RATIO: f64 = 0.8;
/// Long upper shadow: upper shadow >= UPPER_SHADOW_RATIO of the range
pub const UPPER_SHADOW_RATIO: f64 = 0.5;
/// Long lower shadow: lower shadow >= LOWER_SHADOW_RATIO of the range
pub const LOWER_SHADOW_RATIO: f64 = 0.5;

/// History fetched per request, as a multiple of the longest period.
/// Leaves room for weekends and exchange holidays.
pub const LOOKBACK_MULTIPLIER: usize = 2;

// ============================================================
// PARAMETER METADATA
// ============================================================

/// Metadata for a single threshold parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "doji_ratio")
  pub name: &'static str,
  /// Default value
  pub default: f64,
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn ratio(name: &'static str, default: f64, description: &'static str) -> Self {
    Self { name, default, description }
  }
}

const THRESHOLD_PARAMS: [ParamMeta; 3] = [
  ParamMeta::ratio("doji_ratio", DOJI_RATIO, "Combined shadow share of the range for a doji"),
  ParamMeta::ratio(
    "upper_shadow_ratio",
    UPPER_SHADOW_RATIO,
    "Upper shadow share of the range for a long upper shadow",
  ),
  ParamMeta::ratio(
    "lower_shadow_ratio",
    LOWER_SHADOW_RATIO,
    "Lower shadow share of the range for a long lower shadow",
  ),
];

// ============================================================
// THRESHOLDS
// ============================================================

/// Ratio thresholds used by the bar classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
  pub doji: Ratio,
  pub upper_shadow: Ratio,
  pub lower_shadow: Ratio,
}

impl Default for Thresholds {
  fn default() -> Self {
    Self {
      doji: Ratio::new_const(DOJI_RATIO),
      upper_shadow: Ratio::new_const(UPPER_SHADOW_RATIO),
      lower_shadow: Ratio::new_const(LOWER_SHADOW_RATIO),
    }
  }
}

impl Thresholds {
  /// Returns metadata for all configurable thresholds
  pub fn param_meta() -> &'static [ParamMeta] {
    &THRESHOLD_PARAMS
  }

  /// Looks up a threshold by its parameter name
  pub fn get(&self, name: &str) -> Option<Ratio> {
    match name {
      "doji_ratio" => Some(self.doji),
      "upper_shadow_ratio" => Some(self.upper_shadow),
      "lower_shadow_ratio" => Some(self.lower_shadow),
      _ => None,
    }
  }

  /// Creates thresholds from a name -> value map.
  ///
  /// Missing parameters use their default values.
  pub fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    Ok(Self {
      doji: get_ratio(params, "doji_ratio", DOJI_RATIO)?,
      upper_shadow: get_ratio(params, "upper_shadow_ratio", UPPER_SHADOW_RATIO)?,
      lower_shadow: get_ratio(params, "lower_shadow_ratio", LOWER_SHADOW_RATIO)?,
    })
  }
}

/// Helper to get a Ratio from params with default fallback
pub fn get_ratio(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Ratio> {
  let value = params.get(key).copied().unwrap_or(default);
  Ratio::new(value)
}

// ============================================================
// ANALYZER CONFIG
// ============================================================

/// Periods and thresholds for one analyzer process
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
  periods: Vec<Period>,
  thresholds: Thresholds,
}

impl Default for AnalyzerConfig {
  fn default() -> Self {
    Self {
      periods: DEFAULT_PERIODS.iter().map(|&p| Period::new_const(p)).collect(),
      thresholds: Thresholds::default(),
    }
  }
}

impl AnalyzerConfig {
  /// Periods are sorted ascending and de-duplicated.
  pub fn new(periods: impl IntoIterator<Item = usize>, thresholds: Thresholds) -> Result<Self> {
    let mut periods = periods.into_iter().map(Period::new).collect::<Result<Vec<_>>>()?;
    if periods.is_empty() {
      return Err(CandleError::InvalidConfig("at least one period is required".to_string()));
    }
    periods.sort_unstable();
    periods.dedup();
    Ok(Self { periods, thresholds })
  }

  /// Default periods with the given thresholds
  pub fn with_thresholds(thresholds: Thresholds) -> Self {
    Self { thresholds, ..Self::default() }
  }

  pub fn periods(&self) -> &[Period] {
    &self.periods
  }

  pub fn thresholds(&self) -> &Thresholds {
    &self.thresholds
  }

  pub fn max_period(&self) -> Period {
    // never empty: both constructors guarantee at least one period
    self.periods.last().copied().unwrap_or(Period::new_const(1))
  }

  /// Calendar days of history to request from the data provider
  pub fn lookback_days(&self) -> usize {
    self.max_period().get() * LOOKBACK_MULTIPLIER
  }
}

// ============================================================
// TESTS
// ============================================================

//! Bar classifier
//!
//! Five independent categories per bar: bullish, bearish, doji, long upper
//! shadow, long lower shadow. A bar may land in several at once (a doji with a
//! dominant upper wick counts as both `doji` and `upper_shadow`).
//!
//! The three shadow categories are ratios over the bar's range. A zero-range
//! bar (`high == low`) has no meaningful ratio and is never counted in them;
//! bullish/bearish still follow close vs. open.

use serde::{Deserialize, Serialize};

use crate::{params::Thresholds, OHLCExt, OHLC};

/// Category membership of a single bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarClass {
    pub bullish: bool,
    pub bearish: bool,
    pub doji: bool,
    pub upper_shadow: bool,
    pub lower_shadow: bool,
}

/// Per-category bar counts over a window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleCounts {
    pub bullish: usize,
    pub bearish: usize,
    pub doji: usize,
    pub upper_shadow: usize,
    pub lower_shadow: usize,
}

impl CandleCounts {
    /// Add one classified bar to the counts
    #[inline]
    pub fn record(&mut self, class: BarClass) {
        self.bullish += usize::from(class.bullish);
        self.bearish += usize::from(class.bearish);
        self.doji += usize::from(class.doji);
        self.upper_shadow += usize::from(class.upper_shadow);
        self.lower_shadow += usize::from(class.lower_shadow);
    }
}

/// Classify one bar against the given thresholds
#[inline]
pub fn classify_bar<T: OHLC>(bar: &T, thresholds: &Thresholds) -> BarClass {
    BarClass {
        bullish: bar.is_bullish(),
        bearish: bar.is_bearish(),
        doji: bar
            .shadow_ratio()
            .is_some_and(|r| r >= thresholds.doji.get()),
        upper_shadow: bar
            .upper_shadow_ratio()
            .is_some_and(|r| r >= thresholds.upper_shadow.get()),
        lower_shadow: bar
            .lower_shadow_ratio()
            .is_some_and(|r| r >= thresholds.lower_shadow.get()),
    }
}

/// Count each category over `bars`
pub fn classify<T: OHLC>(bars: &[T], thresholds: &Thresholds) -> CandleCounts {
    bars.iter().fold(CandleCounts::default(), |mut counts, bar| {
        counts.record(classify_bar(bar, thresholds));
        counts
    })
}

// ============================================================
// TESTS
// ============================================================

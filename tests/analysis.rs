//! Integration tests for window analysis through the public prelude.

use candlestat::prelude::*;
use proptest::prelude::*;

/// Caller-defined bar type, to exercise the OHLC trait rather than `Bar`
#[derive(Debug, Clone, Copy)]
struct TestBar {
    o: f64,
    h: f64,
    l: f64,
    c: f64,
}

impl TestBar {
    fn new(o: f64, h: f64, l: f64, c: f64) -> Self {
        Self { o, h, l, c }
    }
}

impl OHLC for TestBar {
    fn open(&self) -> f64 {
        self.o
    }

    fn high(&self) -> f64 {
        self.h
    }

    fn low(&self) -> f64 {
        self.l
    }

    fn close(&self) -> f64 {
        self.c
    }
}

/// Bullish bars with short shadows on both sides
fn make_uptrend(n: usize) -> Vec<TestBar> {
    (0..n)
        .map(|i| {
            let base = 100.0 + (i as f64) * 2.0;
            TestBar::new(base - 0.5, base + 1.5, base - 1.5, base + 1.0)
        })
        .collect()
}

fn period(n: usize) -> Period {
    Period::new(n).unwrap()
}

// ============================================================
// WINDOW SELECTION
// ============================================================

#[test]
fn test_uniform_bullish_window() {
    let bars = make_uptrend(60);
    let results = analyze_windows(&bars, &AnalyzerConfig::default());

    for (p, counts) in &results {
        assert_eq!(
            *counts,
            CandleCounts {
                bullish: p.get(),
                ..CandleCounts::default()
            },
            "period {p}"
        );
    }
}

#[test]
fn test_insufficient_history_only_affects_longer_periods() {
    let bars = make_uptrend(29);
    let results = analyze_windows(&bars, &AnalyzerConfig::default());

    assert_eq!(results[&period(20)].bullish, 20);
    assert_eq!(results[&period(30)], CandleCounts::default());
    assert_eq!(results[&period(60)], CandleCounts::default());
}

#[test]
fn test_empty_history() {
    let bars: Vec<TestBar> = vec![];
    let results = analyze_windows(&bars, &AnalyzerConfig::default());

    assert_eq!(results.len(), 5);
    assert!(results.values().all(|c| *c == CandleCounts::default()));
}

#[test]
fn test_results_in_ascending_period_order() {
    let config = AnalyzerConfig::new([60, 5, 30, 10, 20], Thresholds::default()).unwrap();
    let results = analyze_windows(&make_uptrend(10), &config);

    let keys: Vec<usize> = results.keys().map(|p| p.get()).collect();
    assert_eq!(keys, vec![5, 10, 20, 30, 60]);
}

#[test]
fn test_recent_reversal_shows_in_short_window() {
    let mut bars = make_uptrend(20);
    // last 5 sessions: bearish with long lower shadows (hammers closing down)
    for i in 0..5 {
        let base = 140.0 - i as f64;
        bars.push(TestBar::new(base, base + 0.2, base - 3.0, base - 0.5));
    }

    let config = AnalyzerConfig::new([5, 20], Thresholds::default()).unwrap();
    let results = analyze_windows(&bars, &config);

    let short = results[&period(5)];
    assert_eq!(short.bearish, 5);
    assert_eq!(short.lower_shadow, 5);
    assert_eq!(short.bullish, 0);

    let long = results[&period(20)];
    assert_eq!(long.bullish, 15);
    assert_eq!(long.bearish, 5);
}

#[test]
fn test_full_report() {
    let bars: Vec<Bar> = make_uptrend(12)
        .into_iter()
        .map(|b| Bar::new(b.o, b.h, b.l, b.c))
        .collect();
    let config = AnalyzerConfig::default();
    let ticker = to_provider_ticker("700 HK");

    let report = AnalysisResponse::build("700 HK", ticker, &bars, &config);
    assert_eq!(report.ticker, "0700.HK");
    assert_eq!(report.periods, config.periods());
    assert_eq!(report.results[&period(10)].bullish, 10);
    assert_eq!(report.results[&period(20)], CandleCounts::default());
}

// ============================================================
// SYMBOL NORMALIZATION
// ============================================================

#[test]
fn test_symbol_examples() {
    assert_eq!(to_provider_ticker("700 HK"), "0700.HK");
    assert_eq!(to_provider_ticker("0700 HK"), "0700.HK");
    assert_eq!(to_provider_ticker("NVDA US"), "NVDA");
    assert_eq!(to_provider_ticker("603501 CH"), "603501.SS");
    assert_eq!(to_provider_ticker("000001 CH"), "000001.SZ");
    assert_eq!(to_provider_ticker("garbage"), "GARBAGE");
}

// ============================================================
// PROPERTIES
// ============================================================

fn arb_bar() -> impl Strategy<Value = TestBar> {
    (1.0f64..1000.0, 0.0f64..50.0, 0.0f64..50.0, -20.0f64..20.0).prop_map(
        |(open, up, down, body)| {
            let close = (open + body).max(0.01);
            let high = open.max(close) + up;
            let low = (open.min(close) - down).max(0.0);
            TestBar::new(open, high, low, close)
        },
    )
}

proptest! {
    #[test]
    fn prop_bullish_and_bearish_are_exclusive(bars in prop::collection::vec(arb_bar(), 0..80)) {
        let thresholds = Thresholds::default();
        for bar in &bars {
            let class = classify_bar(bar, &thresholds);
            prop_assert!(!(class.bullish && class.bearish));
        }

        let counts = classify(&bars, &thresholds);
        prop_assert!(counts.bullish + counts.bearish <= bars.len());
        let flat = bars.iter().filter(|b| b.c == b.o).count();
        prop_assert_eq!(counts.bullish + counts.bearish + flat, bars.len());
    }

    #[test]
    fn prop_counts_bounded_by_window(bars in prop::collection::vec(arb_bar(), 0..80)) {
        let config = AnalyzerConfig::default();
        for (p, counts) in analyze_windows(&bars, &config) {
            let n = p.get();
            prop_assert!(counts.bullish <= n);
            prop_assert!(counts.bearish <= n);
            prop_assert!(counts.doji <= n);
            prop_assert!(counts.upper_shadow <= n);
            prop_assert!(counts.lower_shadow <= n);
            if bars.len() < n {
                prop_assert_eq!(counts, CandleCounts::default());
            }
        }
    }

    #[test]
    fn prop_window_equals_classifying_the_tail(bars in prop::collection::vec(arb_bar(), 0..80), n in 1usize..70) {
        let thresholds = Thresholds::default();
        let got = analyze_window(&bars, period(n), &thresholds);
        let expected = if bars.len() >= n {
            classify(&bars[bars.len() - n..], &thresholds)
        } else {
            CandleCounts::default()
        };
        prop_assert_eq!(got, expected);
    }
}

#![allow(dead_code)]

use serde::{Deserialize, de::DeserializeOwned};
use ta_verdict::{Ohlcv, Price, PriceBar, Timestamp};

/// Daily bar parsed from the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub timestamp: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn open_time(&self) -> Timestamp {
        self.timestamp
    }
}

/// Reference value per bar; empty cell where the indicator is undefined.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub timestamp: Timestamp,
    pub expected: Option<f64>,
}

/// Reference MACD and signal line per bar.
#[derive(Debug, Deserialize)]
pub struct RefMacdValue {
    pub timestamp: Timestamp,
    pub macd: f64,
    pub signal: f64,
}

const BARS_PATH: &str = "tests/fixtures/data/daily-bars.csv";

/// Index of the first bar of the embedded run of `close = 50.0`.
pub const FLAT_START: usize = 150;
/// One past the last bar of that run.
pub const FLAT_END: usize = 170;

/// Load the 300 synthetic daily bars.
pub fn load_reference_bars() -> Vec<RefBar> {
    load_records(BARS_PATH, "invalid bar record")
}

/// Same bars as owned [`PriceBar`]s.
pub fn load_price_bars() -> Vec<PriceBar> {
    load_reference_bars()
        .iter()
        .map(PriceBar::from_ohlcv)
        .collect()
}

/// Load single-value reference data (SMA, EMA, RSI).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load MACD reference data (macd, signal).
pub fn load_macd_ref(path: &str) -> Vec<RefMacdValue> {
    load_records(path, "invalid MACD reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert an optional value matches its reference, `None` included.
pub fn assert_option_near(
    actual: Option<f64>,
    expected: Option<f64>,
    tolerance: f64,
    context: &str,
) {
    match (actual, expected) {
        (None, None) => {}
        (Some(a), Some(e)) => assert_near(a, e, tolerance, context),
        (a, e) => panic!("{context}: definedness mismatch, expected {e:?}, got {a:?}"),
    }
}

/// Generate a reference-match test for a single-value indicator.
///
/// Usage: `reference_test!(sma_50, Sma, SmaConfig::new(nz(50)), "tests/fixtures/data/sma-50.csv", 1e-9);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use std::num::NonZero;
            use ta_verdict::*;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_bars();
                let reference = load_ref_values($ref_path);
                assert_eq!(bars.len(), reference.len(), "reference length");

                let mut ind = <$ind>::new($config);
                for (i, (bar, expected)) in bars.iter().zip(&reference).enumerate() {
                    assert_eq!(bar.timestamp, expected.timestamp, "misaligned at bar {i}");
                    ind.compute(bar);
                    assert_option_near(
                        ind.value(),
                        expected.expected,
                        $tolerance,
                        &format!("{} at bar {i} (t={})", stringify!($name), bar.timestamp),
                    );
                }
            }

            #[test]
            fn warm_up_matches_first_defined_value() {
                let bars = load_reference_bars();
                let reference = load_ref_values($ref_path);
                let config = $config;

                let first = reference
                    .iter()
                    .position(|row| row.expected.is_some())
                    .expect("reference has values");
                assert_eq!(first + 1, config.warm_up());

                let mut ind = <$ind>::new(config);
                let defined = bars.iter().map(|bar| ind.compute(bar)).position(|v| v.is_some());
                assert_eq!(defined, Some(first));
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}

// src/test_util.rs

use std::num::NonZero;

use chrono::DateTime;

use crate::{Ohlcv, Price, PriceBar, Timestamp};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// 2024-01-01T00:00:00Z.
const EPOCH_2024: i64 = 1_704_067_200;

/// Midnight UTC of the `n`-th day after 2024-01-01.
pub fn day(n: i64) -> Timestamp {
    DateTime::from_timestamp(EPOCH_2024 + n * 86_400, 0).expect("in range")
}

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).expect("non zero value")
}

pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub open_time: Timestamp,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            open_time: day(0),
        }
    }

    pub fn at(mut self, n: i64) -> Self {
        self.open_time = day(n);
        self
    }
}

/// Convenience: bar with just a close price and a day offset (OHLC all equal to close).
pub fn bar(close: f64, n: i64) -> Bar {
    Bar::new(close, close, close, close).at(n)
}

/// Owned daily bars, one per close, starting at day 0.
pub fn price_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .zip(0..)
        .map(|(&close, n)| PriceBar::new(day(n), close, close, close, close))
        .collect()
}

impl Ohlcv for Bar {
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
        self.open_time
    }
}

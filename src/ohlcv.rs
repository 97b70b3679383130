use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp.
///
/// Must be strictly increasing across a sequence handed to the
/// [`IndicatorEngine`](crate::IndicatorEngine).
pub type Timestamp = DateTime<Utc>;

/// OHLC bar data used as input to all indicators.
///
/// Implement this on your own candle type to feed it to the engine without
/// converting every bar into a [`PriceBar`] first.
///
/// # Example
///
/// ```
/// use ta_verdict::{Ohlcv, Price, Timestamp};
///
/// struct MyCandle {
///     o: f64, h: f64, l: f64, c: f64,
///     ts: Timestamp,
/// }
///
/// impl Ohlcv for MyCandle {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn open_time(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Bar open timestamp.
    fn open_time(&self) -> Timestamp;
}

/// One trading-period record as delivered by a price-history provider.
///
/// Prices are not validated on construction; the engine checks them before
/// computing anything.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

impl PriceBar {
    #[must_use]
    pub fn new(timestamp: Timestamp, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Copies any [`Ohlcv`] value into an owned bar.
    #[must_use]
    pub fn from_ohlcv(ohlcv: &impl Ohlcv) -> Self {
        Self::new(
            ohlcv.open_time(),
            ohlcv.open(),
            ohlcv.high(),
            ohlcv.low(),
            ohlcv.close(),
        )
    }
}

impl Ohlcv for PriceBar {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn open_time(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{Bar, day};

    #[test]
    fn from_ohlcv_copies_every_field() {
        let bar = Bar::new(10.0, 30.0, 5.0, 20.0).at(3);
        let owned = PriceBar::from_ohlcv(&bar);

        assert_eq!(owned.timestamp, day(3));
        assert_eq!(owned.open, 10.0);
        assert_eq!(owned.high, 30.0);
        assert_eq!(owned.low, 5.0);
        assert_eq!(owned.close, 20.0);
    }

    #[test]
    fn price_bar_is_ohlcv() {
        let bar = PriceBar::new(day(1), 1.0, 4.0, 0.5, 2.0);
        assert_eq!(bar.open_time(), day(1));
        assert_eq!(bar.close(), 2.0);
        assert_eq!(bar.high(), 4.0);
    }
}

use std::{fmt::Display, num::NonZero};

use crate::{Indicator, IndicatorConfig, Ohlcv, Price, rolling_window::RollingWindow};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// Gains and losses are averaged with a plain trailing mean over the last
/// `length` close-to-close changes. The first bar has no change, so output
/// begins at bar `length + 1`.
///
/// # Example
///
/// ```
/// use ta_verdict::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// let config = RsiConfig::new(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.warm_up(), 15);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
}

impl RsiConfig {
    /// RSI on closing price over `length` changes.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
        }
    }

    /// Number of price changes averaged.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl IndicatorConfig for RsiConfig {
    #[inline]
    fn warm_up(&self) -> usize {
        self.length + 1
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({})", self.length)
    }
}

/// Relative Strength Index (RSI) with simple-mean smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// ```text
/// avg_gain = mean(max(Δclose, 0))   over the last `length` changes
/// avg_loss = mean(max(−Δclose, 0))  over the last `length` changes
/// RSI      = 100 × avg_gain / (avg_gain + avg_loss)
/// ```
///
/// which equals `100 − 100 / (1 + avg_gain / avg_loss)` wherever the ratio
/// exists. When `avg_loss` is zero and gains exist the result is exactly
/// `100`. When both averages are zero (a flat window) there is no meaningful
/// strength, so the value is `None` rather than a NaN.
///
/// # Example
///
/// ```
/// use ta_verdict::{Rsi, RsiConfig};
/// use std::num::NonZero;
/// # use ta_verdict::{Ohlcv, Price, Timestamp};
/// #
/// # struct Bar(f64, i64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn open_time(&self) -> Timestamp {
/// #         Timestamp::from_timestamp(self.1 * 86_400, 0).unwrap()
/// #     }
/// # }
///
/// let mut rsi = Rsi::new(RsiConfig::new(NonZero::new(3).unwrap()));
///
/// // Need 3 price changes (4 bars)
/// assert_eq!(rsi.compute(&Bar(10.0, 1)), None);
/// assert_eq!(rsi.compute(&Bar(12.0, 2)), None);
/// assert_eq!(rsi.compute(&Bar(11.0, 3)), None);
///
/// // changes = +2, −1, +2 → avg_gain=4/3, avg_loss=1/3 → RSI=80
/// assert_eq!(rsi.compute(&Bar(13.0, 4)), Some(80.0));
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
    gains: RollingWindow,
    losses: RollingWindow,
    prev_close: Option<Price>,
    current: Option<Price>,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            gains: RollingWindow::new(config.length),
            losses: RollingWindow::new(config.length),
            prev_close: None,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Self::Output> {
        let close = ohlcv.close();

        if let Some(prev_close) = self.prev_close.replace(close) {
            let (gain, loss) = Self::gain_and_loss(prev_close, close);
            self.gains.push(gain);
            self.losses.push(loss);
        }

        // Both windows are the same length and fill together; the sums
        // (not the means) are enough since the ratio cancels `length`.
        self.current = match (self.gains.sum(), self.losses.sum()) {
            (Some(gain), Some(loss)) => Self::rsi_from_sums(gain, loss),
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Rsi {
    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    #[inline]
    fn rsi_from_sums(gain: f64, loss: f64) -> Option<f64> {
        // running sums of non-negative values can drift a hair below zero
        let (gain, loss) = (gain.max(0.0), loss.max(0.0));
        let total = gain + loss;
        if total == 0.0 {
            None
        } else {
            Some(100.0 * gain / total)
        }
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({})", self.config.length)
    }
}

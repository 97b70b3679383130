use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{Indicator, IndicatorConfig, Ohlcv, Price, rolling_window::RollingWindow};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use ta_verdict::SmaConfig;
/// use std::num::NonZero;
///
/// let config = SmaConfig::new(NonZero::new(50).unwrap());
/// assert_eq!(config.length(), 50);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: usize,
}

impl SmaConfig {
    /// SMA of closing price over `length` bars.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self {
            length: length.get(),
        }
    }

    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl IndicatorConfig for SmaConfig {
    #[inline]
    fn warm_up(&self) -> usize {
        self.length
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({})", self.length)
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* closes, where *n* is the
/// configured window length. Returns `None` for the first `n - 1` bars.
///
/// Uses a running sum for O(1) updates per bar.
///
/// # Example
///
/// ```rust
/// use ta_verdict::{Sma, SmaConfig};
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
/// let mut sma = Sma::new(SmaConfig::new(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.compute(&Bar(10.0, 1)), None);
/// assert_eq!(sma.compute(&Bar(20.0, 2)), None);
/// assert_eq!(sma.compute(&Bar(30.0, 3)), Some(20.0));
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
    window: RollingWindow,
    length_reciprocal: f64,
    current: Option<Price>,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: RollingWindow::new(config.length),
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / config.length as f64,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Price> {
        self.window.push(bar.close());

        self.current = self.window.sum().map(|sum| sum * self.length_reciprocal);

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({})", self.config.length)
    }
}

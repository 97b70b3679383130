use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use crate::{Indicator, IndicatorConfig, Ohlcv, Price};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use ta_verdict::EmaConfig;
/// use std::num::NonZero;
///
/// let config = EmaConfig::new(NonZero::new(12).unwrap());
///
/// assert_eq!(config.span(), 12);
/// assert!((config.alpha() - 2.0 / 13.0).abs() < 1e-15);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    span: usize,
}

impl EmaConfig {
    /// EMA of closing price with the given span.
    #[must_use]
    pub fn new(span: NonZero<usize>) -> Self {
        Self { span: span.get() }
    }

    /// Span used to derive the smoothing factor.
    #[inline]
    #[must_use]
    pub fn span(&self) -> usize {
        self.span
    }

    /// Smoothing factor `α = 2 / (span + 1)`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let span = self.span as f64;
        2.0 / (span + 1.0)
    }
}

impl IndicatorConfig for EmaConfig {
    #[inline]
    fn warm_up(&self) -> usize {
        1
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({})", self.span)
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (span + 1)`. Each value is computed as:
///
/// ```text
/// EMA = α × price + (1 − α) × prev_EMA
/// ```
///
/// The first price seeds the series directly: there is no warm-up
/// average, so the EMA has a value from the first bar onward. A constant
/// input therefore yields that constant on every bar.
///
/// Besides bars, an EMA can smooth any derived series through
/// [`update`](Ema::update); MACD uses this for its signal line.
///
/// # Example
///
/// ```
/// use ta_verdict::{Ema, EmaConfig};
/// use std::num::NonZero;
///
/// let mut ema = Ema::new(EmaConfig::new(NonZero::new(3).unwrap()));
///
/// // First value seeds the series.
/// assert_eq!(ema.update(2.0), 2.0);
///
/// // EMA(3) α = 0.5: 6 × 0.5 + 2 × 0.5 = 4.0
/// assert_eq!(ema.update(6.0), 4.0);
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    alpha: f64,
    current: Option<Price>,
}

impl Ema {
    /// Feeds the next value of an arbitrary series and returns the smoothed
    /// value.
    #[inline]
    pub fn update(&mut self, price: Price) -> Price {
        let next = match self.current {
            Some(previous) => self.alpha.mul_add(price - previous, previous),
            None => price,
        };
        self.current = Some(next);
        next
    }
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            alpha: config.alpha(),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<Price> {
        Some(self.update(ohlcv.close()))
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({})", self.config.span)
    }
}

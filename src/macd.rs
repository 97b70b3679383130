use std::{fmt::Display, num::NonZero};

use crate::{Ema, EmaConfig, Indicator, IndicatorConfig, Ohlcv, Price, indicator::length};

/// Configuration for the Moving Average Convergence/Divergence
/// ([`Macd`]) indicator.
///
/// Defaults to the classic `(12, 26, 9)` spans.
///
/// # Example
///
/// ```
/// use ta_verdict::MacdConfig;
/// use std::num::NonZero;
///
/// let config = MacdConfig::builder()
///     .fast(NonZero::new(8).unwrap())
///     .slow(NonZero::new(21).unwrap())
///     .build();
///
/// assert_eq!(config.fast(), 8);
/// assert_eq!(config.slow(), 21);
/// assert_eq!(config.signal(), 9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: EmaConfig,
    slow: EmaConfig,
    signal: EmaConfig,
}

impl MacdConfig {
    /// Returns a new builder with the default `(12, 26, 9)` spans.
    #[must_use]
    pub fn builder() -> MacdConfigBuilder {
        MacdConfigBuilder::default()
    }

    /// MACD with explicit fast, slow and signal spans.
    #[must_use]
    pub fn new(fast: NonZero<usize>, slow: NonZero<usize>, signal: NonZero<usize>) -> Self {
        Self::builder().fast(fast).slow(slow).signal(signal).build()
    }

    /// Span of the fast EMA.
    #[inline]
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast.span()
    }

    /// Span of the slow EMA.
    #[inline]
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow.span()
    }

    /// Span of the signal-line EMA.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal.span()
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl IndicatorConfig for MacdConfig {
    #[inline]
    fn warm_up(&self) -> usize {
        1
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {})",
            self.fast(),
            self.slow(),
            self.signal()
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: fast = 12, slow = 26, signal = 9.
pub struct MacdConfigBuilder {
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
}

impl Default for MacdConfigBuilder {
    fn default() -> Self {
        Self {
            fast: length(12),
            slow: length(26),
            signal: length(9),
        }
    }
}

impl MacdConfigBuilder {
    /// Sets the fast EMA span.
    #[inline]
    #[must_use]
    pub fn fast(mut self, span: NonZero<usize>) -> Self {
        self.fast = span;
        self
    }

    /// Sets the slow EMA span.
    #[inline]
    #[must_use]
    pub fn slow(mut self, span: NonZero<usize>) -> Self {
        self.slow = span;
        self
    }

    /// Sets the signal-line EMA span.
    #[inline]
    #[must_use]
    pub fn signal(mut self, span: NonZero<usize>) -> Self {
        self.signal = span;
        self
    }

    #[inline]
    #[must_use]
    pub fn build(self) -> MacdConfig {
        MacdConfig {
            fast: EmaConfig::new(self.fast),
            slow: EmaConfig::new(self.slow),
            signal: EmaConfig::new(self.signal),
        }
    }
}

/// MACD output: the MACD line and its signal line.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MacdValue {
    macd: Price,
    signal: Price,
}

impl MacdValue {
    /// MACD line: `EMA(fast) − EMA(slow)`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    /// Signal line: EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> Price {
        self.signal
    }

    /// Histogram: `macd − signal`.
    ///
    /// Positive while momentum is rising relative to its own trend.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> Price {
        self.macd - self.signal
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MACD(m: {}, s: {})", self.macd, self.signal)
    }
}

/// Moving Average Convergence/Divergence (MACD).
///
/// Difference of a fast and a slow [`Ema`] of the close, smoothed again by a
/// third EMA to form the signal line. All three EMAs seed from their first
/// input, so a value is produced from the first bar onward, and a constant
/// close gives a MACD and signal of exactly zero.
///
/// # Example
///
/// ```
/// use ta_verdict::{Macd, MacdConfig};
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
/// let mut macd = Macd::new(MacdConfig::default());
///
/// let first = macd.compute(&Bar(100.0, 1)).unwrap();
/// assert_eq!(first.macd(), 0.0);
/// assert_eq!(first.signal(), 0.0);
///
/// // A rising close pulls the fast EMA above the slow one.
/// let next = macd.compute(&Bar(110.0, 2)).unwrap();
/// assert!(next.macd() > next.signal());
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
    fast: Ema,
    slow: Ema,
    signal: Ema,
    current: Option<MacdValue>,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            fast: Ema::new(config.fast),
            slow: Ema::new(config.slow),
            signal: Ema::new(config.signal),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Option<MacdValue> {
        let close = ohlcv.close();
        let macd = self.fast.update(close) - self.slow.update(close);
        let signal = self.signal.update(macd);

        self.current = Some(MacdValue { macd, signal });
        self.current
    }

    #[inline]
    fn value(&self) -> Option<MacdValue> {
        self.current
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {})",
            self.config.fast(),
            self.config.slow(),
            self.config.signal()
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, bar, nz};

    fn macd(fast: usize, slow: usize, signal: usize) -> Macd {
        Macd::new(MacdConfig::new(nz(fast), nz(slow), nz(signal)))
    }

    mod computation {
        use super::*;

        #[test]
        fn defined_from_first_bar() {
            let mut macd = macd(12, 26, 9);
            let value = macd.compute(&bar(42.0, 1)).unwrap();
            assert_eq!(value.macd(), 0.0);
            assert_eq!(value.signal(), 0.0);
        }

        #[test]
        fn follows_ema_difference() {
            // fast EMA(1): α = 1, slow EMA(3): α = 0.5, signal EMA(3): α = 0.5
            let mut macd = macd(1, 3, 3);
            macd.compute(&bar(10.0, 1));
            let value = macd.compute(&bar(20.0, 2)).unwrap();
            // fast = 20, slow = 15 → macd = 5; signal = 0.5 * 5 + 0.5 * 0 = 2.5
            assert_eq!(value.macd(), 5.0);
            assert_eq!(value.signal(), 2.5);
            assert_eq!(value.histogram(), 2.5);
        }

        #[test]
        fn signal_matches_standalone_ema_of_macd() {
            let closes = [10.0, 11.5, 10.25, 12.0, 13.5, 12.75];
            let mut macd = macd(3, 5, 2);
            let mut fast = Ema::new(EmaConfig::new(nz(3)));
            let mut slow = Ema::new(EmaConfig::new(nz(5)));
            let mut signal = Ema::new(EmaConfig::new(nz(2)));

            for (&close, day) in closes.iter().zip(1..) {
                let value = macd.compute(&bar(close, day)).unwrap();
                let line = fast.update(close) - slow.update(close);
                assert_approx!(value.macd(), line);
                assert_approx!(value.signal(), signal.update(line));
            }
        }

        #[test]
        fn constant_close_gives_zero_lines() {
            let mut macd = macd(12, 26, 9);
            for day in 1..=40 {
                let value = macd.compute(&bar(73.25, day)).unwrap();
                assert_eq!(value.macd(), 0.0);
                assert_eq!(value.signal(), 0.0);
            }
        }

        #[test]
        fn falling_close_puts_macd_below_signal() {
            let mut macd = macd(12, 26, 9);
            for (day, close) in (1..=30).zip((0..30).map(|i| 200.0 - f64::from(i))) {
                macd.compute(&bar(close, day));
            }
            let value = macd.value().unwrap();
            assert!(value.macd() < 0.0);
            assert!(value.macd() < value.signal());
        }
    }

    mod config {
        use super::*;

        #[test]
        fn default_is_12_26_9() {
            let config = MacdConfig::default();
            assert_eq!(
                (config.fast(), config.slow(), config.signal()),
                (12, 26, 9)
            );
        }

        #[test]
        fn warm_up_is_one_bar() {
            assert_eq!(MacdConfig::default().warm_up(), 1);
        }

        #[test]
        fn display_config() {
            assert_eq!(MacdConfig::default().to_string(), "MacdConfig(12, 26, 9)");
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(macd(12, 26, 9).to_string(), "MACD(12, 26, 9)");
        }
    }
}

use crate::Ohlcv;

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    num::NonZero,
};

/// Window length usable in const context, e.g. for default settings.
pub(crate) const fn length(n: usize) -> NonZero<usize> {
    match NonZero::new(n) {
        Some(n) => n,
        None => panic!("window length must be non-zero"),
    }
}

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters.
/// Configs are value types: cheap to copy, compare, and hash. Window lengths
/// are taken as [`NonZero`](std::num::NonZero) so a zero-length window cannot
/// be expressed.
pub trait IndicatorConfig: Sized + Copy + PartialEq + Eq + Hash + Display + Debug {
    /// Number of bars that must be fed before the indicator produces its
    /// first value.
    fn warm_up(&self) -> usize;
}

/// A streaming technical indicator.
///
/// Indicators maintain internal state and update incrementally on each call to
/// [`compute`](Indicator::compute). Output is `None` until enough data has been
/// received to fill the indicator's window.
///
/// # Example
///
/// ```
/// use ta_verdict::{Indicator, Sma, SmaConfig};
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
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. `f64` for simple indicators,
    /// a struct for composite ones (e.g. MACD).
    type Output: Copy + Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds the next bar and returns the updated indicator value,
    /// or `None` if the window is not yet filled.
    fn compute(&mut self, bar: &impl Ohlcv) -> Option<Self::Output>;

    /// Returns the last computed indicator value without advancing state.
    fn value(&self) -> Option<Self::Output>;
}

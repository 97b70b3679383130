//! Technical indicators and a composite buy/sell verdict for daily price
//! history.
//!
//! The [`IndicatorEngine`] turns a chronological sequence of bars into
//! [`IndicatorRow`]s carrying SMA 50/200, RSI 14 and MACD 12/26/9 columns.
//! Each column is `None` until its window has enough history. The
//! [`SignalScorer`] reads the latest row and sums three sub-votes (trend,
//! oscillator, momentum) into a score in `-3..=3` and a [`Verdict`].
//!
//! The streaming indicators ([`Sma`], [`Ema`], [`Rsi`], [`Macd`]) are usable
//! on their own and expose [`new`](Sma::new), [`compute`](Sma::compute) and
//! [`value`](Sma::value) as inherent methods, so no trait import is needed.
//! Import [`Indicator`] only for generic code.
//!
//! # Example
//!
//! ```
//! use ta_verdict::{IndicatorEngine, PriceBar, SignalScorer, Verdict};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
//! let bars: Vec<PriceBar> = (0..250)
//!     .map(|i| {
//!         let close = 100.0 + f64::from(i) * 0.5;
//!         PriceBar::new(start + Duration::days(i.into()), close, close, close, close)
//!     })
//!     .collect();
//!
//! let rows = IndicatorEngine::default().compute(&bars).unwrap();
//! let signal = SignalScorer::default().score(rows.last().unwrap());
//!
//! // Golden cross and rising momentum, but RSI is pinned at 100.
//! assert_eq!(signal.score, 1);
//! assert_eq!(signal.verdict, Verdict::Buy);
//! ```

mod analysis;
mod cache;
mod config;
mod ema;
mod engine;
mod error;
pub mod export;
mod indicator;
mod macd;
mod ohlcv;
mod portfolio;
mod provider;
mod rolling_window;
mod rsi;
mod signal;
mod sma;
mod validation;

pub use crate::error::{Error, Result};
pub use crate::indicator::{Indicator, IndicatorConfig};
pub use crate::ohlcv::{Ohlcv, Price, PriceBar, Timestamp};
pub use crate::validation::{BarPolicy, ValidationPolicy};

pub use crate::ema::{Ema, EmaConfig};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdValue};
pub use crate::rsi::{Rsi, RsiConfig};
pub use crate::sma::{Sma, SmaConfig};

pub use crate::engine::{IndicatorEngine, IndicatorRow, IndicatorSettings};
pub use crate::signal::{
    Factor, MomentumPolicy, Reason, ScorerConfig, Signal, SignalScorer, Verdict, Vote,
};

pub use crate::analysis::{Analysis, Analyzer, PriceChange};
pub use crate::cache::{CacheConfig, HistoryCache};
pub use crate::config::Settings;
pub use crate::portfolio::{Portfolio, PortfolioConfig, Position, Transition};
pub use crate::provider::{Period, PriceHistoryProvider, ProviderError, StaticProvider, Symbol};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, bar: &impl Ohlcv) -> Option<$output> {
                <Self as Indicator>::compute(self, bar)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Price);
impl_indicator_methods!(Ema, EmaConfig, Price);
impl_indicator_methods!(Rsi, RsiConfig, Price);
impl_indicator_methods!(Macd, MacdConfig, MacdValue);

#[cfg(test)]
mod test_util;

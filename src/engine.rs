use std::{fmt::Display, num::NonZero};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    IndicatorConfig, Macd, MacdConfig, Ohlcv, Price, PriceBar, Result, Rsi, RsiConfig,
    Sma, SmaConfig, Timestamp, ValidationPolicy, indicator::length,
};

/// Window lengths used by the [`IndicatorEngine`].
///
/// Defaults: SMA 50/200, RSI 14, MACD 12/26/9. Every field is optional when
/// deserializing; missing ones take their default.
///
/// # Example
///
/// ```
/// use ta_verdict::IndicatorSettings;
///
/// let settings: IndicatorSettings = toml::from_str("sma_fast = 20").unwrap();
/// assert_eq!(settings.sma_fast.get(), 20);
/// assert_eq!(settings.sma_slow.get(), 200);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_fast: NonZero<usize>,
    pub sma_slow: NonZero<usize>,
    pub rsi: NonZero<usize>,
    pub macd_fast: NonZero<usize>,
    pub macd_slow: NonZero<usize>,
    pub macd_signal: NonZero<usize>,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_fast: length(50),
            sma_slow: length(200),
            rsi: length(14),
            macd_fast: length(12),
            macd_slow: length(26),
            macd_signal: length(9),
        }
    }
}

impl IndicatorSettings {
    #[must_use]
    pub fn sma_fast_config(&self) -> SmaConfig {
        SmaConfig::new(self.sma_fast)
    }

    #[must_use]
    pub fn sma_slow_config(&self) -> SmaConfig {
        SmaConfig::new(self.sma_slow)
    }

    #[must_use]
    pub fn rsi_config(&self) -> RsiConfig {
        RsiConfig::new(self.rsi)
    }

    #[must_use]
    pub fn macd_config(&self) -> MacdConfig {
        MacdConfig::new(self.macd_fast, self.macd_slow, self.macd_signal)
    }

    /// Bars needed before every indicator column is defined.
    #[must_use]
    pub fn full_warm_up(&self) -> usize {
        [
            self.sma_fast_config().warm_up(),
            self.sma_slow_config().warm_up(),
            self.rsi_config().warm_up(),
            self.macd_config().warm_up(),
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
    }
}

impl Display for IndicatorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SMA({}/{}) RSI({}) MACD({}, {}, {})",
            self.sma_fast,
            self.sma_slow,
            self.rsi,
            self.macd_fast,
            self.macd_slow,
            self.macd_signal
        )
    }
}

/// A price bar together with every indicator computed at that bar.
///
/// Indicator fields are `None` while their window is still filling (or, for
/// RSI, when the window is completely flat). Column order matches the CSV
/// layout produced by [`export`](crate::export).
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub sma_fast: Option<Price>,
    pub sma_slow: Option<Price>,
    pub rsi: Option<Price>,
    pub macd: Option<Price>,
    pub macd_signal: Option<Price>,
}

impl IndicatorRow {
    /// The underlying bar without indicator columns.
    #[must_use]
    pub fn bar(&self) -> PriceBar {
        PriceBar::from_ohlcv(self)
    }

    /// `true` when every indicator column has a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sma_fast.is_some()
            && self.sma_slow.is_some()
            && self.rsi.is_some()
            && self.macd.is_some()
            && self.macd_signal.is_some()
    }

    /// MACD line minus signal line, when both are defined.
    #[must_use]
    pub fn macd_histogram(&self) -> Option<Price> {
        Some(self.macd? - self.macd_signal?)
    }
}

impl Ohlcv for IndicatorRow {
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

/// Computes SMA, RSI and MACD columns over a whole price history.
///
/// The engine itself is immutable: every call to
/// [`compute`](IndicatorEngine::compute) builds fresh indicators, so the
/// same input always yields bit-identical output and one engine can be
/// shared freely across threads.
///
/// # Example
///
/// ```
/// use ta_verdict::{IndicatorEngine, PriceBar};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let bars: Vec<PriceBar> = (0..60)
///     .map(|i| {
///         let close = 100.0 + f64::from(i);
///         PriceBar::new(start + Duration::days(i.into()), close, close, close, close)
///     })
///     .collect();
///
/// let rows = IndicatorEngine::default().compute(&bars).unwrap();
///
/// assert_eq!(rows.len(), 60);
/// assert!(rows[48].sma_fast.is_none());
/// assert!(rows[49].sma_fast.is_some());
/// assert!(rows.iter().all(|row| row.sma_slow.is_none()));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
    validation: ValidationPolicy,
}

impl IndicatorEngine {
    #[must_use]
    pub fn new(settings: IndicatorSettings) -> Self {
        Self {
            settings,
            validation: ValidationPolicy::default(),
        }
    }

    /// Replaces the input validation policy.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    /// Computes one [`IndicatorRow`] per input bar, in input order.
    ///
    /// An empty input yields an empty output. Fewer bars than a window length
    /// leaves that column `None`; it is not an error.
    ///
    /// # Errors
    ///
    /// Fails when the bars are not strictly increasing in time or carry
    /// invalid prices; see [`ValidationPolicy::check`].
    pub fn compute<B: Ohlcv>(&self, bars: &[B]) -> Result<Vec<IndicatorRow>> {
        if bars.is_empty() {
            debug!("no bars, nothing to compute");
            return Ok(Vec::new());
        }

        let warned = self.validation.check(bars)?;
        debug!(
            bars = bars.len(),
            warned,
            settings = %self.settings,
            "computing indicators"
        );

        let mut columns = Columns::new(&self.settings);
        Ok(bars.iter().map(|bar| columns.row(bar)).collect())
    }
}

/// One streaming indicator per output column.
struct Columns {
    sma_fast: Sma,
    sma_slow: Sma,
    rsi: Rsi,
    macd: Macd,
}

impl Columns {
    fn new(settings: &IndicatorSettings) -> Self {
        Self {
            sma_fast: Sma::new(settings.sma_fast_config()),
            sma_slow: Sma::new(settings.sma_slow_config()),
            rsi: Rsi::new(settings.rsi_config()),
            macd: Macd::new(settings.macd_config()),
        }
    }

    fn row(&mut self, bar: &impl Ohlcv) -> IndicatorRow {
        let macd = self.macd.compute(bar);

        IndicatorRow {
            timestamp: bar.open_time(),
            open: bar.open(),
            high: bar.high(),
            low: bar.low(),
            close: bar.close(),
            sma_fast: self.sma_fast.compute(bar),
            sma_slow: self.sma_slow.compute(bar),
            rsi: self.rsi.compute(bar),
            macd: macd.map(|value| value.macd()),
            macd_signal: macd.map(|value| value.signal()),
        }
    }
}

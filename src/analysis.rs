use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    CacheConfig, HistoryCache, IndicatorEngine, IndicatorRow, Period, Price,
    PriceHistoryProvider, Result, Signal, SignalScorer, Symbol,
};

/// Last close against the one before it.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct PriceChange {
    pub last: Price,
    pub previous: Price,
    pub absolute: Price,
    /// Change in percent of `previous`.
    pub percent: f64,
}

impl PriceChange {
    /// Change over the final two rows, `None` with fewer than two.
    #[must_use]
    pub fn from_rows(rows: &[IndicatorRow]) -> Option<Self> {
        let [.., previous, last] = rows else {
            return None;
        };
        let absolute = last.close - previous.close;

        Some(Self {
            last: last.close,
            previous: previous.close,
            absolute,
            percent: absolute / previous.close * 100.0,
        })
    }
}

/// Everything a dashboard shows for one `(symbol, period)`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Analysis {
    pub symbol: Symbol,
    pub period: Period,
    /// Full indicator history, oldest first.
    pub rows: Vec<IndicatorRow>,
    /// Verdict for the latest row; `None` when there is no history.
    pub signal: Option<Signal>,
    pub change: Option<PriceChange>,
}

impl Analysis {
    #[must_use]
    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fetches history through a [`HistoryCache`], computes indicators and
/// scores the latest bar.
///
/// # Example
///
/// ```
/// use ta_verdict::{Analyzer, CacheConfig, Period, PriceBar, StaticProvider, Symbol};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let bars = (0..30)
///     .map(|i| {
///         let close = 50.0 + f64::from(i);
///         PriceBar::new(start + Duration::days(i.into()), close, close, close, close)
///     })
///     .collect();
///
/// let symbol = Symbol::new("demo").unwrap();
/// let provider = StaticProvider::new().with_history(symbol.clone(), bars);
/// let analyzer = Analyzer::new(provider, CacheConfig::default());
///
/// let analysis = analyzer.analyze(&symbol, Period::OneYear).unwrap();
/// assert_eq!(analysis.rows.len(), 30);
/// assert!(analysis.signal.is_some());
/// assert_eq!(analysis.change.unwrap().absolute, 1.0);
/// ```
pub struct Analyzer<P> {
    cache: HistoryCache<P>,
    engine: IndicatorEngine,
    scorer: SignalScorer,
}

impl<P: PriceHistoryProvider> Analyzer<P> {
    /// Analyzer with the default engine and scorer.
    #[must_use]
    pub fn new(provider: P, cache: CacheConfig) -> Self {
        Self::with_parts(
            HistoryCache::new(provider, cache),
            IndicatorEngine::default(),
            SignalScorer::default(),
        )
    }

    #[must_use]
    pub fn with_parts(cache: HistoryCache<P>, engine: IndicatorEngine, scorer: SignalScorer) -> Self {
        Self {
            cache,
            engine,
            scorer,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &HistoryCache<P> {
        &self.cache
    }

    /// Analyzes the cached (or freshly fetched) history.
    ///
    /// A provider failure yields an empty analysis, not an error.
    ///
    /// # Errors
    ///
    /// Validation errors from [`IndicatorEngine::compute`].
    pub fn analyze(&self, symbol: &Symbol, period: Period) -> Result<Analysis> {
        let bars = self.cache.get_or_fetch(symbol, period);
        let rows = self.engine.compute(bars.as_slice())?;

        let signal = rows.last().map(|row| self.scorer.score(row));
        if let Some(signal) = &signal {
            debug!(%symbol, %period, rows = rows.len(), %signal, "analysis complete");
        } else {
            debug!(%symbol, %period, "no history to analyze");
        }

        Ok(Analysis {
            symbol: symbol.clone(),
            period,
            change: PriceChange::from_rows(&rows),
            rows,
            signal,
        })
    }

    /// Drops the cached history for the key and analyzes again.
    ///
    /// # Errors
    ///
    /// See [`analyze`](Self::analyze).
    pub fn refresh(&self, symbol: &Symbol, period: Period) -> Result<Analysis> {
        info!(%symbol, %period, "refreshing price history");
        self.cache.invalidate(symbol, period);
        self.analyze(symbol, period)
    }
}

use std::{sync::Arc, time::Duration};

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Period, PriceBar, PriceHistoryProvider, Symbol};

/// Sizing and expiry for a [`HistoryCache`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of `(symbol, period)` histories held.
    pub capacity: u64,
    /// Entries older than this many seconds are refetched. `None` keeps
    /// them until evicted or invalidated.
    pub time_to_live_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            time_to_live_secs: None,
        }
    }
}

type Key = (Symbol, Period);

/// Memoizing front for a [`PriceHistoryProvider`].
///
/// Histories are shared as `Arc<Vec<PriceBar>>`, so repeated lookups of the
/// same `(symbol, period)` do not copy bars. Only successful, non-empty
/// fetches are stored: a provider error or an empty answer is logged and
/// handed back as an empty history, and the next request asks the provider
/// again.
///
/// # Example
///
/// ```
/// use ta_verdict::{CacheConfig, HistoryCache, Period, StaticProvider, Symbol};
///
/// let symbol = Symbol::new("MISSING").unwrap();
/// let cache = HistoryCache::new(StaticProvider::new(), CacheConfig::default());
///
/// // Unknown to the provider: empty, and nothing is cached.
/// assert!(cache.get_or_fetch(&symbol, Period::OneYear).is_empty());
/// assert!(!cache.contains(&symbol, Period::OneYear));
/// ```
pub struct HistoryCache<P> {
    provider: P,
    entries: Cache<Key, Arc<Vec<PriceBar>>>,
}

impl<P: PriceHistoryProvider> HistoryCache<P> {
    #[must_use]
    pub fn new(provider: P, config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.capacity);
        if let Some(secs) = config.time_to_live_secs {
            builder = builder.time_to_live(Duration::from_secs(secs));
        }

        Self {
            provider,
            entries: builder.build(),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the cached history, fetching it from the provider on a miss.
    #[must_use]
    pub fn get_or_fetch(&self, symbol: &Symbol, period: Period) -> Arc<Vec<PriceBar>> {
        let key = (symbol.clone(), period);

        self.entries
            .optionally_get_with(key, || self.fetch(symbol, period))
            .unwrap_or_default()
    }

    fn fetch(&self, symbol: &Symbol, period: Period) -> Option<Arc<Vec<PriceBar>>> {
        match self.provider.fetch(symbol, period) {
            Ok(bars) if bars.is_empty() => {
                debug!(%symbol, %period, "provider returned no bars");
                None
            }
            Ok(bars) => {
                debug!(%symbol, %period, bars = bars.len(), "fetched price history");
                Some(Arc::new(bars))
            }
            Err(err) => {
                warn!(%symbol, %period, error = %err, "price history fetch failed");
                None
            }
        }
    }

    /// `true` when a history for the key is currently held.
    #[must_use]
    pub fn contains(&self, symbol: &Symbol, period: Period) -> bool {
        self.entries.contains_key(&(symbol.clone(), period))
    }

    /// Drops one history so the next lookup refetches it.
    pub fn invalidate(&self, symbol: &Symbol, period: Period) {
        self.entries.invalidate(&(symbol.clone(), period));
    }

    /// Drops every history.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

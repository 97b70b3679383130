use std::{collections::HashMap, fmt::Display, str::FromStr};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{Error, PriceBar, Result};

/// Lookback window requested from a [`PriceHistoryProvider`].
///
/// Parses from and displays as the short provider notation.
///
/// ```
/// use ta_verdict::Period;
///
/// let period: Period = "2y".parse().unwrap();
/// assert_eq!(period, Period::TwoYears);
/// assert_eq!(Period::SixMonths.to_string(), "6mo");
/// assert!("3w".parse::<Period>().is_err());
/// ```
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Debug, Serialize, Deserialize,
)]
pub enum Period {
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    /// Calendar span covered by the period.
    #[must_use]
    pub fn lookback(self) -> Duration {
        Duration::days(match self {
            Self::SixMonths => 183,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1826,
        })
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownPeriod(s.to_owned()))
    }
}

/// Normalized ticker: trimmed and upper-cased.
///
/// ```
/// use ta_verdict::Symbol;
///
/// let symbol = Symbol::new(" btc-usd ").unwrap();
/// assert_eq!(symbol.as_str(), "BTC-USD");
/// assert!(Symbol::new("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// # Errors
    ///
    /// [`Error::EmptySymbol`] when nothing but whitespace is given.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptySymbol);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// Failure reported by a [`PriceHistoryProvider`].
///
/// The analysis layer never propagates these: a failed fetch is treated the
/// same as an empty history.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("unknown symbol {0}")]
    UnknownSymbol(Symbol),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of daily price history, e.g. a market-data HTTP API.
///
/// Implementations return bars in chronological order, or an empty vector
/// when the provider has no rows for the request.
pub trait PriceHistoryProvider: Send + Sync {
    /// # Errors
    ///
    /// Any lookup or transport failure.
    fn fetch(&self, symbol: &Symbol, period: Period) -> Result<Vec<PriceBar>, ProviderError>;
}

/// In-memory provider holding a fixed history per symbol.
///
/// A request returns the bars that fall inside the period's lookback,
/// measured back from the symbol's latest bar.
#[derive(Clone, Default, Debug)]
pub struct StaticProvider {
    histories: HashMap<Symbol, Vec<PriceBar>>,
}

impl StaticProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the history served for `symbol`.
    #[must_use]
    pub fn with_history(mut self, symbol: Symbol, bars: Vec<PriceBar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    pub fn insert(&mut self, symbol: Symbol, mut bars: Vec<PriceBar>) {
        bars.sort_by_key(|bar| bar.timestamp);
        self.histories.insert(symbol, bars);
    }
}

impl PriceHistoryProvider for StaticProvider {
    fn fetch(&self, symbol: &Symbol, period: Period) -> Result<Vec<PriceBar>, ProviderError> {
        let bars = self
            .histories
            .get(symbol)
            .ok_or_else(|| ProviderError::UnknownSymbol(symbol.clone()))?;

        let Some(last) = bars.last() else {
            return Ok(Vec::new());
        };
        let start = last.timestamp - period.lookback();

        Ok(bars
            .iter()
            .filter(|bar| bar.timestamp > start)
            .copied()
            .collect())
    }
}

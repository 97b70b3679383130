use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, IndicatorRow, Result};

/// Categorical outcome of a [`Signal`], a total function of its score.
///
/// | score | verdict |
/// |---|---|
/// | ≥ 2 | `StrongBuy` |
/// | 1 | `Buy` |
/// | 0 | `Hold` |
/// | −1 | `Sell` |
/// | ≤ −2 | `StrongSell` |
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Verdict {
    #[must_use]
    pub fn from_score(score: i8) -> Self {
        match score {
            2.. => Self::StrongBuy,
            1 => Self::Buy,
            0 => Self::Hold,
            -1 => Self::Sell,
            ..=-2 => Self::StrongSell,
        }
    }

    /// `Buy` or `StrongBuy`.
    #[must_use]
    pub fn is_bullish(self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy)
    }

    /// `Sell` or `StrongSell`.
    #[must_use]
    pub fn is_bearish(self) -> bool {
        matches!(self, Self::Sell | Self::StrongSell)
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        })
    }
}

/// The three independent sub-votes, in scoring order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// Fast SMA against slow SMA.
    Trend,
    /// RSI against the oversold/overbought bands.
    Oscillator,
    /// MACD line against its signal line.
    Momentum,
}

impl Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Trend => "TREND",
            Self::Oscillator => "RSI",
            Self::Momentum => "MACD",
        })
    }
}

/// Why a sub-vote came out the way it did.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    BullishTrend,
    BearishTrend,
    Oversold,
    Overbought,
    Neutral,
    RisingMomentum,
    FallingMomentum,
    InsufficientData,
}

impl Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::BullishTrend => "bullish (golden cross)",
            Self::BearishTrend => "bearish (death cross)",
            Self::Oversold => "oversold",
            Self::Overbought => "overbought",
            Self::Neutral => "neutral zone",
            Self::RisingMomentum => "rising momentum",
            Self::FallingMomentum => "falling momentum",
            Self::InsufficientData => "insufficient data",
        })
    }
}

/// One sub-vote: its factor, the reason, and what it adds to the score.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub factor: Factor,
    pub reason: Reason,
    pub contribution: i8,
}

impl Vote {
    fn new(factor: Factor, reason: Reason, contribution: i8) -> Self {
        Self {
            factor,
            reason,
            contribution,
        }
    }
}

impl Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.factor, self.reason)
    }
}

/// How the momentum sub-vote treats an undefined MACD or signal line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumPolicy {
    /// Contribute 0, like the other sub-votes do on missing data.
    #[default]
    Abstain,
    /// Contribute −1, treating missing momentum as falling.
    Penalize,
}

/// Thresholds and policies for the [`SignalScorer`].
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// RSI strictly below this votes +1.
    pub oversold: f64,
    /// RSI strictly above this votes −1.
    pub overbought: f64,
    pub undefined_momentum: MomentumPolicy,
}

impl ScorerConfig {
    /// # Errors
    ///
    /// [`Error::InvalidThresholds`] when either band is not finite or
    /// `oversold` is not strictly below `overbought`.
    pub fn validate(&self) -> Result<()> {
        let Self {
            oversold,
            overbought,
            ..
        } = *self;
        if oversold.is_finite() && overbought.is_finite() && oversold < overbought {
            Ok(())
        } else {
            Err(Error::InvalidThresholds {
                oversold,
                overbought,
            })
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            undefined_momentum: MomentumPolicy::Abstain,
        }
    }
}

/// Composite directional signal derived from one [`IndicatorRow`].
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Signal {
    /// Sum of the three contributions, within `-3..=3`.
    pub score: i8,
    pub verdict: Verdict,
    /// Trend, oscillator and momentum votes, always in that order.
    pub votes: [Vote; 3],
}

impl Signal {
    /// Human-readable reason lines in vote order, e.g.
    /// `"TREND: bullish (golden cross)"`.
    pub fn reasons(&self) -> impl Iterator<Item = String> + '_ {
        self.votes.iter().map(ToString::to_string)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:+})", self.verdict, self.score)
    }
}

/// Scores the latest [`IndicatorRow`] into a [`Signal`].
///
/// Stateless and total: every row, including rows with undefined indicator
/// columns, produces a signal. Missing or non-finite inputs abstain
/// (contribute 0) unless [`MomentumPolicy::Penalize`] is configured for MACD.
///
/// # Example
///
/// ```
/// use ta_verdict::{IndicatorRow, SignalScorer, Verdict};
/// use chrono::{TimeZone, Utc};
///
/// let row = IndicatorRow {
///     timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap(),
///     open: 101.0, high: 103.0, low: 100.0, close: 102.0,
///     sma_fast: Some(98.0),
///     sma_slow: Some(95.0),
///     rsi: Some(45.0),
///     macd: Some(1.2),
///     macd_signal: Some(0.8),
/// };
///
/// let signal = SignalScorer::default().score(&row);
/// assert_eq!(signal.score, 2);
/// assert_eq!(signal.verdict, Verdict::StrongBuy);
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct SignalScorer {
    config: ScorerConfig,
}

impl SignalScorer {
    #[must_use]
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    #[must_use]
    pub fn score(&self, row: &IndicatorRow) -> Signal {
        let votes = [
            Self::trend(row),
            self.oscillator(row),
            self.momentum(row),
        ];
        let score = votes.iter().map(|vote| vote.contribution).sum();

        Signal {
            score,
            verdict: Verdict::from_score(score),
            votes,
        }
    }

    fn trend(row: &IndicatorRow) -> Vote {
        match (defined(row.sma_fast), defined(row.sma_slow)) {
            (Some(fast), Some(slow)) if fast > slow => {
                Vote::new(Factor::Trend, Reason::BullishTrend, 1)
            }
            (Some(_), Some(_)) => Vote::new(Factor::Trend, Reason::BearishTrend, -1),
            _ => Vote::new(Factor::Trend, Reason::InsufficientData, 0),
        }
    }

    fn oscillator(&self, row: &IndicatorRow) -> Vote {
        match defined(row.rsi) {
            Some(rsi) if rsi < self.config.oversold => {
                Vote::new(Factor::Oscillator, Reason::Oversold, 1)
            }
            Some(rsi) if rsi > self.config.overbought => {
                Vote::new(Factor::Oscillator, Reason::Overbought, -1)
            }
            Some(_) => Vote::new(Factor::Oscillator, Reason::Neutral, 0),
            None => Vote::new(Factor::Oscillator, Reason::InsufficientData, 0),
        }
    }

    fn momentum(&self, row: &IndicatorRow) -> Vote {
        match (defined(row.macd), defined(row.macd_signal)) {
            (Some(macd), Some(signal)) if macd > signal => {
                Vote::new(Factor::Momentum, Reason::RisingMomentum, 1)
            }
            (Some(_), Some(_)) => Vote::new(Factor::Momentum, Reason::FallingMomentum, -1),
            _ => {
                let contribution = match self.config.undefined_momentum {
                    MomentumPolicy::Abstain => 0,
                    MomentumPolicy::Penalize => -1,
                };
                Vote::new(Factor::Momentum, Reason::InsufficientData, contribution)
            }
        }
    }
}

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Price, Result, Verdict};

/// Starting capital and the amount added on each averaging step.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub initial_cash: f64,
    pub dca_amount: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            initial_cash: 10_000.0,
            dca_amount: 100.0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    In,
    Out,
}

/// What [`Portfolio::apply`] did.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Out of the market on a bullish verdict: all cash was invested.
    Reentry { units: f64 },
    /// In the market on a bearish verdict: every unit was sold.
    Exit { proceeds: f64 },
    /// In the market otherwise: a fixed amount of new money was invested.
    DollarCostAverage { units: f64 },
    Hold,
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reentry { units } => write!(f, "re-entry: bought {units} units"),
            Self::Exit { proceeds } => write!(f, "exit: sold for {proceeds}"),
            Self::DollarCostAverage { units } => write!(f, "dca: bought {units} units"),
            Self::Hold => f.write_str("hold"),
        }
    }
}

/// Two-state `{In, Out}` position simulator driven by verdicts.
///
/// Starts out of the market holding `initial_cash`.
///
/// # Example
///
/// ```
/// use ta_verdict::{Portfolio, PortfolioConfig, Position, Transition, Verdict};
///
/// let mut portfolio = Portfolio::new(PortfolioConfig::default());
///
/// let entry = portfolio.apply(Verdict::Buy, 100.0).unwrap();
/// assert_eq!(entry, Transition::Reentry { units: 100.0 });
/// assert_eq!(portfolio.position(), Position::In);
///
/// let exit = portfolio.apply(Verdict::StrongSell, 110.0).unwrap();
/// assert_eq!(exit, Transition::Exit { proceeds: 11_000.0 });
/// assert_eq!(portfolio.equity(120.0), 11_000.0);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Portfolio {
    config: PortfolioConfig,
    position: Position,
    cash: f64,
    units: f64,
    contributed: f64,
}

impl Portfolio {
    #[must_use]
    pub fn new(config: PortfolioConfig) -> Self {
        Self {
            config,
            position: Position::Out,
            cash: config.initial_cash,
            units: 0.0,
            contributed: config.initial_cash,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn cash(&self) -> f64 {
        self.cash
    }

    #[must_use]
    pub fn units(&self) -> f64 {
        self.units
    }

    /// Initial cash plus every averaging contribution.
    #[must_use]
    pub fn contributed(&self) -> f64 {
        self.contributed
    }

    /// Cash plus units marked at `price`.
    #[must_use]
    pub fn equity(&self, price: Price) -> f64 {
        self.units.mul_add(price, self.cash)
    }

    /// Applies one verdict at the given price.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTradePrice`] when `price` is not finite and positive; the
    /// portfolio is left untouched.
    pub fn apply(&mut self, verdict: Verdict, price: Price) -> Result<Transition> {
        if !price.is_finite() || price <= 0.0 {
            return Err(Error::InvalidTradePrice(price));
        }

        let transition = match self.position {
            Position::Out if verdict.is_bullish() => {
                let units = self.cash / price;
                self.units += units;
                self.cash = 0.0;
                self.position = Position::In;
                Transition::Reentry { units }
            }
            Position::In if verdict.is_bearish() => {
                let proceeds = self.units * price;
                self.cash += proceeds;
                self.units = 0.0;
                self.position = Position::Out;
                Transition::Exit { proceeds }
            }
            Position::In => {
                let units = self.config.dca_amount / price;
                self.units += units;
                self.contributed += self.config.dca_amount;
                Transition::DollarCostAverage { units }
            }
            Position::Out => Transition::Hold,
        };

        debug!(%verdict, price, %transition, "portfolio step");
        Ok(transition)
    }
}

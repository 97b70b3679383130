use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Ohlcv, Price, Result};

/// What to do with a bar whose OHLC values contradict each other.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarPolicy {
    /// Log a warning and keep the bar.
    #[default]
    Warn,
    /// Fail with [`Error::InconsistentBar`].
    Reject,
}

/// Input checks run before any indicator is computed.
///
/// Ordering and price sanity are always enforced: out-of-order or duplicate
/// timestamps and non-finite or non-positive prices are errors. Only OHLC
/// internal consistency (`low ≤ open, close ≤ high`) is governed by policy,
/// since providers do occasionally publish such bars.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub inconsistent_bars: BarPolicy,
}

impl ValidationPolicy {
    /// Policy that rejects inconsistent bars instead of warning.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            inconsistent_bars: BarPolicy::Reject,
        }
    }

    /// Checks a bar sequence.
    ///
    /// Returns the number of inconsistent bars that were let through with a
    /// warning.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateTimestamp`] or [`Error::NonChronological`] when the
    /// sequence is not strictly increasing in time, [`Error::InvalidPrice`]
    /// for NaN, infinite or non-positive prices, and
    /// [`Error::InconsistentBar`] under [`BarPolicy::Reject`].
    pub fn check<B: Ohlcv>(&self, bars: &[B]) -> Result<usize> {
        let mut warned = 0;
        let mut previous = None;

        for (index, bar) in bars.iter().enumerate() {
            let current = bar.open_time();
            if let Some(previous) = previous {
                if current == previous {
                    return Err(Error::DuplicateTimestamp {
                        index,
                        timestamp: current,
                    });
                }
                if current < previous {
                    return Err(Error::NonChronological {
                        index,
                        previous,
                        current,
                    });
                }
            }
            previous = Some(current);

            check_prices(index, bar)?;

            if let Some(reason) = inconsistency(bar) {
                match self.inconsistent_bars {
                    BarPolicy::Reject => return Err(Error::InconsistentBar { index, reason }),
                    BarPolicy::Warn => {
                        warn!(index, timestamp = %current, %reason, "inconsistent bar");
                        warned += 1;
                    }
                }
            }
        }

        Ok(warned)
    }
}

fn check_prices(index: usize, bar: &impl Ohlcv) -> Result<()> {
    let fields: [(&'static str, Price); 4] = [
        ("open", bar.open()),
        ("high", bar.high()),
        ("low", bar.low()),
        ("close", bar.close()),
    ];

    match fields
        .into_iter()
        .find(|(_, value)| !value.is_finite() || *value <= 0.0)
    {
        Some((field, value)) => Err(Error::InvalidPrice {
            index,
            field,
            value,
        }),
        None => Ok(()),
    }
}

fn inconsistency(bar: &impl Ohlcv) -> Option<String> {
    let (open, high, low, close) = (bar.open(), bar.high(), bar.low(), bar.close());

    if low > high {
        Some(format!("low {low} above high {high}"))
    } else if !(low..=high).contains(&open) {
        Some(format!("open {open} outside [{low}, {high}]"))
    } else if !(low..=high).contains(&close) {
        Some(format!("close {close} outside [{low}, {high}]"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{Bar, bar};
    use assert_matches::assert_matches;

    mod ordering {
        use super::*;

        #[test]
        fn empty_sequence_is_valid() {
            let bars: [Bar; 0] = [];
            assert_eq!(ValidationPolicy::default().check(&bars).unwrap(), 0);
        }

        #[test]
        fn increasing_with_gaps_is_valid() {
            let bars = [bar(10.0, 1), bar(11.0, 2), bar(12.0, 5)];
            assert_eq!(ValidationPolicy::default().check(&bars).unwrap(), 0);
        }

        #[test]
        fn duplicate_timestamp_is_rejected() {
            let bars = [bar(10.0, 1), bar(11.0, 2), bar(12.0, 2)];
            assert_matches!(
                ValidationPolicy::default().check(&bars),
                Err(Error::DuplicateTimestamp { index: 2, .. })
            );
        }

        #[test]
        fn decreasing_timestamp_is_rejected() {
            let bars = [bar(10.0, 3), bar(11.0, 2)];
            assert_matches!(
                ValidationPolicy::default().check(&bars),
                Err(Error::NonChronological { index: 1, .. })
            );
        }
    }

    mod prices {
        use super::*;

        #[test]
        fn nan_close_is_rejected() {
            let bars = [Bar::new(10.0, 10.0, 10.0, f64::NAN).at(1)];
            assert_matches!(
                ValidationPolicy::default().check(&bars),
                Err(Error::InvalidPrice { index: 0, field: "close", .. })
            );
        }

        #[test]
        fn zero_low_is_rejected() {
            let bars = [bar(10.0, 1), Bar::new(10.0, 10.0, 0.0, 10.0).at(2)];
            assert_matches!(
                ValidationPolicy::default().check(&bars),
                Err(Error::InvalidPrice { index: 1, field: "low", .. })
            );
        }

        #[test]
        fn infinite_high_is_rejected() {
            let bars = [Bar::new(10.0, f64::INFINITY, 9.0, 10.0).at(1)];
            assert_matches!(
                ValidationPolicy::strict().check(&bars),
                Err(Error::InvalidPrice { field: "high", .. })
            );
        }
    }

    mod consistency {
        use super::*;

        fn crossed() -> [Bar; 2] {
            [bar(10.0, 1), Bar::new(10.0, 9.0, 11.0, 10.0).at(2)]
        }

        #[test]
        fn warns_by_default() {
            assert_eq!(ValidationPolicy::default().check(&crossed()).unwrap(), 1);
        }

        #[test]
        fn strict_rejects() {
            assert_matches!(
                ValidationPolicy::strict().check(&crossed()),
                Err(Error::InconsistentBar { index: 1, .. })
            );
        }

        #[test]
        fn close_above_high_is_reported() {
            let bars = [Bar::new(10.0, 11.0, 9.0, 12.0).at(1)];
            let err = ValidationPolicy::strict().check(&bars).unwrap_err();
            assert_eq!(err.to_string(), "bar 0 is inconsistent: close 12 outside [9, 11]");
        }
    }
}

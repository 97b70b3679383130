use crate::Price;
use std::collections::VecDeque;

/// Fixed-length trailing window over a stream of values.
///
/// Keeps a running sum for O(1) updates. Also counts the non-zero values it
/// holds so that a window made only of zeros reports a sum of exactly `0.0`,
/// whatever rounding residue the add/subtract sequence left behind. RSI relies
/// on this to tell a flat market apart from a tiny average loss.
#[derive(Clone, Debug)]
pub(crate) struct RollingWindow {
    size: usize,
    window: VecDeque<Price>,
    /// Running sum of values in the window. Maintained incrementally via
    /// add/subtract, may accumulate FP rounding drift over very long runs,
    /// but negligible for typical window sizes on financial data.
    sum: Price,
    non_zero: usize,
}

impl RollingWindow {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            window: VecDeque::with_capacity(size),
            sum: 0.0,
            non_zero: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, value: Price) {
        if self.is_ready()
            && let Some(old) = self.window.pop_front()
        {
            self.sum -= old;
            if old != 0.0 {
                self.non_zero -= 1;
            }
        }

        self.window.push_back(value);
        self.sum += value;
        if value != 0.0 {
            self.non_zero += 1;
        }
    }

    /// Sum of the window, or `None` until `size` values have been pushed.
    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_ready()
            .then_some(if self.non_zero == 0 { 0.0 } else { self.sum })
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }
}

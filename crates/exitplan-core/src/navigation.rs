//! Wizard cursor and positional progress.
//!
//! Progress here is positional, `(index + 1) / total`. It is unrelated to
//! the content-based readiness in [`crate::completion`].

use crate::completion::{LAST_STEP, SUMMARY_STEP};

/// Only constructible through [`Navigator::new`], which keeps `total >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    total: usize,
}

/// What a forward move from the current position involves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Plain synchronous move to this index.
    Move(usize),
    /// Leaving the readiness step without an analysis. The caller must run
    /// the analysis and only then call [`Navigator::next`].
    RequiresAnalysis,
    /// Already on the last step.
    AtEnd,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(usize::from(LAST_STEP))
    }
}

impl Navigator {
    /// A cursor on the first of `total` steps. A zero total is treated as one step.
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total: total.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.current
    }

    /// 1-based step id at the cursor.
    pub fn step_id(&self) -> u8 {
        u8::try_from(self.current + 1).unwrap_or(u8::MAX)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.total
    }

    /// Classify the forward move without performing it.
    pub fn transition(&self, has_analysis: bool) -> Transition {
        if self.is_last() {
            Transition::AtEnd
        } else if self.step_id() == SUMMARY_STEP && !has_analysis {
            Transition::RequiresAnalysis
        } else {
            Transition::Move(self.current + 1)
        }
    }

    /// Move forward one step, clamped to the last step. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        let before = self.current;
        self.current = (self.current + 1).min(self.total - 1);
        self.current != before
    }

    /// Move back one step, clamped to the first step.
    pub fn prev(&mut self) -> bool {
        let before = self.current;
        self.current = self.current.saturating_sub(1);
        self.current != before
    }

    /// Jump to any index. Out-of-range indices land on the last step.
    pub fn set_step(&mut self, index: usize) {
        self.current = index.min(self.total - 1);
    }

    /// Positional progress, 1–100.
    pub fn progress_percent(&self) -> u8 {
        ((self.current + 1) * 100 / self.total) as u8
    }
}

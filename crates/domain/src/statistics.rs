//! Run statistics.
//!
//! `tested` is counted when an invocation starts; the outcome buckets are
//! counted when it finalizes. Anything started but never finalized shows up
//! as `undefined`.

use serde::{Deserialize, Serialize};

use crate::outcome::ExecutionOutcome;

/// Outcome counters accumulated across a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Invocations started.
    pub tested: usize,
    /// Invocations with an unsupported verb.
    pub unsupported: usize,
    /// Invocations that failed a status or schema check.
    pub failed: usize,
    /// Invocations that passed.
    pub passed: usize,
    /// Invocations that could not be carried out.
    pub error: usize,
    /// Invocations excluded by the filter.
    pub skipped: usize,
}

impl RunStatistics {
    /// Creates zeroed statistics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tested: 0,
            unsupported: 0,
            failed: 0,
            passed: 0,
            error: 0,
            skipped: 0,
        }
    }

    /// Zeroes every counter for a new run.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Counts the start of an invocation.
    pub const fn begin(&mut self) {
        self.tested += 1;
    }

    /// Counts a finalized outcome into its bucket.
    pub const fn record(&mut self, outcome: &ExecutionOutcome) {
        match outcome {
            ExecutionOutcome::Passed => self.passed += 1,
            ExecutionOutcome::Failed => self.failed += 1,
            ExecutionOutcome::Unsupported => self.unsupported += 1,
            ExecutionOutcome::Error(_) => self.error += 1,
            ExecutionOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Returns the number of finalized invocations.
    #[must_use]
    pub const fn finalized(&self) -> usize {
        self.unsupported + self.failed + self.passed + self.error + self.skipped
    }

    /// Returns invocations that started but never reached an outcome.
    #[must_use]
    pub const fn undefined(&self) -> usize {
        self.tested.saturating_sub(self.finalized())
    }

    /// Returns true if no invocation failed, errored or was left undefined.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0 && self.error == 0 && self.undefined() == 0
    }

    /// Renders the run summary.
    ///
    /// Totals, passed and failed are always shown; the other buckets only
    /// when non-zero.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total {} tests", self.tested),
            format!("  {} passed", self.passed),
            format!("  {} failed", self.failed),
        ];
        let optional = [
            (self.unsupported, "unsupported"),
            (self.error, "errors"),
            (self.skipped, "skipped"),
            (self.undefined(), "undefined"),
        ];
        lines.extend(
            optional
                .into_iter()
                .filter(|(count, _)| *count > 0)
                .map(|(count, label)| format!("  {count} {label}")),
        );
        lines
    }
}

// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Per-reservation outcomes of a job run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    /// Reservations the job transitioned or otherwise acted on.
    pub reservations_updated: Vec<i64>,
    /// Reservations examined but deliberately left alone (including dry-run
    /// candidates).
    pub skipped_reservations: Vec<i64>,
    /// Human-readable notes: side actions taken, dry-run previews, sweep
    /// summaries.
    pub notifications: Vec<String>,
}

/// Aggregated outcome of one job execution.
///
/// An empty candidate set is a success with a zero count, not a failure.
/// `errors` collects per-reservation failures that did not abort the sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub success: bool,
    /// Reservations that met the job's criteria (in dry-run mode: that
    /// would have been acted on).
    pub processed_count: usize,
    pub errors: Vec<String>,
    pub details: JobDetails,
}

impl Default for JobResult {
    fn default() -> Self {
        Self {
            success: true,
            processed_count: 0,
            errors: Vec::new(),
            details: JobDetails::default(),
        }
    }
}

impl JobResult {
    /// A successful no-op result carrying a single explanatory note.
    #[must_use]
    pub fn skipped(note: impl Into<String>) -> Self {
        let mut result = Self::default();
        result.details.notifications.push(note.into());
        result
    }

    /// A failed result carrying a single error string.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            processed_count: 0,
            errors: vec![error.into()],
            details: JobDetails::default(),
        }
    }

    /// Records a reservation the job acted on.
    pub fn record_updated(&mut self, reservation_id: i64) {
        self.processed_count += 1;
        self.details.reservations_updated.push(reservation_id);
    }

    /// Records a candidate left alone (dry-run or deliberate skip).
    ///
    /// Dry-run candidates still count as processed so the dry-run count
    /// matches what a real run would commit.
    pub fn record_skipped(&mut self, reservation_id: i64, counts: bool) {
        if counts {
            self.processed_count += 1;
        }
        self.details.skipped_reservations.push(reservation_id);
    }

    /// Adds a notification note.
    pub fn note(&mut self, message: impl Into<String>) {
        self.details.notifications.push(message.into());
    }

    /// Records a per-reservation error without failing the whole result.
    pub fn record_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Merges another result into this one (used by composite sweeps).
    pub fn absorb(&mut self, other: Self) {
        self.success = self.success && other.success;
        self.processed_count += other.processed_count;
        self.errors.extend(other.errors);
        self.details
            .reservations_updated
            .extend(other.details.reservations_updated);
        self.details
            .skipped_reservations
            .extend(other.details.skipped_reservations);
        self.details
            .notifications
            .extend(other.details.notifications);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_successful_and_empty() {
        let result = JobResult::default();
        assert!(result.success);
        assert_eq!(result.processed_count, 0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_absorb_combines_counts_and_failure() {
        let mut a = JobResult::default();
        a.record_updated(1);
        let mut b = JobResult::failed("boom");
        b.record_skipped(2, true);

        a.absorb(b);
        assert!(!a.success);
        assert_eq!(a.processed_count, 2);
        assert_eq!(a.errors, vec!["boom".to_string()]);
        assert_eq!(a.details.reservations_updated, vec![1]);
        assert_eq!(a.details.skipped_reservations, vec![2]);
    }

    #[test]
    fn test_skipped_result_is_success() {
        let result = JobResult::skipped("feature disabled");
        assert!(result.success);
        assert_eq!(result.processed_count, 0);
        assert_eq!(result.details.notifications.len(), 1);
    }
}

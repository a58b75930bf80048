//! Metrics registry
//!
//! - Counters increase monotonically and reset only on process start
//! - `submissions` is a gauge tracking the current store size
//! - Atomics with Relaxed ordering; exact values, no sampling

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the submission service
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Submissions accepted by POST
    submissions_created: AtomicU64,
    /// Submissions replaced by PUT
    submissions_updated: AtomicU64,
    submissions_deleted: AtomicU64,
    /// Payloads that passed validation
    validations_passed: AtomicU64,
    /// Payloads rejected by validation
    validations_failed: AtomicU64,
    /// Submissions currently stored
    submissions: AtomicU64,
}

impl MetricsRegistry {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_created(&self) {
        self.submissions_created.fetch_add(1, Ordering::Relaxed);
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updated(&self) {
        self.submissions_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deleted(&self) {
        self.submissions_deleted.fetch_add(1, Ordering::Relaxed);
        // Saturate at zero rather than wrap.
        let _ = self
            .submissions
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Record the outcome of one validation run
    pub fn record_validation(&self, is_valid: bool) {
        if is_valid {
            self.validations_passed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.validations_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Set the submission gauge, e.g. after opening a persisted store
    pub fn set_submissions(&self, count: u64) {
        self.submissions.store(count, Ordering::Relaxed);
    }

    /// Point-in-time copy of all values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            submissions_created: self.submissions_created.load(Ordering::Relaxed),
            submissions_updated: self.submissions_updated.load(Ordering::Relaxed),
            submissions_deleted: self.submissions_deleted.load(Ordering::Relaxed),
            validations_passed: self.validations_passed.load(Ordering::Relaxed),
            validations_failed: self.validations_failed.load(Ordering::Relaxed),
            submissions: self.submissions.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub submissions_created: u64,
    pub submissions_updated: u64,
    pub submissions_deleted: u64,
    pub validations_passed: u64,
    pub validations_failed: u64,
    pub submissions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.submissions_created, 0);
        assert_eq!(snapshot.validations_failed, 0);
        assert_eq!(snapshot.submissions, 0);
    }

    #[test]
    fn test_submission_gauge_follows_create_and_delete() {
        let registry = MetricsRegistry::new();
        registry.increment_created();
        registry.increment_created();
        registry.increment_deleted();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.submissions_created, 2);
        assert_eq!(snapshot.submissions_deleted, 1);
        assert_eq!(snapshot.submissions, 1);
    }

    #[test]
    fn test_gauge_does_not_wrap() {
        let registry = MetricsRegistry::new();
        registry.increment_deleted();
        assert_eq!(registry.snapshot().submissions, 0);
    }

    #[test]
    fn test_record_validation() {
        let registry = MetricsRegistry::new();
        registry.record_validation(true);
        registry.record_validation(false);
        registry.record_validation(false);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.validations_passed, 1);
        assert_eq!(snapshot.validations_failed, 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.set_submissions(7);
        registry.increment_updated();

        let value = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(value["submissions"], 7);
        assert_eq!(value["submissions_updated"], 1);
    }
}

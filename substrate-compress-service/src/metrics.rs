use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Running totals for one algorithm, updated concurrently by every caller
/// dispatching through the service.
#[derive(Default)]
pub struct AlgorithmMetrics {
    attempts: AtomicU64,
    errors: AtomicU64,
    total_duration_ms: AtomicU64,
    ratio_sum: Mutex<f64>,
    quality_sum: Mutex<f64>,
}

/// A point-in-time read of [`AlgorithmMetrics`], safe to hand out by value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgorithmMetricsSnapshot {
    pub attempts: u64,
    pub errors: u64,
    pub avg_duration_ms: f64,
    pub avg_ratio: f64,
    pub avg_quality: f64,
}

impl AlgorithmMetrics {
    pub(crate) fn record_success(&self, duration_ms: u64, ratio: f64, quality: f64) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms.fetch_add(duration_ms, Ordering::Relaxed);
        *self.ratio_sum.lock() += ratio;
        *self.quality_sum.lock() += quality;
    }

    pub(crate) fn record_error(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> AlgorithmMetricsSnapshot {
        let attempts = self.attempts.load(Ordering::Relaxed);
        let errors = self.errors.load(Ordering::Relaxed);
        let successes = attempts.saturating_sub(errors);
        let denom = successes.max(1) as f64;
        AlgorithmMetricsSnapshot {
            attempts,
            errors,
            avg_duration_ms: if successes == 0 { 0.0 } else { self.total_duration_ms.load(Ordering::Relaxed) as f64 / denom },
            avg_ratio: if successes == 0 { 0.0 } else { *self.ratio_sum.lock() / denom },
            avg_quality: if successes == 0 { 0.0 } else { *self.quality_sum.lock() / denom },
        }
    }
}

use std::collections::HashMap;

use substrate_core::compression::Algorithm;

use crate::experiment::{CompressionOutcome, Experiment};

/// Per-variant aggregate metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantMetrics {
    pub total_attempts: u64,
    pub success_count: u64,
    pub success_rate: f64,
    pub avg_ratio: f64,
    pub avg_quality: f64,
    pub avg_time_ms: f64,
    pub user_acceptance_rate: f64,
    pub user_acceptance_count: u64,
    pub user_rejection_count: u64,
    pub p50_ratio: f64,
    pub p95_time_ms: f64,
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p * (sorted.len() - 1) as f64).round() as usize).min(sorted.len() - 1);
    sorted[idx]
}

pub(crate) fn compute_variant_metrics(outcomes: &[&CompressionOutcome]) -> VariantMetrics {
    if outcomes.is_empty() {
        return VariantMetrics::default();
    }

    let total_attempts = outcomes.len() as u64;
    let successes: Vec<&&CompressionOutcome> = outcomes.iter().filter(|o| o.success).collect();
    let success_count = successes.len() as u64;

    let avg = |f: fn(&CompressionOutcome) -> f64| -> f64 {
        if successes.is_empty() {
            0.0
        } else {
            successes.iter().map(|o| f(o)).sum::<f64>() / successes.len() as f64
        }
    };

    let mut ratios: Vec<f64> = successes.iter().map(|o| o.ratio).collect();
    ratios.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut times: Vec<f64> = successes.iter().map(|o| o.duration_ms).collect();
    times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Acceptance is computed only over successful outcomes carrying an
    // explicit accept/reject signal.
    let signaled: Vec<bool> = successes.iter().filter_map(|o| o.user_accepted).collect();
    let accepted = signaled.iter().filter(|a| **a).count() as u64;
    let rejected = signaled.iter().filter(|a| !**a).count() as u64;

    VariantMetrics {
        total_attempts,
        success_count,
        success_rate: success_count as f64 / total_attempts as f64,
        avg_ratio: avg(|o| o.ratio),
        avg_quality: avg(|o| o.quality),
        avg_time_ms: avg(|o| o.duration_ms),
        user_acceptance_rate: if signaled.is_empty() { 0.0 } else { accepted as f64 / signaled.len() as f64 },
        user_acceptance_count: accepted,
        user_rejection_count: rejected,
        p50_ratio: percentile(&ratios, 0.5),
        p95_time_ms: percentile(&times, 0.95),
    }
}

/// Composite score used to pick a winner: weighted blend of
/// success rate, achieved ratio (capped contribution via `/5`), quality,
/// and acceptance.
pub fn composite_score(metrics: &VariantMetrics) -> f64 {
    0.3 * metrics.success_rate + 0.3 * (metrics.avg_ratio / 5.0) + 0.2 * metrics.avg_quality + 0.2 * metrics.user_acceptance_rate
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

fn confidence_tier(metrics: &VariantMetrics) -> ConfidenceTier {
    if metrics.success_rate >= 0.9 && metrics.avg_quality >= 0.8 {
        ConfidenceTier::High
    } else if metrics.success_rate >= 0.7 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// A full per-variant comparison with winner selection and a textual
/// recommendation.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub per_variant: HashMap<Algorithm, VariantMetrics>,
    pub distinct_sessions: usize,
    pub winner: Option<Algorithm>,
    pub recommendation: String,
}

const MIN_ATTEMPTS_FOR_WINNER: u64 = 5;

pub(crate) fn build_comparison_report(experiment: &Experiment) -> ComparisonReport {
    let per_variant: HashMap<Algorithm, VariantMetrics> = experiment
        .variants
        .iter()
        .map(|&algo| (algo, compute_variant_metrics(&experiment.outcomes_for(algo).collect::<Vec<_>>())))
        .collect();

    let eligible: Vec<(Algorithm, VariantMetrics)> = per_variant
        .iter()
        .filter(|(_, m)| m.total_attempts >= MIN_ATTEMPTS_FOR_WINNER)
        .map(|(a, m)| (*a, *m))
        .collect();

    let winner = eligible
        .iter()
        .max_by(|(_, a), (_, b)| composite_score(a).partial_cmp(&composite_score(b)).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(a, _)| *a);

    let recommendation = match winner {
        None => "not enough data yet: no variant has reached 5 attempts".to_string(),
        Some(algo) => {
            let metrics = per_variant[&algo];
            match confidence_tier(&metrics) {
                ConfidenceTier::High => format!("{algo} is the clear winner with high confidence"),
                ConfidenceTier::Medium => format!("{algo} leads but confidence is medium; keep testing"),
                ConfidenceTier::Low => "further testing needed before declaring a winner".to_string(),
            }
        }
    };

    ComparisonReport { per_variant, distinct_sessions: experiment.distinct_sessions(), winner, recommendation }
}

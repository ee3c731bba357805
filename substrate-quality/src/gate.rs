use serde::{Deserialize, Serialize};

use crate::scoring::QualityScores;

/// Per-sub-score thresholds; a `0.0` threshold means "not checked".
/// Checked in a fixed order so the first failing criterion is always the
/// one reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityGate {
    pub compression_threshold: f64,
    pub retention_threshold: f64,
    pub similarity_threshold: f64,
    pub readability_threshold: f64,
    pub composite_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub pass: bool,
    pub failure_reason: String,
    pub scores: QualityScores,
}

impl QualityGate {
    /// Evaluate `scores` against this gate's thresholds, short-circuiting
    /// at the first failing criterion in the order: compression, retention,
    /// similarity, readability, composite.
    pub fn evaluate(&self, scores: QualityScores) -> GateResult {
        let checks: [(&str, f64, f64); 5] = [
            ("compression", self.compression_threshold, scores.compression),
            ("retention", self.retention_threshold, scores.information_retention),
            ("similarity", self.similarity_threshold, scores.similarity),
            ("readability", self.readability_threshold, scores.readability),
            ("composite", self.composite_threshold, scores.composite),
        ];

        for (name, threshold, value) in checks {
            if threshold > 0.0 && value < threshold {
                return GateResult {
                    pass: false,
                    failure_reason: name.to_string(),
                    scores,
                };
            }
        }

        GateResult { pass: true, failure_reason: String::new(), scores }
    }
}

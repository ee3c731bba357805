use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scope::{RequestScope, ScopeLevel};

/// Feedback counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCounters {
    pub helpful: u64,
    pub unhelpful: u64,
}

/// Outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounters {
    pub success: u64,
    pub failure: u64,
}

/// A distilled strategy, insight, or fix with confidence that adapts to
/// observed outcomes. The universal memory entity; owned
/// exclusively by the Memory Engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub tenant_id: String,
    pub project_id: String,
    pub scope: ScopeLevel,
    pub text: String,
    pub embedding: Vec<f32>,
    /// Confidence, always clamped to [0, 1] — see `Memory::clamp_confidence`.
    pub confidence: f64,
    pub outcomes: OutcomeCounters,
    pub feedback: FeedbackCounters,
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// blake3 hex digest of `text`, used for dedup/cache-key purposes only —
    /// internal bookkeeping, not part of the entity's public identity.
    pub content_hash: String,
}

impl Memory {
    pub fn content_hash_of(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Invariant I1: the memory's tenant/project/scope fields always match
    /// the scope it was recorded under.
    pub fn scope_of(&self) -> RequestScope {
        RequestScope::new(&self.tenant_id, &self.project_id, self.scope)
    }

    /// Invariant I2: clamp confidence into [0, 1] — never let an update push
    /// it out of bounds.
    pub fn clamp_confidence(value: f64) -> f64 {
        value.clamp(0.0, 1.0)
    }
}

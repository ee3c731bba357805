//! Deterministic builders for the entity types shared across every crate's
//! test suite, in the spirit of the workspace's `test-fixtures` crate but
//! generated in-process rather than loaded from golden files — no fixture
//! data was retrieved alongside this workspace.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, TimeZone, Utc};
use substrate_core::checkpoint::Checkpoint;
use substrate_core::document::{Document, Payload, PayloadValue};
use substrate_core::memory::{FeedbackCounters, Memory, OutcomeCounters};
use substrate_core::scope::{RequestContext, RequestScope, ScopeLevel};

/// A fixed instant so builders are reproducible across runs.
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub fn scope(tenant_id: &str, project_id: &str, level: ScopeLevel) -> RequestScope {
    RequestScope::new(tenant_id, project_id, level)
}

pub fn context(tenant_id: &str, project_id: &str, level: ScopeLevel) -> RequestContext {
    RequestContext::new(Some(scope(tenant_id, project_id, level)))
}

pub fn context_without_scope() -> RequestContext {
    RequestContext::new(None)
}

/// A deterministic unit-length embedding, distinct per `seed` without
/// pulling in a real embedder.
pub fn fake_embedding(seed: u64, dimension: usize) -> Vec<f32> {
    let mut values: Vec<f32> = (0..dimension)
        .map(|i| {
            let x = (seed.wrapping_mul(2_654_435_761).wrapping_add(i as u64)) as f32;
            (x % 1000.0) / 1000.0 - 0.5
        })
        .collect();
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut values {
            *v /= norm;
        }
    }
    values
}

pub struct MemoryBuilder {
    id: String,
    tenant_id: String,
    project_id: String,
    scope: ScopeLevel,
    text: String,
    confidence: f64,
    tags: BTreeSet<String>,
}

impl MemoryBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tenant_id: "tenant-a".to_string(),
            project_id: "project-a".to_string(),
            scope: ScopeLevel::Project,
            text: "sample memory text".to_string(),
            confidence: 0.5,
            tags: BTreeSet::new(),
        }
    }

    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = tenant_id.into();
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn scope(mut self, level: ScopeLevel) -> Self {
        self.scope = level;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn build(self) -> Memory {
        let now = fixed_timestamp();
        Memory {
            id: self.id,
            tenant_id: self.tenant_id,
            project_id: self.project_id,
            scope: self.scope,
            embedding: fake_embedding(self.text.len() as u64, 16),
            content_hash: Memory::content_hash_of(&self.text),
            text: self.text,
            confidence: Memory::clamp_confidence(self.confidence),
            outcomes: OutcomeCounters::default(),
            feedback: FeedbackCounters::default(),
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn sample_checkpoint(id: impl Into<String>, session_id: impl Into<String>, tenant_id: impl Into<String>) -> Checkpoint {
    Checkpoint {
        id: id.into(),
        session_id: session_id.into(),
        tenant_id: tenant_id.into(),
        project_id: "project-a".to_string(),
        name: "sample checkpoint".to_string(),
        description: "a checkpoint created for tests".to_string(),
        summary: "short summary of session progress".to_string(),
        context_body: "fuller context body with more detail about what happened".to_string(),
        full_state: "{\"full\":\"state\"}".to_string(),
        token_count: 1200,
        threshold_percent: 80.0,
        auto_created: false,
        metadata: HashMap::new(),
        summary_embedding: fake_embedding(7, 16),
        created_at: fixed_timestamp(),
    }
}

pub fn sample_document(id: impl Into<String>, collection: impl Into<String>, payload: Payload, dimension: usize) -> Document {
    Document { id: id.into(), collection: collection.into(), payload, embedding: fake_embedding(3, dimension) }
}

pub fn payload_with(fields: &[(&str, &str)]) -> Payload {
    fields.iter().map(|(k, v)| (k.to_string(), PayloadValue::String(v.to_string()))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_builder_produces_a_valid_memory() {
        let memory = MemoryBuilder::new("m1").tenant("acme").project("proj").scope(ScopeLevel::Team).confidence(1.4).tag("rust").build();

        assert_eq!(memory.id, "m1");
        assert_eq!(memory.tenant_id, "acme");
        assert_eq!(memory.scope, ScopeLevel::Team);
        assert_eq!(memory.confidence, 1.0, "confidence must clamp into [0, 1]");
        assert!(memory.tags.contains("rust"));
    }

    #[test]
    fn fake_embedding_is_deterministic_and_unit_length() {
        let a = fake_embedding(42, 16);
        let b = fake_embedding(42, 16);
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn sample_checkpoint_carries_requested_ids() {
        let cp = sample_checkpoint("cp1", "session-1", "acme");
        assert_eq!(cp.id, "cp1");
        assert_eq!(cp.session_id, "session-1");
        assert_eq!(cp.tenant_id, "acme");
    }

    #[test]
    fn sample_document_uses_requested_collection_and_payload() {
        let payload = payload_with(&[("tenant_id", "acme")]);
        let doc = sample_document("d1", "memories", payload, 8);
        assert_eq!(doc.collection, "memories");
        assert_eq!(doc.embedding.len(), 8);
        assert_eq!(doc.payload.get("tenant_id"), Some(&PayloadValue::String("acme".to_string())));
    }
}

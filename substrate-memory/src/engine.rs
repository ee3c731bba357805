use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use substrate_core::constants::MEMORY_CONFIDENCE_FLOOR;
use substrate_core::document::{Document, Payload, PayloadValue};
use substrate_core::errors::SubstrateError;
use substrate_core::scope::{RequestContext, RequestScope, ScopeLevel};
use substrate_core::config::MemoryConfig;
use substrate_core::{Memory, SubstrateResult};
use substrate_embed::Embedder;
use substrate_tenant::TenantGuard;
use substrate_vectorstore::VectorStore;

const ENTITY_KIND: &str = "memories";

fn scope_level_str(level: ScopeLevel) -> &'static str {
    match level {
        ScopeLevel::Project => "project",
        ScopeLevel::Team => "team",
        ScopeLevel::Org => "org",
    }
}

fn memory_to_document(guard: &TenantGuard, collection: &str, scope: &RequestScope, memory: &Memory) -> SubstrateResult<Document> {
    let memory_json = serde_json::to_string(memory).map_err(|e| SubstrateError::backend("memory.codec", e.to_string()))?;
    let mut payload: Payload = HashMap::new();
    payload.insert("memory_json".to_string(), PayloadValue::String(memory_json));
    let payload = guard.bind_write(Some(scope), payload)?;
    Ok(Document {
        id: memory.id.clone(),
        collection: collection.to_string(),
        payload,
        embedding: memory.embedding.clone(),
    })
}

fn document_to_memory(doc: &Document) -> SubstrateResult<Memory> {
    let raw = doc
        .payload
        .get("memory_json")
        .ok_or_else(|| SubstrateError::backend("memory.codec", "document missing memory_json field"))?;
    let PayloadValue::String(json) = raw else {
        return Err(SubstrateError::backend("memory.codec", "memory_json field is not a string"));
    };
    serde_json::from_str(json).map_err(|e| SubstrateError::backend("memory.codec", e.to_string()))
}

/// The Memory Engine: hierarchical recall, confidence-weighted
/// re-ranking, and feedback/outcome accumulation. Owns the `Memory` entity
/// outright; the documents backing it in the Vector Store are a derived
/// representation.
///
/// Per-id state lives in a `DashMap`, giving fine-grained per-memory
/// locking without a global lock.
pub struct MemoryEngine {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    guard: TenantGuard,
    config: MemoryConfig,
    memories: DashMap<String, Memory>,
}

impl MemoryEngine {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, guard: TenantGuard, config: MemoryConfig) -> Self {
        Self { embedder, store, guard, config, memories: DashMap::new() }
    }

    fn collection_for(&self, scope: &RequestScope) -> SubstrateResult<String> {
        self.guard.collection_name(ENTITY_KIND, Some(scope))
    }

    /// Embed `text`, bind scope via the Guard, and insert a new memory at
    /// the configured confidence prior.
    pub fn record(&self, ctx: &RequestContext, text: &str, tags: BTreeSet<String>) -> SubstrateResult<Memory> {
        let scope = ctx.scope.clone().ok_or(SubstrateError::MissingTenant)?;
        ctx.check_cancelled()?;

        let embedding = self.embedder.embed(ctx, &[text.to_string()])?.into_iter().next().unwrap_or_default();
        let collection = self.collection_for(&scope)?;
        self.store.ensure_collection(ctx, &collection, embedding.len() as u32)?;

        let now = Utc::now();
        let memory = Memory {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: scope.tenant_id.clone(),
            project_id: scope.project_id.clone(),
            scope: scope.scope,
            text: text.to_string(),
            embedding,
            confidence: self.config.confidence_prior,
            outcomes: Default::default(),
            feedback: Default::default(),
            tags,
            created_at: now,
            updated_at: now,
            content_hash: Memory::content_hash_of(text),
        };

        let doc = memory_to_document(&self.guard, &collection, &scope, &memory)?;
        self.store.add_documents(ctx, &collection, &[doc])?;
        self.memories.insert(memory.id.clone(), memory.clone());
        Ok(memory)
    }

    /// Hierarchical recall: search the caller's scope, cascading to
    /// broader levels while fewer than `limit` results clear the confidence
    /// floor, deduplicating by id and preserving first-seen rank, then
    /// re-ranking by `similarity * confidence^alpha`. `scope_hint` caps how
    /// far the cascade is allowed to broaden; `None` allows it all the way
    /// to `Org`, `Some(ScopeLevel::Project)` restricts the lookup to the
    /// caller's own project with no cascading at all.
    pub fn search(
        &self,
        ctx: &RequestContext,
        query: &str,
        limit: usize,
        scope_hint: Option<ScopeLevel>,
    ) -> SubstrateResult<Vec<Memory>> {
        let base_scope = ctx.scope.clone().ok_or(SubstrateError::MissingTenant)?;
        ctx.check_cancelled()?;

        let query_embedding = self.embedder.embed(ctx, &[query.to_string()])?.into_iter().next().unwrap_or_default();
        let ceiling = scope_hint.unwrap_or(ScopeLevel::Org);

        let mut seen: HashSet<String> = HashSet::new();
        let mut ranked: Vec<(Memory, f64)> = Vec::new();
        let mut level = Some(base_scope.scope);

        while let Some(current_level) = level {
            ctx.check_cancelled()?;
            let scope_at_level = RequestScope::new(&base_scope.tenant_id, &base_scope.project_id, current_level);
            let collection = self.collection_for(&scope_at_level)?;
            let mut filter = self.guard.bind_read(Some(&scope_at_level), HashMap::new())?;
            filter.insert("scope".to_string(), PayloadValue::from(scope_level_str(current_level)));

            let hits = match self.store.query(ctx, &collection, &query_embedding, limit * 4 + limit, &filter) {
                Ok(hits) => hits,
                Err(SubstrateError::NotFound(_)) => Vec::new(),
                Err(e) => return Err(e),
            };

            for hit in hits {
                if seen.contains(&hit.document.id) {
                    continue;
                }
                let memory = document_to_memory(&hit.document)?;
                seen.insert(memory.id.clone());
                ranked.push((memory, hit.score));
            }

            let passing = ranked.iter().filter(|(m, _)| m.confidence >= MEMORY_CONFIDENCE_FLOOR).count();
            if passing >= limit || current_level >= ceiling {
                break;
            }
            level = current_level.broaden();
        }

        let alpha = self.config.alpha;
        ranked.sort_by(|(ma, sa), (mb, sb)| {
            let score_a = sa * ma.confidence.powf(alpha);
            let score_b = sb * mb.confidence.powf(alpha);
            score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);
        Ok(ranked.into_iter().map(|(m, _)| m).collect())
    }

    fn apply_delta(&self, ctx: &RequestContext, memory_id: &str, delta: f64, mark: impl FnOnce(&mut Memory)) -> SubstrateResult<Memory> {
        ctx.check_cancelled()?;
        let mut entry = self
            .memories
            .get_mut(memory_id)
            .ok_or_else(|| SubstrateError::NotFound(memory_id.to_string()))?;
        entry.confidence = Memory::clamp_confidence(entry.confidence + delta);
        mark(&mut *entry);
        entry.updated_at = Utc::now();
        let updated = entry.clone();
        drop(entry);

        let scope = updated.scope_of();
        let collection = self.collection_for(&scope)?;
        let doc = memory_to_document(&self.guard, &collection, &scope, &updated)?;
        self.store.add_documents(ctx, &collection, &[doc])?;
        Ok(updated)
    }

    /// Feedback: `+weights.helpful` or `-weights.unhelpful`,
    /// clamped to `[0,1]`. Counters only ever increase.
    pub fn feedback(&self, ctx: &RequestContext, memory_id: &str, helpful: bool) -> SubstrateResult<Memory> {
        let weights = self.config.weights;
        let delta = if helpful { weights.helpful } else { -weights.unhelpful };
        self.apply_delta(ctx, memory_id, delta, |memory| {
            if helpful {
                memory.feedback.helpful += 1;
            } else {
                memory.feedback.unhelpful += 1;
            }
        })
    }

    /// Outcome: same shape as feedback with `weights.success`
    /// / `weights.failure`.
    pub fn outcome(&self, ctx: &RequestContext, memory_id: &str, success: bool) -> SubstrateResult<Memory> {
        let weights = self.config.weights;
        let delta = if success { weights.success } else { -weights.failure };
        self.apply_delta(ctx, memory_id, delta, |memory| {
            if success {
                memory.outcomes.success += 1;
            } else {
                memory.outcomes.failure += 1;
            }
        })
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use substrate_core::checkpoint::{Checkpoint, ResumeLevel, ResumedCheckpoint};
use substrate_core::document::{Document, Payload, PayloadValue};
use substrate_core::errors::SubstrateError;
use substrate_core::scope::{RequestContext, RequestScope};
use substrate_core::SubstrateResult;
use substrate_embed::Embedder;
use substrate_tenant::TenantGuard;
use substrate_vectorstore::VectorStore;

const ENTITY_KIND: &str = "checkpoints";
const LOAD_SCAN_LIMIT: usize = 10_000;

/// Parameters for a new checkpoint, everything the caller controls before
/// the store assigns an id and embeds the summary.
pub struct NewCheckpoint {
    pub session_id: String,
    pub name: String,
    pub description: String,
    pub summary: String,
    pub context_body: String,
    pub full_state: String,
    pub token_count: u32,
    pub threshold_percent: f64,
    pub auto_created: bool,
    pub metadata: HashMap<String, String>,
}

fn checkpoint_to_document(guard: &TenantGuard, collection: &str, scope: &RequestScope, checkpoint: &Checkpoint) -> SubstrateResult<Document> {
    let checkpoint_json = serde_json::to_string(checkpoint).map_err(|e| SubstrateError::backend("checkpoint.codec", e.to_string()))?;
    let mut payload: Payload = HashMap::new();
    payload.insert("checkpoint_json".to_string(), PayloadValue::String(checkpoint_json));
    payload.insert("session_id".to_string(), PayloadValue::String(checkpoint.session_id.clone()));
    let payload = guard.bind_write(Some(scope), payload)?;
    Ok(Document {
        id: checkpoint.id.clone(),
        collection: collection.to_string(),
        payload,
        embedding: checkpoint.summary_embedding.clone(),
    })
}

fn document_to_checkpoint(doc: &Document) -> SubstrateResult<Checkpoint> {
    let raw = doc
        .payload
        .get("checkpoint_json")
        .ok_or_else(|| SubstrateError::backend("checkpoint.codec", "document missing checkpoint_json field"))?;
    let PayloadValue::String(json) = raw else {
        return Err(SubstrateError::backend("checkpoint.codec", "checkpoint_json field is not a string"));
    };
    serde_json::from_str(json).map_err(|e| SubstrateError::backend("checkpoint.codec", e.to_string()))
}

/// Checkpoint Store: `save`, `list`, `resume`. A `DashMap` keyed by
/// checkpoint id serves reads, but every write is mirrored into the Vector
/// Store under a `checkpoints` collection so saved state survives a process
/// restart — the same write-mirror `MemoryEngine` uses, since the `DashMap`
/// alone is volatile. There's no similarity search over checkpoints; the
/// store is used purely as durable, scope-filterable storage here.
pub struct CheckpointStore {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    guard: TenantGuard,
    checkpoints: DashMap<String, Checkpoint>,
}

impl CheckpointStore {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, guard: TenantGuard) -> Self {
        Self { embedder, store, guard, checkpoints: DashMap::new() }
    }

    fn collection_for(&self, scope: &RequestScope) -> SubstrateResult<String> {
        self.guard.collection_name(ENTITY_KIND, Some(scope))
    }

    /// Pull every checkpoint visible to `scope` out of the Vector Store and
    /// into the local cache. Cheap to call repeatedly: existing cache
    /// entries are left untouched, so this only does real work the first
    /// time a scope is seen by a fresh (e.g. just-restarted) store.
    fn load_scope(&self, ctx: &RequestContext, scope: &RequestScope) -> SubstrateResult<()> {
        let collection = self.collection_for(scope)?;
        let filter = self.guard.bind_read(Some(scope), HashMap::new())?;
        let probe = self.embedder.embed(ctx, &[String::new()])?.into_iter().next().unwrap_or_default();

        let hits = match self.store.query(ctx, &collection, &probe, LOAD_SCAN_LIMIT, &filter) {
            Ok(hits) => hits,
            Err(SubstrateError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        for hit in hits {
            let checkpoint = document_to_checkpoint(&hit.document)?;
            self.checkpoints.entry(checkpoint.id.clone()).or_insert(checkpoint);
        }
        Ok(())
    }

    pub fn save(&self, ctx: &RequestContext, new: NewCheckpoint) -> SubstrateResult<Checkpoint> {
        let scope = ctx.scope.clone().ok_or(SubstrateError::MissingTenant)?;
        ctx.check_cancelled()?;

        let summary_embedding = self
            .embedder
            .embed(ctx, &[new.summary.clone()])?
            .into_iter()
            .next()
            .unwrap_or_default();
        let collection = self.collection_for(&scope)?;
        self.store.ensure_collection(ctx, &collection, summary_embedding.len() as u32)?;

        let checkpoint = Checkpoint {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: new.session_id,
            tenant_id: scope.tenant_id.clone(),
            project_id: scope.project_id.clone(),
            name: new.name,
            description: new.description,
            summary: new.summary,
            context_body: new.context_body,
            full_state: new.full_state,
            token_count: new.token_count,
            threshold_percent: new.threshold_percent,
            auto_created: new.auto_created,
            metadata: new.metadata,
            summary_embedding,
            created_at: Utc::now(),
        };

        let doc = checkpoint_to_document(&self.guard, &collection, &scope, &checkpoint)?;
        self.store.add_documents(ctx, &collection, &[doc])?;
        self.checkpoints.insert(checkpoint.id.clone(), checkpoint.clone());
        Ok(checkpoint)
    }

    /// List checkpoints visible to the request's scope, optionally
    /// restricted to one session, newest first.
    pub fn list(&self, ctx: &RequestContext, session_id: Option<&str>) -> SubstrateResult<Vec<Checkpoint>> {
        let scope = ctx.scope.clone().ok_or(SubstrateError::MissingTenant)?;
        ctx.check_cancelled()?;
        self.load_scope(ctx, &scope)?;

        let mut matching: Vec<Checkpoint> = self
            .checkpoints
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|cp| cp.tenant_id == scope.tenant_id && cp.project_id == scope.project_id)
            .filter(|cp| session_id.map(|s| s == cp.session_id).unwrap_or(true))
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    pub fn resume(&self, ctx: &RequestContext, id: &str, level: ResumeLevel) -> SubstrateResult<ResumedCheckpoint> {
        let scope = ctx.scope.clone().ok_or(SubstrateError::MissingTenant)?;
        ctx.check_cancelled()?;

        if !self.checkpoints.contains_key(id) {
            self.load_scope(ctx, &scope)?;
        }

        let checkpoint = self
            .checkpoints
            .get(id)
            .filter(|cp| cp.tenant_id == scope.tenant_id && cp.project_id == scope.project_id)
            .ok_or_else(|| SubstrateError::NotFound(id.to_string()))?;

        Ok(checkpoint.resume_at(level))
    }
}

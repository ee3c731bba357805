use substrate_core::document::{Document, Filter, ScoredDocument};
use substrate_core::{RequestContext, SubstrateResult};

/// Append, delete, and k-NN query of documents with metadata, scoped by
/// named collections. Two concrete backings are expected: an
/// embedded local index and a remote server accessed over a network
/// protocol; both implement this same contract.
pub trait VectorStore: Send + Sync {
    /// Create the collection if absent, fixing its embedding dimension.
    /// Idempotent: calling twice with the same dimension is a no-op,
    /// calling with a different dimension is a contract violation.
    fn ensure_collection(&self, ctx: &RequestContext, collection: &str, dim: u32) -> SubstrateResult<()>;

    /// Insert or replace documents by id. Every document's embedding
    /// length must equal the collection's dimension.
    fn add_documents(&self, ctx: &RequestContext, collection: &str, docs: &[Document]) -> SubstrateResult<()>;

    /// Return up to `limit` documents in `collection` ordered by
    /// descending cosine similarity to `query`, restricted to documents
    /// whose payload matches every predicate in `filter`.
    fn query(
        &self,
        ctx: &RequestContext,
        collection: &str,
        query: &[f32],
        limit: usize,
        filter: &Filter,
    ) -> SubstrateResult<Vec<ScoredDocument>>;

    /// Remove documents by id. Missing ids are ignored.
    fn delete(&self, ctx: &RequestContext, collection: &str, ids: &[String]) -> SubstrateResult<()>;

    /// Release any held resources (file handles, connections).
    fn close(&self) -> SubstrateResult<()> {
        Ok(())
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

pub(crate) fn matches_filter(payload: &substrate_core::document::Payload, filter: &Filter) -> bool {
    filter.iter().all(|(key, expected)| payload.get(key) == Some(expected))
}

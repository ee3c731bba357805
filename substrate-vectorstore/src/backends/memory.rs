use dashmap::DashMap;
use parking_lot::RwLock;
use substrate_core::document::{Document, Filter, ScoredDocument};
use substrate_core::errors::SubstrateError;
use substrate_core::{RequestContext, SubstrateResult};

use crate::store::{cosine_similarity, matches_filter, VectorStore};

struct Collection {
    dimension: u32,
    documents: DashMap<String, Document>,
}

/// Pure in-process backend, keyed by collection name in a single process.
/// Used for `isolation_mode = none` and for tests that don't want an
/// on-disk database.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<std::collections::HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VectorStore for InMemoryVectorStore {
    fn ensure_collection(&self, ctx: &RequestContext, collection: &str, dim: u32) -> SubstrateResult<()> {
        ctx.check_cancelled()?;
        let mut collections = self.collections.write();
        match collections.get(collection) {
            Some(existing) if existing.dimension != dim => Err(SubstrateError::InvalidArgs(format!(
                "collection {collection} already exists with dimension {}, requested {dim}",
                existing.dimension
            ))),
            Some(_) => Ok(()),
            None => {
                collections.insert(
                    collection.to_string(),
                    Collection { dimension: dim, documents: DashMap::new() },
                );
                Ok(())
            }
        }
    }

    fn add_documents(&self, ctx: &RequestContext, collection: &str, docs: &[Document]) -> SubstrateResult<()> {
        ctx.check_cancelled()?;
        let collections = self.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| SubstrateError::NotFound(format!("collection {collection}")))?;
        for doc in docs {
            if doc.embedding.len() != coll.dimension as usize {
                return Err(SubstrateError::InvalidArgs(format!(
                    "document {} has embedding dimension {}, collection {collection} expects {}",
                    doc.id,
                    doc.embedding.len(),
                    coll.dimension
                )));
            }
        }
        for doc in docs {
            coll.documents.insert(doc.id.clone(), doc.clone());
        }
        Ok(())
    }

    fn query(
        &self,
        ctx: &RequestContext,
        collection: &str,
        query: &[f32],
        limit: usize,
        filter: &Filter,
    ) -> SubstrateResult<Vec<ScoredDocument>> {
        ctx.check_cancelled()?;
        let collections = self.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| SubstrateError::NotFound(format!("collection {collection}")))?;
        if query.len() != coll.dimension as usize {
            return Err(SubstrateError::InvalidArgs(format!(
                "query embedding dimension {} does not match collection {collection} dimension {}",
                query.len(),
                coll.dimension
            )));
        }

        let mut scored: Vec<ScoredDocument> = coll
            .documents
            .iter()
            .filter(|entry| matches_filter(&entry.value().payload, filter))
            .map(|entry| {
                let score = cosine_similarity(query, &entry.value().embedding);
                ScoredDocument { document: entry.value().clone(), score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    fn delete(&self, ctx: &RequestContext, collection: &str, ids: &[String]) -> SubstrateResult<()> {
        ctx.check_cancelled()?;
        let collections = self.collections.read();
        if let Some(coll) = collections.get(collection) {
            for id in ids {
                coll.documents.remove(id);
            }
        }
        Ok(())
    }
}

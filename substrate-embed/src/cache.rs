use std::time::Duration;

use moka::sync::Cache;
use substrate_core::{RequestContext, SubstrateResult};

use crate::provider::Embedder;

/// Wraps an `Embedder` with a content-hash-keyed cache, so repeated text
/// (the common case for memory re-embedding and checkpoint summaries)
/// skips the underlying provider entirely. TinyLFU admission and a
/// time-to-idle bound keep the cache from growing unbounded.
pub struct CachingEmbedder<E: Embedder> {
    inner: E,
    cache: Cache<String, Vec<f32>>,
}

impl<E: Embedder> CachingEmbedder<E> {
    pub fn new(inner: E, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { inner, cache }
    }

    fn key_for(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Entries currently cached, for test/telemetry use.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Embedder> Embedder for CachingEmbedder<E> {
    fn embed(&self, ctx: &RequestContext, texts: &[String]) -> SubstrateResult<Vec<Vec<f32>>> {
        let mut out: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        let mut misses = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            let key = Self::key_for(text);
            if let Some(hit) = self.cache.get(&key) {
                out[i] = Some(hit);
            } else {
                misses.push((i, text.clone(), key));
            }
        }

        if !misses.is_empty() {
            let miss_texts: Vec<String> = misses.iter().map(|(_, t, _)| t.clone()).collect();
            let embedded = self.inner.embed(ctx, &miss_texts)?;
            for ((i, _, key), vector) in misses.into_iter().zip(embedded.into_iter()) {
                self.cache.insert(key, vector.clone());
                out[i] = Some(vector);
            }
        }

        Ok(out.into_iter().map(|v| v.expect("every slot filled")).collect())
    }

    fn dimension(&self) -> u32 {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn close(&self) -> SubstrateResult<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        self.inner.close()
    }
}

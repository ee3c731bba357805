use substrate_core::{RequestContext, SubstrateResult};

use crate::provider::{validate_batch, Embedder};

/// Deterministic local embedding provider requiring no model file on disk:
/// every text is hashed into a fixed number of buckets via blake3, and
/// bucket counts are L2-normalized into the embedding vector. Same text
/// always yields the same vector; unrelated texts land in different buckets
/// with high probability, which is enough to exercise similarity search
/// end to end in tests.
pub struct LocalProvider {
    dimension: u32,
}

impl LocalProvider {
    pub fn new(dimension: u32) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let dim = self.dimension as usize;
        let mut vector = vec![0.0f32; dim];
        let hash = blake3::hash(text.as_bytes());
        let bytes = hash.as_bytes();
        // Spread hash bytes across the vector as signed bucket increments
        // so the embedding carries more than one active dimension.
        for (i, window) in bytes.chunks(2).enumerate() {
            let bucket = (window[0] as usize) % dim;
            let sign = if window.get(1).copied().unwrap_or(0) % 2 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign * (1.0 / (i as f32 + 1.0));
        }
        // Fold the raw text length and word count in too, so texts that
        // hash to similar buckets but differ in size still separate a bit.
        if dim > 0 {
            vector[0] += text.split_whitespace().count() as f32 * 0.01;
        }
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Embedder for LocalProvider {
    fn embed(&self, ctx: &RequestContext, texts: &[String]) -> SubstrateResult<Vec<Vec<f32>>> {
        validate_batch(texts)?;
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            ctx.check_cancelled()?;
            out.push(self.embed_one(text));
        }
        Ok(out)
    }

    fn dimension(&self) -> u32 {
        self.dimension
    }

    fn name(&self) -> &str {
        "local-hash-projection"
    }
}

use substrate_core::{RequestContext, SubstrateResult};

/// Converts a batch of texts into fixed-dimension float vectors.
/// Implementations must return a consistent dimension for the process
/// lifetime, and are stateless from the caller's perspective so they can
/// be shared freely across threads.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts. Errors on an empty batch or a batch larger
    /// than `MAX_EMBED_BATCH_SIZE`.
    fn embed(&self, ctx: &RequestContext, texts: &[String]) -> SubstrateResult<Vec<Vec<f32>>>;

    /// The dimensionality of embeddings produced by this provider. Opaque
    /// to callers beyond "must match across all calls".
    fn dimension(&self) -> u32;

    /// Human-readable provider name, used in telemetry/degradation
    /// reporting.
    fn name(&self) -> &str;

    /// Release any held resources. Default no-op; providers backed by a
    /// connection or model handle override this.
    fn close(&self) -> SubstrateResult<()> {
        Ok(())
    }
}

pub(crate) fn validate_batch(texts: &[String]) -> SubstrateResult<()> {
    use substrate_core::errors::SubstrateError;
    if texts.is_empty() {
        return Err(SubstrateError::InvalidArgs(
            "embed: batch must not be empty".to_string(),
        ));
    }
    if texts.len() > substrate_core::constants::MAX_EMBED_BATCH_SIZE {
        return Err(SubstrateError::InvalidArgs(format!(
            "embed: batch of {} exceeds max size {}",
            texts.len(),
            substrate_core::constants::MAX_EMBED_BATCH_SIZE
        )));
    }
    Ok(())
}

use substrate_core::compression::Algorithm;
use substrate_core::scope::RequestContext;
use substrate_core::{CompressionResult, SubstrateResult};

/// What an implementation supports — queried once at startup by the
/// Compression Service to validate requests before dispatch.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub algorithms: Vec<Algorithm>,
    pub max_content_length: usize,
    pub supports_target_ratio: bool,
    pub quality_range: (f64, f64),
}

/// Capability contract shared by Extractive, Abstractive, and Hybrid.
/// Compressors are selected at construction time and passed explicitly;
/// there is no global registry.
pub trait Compressor: Send + Sync {
    fn compress(&self, ctx: &RequestContext, content: &str, target_ratio: f64) -> SubstrateResult<CompressionResult>;
    fn capabilities(&self) -> Capabilities;
}

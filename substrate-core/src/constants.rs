/// Substrate workspace version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Content below this length is returned unchanged by every compressor.
pub const SHORT_CONTENT_THRESHOLD: usize = 100;

/// Over-compression beyond this multiple of the target ratio is penalized.
pub const OVER_COMPRESSION_FACTOR: f64 = 1.2;

/// Maximum batch size accepted by the Embedder in a single call.
pub const MAX_EMBED_BATCH_SIZE: usize = 512;

/// Minimum confidence a memory must carry to count toward `limit` when
/// deciding whether hierarchical search should broaden to the next scope.
/// Design-tunable.
pub const MEMORY_CONFIDENCE_FLOOR: f64 = 0.3;

use substrate_core::compression::{Algorithm, CompressionLevel};
use substrate_core::constants::SHORT_CONTENT_THRESHOLD;
use substrate_core::CompressionResult;

/// Content below the threshold is returned unchanged with quality 1.0,
/// regardless of algorithm. Shared by every compressor so the passthrough
/// behaves identically everywhere it's checked. `level` must be the
/// calling compressor's own contractual level, since passthrough doesn't
/// change what level a compressor reports at.
pub fn short_content_passthrough(content: &str, algorithm: Algorithm, level: CompressionLevel) -> Option<CompressionResult> {
    if content.len() < SHORT_CONTENT_THRESHOLD {
        Some(CompressionResult::unchanged(content.to_string(), algorithm, level, chrono::Utc::now()))
    } else {
        None
    }
}

pub(crate) fn split_sentences(content: &str) -> Vec<&str> {
    content
        .split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

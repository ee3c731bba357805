use std::sync::Arc;
use std::time::Instant;

use substrate_core::compression::{Algorithm, CompressionLevel, CompressionMetadata};
use substrate_core::constants::OVER_COMPRESSION_FACTOR;
use substrate_core::scope::RequestContext;
use substrate_core::{CompressionResult, SubstrateResult};
use substrate_quality::QualityScores;
use substrate_scrub::Scrubber;

use crate::common::short_content_passthrough;
use crate::compressor::{Capabilities, Compressor};
use crate::summarizer::Summarizer;

/// Delegates to an external summarizer after scrubbing the input of any
/// secrets first.
pub struct AbstractiveCompressor {
    scrubber: Scrubber,
    summarizer: Arc<dyn Summarizer>,
    max_content_length: usize,
}

impl AbstractiveCompressor {
    pub fn new(scrubber: Scrubber, summarizer: Arc<dyn Summarizer>, max_content_length: usize) -> Self {
        Self { scrubber, summarizer, max_content_length }
    }
}

impl Compressor for AbstractiveCompressor {
    fn compress(&self, ctx: &RequestContext, content: &str, target_ratio: f64) -> SubstrateResult<CompressionResult> {
        ctx.check_cancelled()?;
        if let Some(passthrough) = short_content_passthrough(content, Algorithm::Abstractive, CompressionLevel::Summary) {
            return Ok(passthrough);
        }

        let start = Instant::now();
        let scrubbed = self.scrubber.scrub_str(content);
        let target_percent = ((1.0 - 1.0 / target_ratio) * 100.0).floor().max(0.0) as u32;
        let summary = self.summarizer.summarize(ctx, &scrubbed, target_percent)?;
        let elapsed = start.elapsed();

        let achieved_ratio = content.len() as f64 / summary.len().max(1) as f64;
        let scores = QualityScores::compute(content, &summary, target_ratio);
        let mut quality = scores.composite;
        if achieved_ratio > OVER_COMPRESSION_FACTOR * target_ratio {
            quality *= 0.9;
        }

        Ok(CompressionResult {
            content: summary.clone(),
            metadata: CompressionMetadata {
                algorithm: Algorithm::Abstractive,
                level: CompressionLevel::Summary,
                original_size: content.len(),
                compressed_size: summary.len(),
                ratio: achieved_ratio,
                compressed_at: chrono::Utc::now(),
            },
            quality_score: quality,
            processing_time: elapsed,
        })
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            algorithms: vec![Algorithm::Abstractive],
            max_content_length: self.max_content_length,
            supports_target_ratio: true,
            quality_range: (0.0, 1.0),
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use substrate_compress::{Capabilities, Compressor};
use substrate_core::compression::Algorithm;
use substrate_core::errors::SubstrateError;
use substrate_core::scope::RequestContext;
use substrate_core::{CompressionResult, SubstrateResult};

use crate::metrics::{AlgorithmMetrics, AlgorithmMetricsSnapshot};

/// Routes a compression request to the registered [`Compressor`] for the
/// chosen algorithm, enforces the compressor's own capability limits, and
/// records per-algorithm telemetry.
pub struct CompressionService {
    compressors: HashMap<Algorithm, Arc<dyn Compressor>>,
    default_algorithm: Algorithm,
    metrics: DashMap<Algorithm, AlgorithmMetrics>,
}

impl CompressionService {
    pub fn new(compressors: HashMap<Algorithm, Arc<dyn Compressor>>, default_algorithm: Algorithm) -> Self {
        Self { compressors, default_algorithm, metrics: DashMap::new() }
    }

    pub fn capabilities(&self, algorithm: Algorithm) -> Option<Capabilities> {
        self.compressors.get(&algorithm).map(|c| c.capabilities())
    }

    #[tracing::instrument(skip(self, ctx, content), fields(algorithm, target_ratio))]
    pub fn compress(
        &self,
        ctx: &RequestContext,
        content: &str,
        algorithm: Option<Algorithm>,
        target_ratio: f64,
    ) -> SubstrateResult<CompressionResult> {
        if content.is_empty() {
            return Err(SubstrateError::InvalidArgs("content must not be empty".into()));
        }
        if target_ratio <= 1.0 {
            return Err(SubstrateError::InvalidArgs(format!("target_ratio must be > 1.0, got {target_ratio}")));
        }

        let algo = algorithm.unwrap_or(self.default_algorithm);
        tracing::Span::current().record("algorithm", algo.as_str());
        tracing::Span::current().record("target_ratio", target_ratio);

        let compressor = self
            .compressors
            .get(&algo)
            .ok_or_else(|| SubstrateError::InvalidArgs(format!("no compressor registered for algorithm {algo}")))?;

        let caps = compressor.capabilities();
        if content.len() > caps.max_content_length {
            return Err(SubstrateError::TooLarge { actual: content.len(), limit: caps.max_content_length });
        }

        let start = Instant::now();
        match compressor.compress(ctx, content, target_ratio) {
            Ok(result) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                self.metrics
                    .entry(algo)
                    .or_default()
                    .record_success(duration_ms, result.metadata.ratio, result.quality_score);
                tracing::debug!(algorithm = %algo, ratio = result.metadata.ratio, quality = result.quality_score, "compression succeeded");
                Ok(result)
            }
            Err(err) => {
                self.metrics.entry(algo).or_default().record_error();
                tracing::warn!(algorithm = %algo, error = %err, "compression failed");
                Err(err)
            }
        }
    }

    pub fn metrics_snapshot(&self) -> HashMap<Algorithm, AlgorithmMetricsSnapshot> {
        self.metrics.iter().map(|entry| (*entry.key(), entry.value().snapshot())).collect()
    }
}

mod metrics;
mod service;

pub use metrics::{AlgorithmMetrics, AlgorithmMetricsSnapshot};
pub use service::CompressionService;

mod assign;
mod experiment;
mod manager;
mod metrics;

pub use assign::assign_variant;
pub use experiment::{CompressionOutcome, Experiment};
pub use manager::ExperimentManager;
pub use metrics::{composite_score, ComparisonReport, ConfidenceTier, VariantMetrics};

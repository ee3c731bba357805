use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use substrate_core::compression::Algorithm;
use substrate_core::errors::SubstrateError;
use substrate_core::SubstrateResult;

use crate::assign::assign_variant;
use crate::experiment::{CompressionOutcome, Experiment};
use crate::metrics::{build_comparison_report, ComparisonReport, VariantMetrics};

/// Owns every live experiment. The experiment map itself is guarded by a
/// reader/writer lock; each experiment serializes its own outcome appends
/// under a private mutex so concurrent variants don't contend with each
/// other.
pub struct ExperimentManager {
    experiments: RwLock<HashMap<String, Mutex<Experiment>>>,
}

impl ExperimentManager {
    pub fn new() -> Self {
        Self { experiments: RwLock::new(HashMap::new()) }
    }

    pub fn create(&self, id: impl Into<String>, variants: Vec<Algorithm>) -> SubstrateResult<()> {
        let experiment = Experiment::new(id, variants)?;
        let mut experiments = self.experiments.write();
        experiments.insert(experiment.id.clone(), Mutex::new(experiment));
        Ok(())
    }

    pub fn assign(&self, experiment_id: &str, session_id: &str) -> SubstrateResult<Algorithm> {
        let experiments = self.experiments.read();
        let entry = experiments
            .get(experiment_id)
            .ok_or_else(|| SubstrateError::NotFound(format!("experiment {experiment_id}")))?;
        let mut experiment = entry.lock();
        let algo = assign_variant(experiment_id, session_id, &experiment.variants)?;
        experiment.record_session(session_id);
        Ok(algo)
    }

    pub fn record_outcome(&self, experiment_id: &str, outcome: CompressionOutcome) -> SubstrateResult<()> {
        let experiments = self.experiments.read();
        let entry = experiments
            .get(experiment_id)
            .ok_or_else(|| SubstrateError::NotFound(format!("experiment {experiment_id}")))?;
        let result = entry.lock().push_outcome(outcome);
        result
    }

    pub fn get_metrics(&self, experiment_id: &str) -> SubstrateResult<HashMap<Algorithm, VariantMetrics>> {
        Ok(self.compare(experiment_id)?.per_variant)
    }

    pub fn compare(&self, experiment_id: &str) -> SubstrateResult<ComparisonReport> {
        let experiments = self.experiments.read();
        let entry = experiments
            .get(experiment_id)
            .ok_or_else(|| SubstrateError::NotFound(format!("experiment {experiment_id}")))?;
        let report = build_comparison_report(&entry.lock());
        Ok(report)
    }

    pub fn list(&self) -> Vec<String> {
        self.experiments.read().keys().cloned().collect()
    }
}

impl Default for ExperimentManager {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{DateTime, Utc};
use substrate_core::compression::Algorithm;
use substrate_core::errors::SubstrateError;
use substrate_core::SubstrateResult;

/// A single recorded trial of one variant.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub session_id: String,
    pub algorithm: Algorithm,
    pub success: bool,
    pub ratio: f64,
    pub quality: f64,
    pub duration_ms: f64,
    /// `None` when the caller never surfaced an explicit accept/reject
    /// signal for this outcome — excluded from acceptance-rate math.
    pub user_accepted: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

/// A live A/B experiment comparing compression algorithms against the same
/// workload, with uniform initial variant weights.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub id: String,
    pub variants: Vec<Algorithm>,
    outcomes: Vec<(Algorithm, CompressionOutcome)>,
    sessions: std::collections::HashSet<String>,
}

impl Experiment {
    pub fn new(id: impl Into<String>, variants: Vec<Algorithm>) -> SubstrateResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(SubstrateError::InvalidArgs("experiment id must not be empty".into()));
        }
        if variants.len() < 2 {
            return Err(SubstrateError::InvalidArgs("experiment needs at least 2 variants".into()));
        }
        Ok(Self { id, variants, outcomes: Vec::new(), sessions: std::collections::HashSet::new() })
    }

    /// Uniform initial weight for every registered variant.
    pub fn initial_weight(&self) -> f64 {
        1.0 / self.variants.len() as f64
    }

    pub(crate) fn record_session(&mut self, session_id: &str) {
        self.sessions.insert(session_id.to_string());
    }

    pub fn distinct_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub(crate) fn push_outcome(&mut self, outcome: CompressionOutcome) -> SubstrateResult<()> {
        if !self.variants.contains(&outcome.algorithm) {
            return Err(SubstrateError::AlgorithmNotInExperiment(outcome.algorithm.to_string()));
        }
        self.record_session(&outcome.session_id);
        self.outcomes.push((outcome.algorithm, outcome));
        Ok(())
    }

    pub(crate) fn outcomes_for(&self, algorithm: Algorithm) -> impl Iterator<Item = &CompressionOutcome> {
        self.outcomes.iter().filter(move |(a, _)| *a == algorithm).map(|(_, o)| o)
    }
}

use serde::{Deserialize, Serialize};

/// How the Tenant Guard maps scopes onto vector-store collections. A closed
/// tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationMode {
    /// Default: a shared collection per entity kind, tenant isolation
    /// enforced purely through payload filters.
    Payload,
    /// Per-tenant collections.
    Filesystem,
    /// No isolation — testing only.
    None,
}

impl Default for IsolationMode {
    fn default() -> Self {
        IsolationMode::Payload
    }
}

/// `memory.weights` — non-negative; `unhelpful >= helpful`, `failure >=
/// success`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryWeights {
    pub helpful: f64,
    pub unhelpful: f64,
    pub success: f64,
    pub failure: f64,
}

impl Default for MemoryWeights {
    fn default() -> Self {
        Self {
            helpful: 0.05,
            unhelpful: 0.08,
            success: 0.10,
            failure: 0.15,
        }
    }
}

impl MemoryWeights {
    pub fn validate(&self) -> Result<(), String> {
        if self.helpful < 0.0 || self.unhelpful < 0.0 || self.success < 0.0 || self.failure < 0.0 {
            return Err("memory.weights must be non-negative".into());
        }
        if self.unhelpful < self.helpful {
            return Err("memory.weights.unhelpful must be >= helpful".into());
        }
        if self.failure < self.success {
            return Err("memory.weights.failure must be >= success".into());
        }
        Ok(())
    }
}

/// Memory Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub confidence_prior: f64,
    pub weights: MemoryWeights,
    /// Exponent on confidence during re-ranking.
    pub alpha: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            confidence_prior: 0.5,
            weights: MemoryWeights::default(),
            alpha: 1.0,
        }
    }
}

/// Compression Service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub default_algorithm: String,
    pub target_ratio: f64,
    pub quality_threshold: f64,
    pub max_processing_time_ms: u64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_algorithm: "extractive".to_string(),
            target_ratio: 2.0,
            quality_threshold: 0.0,
            max_processing_time_ms: 30_000,
        }
    }
}

/// Scrubber configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubberConfig {
    pub extra_patterns: Vec<String>,
}

/// Abstractive summarizer provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbstractiveConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model_hint: String,
    pub timeout_secs: u64,
}

impl Default for AbstractiveConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model_hint: "default".to_string(),
            timeout_secs: 30,
        }
    }
}

/// The full substrate configuration surface, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstrateConfig {
    pub isolation_mode: IsolationMode,
    pub memory: MemoryConfig,
    pub compression: CompressionConfig,
    pub scrubber: ScrubberConfig,
    pub abstractive: AbstractiveConfig,
}

impl SubstrateConfig {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(text).map_err(|e| e.to_string())?;
        config.memory.weights.validate()?;
        Ok(config)
    }
}

/// The small, closed vocabulary of error kinds every substrate crate returns.
///
/// One enum shared across every component rather than a private error type
/// per crate, since they all surface the same handful of failure shapes to
/// callers: bad input, missing data, conflicts, backend faults, and limits.
#[derive(Debug, thiserror::Error)]
pub enum SubstrateError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("missing tenant scope")]
    MissingTenant,

    #[error("filter injection attempted on field: {0}")]
    FilterInjection(String),

    #[error("content too large: {actual} bytes exceeds limit of {limit} bytes")]
    TooLarge { actual: usize, limit: usize },

    #[error("backend failure in {component}: {message}")]
    Backend {
        component: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("request cancelled")]
    Cancelled,

    #[error("algorithm {0} is not a registered variant of this experiment")]
    AlgorithmNotInExperiment(String),
}

impl SubstrateError {
    pub fn backend(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            component: component.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error represents a transient backend failure eligible
    /// for bounded retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    /// Render to the small agent-facing error vocabulary.
    pub fn agent_code(&self) -> &'static str {
        match self {
            Self::InvalidArgs(_) => "invalid_args",
            Self::NotFound(_) => "not_found",
            Self::MissingTenant => "missing_tenant",
            Self::FilterInjection(_) => "filter_injection",
            Self::TooLarge { .. } => "too_large",
            Self::Backend { .. } => "backend_error",
            Self::Cancelled => "cancelled",
            Self::AlgorithmNotInExperiment(_) => "unknown_algorithm",
        }
    }
}

pub type SubstrateResult<T> = Result<T, SubstrateError>;

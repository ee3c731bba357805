use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detail level at which a checkpoint can be resumed. A closed
/// tag set, ordered from least to most detailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeLevel {
    Summary,
    Context,
    Full,
}

/// An immutable snapshot of an agent session. Owned exclusively
/// by the Checkpoint Store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub session_id: String,
    pub tenant_id: String,
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub summary: String,
    pub context_body: String,
    pub full_state: String,
    pub token_count: u32,
    pub threshold_percent: f64,
    pub auto_created: bool,
    pub metadata: HashMap<String, String>,
    pub summary_embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

/// The subset of a checkpoint's fields returned for a given resume level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumedCheckpoint {
    pub id: String,
    pub session_id: String,
    pub name: String,
    pub summary: String,
    pub context_body: Option<String>,
    pub full_state: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
    pub created_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Project this checkpoint down to exactly the fields visible at
    /// `level`. `Summary` never includes context/full-state/metadata;
    /// `Context` adds `context_body`; `Full` adds everything.
    pub fn resume_at(&self, level: ResumeLevel) -> ResumedCheckpoint {
        ResumedCheckpoint {
            id: self.id.clone(),
            session_id: self.session_id.clone(),
            name: self.name.clone(),
            summary: self.summary.clone(),
            context_body: matches!(level, ResumeLevel::Context | ResumeLevel::Full)
                .then(|| self.context_body.clone()),
            full_state: matches!(level, ResumeLevel::Full).then(|| self.full_state.clone()),
            metadata: matches!(level, ResumeLevel::Full).then(|| self.metadata.clone()),
            created_at: self.created_at,
        }
    }
}

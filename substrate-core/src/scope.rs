use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Hierarchical lookup level. A closed tag set — every
/// dispatcher that matches on it must be exhaustive. Declaration order is
/// narrowest-to-broadest and backs the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    Project,
    Team,
    Org,
}

impl ScopeLevel {
    /// The next broader level to cascade to during hierarchical search, or
    /// `None` once `Org` is reached.
    pub fn broaden(self) -> Option<Self> {
        match self {
            ScopeLevel::Project => Some(ScopeLevel::Team),
            ScopeLevel::Team => Some(ScopeLevel::Org),
            ScopeLevel::Org => None,
        }
    }
}

/// The ambient tenant scope carried on every memory/checkpoint/vector
/// operation. Absence is a hard failure (`ErrMissingTenant`),
/// never a permissive default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestScope {
    pub tenant_id: String,
    pub project_id: String,
    pub scope: ScopeLevel,
}

impl RequestScope {
    pub fn new(
        tenant_id: impl Into<String>,
        project_id: impl Into<String>,
        scope: ScopeLevel,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            project_id: project_id.into(),
            scope,
        }
    }

    /// Produce a new scope at the next broader level, for hierarchical
    /// lookup. The Memory Engine constructs this new scope and
    /// presents it to the Tenant Guard; the guard itself never broadens.
    pub fn broadened(&self) -> Option<Self> {
        self.scope.broaden().map(|level| Self {
            tenant_id: self.tenant_id.clone(),
            project_id: self.project_id.clone(),
            scope: level,
        })
    }
}

/// Per-request cancellation and deadline, threaded explicitly through every
/// downstream call.
#[derive(Clone)]
pub struct RequestContext {
    pub scope: Option<RequestScope>,
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(scope: Option<RequestScope>) -> Self {
        Self {
            scope,
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// A cancellation handle the caller can flip from another thread.
    pub fn cancellation_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        matches!(self.deadline, Some(d) if Instant::now() >= d)
    }

    pub fn check_cancelled(&self) -> crate::errors::SubstrateResult<()> {
        if self.is_cancelled() {
            Err(crate::errors::SubstrateError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(None)
    }
}

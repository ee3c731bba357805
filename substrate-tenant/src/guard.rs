use substrate_core::config::IsolationMode;
use substrate_core::document::{Filter, Payload, RESERVED_FIELDS};
use substrate_core::errors::SubstrateError;
use substrate_core::scope::{RequestScope, ScopeLevel};
use substrate_core::SubstrateResult;

fn scope_level_str(level: ScopeLevel) -> &'static str {
    match level {
        ScopeLevel::Project => "project",
        ScopeLevel::Team => "team",
        ScopeLevel::Org => "org",
    }
}

/// Tenant Guard: the only place a payload's `tenant_id`,
/// `project_id`, `scope` fields are written, and the only place a read
/// filter is checked for tampering on those fields. Isolation mode picks
/// the collection-naming strategy; the write/read contract is identical
/// under every mode.
pub struct TenantGuard {
    isolation_mode: IsolationMode,
}

impl TenantGuard {
    pub fn new(isolation_mode: IsolationMode) -> Self {
        Self { isolation_mode }
    }

    /// Overwrite (never merge) the reserved tenant fields on a write
    /// payload from the given scope. Fails closed if no scope is present.
    pub fn bind_write(&self, scope: Option<&RequestScope>, mut payload: Payload) -> SubstrateResult<Payload> {
        let scope = scope.ok_or(SubstrateError::MissingTenant)?;
        payload.insert("tenant_id".to_string(), scope.tenant_id.clone().into());
        payload.insert("project_id".to_string(), scope.project_id.clone().into());
        payload.insert("scope".to_string(), scope_level_str(scope.scope).into());
        Ok(payload)
    }

    /// Extend a caller-supplied filter with the tenant/project fields from
    /// scope. Rejects any filter that tries to set one of those fields
    /// itself — the guard fails closed rather than silently overriding a
    /// caller's attempt at cross-tenant access.
    pub fn bind_read(&self, scope: Option<&RequestScope>, filter: Filter) -> SubstrateResult<Filter> {
        let scope = scope.ok_or(SubstrateError::MissingTenant)?;
        for field in RESERVED_FIELDS {
            if filter.contains_key(field) {
                return Err(SubstrateError::FilterInjection(field.to_string()));
            }
        }
        let mut bound = filter;
        bound.insert("tenant_id".to_string(), scope.tenant_id.clone().into());
        bound.insert("project_id".to_string(), scope.project_id.clone().into());
        Ok(bound)
    }

    /// The collection name a given entity kind maps to under the current
    /// isolation mode. `payload` and `none` share one collection per
    /// entity kind; `filesystem` partitions by tenant.
    pub fn collection_name(&self, entity_kind: &str, scope: Option<&RequestScope>) -> SubstrateResult<String> {
        match self.isolation_mode {
            IsolationMode::Payload | IsolationMode::None => Ok(entity_kind.to_string()),
            IsolationMode::Filesystem => {
                let scope = scope.ok_or(SubstrateError::MissingTenant)?;
                Ok(format!("{}_{}", scope.tenant_id, entity_kind))
            }
        }
    }
}

use std::collections::BTreeSet;
use std::sync::Arc;

use substrate_core::config::MemoryConfig;
use substrate_core::errors::SubstrateError;
use substrate_core::scope::{RequestContext, RequestScope, ScopeLevel};
use substrate_embed::{Embedder, LocalProvider};
use substrate_memory::MemoryEngine;
use substrate_tenant::TenantGuard;
use substrate_vectorstore::InMemoryVectorStore;

fn engine() -> MemoryEngine {
    let embedder: Arc<dyn Embedder> = Arc::new(LocalProvider::new(16));
    let store = Arc::new(InMemoryVectorStore::new());
    let guard = TenantGuard::new(substrate_core::config::IsolationMode::Payload);
    MemoryEngine::new(embedder, store, guard, MemoryConfig::default())
}

fn ctx_for(tenant: &str, project: &str, level: ScopeLevel) -> RequestContext {
    RequestContext::new(Some(RequestScope::new(tenant, project, level)))
}

#[test]
fn record_and_search_round_trips() {
    let engine = engine();
    let ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    let recorded = engine.record(&ctx, "retry on 429 with backoff", BTreeSet::new()).unwrap();
    assert_eq!(recorded.confidence, 0.5);

    let results = engine.search(&ctx, "retry on 429", 5, None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, recorded.id);
}

#[test]
fn record_without_scope_fails_closed() {
    let engine = engine();
    let ctx = RequestContext::default();
    let err = engine.record(&ctx, "text", BTreeSet::new()).unwrap_err();
    assert!(matches!(err, SubstrateError::MissingTenant));
}

#[test]
fn search_without_scope_fails_closed_not_empty() {
    let engine = engine();
    let ctx = RequestContext::default();
    let err = engine.search(&ctx, "anything", 5, None).unwrap_err();
    assert!(matches!(err, SubstrateError::MissingTenant));
}

#[test]
fn tenant_isolation_holds_across_scopes() {
    let engine = engine();
    let ctx_a = ctx_for("tenant-a", "p1", ScopeLevel::Project);
    let ctx_b = ctx_for("tenant-b", "p1", ScopeLevel::Project);

    engine.record(&ctx_a, "tenant a secret strategy", BTreeSet::new()).unwrap();
    engine.record(&ctx_b, "tenant b secret strategy", BTreeSet::new()).unwrap();

    let results_a = engine.search(&ctx_a, "secret strategy", 10, None).unwrap();
    assert!(results_a.iter().all(|m| m.tenant_id == "tenant-a"));

    let results_b = engine.search(&ctx_b, "secret strategy", 10, None).unwrap();
    assert!(results_b.iter().all(|m| m.tenant_id == "tenant-b"));
}

#[test]
fn feedback_helpful_increases_confidence_and_counter() {
    let engine = engine();
    let ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    let memory = engine.record(&ctx, "some strategy", BTreeSet::new()).unwrap();

    let updated = engine.feedback(&ctx, &memory.id, true).unwrap();
    assert!(updated.confidence > memory.confidence);
    assert_eq!(updated.feedback.helpful, 1);
    assert_eq!(updated.feedback.unhelpful, 0);
}

#[test]
fn unhelpful_feedback_dominates_helpful() {
    let engine = engine();
    let ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    let memory = engine.record(&ctx, "some strategy", BTreeSet::new()).unwrap();
    let initial = memory.confidence;

    engine.feedback(&ctx, &memory.id, true).unwrap();
    let after_unhelpful = engine.feedback(&ctx, &memory.id, false).unwrap();

    assert!(after_unhelpful.confidence <= initial);
}

#[test]
fn confidence_never_escapes_unit_interval() {
    let engine = engine();
    let ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    let memory = engine.record(&ctx, "some strategy", BTreeSet::new()).unwrap();

    let mut last = memory;
    for _ in 0..50 {
        last = engine.feedback(&ctx, &last.id, true).unwrap();
    }
    assert!(last.confidence <= 1.0);

    for _ in 0..50 {
        last = engine.feedback(&ctx, &last.id, false).unwrap();
    }
    assert!(last.confidence >= 0.0);
}

#[test]
fn counters_never_decrease() {
    let engine = engine();
    let ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    let memory = engine.record(&ctx, "some strategy", BTreeSet::new()).unwrap();

    let after_one = engine.outcome(&ctx, &memory.id, true).unwrap();
    assert_eq!(after_one.outcomes.success, 1);
    let after_two = engine.outcome(&ctx, &memory.id, true).unwrap();
    assert_eq!(after_two.outcomes.success, 2);
    assert!(after_two.outcomes.success >= after_one.outcomes.success);
}

#[test]
fn feedback_on_missing_id_fails_not_found() {
    let engine = engine();
    let ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    let err = engine.feedback(&ctx, "does-not-exist", true).unwrap_err();
    assert!(matches!(err, SubstrateError::NotFound(_)));
}

#[test]
fn hierarchical_search_cascades_and_dedups() {
    let engine = engine();
    let project_ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    let team_ctx = ctx_for("acme", "p1", ScopeLevel::Team);
    let org_ctx = ctx_for("acme", "p1", ScopeLevel::Org);

    engine.record(&project_ctx, "auth-fix project one", BTreeSet::new()).unwrap();
    for i in 0..3 {
        engine.record(&team_ctx, &format!("auth-fix team memory {i}"), BTreeSet::new()).unwrap();
    }
    for i in 0..5 {
        engine.record(&org_ctx, &format!("auth-fix org memory {i}"), BTreeSet::new()).unwrap();
    }

    let results = engine.search(&project_ctx, "auth fix", 5, None).unwrap();
    assert_eq!(results.len(), 5);
    let ids: std::collections::HashSet<_> = results.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids.len(), 5, "results must be distinct ids");
}

#[test]
fn scope_hint_restricts_cascade_to_project_only() {
    let engine = engine();
    let project_ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    let org_ctx = ctx_for("acme", "p1", ScopeLevel::Org);

    for i in 0..5 {
        engine.record(&org_ctx, &format!("auth-fix org memory {i}"), BTreeSet::new()).unwrap();
    }

    let results = engine.search(&project_ctx, "auth fix", 5, Some(ScopeLevel::Project)).unwrap();
    assert!(results.is_empty(), "project-only hint must not cascade to org-scoped memories");

    let unrestricted = engine.search(&project_ctx, "auth fix", 5, None).unwrap();
    assert_eq!(unrestricted.len(), 5);
}

#[test]
fn search_is_pure_with_respect_to_store_state() {
    let engine = engine();
    let ctx = ctx_for("acme", "p1", ScopeLevel::Project);
    engine.record(&ctx, "idempotent search text", BTreeSet::new()).unwrap();

    let first = engine.search(&ctx, "idempotent search", 5, None).unwrap();
    let second = engine.search(&ctx, "idempotent search", 5, None).unwrap();
    let first_ids: Vec<_> = first.iter().map(|m| m.id.clone()).collect();
    let second_ids: Vec<_> = second.iter().map(|m| m.id.clone()).collect();
    assert_eq!(first_ids, second_ids);
}

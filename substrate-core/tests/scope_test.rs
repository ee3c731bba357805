use substrate_core::{RequestScope, ScopeLevel};

#[test]
fn broadened_cascades_project_team_org_then_stops() {
    let project = RequestScope::new("t1", "p1", ScopeLevel::Project);
    let team = project.broadened().expect("project broadens to team");
    assert_eq!(team.scope, ScopeLevel::Team);
    assert_eq!(team.tenant_id, "t1");
    assert_eq!(team.project_id, "p1");

    let org = team.broadened().expect("team broadens to org");
    assert_eq!(org.scope, ScopeLevel::Org);

    assert!(org.broadened().is_none());
}

#[test]
fn request_context_cancellation_handle_is_observed() {
    let ctx = substrate_core::RequestContext::new(None);
    assert!(ctx.check_cancelled().is_ok());

    let handle = ctx.cancellation_handle();
    handle.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(ctx.check_cancelled().is_err());
}

#[test]
fn request_context_deadline_in_the_past_is_cancelled() {
    let past = std::time::Instant::now() - std::time::Duration::from_secs(1);
    let ctx = substrate_core::RequestContext::new(None).with_deadline(past);
    assert!(ctx.check_cancelled().is_err());
}

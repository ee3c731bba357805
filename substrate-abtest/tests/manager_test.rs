use substrate_abtest::{CompressionOutcome, ExperimentManager};
use substrate_core::compression::Algorithm;
use substrate_core::errors::SubstrateError;

fn outcome_for(session_id: &str, algorithm: Algorithm, success: bool, ratio: f64, quality: f64, accepted: Option<bool>) -> CompressionOutcome {
    CompressionOutcome {
        session_id: session_id.to_string(),
        algorithm,
        success,
        ratio,
        quality,
        duration_ms: 10.0,
        user_accepted: accepted,
        timestamp: chrono::Utc::now(),
    }
}

fn outcome(algorithm: Algorithm, success: bool, ratio: f64, quality: f64, accepted: Option<bool>) -> CompressionOutcome {
    outcome_for("session-unspecified", algorithm, success, ratio, quality, accepted)
}

#[test]
fn create_rejects_empty_id_and_too_few_variants() {
    let manager = ExperimentManager::new();
    assert!(manager.create("", vec![Algorithm::Extractive, Algorithm::Abstractive]).is_err());
    assert!(manager.create("exp", vec![Algorithm::Extractive]).is_err());
}

#[test]
fn assign_is_deterministic_per_session_property_5() {
    let manager = ExperimentManager::new();
    manager.create("exp-assign", vec![Algorithm::Extractive, Algorithm::Abstractive, Algorithm::Hybrid]).unwrap();

    let first = manager.assign("exp-assign", "session-abc").unwrap();
    for _ in 0..100 {
        assert_eq!(manager.assign("exp-assign", "session-abc").unwrap(), first);
    }
}

#[test]
fn assign_rejects_empty_session_id() {
    let manager = ExperimentManager::new();
    manager.create("exp-empty", vec![Algorithm::Extractive, Algorithm::Abstractive]).unwrap();
    assert!(manager.assign("exp-empty", "").is_err());
}

#[test]
fn assign_on_unknown_experiment_fails_not_found() {
    let manager = ExperimentManager::new();
    let err = manager.assign("does-not-exist", "session-1").unwrap_err();
    assert!(matches!(err, SubstrateError::NotFound(_)));
}

#[test]
fn record_outcome_rejects_unregistered_algorithm() {
    let manager = ExperimentManager::new();
    manager.create("exp-reject", vec![Algorithm::Extractive, Algorithm::Abstractive]).unwrap();

    let err = manager.record_outcome("exp-reject", outcome(Algorithm::Hybrid, true, 2.0, 0.9, Some(true))).unwrap_err();
    assert!(matches!(err, SubstrateError::AlgorithmNotInExperiment(_)));
}

#[test]
fn metrics_aggregate_success_rate_and_acceptance() {
    let manager = ExperimentManager::new();
    manager.create("exp-metrics", vec![Algorithm::Extractive, Algorithm::Abstractive]).unwrap();

    manager.record_outcome("exp-metrics", outcome(Algorithm::Extractive, true, 2.0, 0.9, Some(true))).unwrap();
    manager.record_outcome("exp-metrics", outcome(Algorithm::Extractive, true, 3.0, 0.8, Some(false))).unwrap();
    manager.record_outcome("exp-metrics", outcome(Algorithm::Extractive, false, 0.0, 0.0, None)).unwrap();

    let metrics = manager.get_metrics("exp-metrics").unwrap();
    let extractive = metrics[&Algorithm::Extractive];

    assert_eq!(extractive.total_attempts, 3);
    assert_eq!(extractive.success_count, 2);
    assert!((extractive.success_rate - (2.0 / 3.0)).abs() < 1e-9);
    assert!((extractive.avg_ratio - 2.5).abs() < 1e-9);
    assert_eq!(extractive.user_acceptance_count, 1);
    assert_eq!(extractive.user_rejection_count, 1);
    assert!((extractive.user_acceptance_rate - 0.5).abs() < 1e-9);
}

#[test]
fn comparison_report_withholds_winner_below_minimum_attempts() {
    let manager = ExperimentManager::new();
    manager.create("exp-report", vec![Algorithm::Extractive, Algorithm::Abstractive]).unwrap();
    manager.record_outcome("exp-report", outcome(Algorithm::Extractive, true, 2.0, 0.9, Some(true))).unwrap();

    let report = manager.compare("exp-report").unwrap();
    assert!(report.winner.is_none());
}

#[test]
fn comparison_report_picks_a_winner_once_variant_has_five_attempts() {
    let manager = ExperimentManager::new();
    manager.create("exp-winner", vec![Algorithm::Extractive, Algorithm::Abstractive]).unwrap();

    for _ in 0..5 {
        manager.record_outcome("exp-winner", outcome(Algorithm::Extractive, true, 4.0, 0.95, Some(true))).unwrap();
    }
    for _ in 0..5 {
        manager.record_outcome("exp-winner", outcome(Algorithm::Abstractive, true, 1.2, 0.5, Some(false))).unwrap();
    }

    let report = manager.compare("exp-winner").unwrap();
    assert_eq!(report.winner, Some(Algorithm::Extractive));
    assert!(report.recommendation.contains("extractive"));
}

#[test]
fn list_returns_created_experiment_ids() {
    let manager = ExperimentManager::new();
    manager.create("exp-a", vec![Algorithm::Extractive, Algorithm::Abstractive]).unwrap();
    manager.create("exp-b", vec![Algorithm::Extractive, Algorithm::Hybrid]).unwrap();

    let mut ids = manager.list();
    ids.sort();
    assert_eq!(ids, vec!["exp-a".to_string(), "exp-b".to_string()]);
}

#[test]
fn distinct_sessions_counts_unique_assignments() {
    let manager = ExperimentManager::new();
    manager.create("exp-sessions", vec![Algorithm::Extractive, Algorithm::Abstractive]).unwrap();
    manager.assign("exp-sessions", "s1").unwrap();
    manager.assign("exp-sessions", "s2").unwrap();
    manager.assign("exp-sessions", "s1").unwrap();

    let report = manager.compare("exp-sessions").unwrap();
    assert_eq!(report.distinct_sessions, 2);
}

#[test]
fn distinct_sessions_also_counts_sessions_seen_only_via_outcomes() {
    let manager = ExperimentManager::new();
    manager.create("exp-outcome-only", vec![Algorithm::Extractive, Algorithm::Abstractive]).unwrap();

    // Never assigned, only reported — the session must still be counted.
    manager
        .record_outcome("exp-outcome-only", outcome_for("s-direct", Algorithm::Extractive, true, 2.0, 0.9, Some(true)))
        .unwrap();

    let report = manager.compare("exp-outcome-only").unwrap();
    assert_eq!(report.distinct_sessions, 1);
}

use substrate_quality::{QualityGate, QualityScores};

const ORIGINAL: &str = "The quick brown fox jumps over the lazy dog near the riverbank. \
Foxes are known for their agility and cunning behavior in the wild. \
This particular fox had been observed hunting near the village for several weeks.";

#[test]
fn compression_score_is_one_when_ratio_meets_target() {
    let compressed = "Foxes are known for their agility.";
    let scores = QualityScores::compute(ORIGINAL, compressed, 2.0);
    assert!(scores.compression > 0.0 && scores.compression <= 1.0);
}

#[test]
fn compression_score_scales_below_target_ratio() {
    let barely_shorter = &ORIGINAL[..ORIGINAL.len() - 5];
    let scores = QualityScores::compute(ORIGINAL, barely_shorter, 10.0);
    assert!(scores.compression < 1.0);
}

#[test]
fn identical_text_yields_perfect_similarity_and_retention() {
    let scores = QualityScores::compute(ORIGINAL, ORIGINAL, 1.0);
    assert!((scores.similarity - 1.0).abs() < 1e-9);
    assert!((scores.keyword_retention - 1.0).abs() < 1e-9);
}

#[test]
fn disjoint_text_yields_zero_similarity() {
    let scores = QualityScores::compute(ORIGINAL, "completely unrelated filler words only", 2.0);
    assert!(scores.similarity < 0.3);
}

#[test]
fn information_retention_rewards_high_retention_more_than_linear() {
    let half = "Foxes are known for their agility and cunning behavior in the wild.";
    let scores = QualityScores::compute(ORIGINAL, half, 2.0);
    assert!(scores.information_retention >= scores.keyword_retention);
}

#[test]
fn readability_favors_ten_to_twenty_words_per_sentence() {
    let good = "This sentence has exactly enough words to land in the target readability band for scoring.";
    let scores = QualityScores::compute(ORIGINAL, good, 1.5);
    assert!(scores.readability > 0.5);
}

#[test]
fn composite_is_weighted_sum_of_subscores() {
    let compressed = "Foxes are known for their agility and cunning behavior.";
    let scores = QualityScores::compute(ORIGINAL, compressed, 2.0);
    let expected = 0.25 * scores.compression
        + 0.30 * scores.information_retention
        + 0.30 * scores.similarity
        + 0.15 * scores.readability;
    assert!((scores.composite - expected).abs() < 1e-9);
}

#[test]
fn gate_with_all_zero_thresholds_always_passes() {
    let gate = QualityGate::default();
    let scores = QualityScores::compute(ORIGINAL, "short", 2.0);
    let result = gate.evaluate(scores);
    assert!(result.pass);
}

#[test]
fn gate_short_circuits_on_first_failing_criterion_compression() {
    let gate = QualityGate {
        compression_threshold: 0.99,
        retention_threshold: 0.99,
        similarity_threshold: 0.0,
        readability_threshold: 0.0,
        composite_threshold: 0.0,
    };
    let scores = QualityScores::compute(ORIGINAL, "tiny", 100.0);
    let result = gate.evaluate(scores);
    assert!(!result.pass);
    assert_eq!(result.failure_reason, "compression");
}

#[test]
fn gate_reports_retention_when_compression_passes_but_retention_fails() {
    let gate = QualityGate {
        compression_threshold: 0.0,
        retention_threshold: 0.99,
        similarity_threshold: 0.0,
        readability_threshold: 0.0,
        composite_threshold: 0.0,
    };
    let scores = QualityScores::compute(ORIGINAL, "completely unrelated filler words only", 1.0);
    let result = gate.evaluate(scores);
    assert!(!result.pass);
    assert_eq!(result.failure_reason, "retention");
}

#[test]
fn gate_passes_when_scores_clear_every_threshold() {
    let gate = QualityGate {
        compression_threshold: 0.0,
        retention_threshold: 0.0,
        similarity_threshold: 0.0,
        readability_threshold: 0.0,
        composite_threshold: 0.0,
    };
    let scores = QualityScores::compute(ORIGINAL, ORIGINAL, 1.0);
    let result = gate.evaluate(scores);
    assert!(result.pass);
    assert!(result.failure_reason.is_empty());
}

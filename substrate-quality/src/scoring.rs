use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::stopwords::is_stopword;

fn alnum_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn content_words(text: &str) -> HashSet<String> {
    alnum_words(text).into_iter().filter(|w| w.len() > 3 && !is_stopword(w)).collect()
}

fn word_set(text: &str) -> HashSet<String> {
    alnum_words(text).into_iter().collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    if union == 0.0 {
        0.0
    } else {
        intersection / union
    }
}

fn compression_ratio_score(original: &str, compressed: &str, target_ratio: f64) -> f64 {
    if compressed.is_empty() {
        return 0.0;
    }
    let r = original.len() as f64 / compressed.len() as f64;
    if r >= target_ratio {
        1.0
    } else {
        r / target_ratio
    }
}

fn keyword_retention(original: &str, compressed: &str) -> f64 {
    let orig_words = content_words(original);
    if orig_words.is_empty() {
        return 1.0;
    }
    let comp_words = content_words(compressed);
    let retained = orig_words.intersection(&comp_words).count() as f64;
    retained / orig_words.len() as f64
}

fn readability(text: &str) -> f64 {
    let sentences: Vec<&str> = text
        .split(|c: char| c == '.' || c == '!' || c == '?')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let has_terminator = text.contains('.') || text.contains('!') || text.contains('?');

    if sentences.is_empty() {
        return if has_terminator { 0.1 } else { 0.0 };
    }

    let total_words: usize = sentences.iter().map(|s| s.split_whitespace().count()).sum();
    let avg_words_per_sentence = total_words as f64 / sentences.len() as f64;

    let base = if (10.0..=20.0).contains(&avg_words_per_sentence) {
        1.0
    } else if avg_words_per_sentence < 10.0 {
        if avg_words_per_sentence <= 0.0 { 0.0 } else { avg_words_per_sentence / 10.0 }
    } else {
        20.0 / avg_words_per_sentence
    };

    let bonus = if has_terminator { 0.1 } else { 0.0 };
    (base + bonus).min(1.0)
}

/// The five sub-scores plus composite, all in `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub compression: f64,
    pub keyword_retention: f64,
    pub information_retention: f64,
    pub similarity: f64,
    pub readability: f64,
    pub composite: f64,
}

impl QualityScores {
    pub fn compute(original: &str, compressed: &str, target_ratio: f64) -> Self {
        let compression = compression_ratio_score(original, compressed, target_ratio);
        let retention = keyword_retention(original, compressed);
        let information_retention = retention.powf(0.8);
        let similarity = jaccard(&word_set(original), &word_set(compressed));
        let readability = readability(compressed);

        let composite = 0.25 * compression + 0.30 * information_retention + 0.30 * similarity + 0.15 * readability;

        Self {
            compression,
            keyword_retention: retention,
            information_retention,
            similarity,
            readability,
            composite,
        }
    }
}

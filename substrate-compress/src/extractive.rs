use std::collections::HashMap;
use std::time::Instant;

use substrate_core::compression::{Algorithm, CompressionLevel, CompressionMetadata};
use substrate_core::constants::OVER_COMPRESSION_FACTOR;
use substrate_core::scope::RequestContext;
use substrate_core::{CompressionResult, SubstrateResult};
use substrate_quality::QualityScores;

use crate::common::{short_content_passthrough, split_sentences};
use crate::compressor::{Capabilities, Compressor};

const MIN_SENTENCE_LEN: usize = 8;

struct ScoredSentence<'a> {
    text: &'a str,
    index: usize,
    score: f64,
}

fn word_frequencies(content: &str) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for word in content.split_whitespace() {
        let normalized: String = word.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        *freq.entry(normalized).or_insert(0) += 1;
    }
    freq
}

fn length_score(word_count: usize) -> f64 {
    const PEAK: f64 = 20.0;
    let n = word_count as f64;
    if n <= 0.0 {
        return 0.0;
    }
    (1.0 - ((n - PEAK).abs() / PEAK)).clamp(0.0, 1.0)
}

fn rarity_score(sentence: &str, freq: &HashMap<String, usize>) -> f64 {
    let words: Vec<String> = sentence
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase())
        .filter(|w| w.len() > 2)
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let sum: f64 = words.iter().map(|w| 1.0 / *freq.get(w).unwrap_or(&1) as f64).sum();
    sum / words.len() as f64
}

fn score_sentences<'a>(sentences: &[&'a str], freq: &HashMap<String, usize>) -> Vec<ScoredSentence<'a>> {
    sentences
        .iter()
        .enumerate()
        .map(|(i, &sentence)| {
            let position_bonus = 1.0 / (i as f64 + 1.0);
            let word_count = sentence.split_whitespace().count();
            let len_score = length_score(word_count);
            let rarity = rarity_score(sentence, freq);
            let score = 0.3 * position_bonus + 0.4 * len_score + 0.3 * rarity;
            ScoredSentence { text: sentence, index: i, score }
        })
        .collect()
}

/// Scores and greedily selects sentences under a target length, the way a
/// classic extractive summarizer does: cheap, deterministic, no external
/// dependency.
pub struct ExtractiveCompressor {
    max_content_length: usize,
}

impl ExtractiveCompressor {
    pub fn new(max_content_length: usize) -> Self {
        Self { max_content_length }
    }
}

impl Default for ExtractiveCompressor {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

impl Compressor for ExtractiveCompressor {
    fn compress(&self, ctx: &RequestContext, content: &str, target_ratio: f64) -> SubstrateResult<CompressionResult> {
        ctx.check_cancelled()?;
        if let Some(passthrough) = short_content_passthrough(content, Algorithm::Extractive, CompressionLevel::Folded) {
            return Ok(passthrough);
        }

        let start = Instant::now();
        let all_sentences = split_sentences(content);
        let candidate_sentences: Vec<&str> = all_sentences.iter().copied().filter(|s| s.len() >= MIN_SENTENCE_LEN).collect();
        let candidate_sentences = if candidate_sentences.is_empty() { all_sentences.clone() } else { candidate_sentences };

        if candidate_sentences.is_empty() {
            return Ok(CompressionResult::unchanged(content.to_string(), Algorithm::Extractive, CompressionLevel::Folded, chrono::Utc::now()));
        }

        let freq = word_frequencies(content);
        let mut scored = score_sentences(&candidate_sentences, &freq);

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let target_length = (content.len() as f64 / target_ratio).floor() as usize;
        let mut selected: Vec<&ScoredSentence> = Vec::new();
        let mut running_len = 0usize;

        for candidate in &scored {
            let addition = candidate.text.len() + 1;
            if running_len + addition > target_length {
                continue;
            }
            selected.push(candidate);
            running_len += addition;
        }

        if selected.is_empty() {
            if let Some(best) = scored.first() {
                selected.push(best);
            }
        }

        selected.sort_by_key(|s| s.index);
        let compressed = selected.iter().map(|s| s.text).collect::<Vec<_>>().join(" ");

        let elapsed = start.elapsed();
        let scores = QualityScores::compute(content, &compressed, target_ratio);
        let achieved_ratio = content.len() as f64 / compressed.len().max(1) as f64;
        let mut quality = scores.composite;
        if achieved_ratio > OVER_COMPRESSION_FACTOR * target_ratio {
            quality *= 0.9;
        }

        Ok(CompressionResult {
            content: compressed.clone(),
            metadata: CompressionMetadata {
                algorithm: Algorithm::Extractive,
                level: CompressionLevel::Folded,
                original_size: content.len(),
                compressed_size: compressed.len(),
                ratio: achieved_ratio,
                compressed_at: chrono::Utc::now(),
            },
            quality_score: quality,
            processing_time: elapsed,
        })
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            algorithms: vec![Algorithm::Extractive],
            max_content_length: self.max_content_length,
            supports_target_ratio: true,
            quality_range: (0.0, 1.0),
        }
    }
}

use std::time::Instant;

use substrate_core::compression::{Algorithm, CompressionLevel, CompressionMetadata};
use substrate_core::scope::RequestContext;
use substrate_core::{CompressionResult, SubstrateResult};

use crate::common::short_content_passthrough;
use crate::compressor::{Capabilities, Compressor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentKind {
    Code,
    Markdown,
    Conversation,
    Mixed,
    Plain,
}

const CODE_KEYWORDS: &[&str] = &["fn ", "func ", "def ", "class ", "impl ", "import ", "package ", "const ", "var "];

fn looks_like_code(segment: &str) -> bool {
    segment.contains("```") || CODE_KEYWORDS.iter().any(|kw| segment.contains(kw)) || segment.lines().filter(|l| l.starts_with("    ") || l.starts_with('\t')).count() * 3 > segment.lines().count()
}

fn looks_like_markdown(segment: &str) -> bool {
    let lines: Vec<&str> = segment.lines().collect();
    if lines.is_empty() {
        return false;
    }
    let heading_or_list = lines.iter().filter(|l| l.starts_with('#') || l.trim_start().starts_with("- ") || l.trim_start().starts_with("* ")).count();
    heading_or_list * 4 >= lines.len()
}

fn looks_like_conversation(segment: &str) -> bool {
    let lines: Vec<&str> = segment.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return false;
    }
    let turns = lines
        .iter()
        .filter(|l| {
            let trimmed = l.trim_start();
            trimmed.starts_with("Human:") || trimmed.starts_with("Assistant:") || trimmed.starts_with("User:") || trimmed.starts_with("System:")
        })
        .count();
    turns * 3 >= lines.len()
}

/// Fenced code blocks split a document into alternating prose/code runs; we
/// preserve order so a mixed document can be segmented and rejoined.
fn fenced_segments(content: &str) -> Vec<(ContentKind, &str)> {
    let mut segments = Vec::new();
    let mut rest = content;
    loop {
        match rest.find("```") {
            None => {
                if !rest.is_empty() {
                    segments.push((classify(rest), rest));
                }
                break;
            }
            Some(start) => {
                if start > 0 {
                    segments.push((classify(&rest[..start]), &rest[..start]));
                }
                let after_open = &rest[start + 3..];
                match after_open.find("```") {
                    None => {
                        segments.push((ContentKind::Code, &rest[start..]));
                        break;
                    }
                    Some(end) => {
                        let fence_end = start + 3 + end + 3;
                        segments.push((ContentKind::Code, &rest[start..fence_end]));
                        rest = &rest[fence_end..];
                    }
                }
            }
        }
    }
    segments
}

fn classify(segment: &str) -> ContentKind {
    if segment.trim().is_empty() {
        return ContentKind::Plain;
    }
    if looks_like_code(segment) {
        ContentKind::Code
    } else if looks_like_conversation(segment) {
        ContentKind::Conversation
    } else if looks_like_markdown(segment) {
        ContentKind::Markdown
    } else {
        classify_by_density(segment)
    }
}

/// Fallback for segments with no clear marker: scores each class by pattern
/// density and picks the best fit. Only kicks in once the boolean checks
/// above all miss, and stays Plain unless a class clears a density floor —
/// ambiguous prose should stay Plain rather than get force-fit.
fn classify_by_density(segment: &str) -> ContentKind {
    const DENSITY_FLOOR: f64 = 0.08;

    let lines: Vec<&str> = segment.lines().collect();
    let line_count = lines.len().max(1) as f64;
    let words: Vec<&str> = segment.split_whitespace().collect();
    let word_count = words.len().max(1) as f64;

    let code_symbol_lines = lines
        .iter()
        .filter(|l| {
            let t = l.trim_end();
            t.ends_with(';') || t.ends_with('{') || t.ends_with('}') || t.ends_with(')') || t.contains("->") || t.contains("=>")
        })
        .count() as f64;
    let code_density = code_symbol_lines / line_count;

    let markdown_punct_words = words.iter().filter(|w| w.starts_with('`') || w.starts_with('[') || w.starts_with('*') || w.starts_with('_')).count() as f64;
    let markdown_density = markdown_punct_words / word_count;

    let question_lines = lines.iter().filter(|l| l.trim_end().ends_with('?')).count() as f64;
    let short_lines = lines.iter().filter(|l| !l.trim().is_empty() && l.split_whitespace().count() <= 12).count() as f64;
    // Turn-taking is a multi-line signal; a single line can't exhibit it.
    let conversation_density = if line_count > 1.0 { (question_lines / line_count) * 0.5 + (short_lines / line_count) * 0.5 } else { question_lines / line_count };

    let scores = [
        (ContentKind::Code, code_density),
        (ContentKind::Markdown, markdown_density),
        (ContentKind::Conversation, conversation_density),
    ];

    let best = scores.iter().fold(&scores[0], |best, candidate| if candidate.1 > best.1 { candidate } else { best });

    if best.1 >= DENSITY_FLOOR {
        best.0
    } else {
        ContentKind::Plain
    }
}

fn classify_whole(content: &str) -> ContentKind {
    let segments = fenced_segments(content);
    if segments.len() <= 1 {
        return classify(content);
    }
    let has_code = segments.iter().any(|(k, text)| *k == ContentKind::Code && !text.trim().is_empty());
    let has_other = segments.iter().any(|(k, text)| *k != ContentKind::Code && !text.trim().is_empty());
    if has_code && has_other {
        ContentKind::Mixed
    } else if has_code {
        ContentKind::Code
    } else {
        classify(content)
    }
}

fn route(kind: ContentKind) -> Algorithm {
    match kind {
        ContentKind::Code => Algorithm::Extractive,
        ContentKind::Markdown => Algorithm::Abstractive,
        ContentKind::Conversation => Algorithm::Extractive,
        ContentKind::Mixed => Algorithm::Extractive,
        ContentKind::Plain => Algorithm::Extractive,
    }
}

/// Classifies content by type and routes each section to the compressor
/// best suited for it, then reports the result at `Summary` level
/// regardless of which sub-compressor ran.
pub struct HybridCompressor {
    extractive: Box<dyn Compressor>,
    abstractive: Box<dyn Compressor>,
    max_content_length: usize,
}

impl HybridCompressor {
    pub fn new(extractive: Box<dyn Compressor>, abstractive: Box<dyn Compressor>, max_content_length: usize) -> Self {
        Self { extractive, abstractive, max_content_length }
    }

    fn compressor_for(&self, kind: ContentKind) -> &dyn Compressor {
        match route(kind) {
            Algorithm::Abstractive => self.abstractive.as_ref(),
            _ => self.extractive.as_ref(),
        }
    }

    fn compress_mixed(&self, ctx: &RequestContext, content: &str, target_ratio: f64) -> SubstrateResult<(String, f64)> {
        let segments = fenced_segments(content);
        let mut compressed_parts = Vec::with_capacity(segments.len());
        let mut quality_sum = 0.0;
        let mut quality_count = 0usize;
        for (kind, segment) in segments {
            if segment.trim().is_empty() {
                compressed_parts.push(segment.to_string());
                continue;
            }
            match self.compressor_for(kind).compress(ctx, segment, target_ratio) {
                Ok(result) => {
                    quality_sum += result.quality_score;
                    quality_count += 1;
                    compressed_parts.push(result.content);
                }
                Err(_) => {
                    // Verbatim preservation fallback: a failing sub-compression
                    // keeps its section intact rather than dropping content.
                    compressed_parts.push(segment.to_string());
                    quality_sum += 1.0;
                    quality_count += 1;
                }
            }
        }
        let avg_quality = if quality_count > 0 { quality_sum / quality_count as f64 } else { 1.0 };
        Ok((compressed_parts.join(""), avg_quality))
    }
}

impl Compressor for HybridCompressor {
    fn compress(&self, ctx: &RequestContext, content: &str, target_ratio: f64) -> SubstrateResult<CompressionResult> {
        ctx.check_cancelled()?;
        if let Some(passthrough) = short_content_passthrough(content, Algorithm::Hybrid, CompressionLevel::Summary) {
            return Ok(passthrough);
        }

        let start = Instant::now();
        let kind = classify_whole(content);

        let (compressed, quality) = if kind == ContentKind::Mixed {
            self.compress_mixed(ctx, content, target_ratio)?
        } else {
            let result = self.compressor_for(kind).compress(ctx, content, target_ratio)?;
            (result.content, result.quality_score)
        };
        let elapsed = start.elapsed();

        let achieved_ratio = content.len() as f64 / compressed.len().max(1) as f64;
        Ok(CompressionResult {
            content: compressed.clone(),
            metadata: CompressionMetadata {
                algorithm: Algorithm::Hybrid,
                level: CompressionLevel::Summary,
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
            algorithms: vec![Algorithm::Hybrid],
            max_content_length: self.max_content_length,
            supports_target_ratio: true,
            quality_range: (0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_fenced_code_as_code() {
        let content = "```go\nfunc main() {}\n```";
        assert_eq!(classify_whole(content), ContentKind::Code);
    }

    #[test]
    fn classifies_headings_as_markdown() {
        let content = "# Title\n\n## Section\n\n- item one\n- item two\n";
        assert_eq!(classify_whole(content), ContentKind::Markdown);
    }

    #[test]
    fn classifies_dialog_turns_as_conversation() {
        let content = "Human: hello there\nAssistant: hi, how can I help\nHuman: thanks\n";
        assert_eq!(classify_whole(content), ContentKind::Conversation);
    }

    #[test]
    fn classifies_code_and_prose_together_as_mixed() {
        let content = "Here is an explanation.\n\n```rust\nfn add(a: i32, b: i32) -> i32 { a + b }\n```\n\nAnd more prose after.";
        assert_eq!(classify_whole(content), ContentKind::Mixed);
    }

    #[test]
    fn statistical_fallback_routes_unfenced_code_by_symbol_density() {
        let content = "let x = compute();\nlet y = transform(x);\nreturn y + offset;\nlet z = finalize(y);";
        assert_eq!(classify_whole(content), ContentKind::Code);
    }

    #[test]
    fn statistical_fallback_routes_inline_markdown_by_punctuation_density() {
        let content = "Call `connect()` then `*retry*` with `[config]` and `_backoff_` set.";
        assert_eq!(classify_whole(content), ContentKind::Markdown);
    }

    #[test]
    fn statistical_fallback_leaves_ambiguous_prose_as_plain() {
        let content = "This document describes the general approach taken by the team when planning quarterly work across several distinct engineering groups.";
        assert_eq!(classify_whole(content), ContentKind::Plain);
    }
}

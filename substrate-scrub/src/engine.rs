use regex::Regex;

use crate::patterns::{self, SecretPattern};

/// Redacts secret patterns from any byte string crossing the process
/// boundary. A pure function with no internal state beyond the
/// compiled pattern table and any operator-supplied extra patterns, so it
/// is safely shared across threads without locking.
pub struct Scrubber {
    patterns: Vec<SecretPattern>,
    extra: Vec<(Regex, String)>,
}

impl Scrubber {
    pub fn new() -> Self {
        Self {
            patterns: patterns::default_patterns(),
            extra: Vec::new(),
        }
    }

    /// Build a scrubber with `scrubber.extra_patterns` appended to the
    /// default set. Each extra pattern matches are replaced with
    /// a generic `[REDACTED]` placeholder. Patterns that fail to compile
    /// are silently skipped rather than panicking the process at startup.
    pub fn with_extra_patterns(extra_patterns: &[String]) -> Self {
        let extra = extra_patterns
            .iter()
            .filter_map(|p| Regex::new(p).ok().map(|re| (re, "[REDACTED]".to_string())))
            .collect();
        Self {
            patterns: patterns::default_patterns(),
            extra,
        }
    }

    /// Scrub a UTF-8 string. Idempotent: `scrub(scrub(x)) == scrub(x)`.
    pub fn scrub_str(&self, text: &str) -> String {
        let mut matches = self.collect_matches(text);
        // Sort descending by start so replacement doesn't shift earlier
        // offsets, then drop overlaps (keep the first = most specific,
        // since `self.patterns` is ordered most-specific-first).
        matches.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        dedup_overlapping(&mut matches);

        let mut result = text.to_string();
        for (start, end, placeholder) in matches {
            if end > result.len() {
                continue;
            }
            // Idempotency guard: don't re-redact an already-redacted span.
            let slice = &result[start..end];
            if slice.starts_with('[') && slice.ends_with(']') {
                continue;
            }
            result.replace_range(start..end, &placeholder);
        }
        result
    }

    /// Scrub arbitrary bytes. Contract: never panics on invalid UTF-8 —
    /// invalid sequences are lossily converted (bounded, constant-factor
    /// expansion) before pattern matching.
    pub fn scrub(&self, bytes: &[u8]) -> Vec<u8> {
        let text = String::from_utf8_lossy(bytes);
        self.scrub_str(&text).into_bytes()
    }

    fn collect_matches(&self, text: &str) -> Vec<(usize, usize, String)> {
        let mut out = Vec::new();
        for pat in &self.patterns {
            let Some(re) = pat.regex.as_ref() else { continue };
            for m in re.find_iter(text) {
                out.push((m.start(), m.end(), pat.placeholder.to_string()));
            }
        }
        for (re, placeholder) in &self.extra {
            for m in re.find_iter(text) {
                out.push((m.start(), m.end(), placeholder.clone()));
            }
        }
        out
    }
}

impl Default for Scrubber {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove overlapping matches, sorted descending by start; keeps the
/// earlier-pushed (more specific, per pattern ordering) match.
fn dedup_overlapping(matches: &mut Vec<(usize, usize, String)>) {
    let mut i = 0;
    while i + 1 < matches.len() {
        let (cur_start, cur_end, _) = &matches[i];
        let (next_start, next_end, _) = &matches[i + 1];
        if *next_end > *cur_start && *next_start < *cur_end {
            matches.remove(i + 1);
        } else {
            i += 1;
        }
    }
}

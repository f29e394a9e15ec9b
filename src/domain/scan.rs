//! Per-phrase scanning matcher.
//!
//! Compiles every phrase into its own escaped, literal regex and scans the
//! text once per phrase. Cost is O(|text| x |phrases|), which is fine for
//! the small curated lists this was written for.

use super::{sort_spans, MatchSpan, PhraseList, PhraseMatcher};
use crate::error::ModeratorResult;
use regex::{Regex, RegexBuilder};

/// Compiled form of a single phrase.
#[derive(Debug, Clone)]
enum Needle {
    Pattern(Regex),
    /// Used when a phrase is too large for the regex size limit.
    Literal,
}

/// Naive matcher scanning for each phrase separately.
#[derive(Debug, Clone)]
pub struct ScanMatcher {
    phrases: PhraseList,
    needles: Vec<Needle>,
}

impl ScanMatcher {
    /// Creates a matcher for `phrases`.
    pub fn new(phrases: PhraseList) -> Self {
        let needles = phrases
            .iter()
            .map(|phrase| match RegexBuilder::new(&regex::escape(phrase)).build() {
                Ok(pattern) => Needle::Pattern(pattern),
                Err(e) => {
                    tracing::debug!(phrase, error = %e, "phrase falls back to literal search");
                    Needle::Literal
                }
            })
            .collect();

        Self { phrases, needles }
    }

    /// Start offsets of every (possibly overlapping) occurrence.
    fn occurrences(needle: &Needle, phrase: &str, text: &str) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let hit = match needle {
                Needle::Pattern(re) => re.find_at(text, pos).map(|m| (m.start(), m.end())),
                Needle::Literal => text[pos..]
                    .find(phrase)
                    .map(|i| (pos + i, pos + i + phrase.len())),
            };

            let Some((start, end)) = hit else { break };
            found.push((start, end));

            // Step one character past the start so self-overlaps are reported.
            pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }

        found
    }
}

impl PhraseMatcher for ScanMatcher {
    fn phrases(&self) -> &PhraseList {
        &self.phrases
    }

    fn find_matches(&self, normalized: &str) -> Vec<MatchSpan> {
        let mut spans = Vec::new();

        for (index, (phrase, needle)) in self.phrases.iter().zip(&self.needles).enumerate() {
            for (start, end) in Self::occurrences(needle, phrase, normalized) {
                spans.push(MatchSpan::new(normalized, start, end, phrase, index));
            }
        }

        sort_spans(&mut spans);
        spans
    }

    fn name(&self) -> &str {
        "scan"
    }

    fn rebuild(&self, phrases: PhraseList) -> ModeratorResult<Box<dyn PhraseMatcher>> {
        Ok(Box::new(Self::new(phrases)))
    }
}

//! Multi-pattern matcher backed by an Aho-Corasick automaton.
//!
//! Finds all phrases in a single pass over the text, so cost grows with the
//! text and the number of hits rather than with the size of the vocabulary.

use super::{sort_spans, MatchSpan, PhraseList, PhraseMatcher};
use crate::error::{ModeratorError, ModeratorResult};
use aho_corasick::{AhoCorasick, MatchKind as AcMatchKind};
use std::sync::Arc;

/// Aho-Corasick phrase matcher.
#[derive(Debug, Clone)]
pub struct AutomatonMatcher {
    phrases: PhraseList,
    automaton: Arc<AhoCorasick>,
}

impl AutomatonMatcher {
    /// Builds the automaton for `phrases`.
    ///
    /// Fails only when the vocabulary exceeds the automaton's size limits.
    pub fn new(phrases: PhraseList) -> ModeratorResult<Self> {
        let automaton = AhoCorasick::builder()
            .match_kind(AcMatchKind::Standard)
            .build(phrases.iter())
            .map_err(|e| ModeratorError::Config {
                reason: format!("failed to build phrase automaton: {}", e),
            })?;

        Ok(Self {
            phrases,
            automaton: Arc::new(automaton),
        })
    }
}

impl PhraseMatcher for AutomatonMatcher {
    fn phrases(&self) -> &PhraseList {
        &self.phrases
    }

    fn find_matches(&self, normalized: &str) -> Vec<MatchSpan> {
        let mut spans: Vec<MatchSpan> = self
            .automaton
            .find_overlapping_iter(normalized)
            .filter_map(|m| {
                let index = m.pattern().as_usize();
                let phrase = self.phrases.get(index)?;
                Some(MatchSpan::new(normalized, m.start(), m.end(), phrase, index))
            })
            .collect();

        sort_spans(&mut spans);
        spans
    }

    fn name(&self) -> &str {
        "automaton"
    }

    fn is_match(&self, normalized: &str) -> bool {
        self.automaton.is_match(normalized)
    }

    fn rebuild(&self, phrases: PhraseList) -> ModeratorResult<Box<dyn PhraseMatcher>> {
        Ok(Box::new(Self::new(phrases)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScanMatcher;

    fn build(phrases: &[&str]) -> AutomatonMatcher {
        AutomatonMatcher::new(PhraseList::new(phrases)).expect("automaton builds")
    }

    #[test]
    fn test_empty_vocabulary() {
        let m = build(&[]);
        assert!(m.find_matches("ngu").is_empty());
        assert!(!m.is_match("ngu"));
    }

    #[test]
    fn test_overlapping_and_nested() {
        let spans = build(&["ngu xuẩn", "ngu", "xuan qua"]).find_matches("ngu xuan qua");
        let found: Vec<_> = spans.iter().map(|s| (s.start, s.end, s.phrase.as_str())).collect();
        assert_eq!(
            found,
            vec![(0, 3, "ngu"), (0, 8, "ngu xuan"), (4, 12, "xuan qua")]
        );
    }

    #[test]
    fn test_agrees_with_scan_matcher() {
        let phrases = PhraseList::new(["ngu", "ngu xuẩn", "aa", "óc chó", "a.b", "đm"]);
        let scan = ScanMatcher::new(phrases.clone());
        let automaton = AutomatonMatcher::new(phrases).expect("automaton builds");

        for text in [
            "",
            "hom nay nau gi",
            "may ngu xuan that",
            "aaaa",
            "oc cho oc chooo",
            "a.b axb dmm",
            "nguoi ngu ngu",
        ] {
            assert_eq!(scan.find_matches(text), automaton.find_matches(text), "text: {text}");
        }
    }
}

//! Text matching: normalization, the phrase vocabulary, and matchers.
//!
//! Matchers operate on text that has already been through
//! [`normalize`](normalize::normalize). They report every occurrence of every
//! phrase, including overlapping and nested ones, as [`MatchSpan`]s in the
//! normalized text's byte coordinates.

pub mod automaton;
pub mod normalize;
pub mod phrase;
pub mod scan;

pub use automaton::AutomatonMatcher;
pub use normalize::{normalize, normalize_with_offsets, NormalizedText};
pub use phrase::PhraseList;
pub use scan::ScanMatcher;

use crate::error::ModeratorResult;
use serde::Serialize;

/// How a phrase occurrence sits relative to the surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Bounded by non-alphanumeric characters or the text edges.
    WholeWord,
    /// Embedded inside a longer word.
    Substring,
}

/// One phrase occurrence in normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
    /// The normalized phrase that matched.
    pub phrase: String,
    /// Position of the phrase in its [`PhraseList`].
    pub phrase_index: usize,
    pub kind: MatchKind,
}

impl MatchSpan {
    pub(crate) fn new(text: &str, start: usize, end: usize, phrase: &str, phrase_index: usize) -> Self {
        Self {
            start,
            end,
            phrase: phrase.to_string(),
            phrase_index,
            kind: classify(text, start, end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_whole_word(&self) -> bool {
        self.kind == MatchKind::WholeWord
    }
}

/// Classifies the occurrence `text[start..end]`.
pub fn classify(text: &str, start: usize, end: usize) -> MatchKind {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let bounded = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());

    if bounded(before) && bounded(after) {
        MatchKind::WholeWord
    } else {
        MatchKind::Substring
    }
}

/// Orders spans by position, then by phrase list order.
pub(crate) fn sort_spans(spans: &mut [MatchSpan]) {
    spans.sort_by_key(|s| (s.start, s.end, s.phrase_index));
}

/// Strategy for locating phrases in normalized text.
///
/// Implementations must be literal (phrase content is data, never a pattern
/// language), report overlapping occurrences, and return spans sorted by
/// start, end and phrase index. No match is an empty vector.
pub trait PhraseMatcher: Send + Sync {
    /// The vocabulary this matcher was built from.
    fn phrases(&self) -> &PhraseList;

    /// Every occurrence of every phrase in `normalized`.
    fn find_matches(&self, normalized: &str) -> Vec<MatchSpan>;

    /// Returns a human-readable name for this matcher.
    fn name(&self) -> &str;

    /// A matcher of the same kind over a different vocabulary.
    fn rebuild(&self, phrases: PhraseList) -> ModeratorResult<Box<dyn PhraseMatcher>>;

    /// Whether any phrase occurs in `normalized`.
    fn is_match(&self, normalized: &str) -> bool {
        !self.find_matches(normalized).is_empty()
    }
}

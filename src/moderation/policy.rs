//! Moderation policy: reject or redact flagged text.

use crate::domain::{
    normalize_with_offsets, AutomatonMatcher, MatchKind, MatchSpan, PhraseList, PhraseMatcher,
    ScanMatcher,
};
use crate::error::{ModeratorError, ModeratorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Default mask character for redacted text.
pub const DEFAULT_MASK: char = '*';

/// What to do with text that contains a listed phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationMode {
    /// Fail with [`ModeratorError::ContentRejected`].
    Reject,
    /// Mask every matched range and let the text through.
    Redact,
}

impl fmt::Display for ModerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Redact => f.write_str("redact"),
        }
    }
}

/// User-submitted fields moderated by the application, with their labels.
///
/// Step numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentField {
    DisplayName,
    PostContent,
    Comment,
    Title,
    Description,
    StepTitle(usize),
    StepContent(usize),
}

impl ContentField {
    /// The field name used in rejection messages.
    pub fn label(&self) -> String {
        match self {
            Self::DisplayName => "Tên hiển thị".to_string(),
            Self::PostContent => "Nội dung bài viết".to_string(),
            Self::Comment => "Bình luận".to_string(),
            Self::Title => "Tiêu đề".to_string(),
            Self::Description => "Mô tả".to_string(),
            Self::StepTitle(n) => format!("Tiêu đề bước {}", n),
            Self::StepContent(n) => format!("Nội dung bước {}", n),
        }
    }

    /// The mode the application applies to this field.
    ///
    /// Names and recipe text are refused outright; free-form posts and
    /// comments are masked and published.
    pub fn default_mode(&self) -> ModerationMode {
        match self {
            Self::PostContent | Self::Comment => ModerationMode::Redact,
            _ => ModerationMode::Reject,
        }
    }
}

impl fmt::Display for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Outcome of evaluating one field.
///
/// `text` is the text the caller should continue with: the untouched input
/// when nothing matched, the masked copy in redact mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationVerdict {
    pub is_flagged: bool,
    pub spans: Vec<MatchSpan>,
    pub field_name: String,
    pub policy_applied: ModerationMode,
    pub text: String,
}

impl ModerationVerdict {
    pub fn whole_word_hits(&self) -> impl Iterator<Item = &MatchSpan> {
        self.spans.iter().filter(|s| s.kind == MatchKind::WholeWord)
    }

    pub fn substring_hits(&self) -> impl Iterator<Item = &MatchSpan> {
        self.spans.iter().filter(|s| s.kind == MatchKind::Substring)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Evaluates raw text against a phrase vocabulary.
///
/// Stateless apart from the immutable matcher, so one policy can be shared
/// across threads without locking.
pub struct ModerationPolicy {
    matcher: Box<dyn PhraseMatcher>,
    mask: char,
}

impl ModerationPolicy {
    /// Creates a policy using the Aho-Corasick matcher, falling back to the
    /// per-phrase scanner if the automaton cannot be built.
    pub fn new(phrases: PhraseList) -> Self {
        let matcher: Box<dyn PhraseMatcher> = match AutomatonMatcher::new(phrases.clone()) {
            Ok(automaton) => Box::new(automaton),
            Err(e) => {
                tracing::warn!(error = %e, "using scan matcher");
                Box::new(ScanMatcher::new(phrases))
            }
        };
        Self::with_matcher(matcher)
    }

    /// Creates a policy around a specific matcher.
    pub fn with_matcher(matcher: Box<dyn PhraseMatcher>) -> Self {
        Self {
            matcher,
            mask: DEFAULT_MASK,
        }
    }

    /// A policy with the same matcher kind and mask over `phrases`.
    pub fn with_phrases(&self, phrases: PhraseList) -> ModeratorResult<Self> {
        let matcher = self.matcher.rebuild(phrases)?;
        Ok(Self::with_matcher(matcher).with_mask(self.mask))
    }

    /// Sets the mask character used in redact mode.
    pub fn with_mask(mut self, mask: char) -> Self {
        self.mask = mask;
        self
    }

    pub fn matcher(&self) -> &dyn PhraseMatcher {
        self.matcher.as_ref()
    }

    pub fn phrases(&self) -> &PhraseList {
        self.matcher.phrases()
    }

    pub fn mask(&self) -> char {
        self.mask
    }

    /// Normalizes `raw` and returns every match in normalized coordinates.
    pub fn find_matches(&self, raw: &str) -> Vec<MatchSpan> {
        let normalized = normalize_with_offsets(raw);
        self.matcher.find_matches(normalized.as_str())
    }

    /// Whether `raw` contains any listed phrase.
    pub fn is_flagged(&self, raw: &str) -> bool {
        let normalized = normalize_with_offsets(raw);
        self.matcher.is_match(normalized.as_str())
    }

    /// Evaluates `raw` for the field named `field_name` under `mode`.
    ///
    /// Unflagged text passes through unchanged in either mode. In reject
    /// mode a match fails with [`ModeratorError::ContentRejected`]; in
    /// redact mode it never fails.
    pub fn evaluate(
        &self,
        raw: &str,
        field_name: &str,
        mode: ModerationMode,
    ) -> ModeratorResult<ModerationVerdict> {
        let normalized = normalize_with_offsets(raw);
        let spans = self.matcher.find_matches(normalized.as_str());

        if spans.is_empty() {
            return Ok(ModerationVerdict {
                is_flagged: false,
                spans,
                field_name: field_name.to_string(),
                policy_applied: mode,
                text: raw.to_string(),
            });
        }

        tracing::debug!(
            field = field_name,
            hits = spans.len(),
            matcher = self.matcher.name(),
            "phrases matched"
        );

        match mode {
            ModerationMode::Reject => {
                tracing::info!(field = field_name, "content rejected");
                Err(ModeratorError::rejected(field_name))
            }
            ModerationMode::Redact => {
                let ranges: Vec<Range<usize>> = spans
                    .iter()
                    .filter_map(|s| normalized.raw_range(s.start..s.end))
                    .collect();
                let text = mask_ranges(raw, ranges, self.mask);
                tracing::info!(field = field_name, "content redacted");

                Ok(ModerationVerdict {
                    is_flagged: true,
                    spans,
                    field_name: field_name.to_string(),
                    policy_applied: mode,
                    text,
                })
            }
        }
    }

    /// Evaluates `raw` for a known field using that field's default mode.
    pub fn evaluate_field(&self, raw: &str, field: ContentField) -> ModeratorResult<ModerationVerdict> {
        self.evaluate(raw, &field.label(), field.default_mode())
    }

    /// Returns `raw` with every listed phrase masked.
    pub fn redact(&self, raw: &str) -> String {
        match self.evaluate(raw, "", ModerationMode::Redact) {
            Ok(verdict) => verdict.text,
            // Redact mode has no failure path.
            Err(_) => raw.to_string(),
        }
    }
}

impl fmt::Debug for ModerationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModerationPolicy")
            .field("matcher", &self.matcher.name())
            .field("phrases", &self.matcher.phrases().len())
            .field("mask", &self.mask)
            .finish()
    }
}

/// Replaces every character inside `ranges` with `mask`, one for one.
fn mask_ranges(raw: &str, mut ranges: Vec<Range<usize>>, mask: char) -> String {
    ranges.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }

    let mut out = String::with_capacity(raw.len());
    let mut current = merged.iter().peekable();

    for (i, ch) in raw.char_indices() {
        while current.peek().is_some_and(|r| r.end <= i) {
            current.next();
        }
        match current.peek() {
            Some(r) if r.start <= i => out.push(mask),
            _ => out.push(ch),
        }
    }

    out
}

//! Text normalization for phrase matching.
//!
//! Matching never runs on raw user input. Both the input and every phrase in
//! the list go through [`normalize`], which:
//! - lower-cases with locale-agnostic Unicode case folding,
//! - decomposes accented characters and drops combining marks
//!   (`đ` has no canonical decomposition and is folded to `d` explicitly),
//! - collapses whitespace runs to a single space and trims both ends.
//!
//! Because stripping marks changes string length, [`normalize_with_offsets`]
//! also records where every normalized character came from in the raw text,
//! so that matches can be redacted in the caller's original string.

use std::ops::Range;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// Normalizes `input` for matching. Total and idempotent.
pub fn normalize(input: &str) -> String {
    normalize_with_offsets(input).into_string()
}

/// Normalizes `input`, keeping a map back to raw byte offsets.
pub fn normalize_with_offsets(input: &str) -> NormalizedText<'_> {
    let mut text = String::with_capacity(input.len());
    let mut origins: Vec<Origin> = Vec::new();
    let mut pending_space: Option<Range<usize>> = None;
    let mut folded = Vec::with_capacity(4);

    for (raw_start, ch) in input.char_indices() {
        let raw_end = raw_start + ch.len_utf8();

        if ch.is_whitespace() {
            // Leading whitespace is dropped; trailing is dropped at the end.
            if !text.is_empty() {
                pending_space = Some(match pending_space.take() {
                    Some(run) => run.start..raw_end,
                    None => raw_start..raw_end,
                });
            }
            continue;
        }

        folded.clear();
        fold_char(ch, &mut folded);

        if folded.is_empty() {
            // A bare combining mark belongs to the letter before it.
            if pending_space.is_none() {
                if let Some(last) = origins.last_mut() {
                    last.raw_end = raw_end;
                }
            }
            continue;
        }

        if let Some(run) = pending_space.take() {
            origins.push(Origin {
                norm_start: text.len(),
                raw_start: run.start,
                raw_end: run.end,
            });
            text.push(' ');
        }

        for &c in &folded {
            origins.push(Origin {
                norm_start: text.len(),
                raw_start,
                raw_end,
            });
            text.push(c);
        }
    }

    NormalizedText {
        raw: input,
        text,
        origins,
    }
}

/// Appends the case-folded, mark-stripped form of `ch` to `out`.
fn fold_char(ch: char, out: &mut Vec<char>) {
    for lower in ch.to_lowercase() {
        if lower == 'đ' {
            out.push('d');
            continue;
        }
        decompose_canonical(lower, |c| {
            if !is_combining_mark(c) {
                out.push(c);
            }
        });
    }
}

#[derive(Debug, Clone, Copy)]
struct Origin {
    norm_start: usize,
    raw_start: usize,
    raw_end: usize,
}

/// Normalized form of a raw string plus its offset map.
///
/// Offsets on both sides are byte offsets into the respective strings.
#[derive(Debug, Clone)]
pub struct NormalizedText<'a> {
    raw: &'a str,
    text: String,
    origins: Vec<Origin>,
}

impl<'a> NormalizedText<'a> {
    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The raw input this was produced from.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Maps a normalized byte range back to the raw byte range it covers.
    ///
    /// Returns `None` for empty or out-of-bounds ranges and for ranges that
    /// do not start on a normalized character boundary.
    pub fn raw_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        if range.start >= range.end || range.end > self.text.len() {
            return None;
        }

        let first = self
            .origins
            .binary_search_by_key(&range.start, |o| o.norm_start)
            .ok()?;
        let last = self.origins.partition_point(|o| o.norm_start < range.end) - 1;

        Some(self.origins[first].raw_start..self.origins[last].raw_end)
    }
}

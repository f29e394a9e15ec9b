//! The curated phrase vocabulary.

use super::normalize::normalize;
use std::collections::HashSet;

/// Ordered, deduplicated set of normalized phrases.
///
/// Entries are normalized once at construction with the same function used
/// for input text. Entries that normalize to nothing are skipped and entries
/// that normalize to an already present phrase are merged into the first one.
/// A list is immutable; updating the vocabulary means building a new list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseList {
    phrases: Vec<String>,
}

impl PhraseList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut phrases = Vec::new();

        for entry in entries {
            let phrase = normalize(entry.as_ref());
            if phrase.is_empty() {
                tracing::debug!(entry = entry.as_ref(), "skipping empty phrase");
                continue;
            }
            if seen.insert(phrase.clone()) {
                phrases.push(phrase);
            }
        }

        Self { phrases }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.phrases.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    /// Whether `phrase` (in any case or accenting) is in the list.
    pub fn contains(&self, phrase: &str) -> bool {
        let phrase = normalize(phrase);
        self.phrases.iter().any(|p| *p == phrase)
    }
}

impl<S: AsRef<str>> FromIterator<S> for PhraseList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

//! Moderation configuration loaded from TOML.
//!
//! ```toml
//! # Replace the built-in vocabulary (omit to keep it)
//! phrases = ["ngu", "óc chó"]
//! # Appended to `phrases`
//! extra_phrases = ["đồ dở hơi"]
//! mask = "#"
//! matcher = "scan"   # or "automaton" (default)
//! ```

use crate::domain::{AutomatonMatcher, PhraseList, PhraseMatcher, ScanMatcher};
use crate::error::{ModeratorError, ModeratorResult};
use crate::moderation::{ModerationPolicy, DEFAULT_MASK};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;

/// Built-in vocabulary used when no phrase list is configured.
pub const DEFAULT_PHRASES: &[&str] = &[
    "ngu",
    "ngu xuẩn",
    "ngu si",
    "đồ ngốc",
    "đồ điên",
    "khốn nạn",
    "chó chết",
    "óc chó",
    "mất dạy",
    "vô học",
    "vô văn hóa",
    "súc vật",
    "đồ rác rưởi",
    "thằng hâm",
    "con điên",
    "vcl",
    "vkl",
    "đmm",
    "clgt",
];

/// Shared policy over [`DEFAULT_PHRASES`], built on first use.
pub fn default_policy() -> &'static ModerationPolicy {
    static POLICY: Lazy<ModerationPolicy> =
        Lazy::new(|| ModerationPolicy::new(PhraseList::new(DEFAULT_PHRASES)));
    &POLICY
}

/// Which [`PhraseMatcher`] backs the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// One escaped literal regex per phrase.
    Scan,
    /// A single Aho-Corasick automaton over all phrases.
    #[default]
    Automaton,
}

/// Moderation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModerationConfig {
    #[serde(default = "default_phrases")]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub extra_phrases: Vec<String>,
    #[serde(default = "default_mask")]
    pub mask: char,
    #[serde(default)]
    pub matcher: MatcherKind,
}

fn default_phrases() -> Vec<String> {
    DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect()
}

fn default_mask() -> char {
    DEFAULT_MASK
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            phrases: default_phrases(),
            extra_phrases: Vec::new(),
            mask: default_mask(),
            matcher: MatcherKind::default(),
        }
    }
}

impl ModerationConfig {
    pub fn from_toml_str(source: &str) -> ModeratorResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ModeratorResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ModeratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> ModeratorResult<()> {
        if self.mask.is_whitespace() || self.mask.is_control() {
            return Err(ModeratorError::Config {
                reason: format!("mask must be a visible character, got {:?}", self.mask),
            });
        }
        Ok(())
    }

    /// The effective vocabulary: `phrases` followed by `extra_phrases`.
    pub fn phrase_list(&self) -> PhraseList {
        self.phrases.iter().chain(&self.extra_phrases).collect()
    }

    /// Builds the policy described by this configuration.
    pub fn build_policy(&self) -> ModeratorResult<ModerationPolicy> {
        let phrases = self.phrase_list();
        let matcher: Box<dyn PhraseMatcher> = match self.matcher {
            MatcherKind::Scan => Box::new(ScanMatcher::new(phrases)),
            MatcherKind::Automaton => Box::new(AutomatonMatcher::new(phrases)?),
        };
        tracing::debug!(
            matcher = matcher.name(),
            phrases = matcher.phrases().len(),
            "moderation policy built"
        );
        Ok(ModerationPolicy::with_matcher(matcher).with_mask(self.mask))
    }
}

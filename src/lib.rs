//! Content moderation filter and rating accumulator.
//!
//! This library gates user-submitted text (display names, posts, comments,
//! recipe titles, descriptions and steps) against a curated phrase list, and
//! keeps the `{count, sum}` rating aggregate of posts and recipes exactly in
//! sync with their per-rater entries.
//!
//! # Features
//!
//! - **Normalization**: case folding, diacritic stripping and whitespace
//!   collapsing, with an offset map back to the raw text
//! - **Phrase Matching**: overlapping whole-word and substring hits, with a
//!   per-phrase scanner or an Aho-Corasick automaton
//! - **Policies**: reject with a field-aware message, or redact in place
//!   preserving length, case and accents of the untouched text
//! - **Structured Validation**: fail-fast or redact-all over recipe documents
//! - **Ratings**: one rating per rater, update-in-place, two-decimal averages
//!
//! # Architecture
//!
//! - [`domain`]: Normalization, phrase list and matchers
//! - [`moderation`]: Policies, structured validation and the service layer
//! - [`rating`]: Rating accumulator and an in-memory per-entity store
//! - [`config`]: TOML configuration and the built-in vocabulary
//! - [`error`]: Error types
//!
//! Nothing here performs I/O apart from [`config::ModerationConfig::from_file`];
//! persisting entities and phrase lists is left to the host application.
//!
//! # Quick Start
//!
//! ```
//! use moderator::{ModerationMode, ModerationPolicy, PhraseList};
//!
//! let policy = ModerationPolicy::new(PhraseList::new(["ngu"]));
//!
//! let verdict = policy
//!     .evaluate("Xin chào ngu ngốc bạn", "Nội dung", ModerationMode::Redact)
//!     .unwrap();
//! assert_eq!(verdict.text, "Xin chào *** ngốc bạn");
//!
//! let err = policy
//!     .evaluate("Đồ NGU", "Tên hiển thị", ModerationMode::Reject)
//!     .unwrap_err();
//! assert!(err.to_string().contains("Tên hiển thị"));
//! ```
//!
//! ## Ratings
//!
//! ```
//! use moderator::RatedEntity;
//!
//! let mut recipe = RatedEntity::new();
//! recipe.submit("u1", 5).unwrap();
//! let summary = recipe.submit("u2", 3).unwrap();
//! assert_eq!(summary.count, 2);
//! assert_eq!(summary.average, 4.0);
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod moderation;
pub mod rating;

pub use config::{default_policy, MatcherKind, ModerationConfig, DEFAULT_PHRASES};
pub use domain::{
    normalize, AutomatonMatcher, MatchKind, MatchSpan, PhraseList, PhraseMatcher, ScanMatcher,
};
pub use error::{ModeratorError, ModeratorResult};
pub use moderation::{
    ContentField, ModerationMode, ModerationPolicy, ModerationReport, ModerationService,
    ModerationVerdict, RecipeDocument, RecipeStep, StructuredContentValidator,
};
pub use rating::{
    average_rating, check_consistency, RatedEntity, RatingAccumulator, RatingAggregate,
    RatingBook, RatingEntry, RatingSummary, RatingValue,
};

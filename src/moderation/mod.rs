//! Moderation policies and the service coordinating them.
//!
//! [`ModerationPolicy`] makes the per-field decision, the
//! [`StructuredContentValidator`] applies it across a recipe document, and
//! [`ModerationService`] owns the current vocabulary for a host application.

pub mod policy;
pub mod structured;

pub use policy::{ContentField, ModerationMode, ModerationPolicy, ModerationVerdict, DEFAULT_MASK};
pub use structured::{ModerationReport, RecipeDocument, RecipeStep, StructuredContentValidator};

use crate::domain::PhraseList;
use crate::error::ModeratorResult;
use parking_lot::RwLock;
use std::sync::Arc;

/// Moderation service holding the active policy.
///
/// Each call works on a snapshot of the policy taken when it starts. Replacing
/// the vocabulary swaps in a whole new policy; calls already in flight finish
/// against the old one.
pub struct ModerationService {
    policy: RwLock<Arc<ModerationPolicy>>,
}

impl ModerationService {
    /// Creates a new moderation service with the specified policy.
    pub fn new(policy: ModerationPolicy) -> Self {
        Self {
            policy: RwLock::new(Arc::new(policy)),
        }
    }

    /// Creates a service for `phrases` with the default matcher and mask.
    pub fn with_phrases(phrases: PhraseList) -> Self {
        Self::new(ModerationPolicy::new(phrases))
    }

    /// The policy currently in effect.
    pub fn policy(&self) -> Arc<ModerationPolicy> {
        Arc::clone(&self.policy.read())
    }

    /// Atomically replaces the vocabulary, keeping the current matcher kind
    /// and mask. On error the current policy stays in effect.
    pub fn replace_phrases(&self, phrases: PhraseList) -> ModeratorResult<()> {
        let count = phrases.len();
        let next = Arc::new(self.policy().with_phrases(phrases)?);
        tracing::info!(phrases = count, matcher = next.matcher().name(), "phrase list replaced");
        *self.policy.write() = next;
        Ok(())
    }

    /// Evaluates one field of user input.
    pub fn evaluate(
        &self,
        text: &str,
        field_name: &str,
        mode: ModerationMode,
    ) -> ModeratorResult<ModerationVerdict> {
        self.policy().evaluate(text, field_name, mode)
    }

    /// Evaluates a known field with its default mode.
    pub fn evaluate_field(&self, text: &str, field: ContentField) -> ModeratorResult<ModerationVerdict> {
        self.policy().evaluate_field(text, field)
    }

    /// Validates a recipe document.
    pub fn validate(
        &self,
        doc: &RecipeDocument,
        mode: ModerationMode,
    ) -> ModeratorResult<RecipeDocument> {
        let policy = self.policy();
        StructuredContentValidator::new(&policy).validate(doc, mode)
    }
}

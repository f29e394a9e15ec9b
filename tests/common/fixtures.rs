//! Test fixtures and document builders.
//!
//! Provides builders for recipe documents and ready-made policies,
//! following the Builder pattern for clean test setup.

use moderator::{ModerationPolicy, PhraseList, RecipeDocument, RecipeStep};

/// Phrases used by most tests.
pub const TEST_PHRASES: &[&str] = &["ngu", "ngu xuẩn", "khốn nạn", "óc chó", "mất dạy"];

/// Creates a policy over [`TEST_PHRASES`].
pub fn test_policy() -> ModerationPolicy {
    ModerationPolicy::new(PhraseList::new(TEST_PHRASES))
}

/// Creates a policy over the given phrases.
pub fn policy_with(phrases: &[&str]) -> ModerationPolicy {
    ModerationPolicy::new(PhraseList::new(phrases))
}

/// Builder for recipe documents.
///
/// # Example
///
/// ```ignore
/// let doc = RecipeBuilder::new()
///     .with_title("Phở bò")
///     .with_step(Some("Sơ chế"), "Rửa xương")
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecipeBuilder {
    doc: RecipeDocument,
}

impl RecipeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.doc.title = Some(title.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.doc.description = Some(description.to_string());
        self
    }

    pub fn with_step(mut self, title: Option<&str>, content: &str) -> Self {
        self.doc.steps.get_or_insert_with(Vec::new).push(RecipeStep {
            title: title.map(str::to_string),
            content: content.to_string(),
        });
        self
    }

    pub fn build(self) -> RecipeDocument {
        self.doc
    }
}

//! Moderation of composite recipe documents.
//!
//! Fields are visited in document order: title, description, then each step's
//! title and content. In reject mode the first flagged field aborts the whole
//! validation; in redact mode every field is masked and a new document is
//! returned. The caller's document is never mutated.

use super::policy::{ContentField, ModerationMode, ModerationPolicy};
use crate::error::ModeratorResult;
use serde::{Deserialize, Serialize};

/// One step of a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

/// The user-editable text of a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<RecipeStep>>,
}

/// What happened to a document in redact mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationReport {
    pub document: RecipeDocument,
    /// Labels of the fields that were masked, in document order.
    pub redacted_fields: Vec<String>,
}

impl ModerationReport {
    pub fn is_clean(&self) -> bool {
        self.redacted_fields.is_empty()
    }
}

/// Applies a [`ModerationPolicy`] to every field of a [`RecipeDocument`].
#[derive(Debug, Clone, Copy)]
pub struct StructuredContentValidator<'a> {
    policy: &'a ModerationPolicy,
}

impl<'a> StructuredContentValidator<'a> {
    pub fn new(policy: &'a ModerationPolicy) -> Self {
        Self { policy }
    }

    /// Validates `doc` under `mode`, returning the document to store.
    pub fn validate(
        &self,
        doc: &RecipeDocument,
        mode: ModerationMode,
    ) -> ModeratorResult<RecipeDocument> {
        self.validate_with_report(doc, mode).map(|report| report.document)
    }

    /// Like [`validate`](Self::validate), also listing the masked fields.
    pub fn validate_with_report(
        &self,
        doc: &RecipeDocument,
        mode: ModerationMode,
    ) -> ModeratorResult<ModerationReport> {
        let mut redacted_fields = Vec::new();
        let mut check = |text: &str, field: ContentField| -> ModeratorResult<String> {
            // Absent or empty fields pass automatically.
            if text.is_empty() {
                return Ok(String::new());
            }
            let verdict = self.policy.evaluate(text, &field.label(), mode)?;
            if verdict.is_flagged {
                redacted_fields.push(verdict.field_name.clone());
            }
            Ok(verdict.text)
        };

        let title = doc
            .title
            .as_deref()
            .map(|t| check(t, ContentField::Title))
            .transpose()?;
        let description = doc
            .description
            .as_deref()
            .map(|d| check(d, ContentField::Description))
            .transpose()?;

        let steps = match &doc.steps {
            Some(steps) => {
                let mut checked = Vec::with_capacity(steps.len());
                for (i, step) in steps.iter().enumerate() {
                    let number = i + 1;
                    let title = step
                        .title
                        .as_deref()
                        .map(|t| check(t, ContentField::StepTitle(number)))
                        .transpose()?;
                    let content = check(&step.content, ContentField::StepContent(number))?;
                    checked.push(RecipeStep { title, content });
                }
                Some(checked)
            }
            None => None,
        };

        if !redacted_fields.is_empty() {
            tracing::debug!(fields = ?redacted_fields, "recipe fields redacted");
        }

        Ok(ModerationReport {
            document: RecipeDocument {
                title,
                description,
                steps,
            },
            redacted_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PhraseList;

    fn policy() -> ModerationPolicy {
        ModerationPolicy::new(PhraseList::new(["ngu", "khốn nạn"]))
    }

    fn step(title: Option<&str>, content: &str) -> RecipeStep {
        RecipeStep {
            title: title.map(str::to_string),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_clean_document_round_trips() {
        let policy = policy();
        let doc = RecipeDocument {
            title: Some("Phở bò".to_string()),
            description: None,
            steps: Some(vec![step(None, "Nấu nước dùng")]),
        };
        let out = StructuredContentValidator::new(&policy)
            .validate(&doc, ModerationMode::Reject)
            .unwrap();
        assert_eq!(out, doc);
    }

    #[test]
    fn test_reject_reports_first_flagged_step() {
        let policy = policy();
        let doc = RecipeDocument {
            title: Some("Bún chả".to_string()),
            description: Some("Ngon".to_string()),
            steps: Some(vec![
                step(Some("Sơ chế"), "Rửa thịt"),
                step(Some("Nướng"), "Đồ khốn nạn"),
                step(Some("Ngu"), "ngu"),
            ]),
        };
        let err = StructuredContentValidator::new(&policy)
            .validate(&doc, ModerationMode::Reject)
            .unwrap_err();
        assert_eq!(err.field(), Some("Nội dung bước 2"));
    }

    #[test]
    fn test_redact_leaves_input_untouched() {
        let policy = policy();
        let doc = RecipeDocument {
            title: Some("Món NGU".to_string()),
            description: Some(String::new()),
            steps: Some(vec![step(Some("ngu"), "")]),
        };
        let report = StructuredContentValidator::new(&policy)
            .validate_with_report(&doc, ModerationMode::Redact)
            .unwrap();

        assert_eq!(report.document.title.as_deref(), Some("Món ***"));
        assert_eq!(report.document.description.as_deref(), Some(""));
        let steps = report.document.steps.as_ref().unwrap();
        assert_eq!(steps[0].title.as_deref(), Some("***"));
        assert_eq!(report.redacted_fields, vec!["Tiêu đề", "Tiêu đề bước 1"]);
        assert_eq!(doc.title.as_deref(), Some("Món NGU"));
    }
}

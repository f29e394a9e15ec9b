//! Tests for single-field moderation decisions.
//!
//! Covers pass-through of clean text, rejection messages, and redaction
//! in the raw text's own coordinates.

use moderator::{
    default_policy, ContentField, MatchKind, ModerationMode, ModerationService, PhraseList,
};

mod common;
use common::*;

mod pass_through {
    use super::*;

    #[test]
    fn test_everyday_text_is_not_flagged() {
        let verdict = default_policy()
            .evaluate("hôm nay nấu gì", "content", ModerationMode::Redact)
            .unwrap();

        assert!(!verdict.is_flagged);
        assert!(verdict.spans.is_empty());
        assert_eq!(verdict.text, "hôm nay nấu gì");
        assert_eq!(verdict.policy_applied, ModerationMode::Redact);
    }

    #[test]
    fn test_unflagged_text_is_returned_verbatim() {
        let policy = test_policy();
        let raw = "  Phở   BÒ\tngon  ";
        for mode in [ModerationMode::Reject, ModerationMode::Redact] {
            let verdict = policy.evaluate(raw, "content", mode).unwrap();
            assert_eq!(verdict.text, raw);
        }
    }

    #[test]
    fn test_empty_text() {
        let verdict = test_policy()
            .evaluate("", "content", ModerationMode::Reject)
            .unwrap();
        assert!(!verdict.is_flagged);
        assert_eq!(verdict.text, "");
    }
}

mod reject {
    use super::*;

    #[test]
    fn test_message_contains_field_name() {
        let result = test_policy().evaluate("Tôi là Mất Dạy", "Tên hiển thị", ModerationMode::Reject);
        assert_rejected(result, "Tên hiển thị");
    }

    #[test]
    fn test_exact_message() {
        let err = test_policy()
            .evaluate("ngu", "Tiêu đề bước 2", ModerationMode::Reject)
            .unwrap_err();
        assert_eq!(err.to_string(), "Tiêu đề bước 2 chứa từ ngữ không phù hợp");
    }

    #[test]
    fn test_case_and_accent_variants_are_rejected() {
        let policy = test_policy();
        for text in ["ÓC CHÓ", "oc cho", "Óc   chó", "óc\nchó", "ÒC CHỎ", "KHỐN NẠN"] {
            assert!(
                policy.evaluate(text, "name", ModerationMode::Reject).is_err(),
                "'{}' should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_field_defaults() {
        let service = ModerationService::with_phrases(PhraseList::new(TEST_PHRASES));
        assert_rejected(
            service.evaluate_field("ngu", ContentField::DisplayName),
            "Tên hiển thị",
        );
        let verdict = service
            .evaluate_field("bài viết ngu", ContentField::PostContent)
            .unwrap();
        assert_eq!(verdict.text, "bài viết ***");
    }
}

mod redact {
    use super::*;

    #[test]
    fn test_length_preserved_and_only_match_masked() {
        let policy = policy_with(&["ngu"]);
        let raw = "xin chào ngu ngốc bạn";
        let out = policy.redact(raw);

        assert_eq!(out, "xin chào *** ngốc bạn");
        assert_eq!(out.chars().count(), raw.chars().count());
        assert_masked_only(raw, &out, '*');
    }

    #[test]
    fn test_original_case_and_accents_survive() {
        let out = test_policy().redact("Thằng NGU XUẨN kia, đừng Mất Dạy!");
        assert_eq!(out, "Thằng ******** kia, đừng *******!");
    }

    #[test]
    fn test_whitespace_inside_match_is_masked() {
        let raw = "đồ ngu   xuẩn";
        let out = test_policy().redact(raw);
        assert_eq!(out, "đồ **********");
        assert_masked_only(raw, &out, '*');
    }

    #[test]
    fn test_decomposed_accents_are_masked_whole() {
        let raw = "o\u{0301}c cho\u{0301} day";
        let out = test_policy().redact(raw);
        assert_eq!(out.chars().count(), raw.chars().count());
        assert!(out.ends_with(" day"));
        assert!(out.chars().take(8).all(|c| c == '*'));
    }

    #[test]
    fn test_substring_hits_are_redacted_too() {
        let policy = policy_with(&["ngu"]);
        let verdict = policy
            .evaluate("ngungu ngu", "content", ModerationMode::Redact)
            .unwrap();

        assert_eq!(verdict.text, "****** ***");
        assert_eq!(verdict.substring_hits().count(), 2);
        assert_eq!(verdict.whole_word_hits().count(), 1);
        assert!(verdict
            .spans
            .iter()
            .any(|s| s.kind == MatchKind::WholeWord && s.start == 7));
    }

    #[test]
    fn test_custom_mask() {
        let policy = policy_with(&["khốn nạn"]).with_mask('#');
        assert_eq!(policy.redact("Đồ Khốn Nạn"), "Đồ ########");
    }

    #[test]
    fn test_redact_never_fails() {
        let policy = test_policy();
        for text in ["", "ngu", "😀 ngu 😀", "\u{0301}\u{0301}", "NGU\u{0301}"] {
            let verdict = policy
                .evaluate(text, "content", ModerationMode::Redact)
                .expect("redact mode never fails");
            assert_masked_only(text, &verdict.text, '*');
        }
    }
}

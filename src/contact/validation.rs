//! Field validation rules
//!
//! Two named rule sets exist. `Current` checks presence, email shape and
//! length bounds. `LegacyJapanese` additionally requires Japanese text in the
//! name and in long messages; it is kept selectable rather than merged.

use super::challenge::ChallengeState;
use super::fields::{ErrorKey, FieldName, FormFields, ValidationErrors};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Tokens that mark a message as spam (matched case-insensitively as substrings)
pub const SPAM_TOKENS: &[&str] = &[
    "casino",
    "viagra",
    "lottery",
    "winner",
    "free money",
    "bitcoin",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Which rule set validates the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    #[default]
    Current,
    LegacyJapanese,
}

impl ValidationPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::LegacyJapanese => "legacy-japanese",
        }
    }
}

/// Concrete limits and switches for one validation policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub name_max_chars: Option<usize>,
    pub require_japanese_name: bool,
    /// Messages longer than this with no Japanese characters are rejected
    pub japanese_message_threshold: Option<usize>,
    pub subject_max_chars: usize,
    pub message_max_chars: usize,
    pub spam_tokens: &'static [&'static str],
}

impl RuleSet {
    pub fn current() -> Self {
        Self {
            name_max_chars: Some(100),
            require_japanese_name: false,
            japanese_message_threshold: None,
            subject_max_chars: 100,
            message_max_chars: 3000,
            spam_tokens: SPAM_TOKENS,
        }
    }

    pub fn legacy_japanese() -> Self {
        Self {
            name_max_chars: None,
            require_japanese_name: true,
            japanese_message_threshold: Some(50),
            subject_max_chars: 100,
            message_max_chars: 3000,
            spam_tokens: SPAM_TOKENS,
        }
    }

    /// Validate every field and collect all failures.
    ///
    /// `challenge` is `None` when no bot-verification is required.
    pub fn validate(
        &self,
        fields: &FormFields,
        challenge: Option<&ChallengeState>,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        let name = &fields.name;
        if name.trim().is_empty() {
            errors.insert(FieldName::Name, "お名前を入力してください");
        } else if self.require_japanese_name && !contains_japanese(name) {
            errors.insert(FieldName::Name, "日本語の文字を含めてください");
        } else if self.name_max_chars.is_some_and(|max| char_len(name) > max) {
            errors.insert(FieldName::Name, "お名前は100文字以内で入力してください");
        }

        let email = &fields.email;
        if email.trim().is_empty() {
            errors.insert(FieldName::Email, "メールアドレスを入力してください");
        } else if !is_valid_email(email) {
            errors.insert(FieldName::Email, "有効なメールアドレスを入力してください");
        }

        let subject = &fields.subject;
        if subject.trim().is_empty() {
            errors.insert(FieldName::Subject, "件名を入力してください");
        } else if char_len(subject) > self.subject_max_chars {
            errors.insert(FieldName::Subject, "件名は100文字以内で入力してください");
        }

        let message = &fields.message;
        if message.trim().is_empty() {
            errors.insert(FieldName::Message, "お問い合わせ内容を入力してください");
        } else if char_len(message) > self.message_max_chars {
            errors.insert(
                FieldName::Message,
                "お問い合わせ内容は3000文字以内で入力してください",
            );
        }

        // Later message rules overwrite earlier ones
        if self.contains_spam(fields) {
            errors.insert(FieldName::Message, "スパムと判定される内容が含まれています");
        }
        if let Some(threshold) = self.japanese_message_threshold {
            if !contains_japanese(message) && char_len(message) > threshold {
                errors.insert(FieldName::Message, "日本語の内容を含めてください");
            }
        }

        if let Some(state) = challenge {
            if !state.is_verified() {
                errors.insert(
                    ErrorKey::Challenge,
                    "「私はロボットではありません」にチェックしてください",
                );
            }
        }

        errors
    }

    fn contains_spam(&self, fields: &FormFields) -> bool {
        let haystack = format!("{} {}", fields.message, fields.subject).to_lowercase();
        self.spam_tokens.iter().any(|token| haystack.contains(token))
    }
}

impl From<ValidationPolicy> for RuleSet {
    fn from(policy: ValidationPolicy) -> Self {
        match policy {
            ValidationPolicy::Current => RuleSet::current(),
            ValidationPolicy::LegacyJapanese => RuleSet::legacy_japanese(),
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::current()
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Hiragana, katakana or CJK unified ideographs
pub fn contains_japanese(value: &str) -> bool {
    value.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
    })
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_fields() -> FormFields {
        FormFields {
            name: "山田太郎".into(),
            email: "a@example.com".into(),
            subject: "相談".into(),
            message: "よろしくお願いします".into(),
        }
    }

    fn verified() -> ChallengeState {
        let mut state = ChallengeState::default();
        state.apply(Some("token".into()));
        state
    }

    #[test]
    fn test_valid_fields_produce_no_errors() {
        let errors = RuleSet::current().validate(&valid_fields(), Some(&verified()));
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn test_blank_fields_each_produce_an_error() {
        for field in FieldName::ALL {
            let mut fields = valid_fields();
            fields.set(field, "   ");
            let errors = RuleSet::current().validate(&fields, None);
            assert!(errors.contains(field), "{field:?} should be required");
        }
    }

    #[test]
    fn test_all_failures_are_collected() {
        let errors = RuleSet::current().validate(&FormFields::default(), Some(&ChallengeState::default()));
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(ErrorKey::Challenge));
    }

    #[test]
    fn test_rejects_malformed_email() {
        for email in ["not-an-email", "a@b", "a@b.c", "a b@example.com", " a@example.com"] {
            let mut fields = valid_fields();
            fields.email = email.into();
            let errors = RuleSet::current().validate(&fields, None);
            assert_eq!(
                errors.get(FieldName::Email),
                Some("有効なメールアドレスを入力してください"),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_common_email_shapes() {
        for email in ["a@example.com", "first.last+tag@mail.example.co.jp", "x_y%z@d-1.io"] {
            assert!(is_valid_email(email), "{email} should be accepted");
        }
    }

    #[test]
    fn test_subject_length_bound_counts_characters() {
        let mut fields = valid_fields();
        fields.subject = "相".repeat(100);
        assert!(RuleSet::current().validate(&fields, None).is_empty());
        fields.subject = "相".repeat(101);
        assert!(RuleSet::current().validate(&fields, None).contains(FieldName::Subject));
    }

    #[test]
    fn test_message_length_bound() {
        let mut fields = valid_fields();
        fields.message = "あ".repeat(3001);
        let errors = RuleSet::current().validate(&fields, None);
        assert_eq!(
            errors.get(FieldName::Message),
            Some("お問い合わせ内容は3000文字以内で入力してください")
        );
    }

    #[test]
    fn test_name_length_bound_only_in_current_policy() {
        let mut fields = valid_fields();
        fields.name = "山".repeat(101);
        assert!(RuleSet::current().validate(&fields, None).contains(FieldName::Name));
        assert!(!RuleSet::legacy_japanese().validate(&fields, None).contains(FieldName::Name));
    }

    #[test]
    fn test_spam_token_in_message_any_case() {
        let mut fields = valid_fields();
        fields.message = "Earn BitCoin today".into();
        let errors = RuleSet::current().validate(&fields, Some(&verified()));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FieldName::Message),
            Some("スパムと判定される内容が含まれています")
        );
    }

    #[test]
    fn test_spam_token_in_subject_flags_message() {
        let mut fields = valid_fields();
        fields.subject = "You are a WINNER".into();
        let errors = RuleSet::current().validate(&fields, None);
        assert!(errors.contains(FieldName::Message));
        assert!(!errors.contains(FieldName::Subject));
    }

    #[test]
    fn test_spam_token_across_message_and_subject_boundary() {
        let mut fields = valid_fields();
        fields.message = "free".into();
        fields.subject = "money".into();
        assert!(RuleSet::current().validate(&fields, None).contains(FieldName::Message));
    }

    #[test]
    fn test_legacy_requires_japanese_name() {
        let mut fields = valid_fields();
        fields.name = "Taro Yamada".into();
        assert!(RuleSet::current().validate(&fields, None).is_empty());
        assert_eq!(
            RuleSet::legacy_japanese().validate(&fields, None).get(FieldName::Name),
            Some("日本語の文字を含めてください")
        );
    }

    #[test]
    fn test_legacy_rejects_long_non_japanese_message() {
        let mut fields = valid_fields();
        fields.message = "a".repeat(51);
        assert!(RuleSet::current().validate(&fields, None).is_empty());
        assert_eq!(
            RuleSet::legacy_japanese().validate(&fields, None).get(FieldName::Message),
            Some("日本語の内容を含めてください")
        );

        fields.message = "a".repeat(50);
        assert!(RuleSet::legacy_japanese().validate(&fields, None).is_empty());
    }

    #[test]
    fn test_unverified_challenge_is_an_error_only_when_required() {
        let unverified = ChallengeState::default();
        assert!(RuleSet::current()
            .validate(&valid_fields(), Some(&unverified))
            .contains(ErrorKey::Challenge));
        assert!(RuleSet::current().validate(&valid_fields(), None).is_empty());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut fields = valid_fields();
        fields.email = "broken".into();
        fields.message = "casino".into();
        let challenge = ChallengeState::default();
        let rules = RuleSet::legacy_japanese();
        assert_eq!(
            rules.validate(&fields, Some(&challenge)),
            rules.validate(&fields, Some(&challenge))
        );
    }

    #[test]
    fn test_policy_deserializes_from_kebab_case() {
        let policy: ValidationPolicy = serde_json::from_str("\"legacy-japanese\"").unwrap();
        assert_eq!(policy, ValidationPolicy::LegacyJapanese);
        assert_eq!(RuleSet::from(policy), RuleSet::legacy_japanese());
    }

    #[test]
    fn test_contains_japanese() {
        assert!(contains_japanese("ひらがな"));
        assert!(contains_japanese("カタカナ"));
        assert!(contains_japanese("漢字"));
        assert!(!contains_japanese("ascii only"));
    }
}

//! Contact form field values

use std::collections::BTreeMap;
use std::fmt;

/// Editable text fields of the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Name,
    Email,
    Subject,
    Message,
}

impl FieldName {
    /// All fields in display order
    pub const ALL: [FieldName; 4] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::Subject,
        FieldName::Message,
    ];

    /// Stable identifier used in logs
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "お名前",
            Self::Email => "メールアドレス",
            Self::Subject => "件名",
            Self::Message => "お問い合わせ内容",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Name => "山田 太郎",
            Self::Email => "example@email.com",
            Self::Subject => "お問い合わせの件名",
            Self::Message => "お問い合わせ内容を入力してください",
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::Message)
    }
}

/// Key of a validation error entry. The challenge has no text value but can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    Field(FieldName),
    Challenge,
}

impl ErrorKey {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Field(field) => field.key(),
            Self::Challenge => "challenge",
        }
    }
}

impl From<FieldName> for ErrorKey {
    fn from(field: FieldName) -> Self {
        ErrorKey::Field(field)
    }
}

/// The four text values of the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormFields {
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Subject => &self.subject,
            FieldName::Message => &self.message,
        }
    }

    pub fn get_mut(&mut self, field: FieldName) -> &mut String {
        match field {
            FieldName::Name => &mut self.name,
            FieldName::Email => &mut self.email,
            FieldName::Subject => &mut self.subject,
            FieldName::Message => &mut self.message,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// True when every field is empty
    pub fn is_empty(&self) -> bool {
        FieldName::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Field-keyed validation messages. An empty map means the form is submittable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: BTreeMap<ErrorKey, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message for a key, replacing any earlier one
    pub fn insert(&mut self, key: impl Into<ErrorKey>, message: impl Into<String>) {
        self.entries.insert(key.into(), message.into());
    }

    pub fn get(&self, key: impl Into<ErrorKey>) -> Option<&str> {
        self.entries.get(&key.into()).map(String::as_str)
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: impl Into<ErrorKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn clear_key(&mut self, key: impl Into<ErrorKey>) {
        self.entries.remove(&key.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ErrorKey, &String)> {
        self.entries.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.entries.values().map(String::as_str).collect();
        write!(f, "{}", messages.join(" / "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_round_through_field_name() {
        let mut fields = FormFields::default();
        fields.set(FieldName::Subject, "相談");
        assert_eq!(fields.get(FieldName::Subject), "相談");
        assert_eq!(fields.subject, "相談");
        assert!(fields.name.is_empty());
    }

    #[test]
    fn test_clear_empties_all_fields() {
        let mut fields = FormFields {
            name: "山田太郎".into(),
            email: "a@example.com".into(),
            subject: "相談".into(),
            message: "よろしく".into(),
        };
        assert!(!fields.is_empty());
        fields.clear();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_only_message_is_multiline() {
        let multiline: Vec<_> = FieldName::ALL
            .iter()
            .filter(|f| f.is_multiline())
            .collect();
        assert_eq!(multiline, vec![&FieldName::Message]);
    }

    #[test]
    fn test_errors_insert_replaces_previous_message() {
        let mut errors = ValidationErrors::new();
        errors.insert(FieldName::Message, "first");
        errors.insert(FieldName::Message, "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FieldName::Message), Some("second"));
    }

    #[test]
    fn test_errors_clear_key() {
        let mut errors = ValidationErrors::new();
        errors.insert(ErrorKey::Challenge, "check");
        errors.insert(FieldName::Email, "bad");
        errors.clear_key(ErrorKey::Challenge);
        assert!(!errors.contains(ErrorKey::Challenge));
        assert!(errors.contains(FieldName::Email));
    }
}

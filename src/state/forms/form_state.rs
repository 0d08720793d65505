//! Focus handling for the contact form rows

use crate::contact::{ErrorKey, FieldName};

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// One focusable row of the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Field(FieldName),
    Challenge,
    Submit,
}

impl FormRow {
    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::Field(field) if field.is_multiline())
    }

    pub fn error_key(&self) -> Option<ErrorKey> {
        match self {
            Self::Field(field) => Some(ErrorKey::Field(*field)),
            Self::Challenge => Some(ErrorKey::Challenge),
            Self::Submit => None,
        }
    }
}

/// Which row of the contact form has focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    rows: Vec<FormRow>,
    active_row: usize,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ContactForm {
    /// Rows in display order. The challenge row only exists when a widget is available.
    pub fn new(with_challenge: bool) -> Self {
        let mut rows: Vec<FormRow> = FieldName::ALL.into_iter().map(FormRow::Field).collect();
        if with_challenge {
            rows.push(FormRow::Challenge);
        }
        rows.push(FormRow::Submit);
        Self {
            rows,
            active_row: 0,
        }
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn active(&self) -> FormRow {
        self.rows[self.active_row]
    }

    pub fn is_active(&self, row: FormRow) -> bool {
        self.active() == row
    }

    /// Move focus to the row showing `key`, if any
    pub fn focus_error(&mut self, key: ErrorKey) {
        if let Some(index) = self.rows.iter().position(|r| r.error_key() == Some(key)) {
            self.active_row = index;
        }
    }

    pub fn reset_focus(&mut self) {
        self.active_row = 0;
    }
}

impl Form for ContactForm {
    fn field_count(&self) -> usize {
        self.rows.len()
    }

    fn active_field(&self) -> usize {
        self.active_row
    }

    fn set_active_field(&mut self, index: usize) {
        self.active_row = index.min(self.rows.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rows_with_challenge() {
        let form = ContactForm::new(true);
        assert_eq!(
            form.rows(),
            &[
                FormRow::Field(FieldName::Name),
                FormRow::Field(FieldName::Email),
                FormRow::Field(FieldName::Subject),
                FormRow::Field(FieldName::Message),
                FormRow::Challenge,
                FormRow::Submit,
            ]
        );
    }

    #[test]
    fn test_rows_without_challenge() {
        let form = ContactForm::new(false);
        assert_eq!(form.field_count(), 5);
        assert!(!form.rows().contains(&FormRow::Challenge));
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let mut form = ContactForm::new(false);
        form.prev_field();
        assert_eq!(form.active(), FormRow::Submit);
        form.next_field();
        assert_eq!(form.active(), FormRow::Field(FieldName::Name));
        form.next_field();
        assert_eq!(form.active(), FormRow::Field(FieldName::Email));
    }

    #[test]
    fn test_focus_error() {
        let mut form = ContactForm::new(true);
        form.focus_error(ErrorKey::Challenge);
        assert_eq!(form.active(), FormRow::Challenge);

        form.focus_error(ErrorKey::Field(FieldName::Subject));
        assert_eq!(form.active(), FormRow::Field(FieldName::Subject));

        let mut form = ContactForm::new(false);
        form.focus_error(ErrorKey::Challenge);
        assert_eq!(form.active(), FormRow::Field(FieldName::Name));
    }

    #[test]
    fn test_only_message_is_multiline() {
        assert!(FormRow::Field(FieldName::Message).is_multiline());
        assert!(!FormRow::Field(FieldName::Name).is_multiline());
        assert!(!FormRow::Submit.is_multiline());
    }
}

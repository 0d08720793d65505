//! Wire format for the form relay

use crate::contact::FormFields;
use serde::{Deserialize, Serialize};

/// JSON body posted to the relay endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Subject line of the relayed email
    #[serde(rename = "_subject")]
    pub mail_subject: String,
    #[serde(rename = "_replyto")]
    pub reply_to: String,
    /// Honeypot. Always empty when sent by a person through this client.
    #[serde(rename = "_gotcha")]
    pub gotcha: String,
}

impl SubmissionPayload {
    pub fn from_fields(fields: &FormFields, subject_prefix: &str) -> Self {
        let mail_subject = if subject_prefix.trim().is_empty() {
            fields.subject.clone()
        } else {
            format!("{} {}", subject_prefix.trim(), fields.subject)
        };
        Self {
            name: fields.name.clone(),
            email: fields.email.clone(),
            subject: fields.subject.clone(),
            message: fields.message.clone(),
            mail_subject,
            reply_to: fields.email.clone(),
            gotcha: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: Option<String>,
}

/// Best-effort extraction of a user-facing message from a failure body.
/// Accepts `{"error": ..}`, `{"message": ..}` or `{"errors": [{"message": ..}]}`.
pub fn extract_error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .or_else(|| parsed.errors.into_iter().find_map(|e| e.message))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

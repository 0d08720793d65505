//! Contact pipeline errors

use super::fields::ValidationErrors;
use thiserror::Error;

/// Generic text shown when the relay gave nothing usable
pub const GENERIC_FAILURE_MESSAGE: &str =
    "メッセージの送信中にエラーが発生しました。後ほど再度お試しください。";

/// Why a submit attempt did not deliver the message.
/// Every variant resolves to user-facing text through `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// A required setting is absent; only an operator can fix this
    #[error("お問い合わせフォームが設定されていません（{setting}）。管理者にお問い合わせください。")]
    Configuration { setting: &'static str },

    /// A successful submission happened too recently
    #[error("しばらく時間をおいてから再度お試しください（あと{remaining_secs}秒）")]
    RateLimited { remaining_secs: i64 },

    /// One or more fields failed validation
    #[error("入力内容を確認してください: {0}")]
    Validation(ValidationErrors),

    /// The relay rejected the submission or could not be reached
    #[error("{0}")]
    Submission(String),
}

impl ContactError {
    /// Build a submission error from the relay's detail text, if any
    pub fn submission(detail: Option<&str>) -> Self {
        match detail.map(str::trim).filter(|d| !d.is_empty()) {
            Some(detail) => Self::Submission(format!("送信に失敗しました: {detail}")),
            None => Self::Submission(GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Whether the visitor can usefully try again
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Configuration { .. })
    }
}

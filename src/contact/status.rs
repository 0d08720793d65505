//! Submission status and its presentation

use super::error::ContactError;
use super::fields::ValidationErrors;

pub const SUCCESS_MESSAGE: &str =
    "お問い合わせいただきありがとうございます。メッセージは正常に送信されました。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Lifecycle of one submission: `Idle -> Submitting -> Done`.
/// An outcome only exists once the phase is `Done`.
///
/// Besides `reset` (`Done -> Idle`), a new submit attempt may leave `Done` directly:
/// it goes to `Submitting` when every local check passes and back to `Idle` when one
/// rejects it. This is how a failed submission is retried with the kept values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Done { outcome: Outcome, message: String },
}

impl SubmissionStatus {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Submitting => Phase::Submitting,
            Self::Done { .. } => Phase::Done,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Done { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Done { message, .. } => message,
            _ => "",
        }
    }

    pub fn succeeded() -> Self {
        Self::Done {
            outcome: Outcome::Success,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failed(error: &ContactError) -> Self {
        Self::Done {
            outcome: Outcome::Failure,
            message: error.to_string(),
        }
    }
}

/// Transient message shown above the form for errors that are not tied to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// Configuration problems block the form until an operator intervenes
    pub blocking: bool,
}

impl From<&ContactError> for Notice {
    fn from(error: &ContactError) -> Self {
        Self {
            message: error.to_string(),
            blocking: !error.is_retryable(),
        }
    }
}

/// What the presenter should show for the current session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusView<'a> {
    Editing {
        errors: &'a ValidationErrors,
        notice: Option<&'a Notice>,
    },
    Submitting,
    /// Offer "create a new inquiry"
    Succeeded { message: &'a str },
    /// Offer "try again" with the entered values kept
    Failed { message: &'a str },
}

impl StatusView<'_> {
    /// The form stays editable except behind the success panel
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Self::Succeeded { .. })
    }
}

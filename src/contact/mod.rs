//! Contact form domain: fields, validation, cool-down and submission lifecycle

mod challenge;
mod error;
mod fields;
mod ledger;
mod pipeline;
mod rate_limit;
mod status;
mod validation;

pub use challenge::CheckboxChallenge;
pub use error::ContactError;
pub use fields::{ErrorKey, FieldName, FormFields};
pub use ledger::SubmissionLedger;
pub use pipeline::{ContactSession, SubmitOutcome, SubmitStart, SubmitTicket};
pub use status::StatusView;
pub use validation::ValidationPolicy;

#[cfg(test)]
pub use status::{Outcome, Phase};

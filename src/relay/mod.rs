//! Form relay module for delivering contact submissions over HTTP

mod client;
mod payload;
mod traits;

pub use client::HttpFormRelay;
pub use payload::SubmissionPayload;
pub use traits::{FormRelay, RelayError};

#[cfg(test)]
pub use traits::MockFormRelay;

//! HTTP client for the third-party form relay

use super::payload::{extract_error_detail, SubmissionPayload};
use super::traits::{FormRelay, RelayError};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;

/// Posts submissions as JSON with reqwest
#[derive(Debug, Clone)]
pub struct HttpFormRelay {
    http: Client,
}

impl HttpFormRelay {
    /// Build a relay client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("ailab-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http })
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl FormRelay for HttpFormRelay {
    async fn deliver(&self, endpoint: &str, payload: &SubmissionPayload) -> Result<(), RelayError> {
        let response = self.http.post(endpoint).json(payload).send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::info!("Relay accepted submission ({status})");
            return Ok(());
        }

        // A body that cannot be read is treated like one without details
        let body = response.text().await.unwrap_or_default();
        let detail = extract_error_detail(&body);
        tracing::warn!("Relay rejected submission ({status}): {detail:?}");

        Err(RelayError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

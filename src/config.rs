//! Configuration handling for the TUI

use crate::contact::ValidationPolicy;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the relay endpoint
pub const ENDPOINT_ENV: &str = "AILAB_FORM_ENDPOINT";
/// Environment variable overriding the challenge site key
pub const SITE_KEY_ENV: &str = "AILAB_CHALLENGE_SITE_KEY";

pub const DEFAULT_SUBJECT_PREFIX: &str = "[生成AIラボ]";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SiteConfig {
    /// Form relay endpoint URL
    pub form_endpoint: Option<String>,
    /// Bot-verification site key
    pub challenge_site_key: Option<String>,
    /// Require the bot-verification challenge (defaults to true)
    pub require_challenge: Option<bool>,
    /// Validation rule set
    pub validation_policy: Option<ValidationPolicy>,
    /// Relay request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Prefix added to the relayed mail subject
    pub subject_prefix: Option<String>,
}

impl SiteConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("jp", "ailab", "ailab-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: SiteConfig = serde_json::from_str(&content)?;
                tracing::debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Replace endpoint and site key with values from `lookup` when present.
    /// Blank values are ignored so an exported-but-empty variable keeps the file value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            self.form_endpoint = Some(endpoint);
        }
        if let Some(site_key) = lookup(SITE_KEY_ENV) {
            self.challenge_site_key = Some(site_key);
        }
    }

    /// Resolve into the settings the contact pipeline runs with
    pub fn resolve(&self) -> ContactConfig {
        let site_key = non_blank(&self.challenge_site_key);
        let challenge = if self.require_challenge.unwrap_or(true) {
            ChallengeSetting::Required { site_key }
        } else {
            ChallengeSetting::Disabled
        };

        ContactConfig {
            endpoint: non_blank(&self.form_endpoint),
            challenge,
            validation_policy: self.validation_policy.unwrap_or_default(),
            subject_prefix: self
                .subject_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string()),
            request_timeout: Duration::from_secs(
                self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1),
            ),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Whether submissions must pass bot-verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeSetting {
    Disabled,
    Required { site_key: Option<String> },
}

/// Settings injected into the contact pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfig {
    pub endpoint: Option<String>,
    pub challenge: ChallengeSetting,
    pub validation_policy: ValidationPolicy,
    pub subject_prefix: String,
    pub request_timeout: Duration,
}

impl Default for ContactConfig {
    fn default() -> Self {
        SiteConfig::default().resolve()
    }
}

impl ContactConfig {
    /// Config with the given endpoint and no challenge
    #[cfg(test)]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            challenge: ChallengeSetting::Disabled,
            ..Self::default()
        }
    }

    pub fn challenge_required(&self) -> bool {
        matches!(self.challenge, ChallengeSetting::Required { .. })
    }

    pub fn site_key(&self) -> Option<&str> {
        match &self.challenge {
            ChallengeSetting::Required { site_key } => site_key.as_deref(),
            ChallengeSetting::Disabled => None,
        }
    }

    /// Name of the first required setting that is absent
    pub fn missing_setting(&self) -> Option<&'static str> {
        if self.endpoint.is_none() {
            return Some("form_endpoint");
        }
        if self.challenge_required() && self.site_key().is_none() {
            return Some("challenge_site_key");
        }
        None
    }
}

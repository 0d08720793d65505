//! Persisted timestamp of the last successful submission

use anyhow::Result;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The only state that outlives a form session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionLedger {
    pub last_submitted_at: Option<DateTime<Utc>>,
}

impl SubmissionLedger {
    /// Default ledger location in the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("jp", "ailab", "ailab-tui")
            .map(|dirs| dirs.data_dir().join("last_submission.json"))
    }

    /// Load the ledger. A missing or unreadable file means "never submitted".
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str(&content)?))
        {
            Ok(ledger) => ledger,
            Err(err) => {
                tracing::warn!("Ignoring unreadable submission ledger {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Record a submission time. The stored value never moves backwards.
    pub fn record(&mut self, at: DateTime<Utc>) {
        self.last_submitted_at = Some(match self.last_submitted_at {
            Some(prev) if prev > at => prev,
            _ => at,
        });
    }
}

//! Bot-verification challenge state and provider capability

use uuid::Uuid;

/// Whether the visitor has passed the bot-verification challenge.
///
/// Verification survives field edits. It is only cleared by the provider
/// (an empty notification or an explicit reset) or by a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeState {
    token: Option<String>,
}

impl ChallengeState {
    pub fn is_verified(&self) -> bool {
        self.token.is_some()
    }

    /// Apply a provider notification. Empty tokens count as un-verification.
    pub fn apply(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn reset(&mut self) {
        self.token = None;
    }
}

/// A bot-verification widget, treated as a black box that notifies with a token or none
pub trait ChallengeProvider: Send {
    /// Public site key the widget was rendered with
    fn site_key(&self) -> &str;

    /// Let the visitor interact with the widget and return its notification
    fn interact(&mut self) -> Option<String>;

    /// Return the widget to its initial, unverified state
    fn reset(&mut self);

    /// Whether the widget currently displays as checked
    fn is_checked(&self) -> bool;
}

/// Terminal checkbox standing in for a "私はロボットではありません" widget.
/// Each check issues a fresh opaque token.
#[derive(Debug, Clone)]
pub struct CheckboxChallenge {
    site_key: String,
    checked: bool,
}

impl CheckboxChallenge {
    pub fn new(site_key: impl Into<String>) -> Self {
        Self {
            site_key: site_key.into(),
            checked: false,
        }
    }
}

impl ChallengeProvider for CheckboxChallenge {
    fn site_key(&self) -> &str {
        &self.site_key
    }

    fn interact(&mut self) -> Option<String> {
        self.checked = !self.checked;
        self.checked.then(|| Uuid::new_v4().to_string())
    }

    fn reset(&mut self) {
        self.checked = false;
    }

    fn is_checked(&self) -> bool {
        self.checked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_starts_unverified() {
        assert!(!ChallengeState::default().is_verified());
    }

    #[test]
    fn test_empty_token_unverifies() {
        let mut state = ChallengeState::default();
        state.apply(Some("tok".into()));
        assert!(state.is_verified());
        state.apply(Some(String::new()));
        assert!(!state.is_verified());
    }

    #[test]
    fn test_none_token_unverifies() {
        let mut state = ChallengeState::default();
        state.apply(Some("tok".into()));
        state.apply(None);
        assert!(!state.is_verified());
    }

    #[test]
    fn test_checkbox_toggles_between_token_and_none() {
        let mut widget = CheckboxChallenge::new("site-key");
        let first = widget.interact();
        assert!(first.is_some());
        assert!(widget.is_checked());

        let second = widget.interact();
        assert!(second.is_none());
        assert!(!widget.is_checked());
    }

    #[test]
    fn test_checkbox_tokens_are_fresh() {
        let mut widget = CheckboxChallenge::new("site-key");
        let a = widget.interact();
        widget.reset();
        let b = widget.interact();
        assert_ne!(a, b);
    }

    #[test]
    fn test_checkbox_reports_site_key() {
        let widget = CheckboxChallenge::new("6Lc-site");
        assert_eq!(widget.site_key(), "6Lc-site");
    }
}

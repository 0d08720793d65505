//! Application state and core logic

use crate::config::SiteConfig;
use crate::contact::{
    CheckboxChallenge, ContactError, ContactSession, SubmissionLedger, SubmitOutcome, SubmitStart,
    SubmitTicket,
};
use crate::relay::{FormRelay, HttpFormRelay, RelayError};
use crate::state::{Anchor, AppState, ContactForm, Form, FormRow, NavRequest, View};
use crate::ui::HomeContent;
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot::{self, error::TryRecvError};

/// Second Ctrl+C within this window quits
const DOUBLE_CTRL_C_WINDOW: Duration = Duration::from_millis(1500);

/// Lines moved by d/u on the home view
const PAGE_LINES: u16 = 10;

/// What the background submission task hands back
type SubmitReport = (SubmitTicket, Result<(), RelayError>);

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Contact form session
    pub contact: ContactSession,
    relay: Arc<dyn FormRelay>,
    /// Result channel of the outstanding submission
    pending: Option<oneshot::Receiver<SubmitReport>>,
    /// Where the last successful submission time is stored
    ledger_path: Option<PathBuf>,
    /// Whether the app should quit
    quit: bool,
    /// Transient message for the status bar
    pub status_message: Option<String>,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    /// Create a new App instance from user configuration
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let config = site.resolve();
        let relay = HttpFormRelay::new(config.request_timeout)?;

        let ledger_path = SubmissionLedger::default_path();
        let last_submitted_at = ledger_path
            .as_deref()
            .map(SubmissionLedger::load)
            .unwrap_or_default()
            .last_submitted_at;

        if let Some(setting) = config.missing_setting() {
            tracing::warn!("Contact form is not configured: missing {setting}");
        }
        tracing::info!(
            "Contact form using {} validation",
            config.validation_policy.label()
        );

        let site_key = config.site_key().map(str::to_string);
        let mut contact = ContactSession::new(config).with_last_submission(last_submitted_at);
        if let Some(site_key) = site_key {
            contact = contact.with_challenge_provider(Box::new(CheckboxChallenge::new(site_key)));
        }

        Ok(Self::with_parts(contact, Arc::new(relay), ledger_path))
    }

    /// Assemble an app from already-built collaborators
    pub fn with_parts(
        contact: ContactSession,
        relay: Arc<dyn FormRelay>,
        ledger_path: Option<PathBuf>,
    ) -> Self {
        let form = ContactForm::new(contact.has_challenge_provider());
        Self {
            state: AppState::new(form),
            contact,
            relay,
            pending: None,
            ledger_path,
            quit: false,
            status_message: None,
            last_ctrl_c: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether a relay request is outstanding
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_ctrl_c();
            return;
        }

        // Error dialog is modal
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return;
        }

        self.status_message = None;

        match self.state.current_view {
            View::Home => self.handle_home_key(key),
            View::Contact => self.handle_contact_key(key),
        }
    }

    fn handle_ctrl_c(&mut self) {
        let now = Instant::now();
        if self
            .last_ctrl_c
            .is_some_and(|prev| now.duration_since(prev) < DOUBLE_CTRL_C_WINDOW)
        {
            self.quit = true;
        } else {
            self.last_ctrl_c = Some(now);
            self.status_message = Some("Press Ctrl+C again to quit".to_string());
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        let max_scroll = HomeContent::build().line_count().saturating_sub(1);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(1, max_scroll),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(1),
            KeyCode::Char('d') | KeyCode::PageDown => {
                self.state.scroll_down(PAGE_LINES, max_scroll)
            }
            KeyCode::Char('u') | KeyCode::PageUp => self.state.scroll_up(PAGE_LINES),
            KeyCode::Char('g') | KeyCode::Home => self.state.home_scroll = 0,
            KeyCode::Char('c') => self.apply(NavRequest::GoTo(View::Contact)),
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char(c) => {
                if let Some(anchor) = Anchor::from_shortcut(c) {
                    self.apply(NavRequest::ScrollTo(anchor));
                }
            }
            _ => {}
        }
    }

    fn handle_contact_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.go_back();
            return;
        }

        if !self.contact.status_view().accepts_input() {
            if key.code == KeyCode::Enter {
                self.contact.reset();
                self.state.contact_form.reset_focus();
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('s') {
            self.start_submission();
            return;
        }

        let row = self.state.contact_form.active();
        match key.code {
            KeyCode::Tab => self.state.contact_form.next_field(),
            KeyCode::BackTab => self.state.contact_form.prev_field(),
            KeyCode::Enter => match row {
                FormRow::Field(field) if field.is_multiline() => {
                    self.contact.input_char(field, '\n')
                }
                FormRow::Field(_) => self.state.contact_form.next_field(),
                FormRow::Challenge => self.contact.interact_challenge(),
                FormRow::Submit => self.start_submission(),
            },
            KeyCode::Char(' ') if row == FormRow::Challenge => self.contact.interact_challenge(),
            KeyCode::Char(c) if !ctrl => {
                if let FormRow::Field(field) = row {
                    self.contact.input_char(field, c);
                }
            }
            KeyCode::Backspace => {
                if let FormRow::Field(field) = row {
                    self.contact.backspace(field);
                }
            }
            _ => {}
        }
    }

    /// Apply a navigation request from any view
    pub fn apply(&mut self, request: NavRequest) {
        match request {
            NavRequest::GoTo(view) => {
                if self.state.current_view != view {
                    self.navigate(view);
                }
            }
            NavRequest::ScrollTo(anchor) => {
                if self.state.current_view != View::Home {
                    self.navigate(View::Home);
                }
                self.state.home_scroll = HomeContent::build().anchor_line(anchor);
            }
        }
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        self.state.view_history.push(self.state.current_view);
        self.state.current_view = view;
    }

    /// Go back to previous view
    pub fn go_back(&mut self) {
        if let Some(view) = self.state.view_history.pop() {
            self.state.current_view = view;
        } else if self.state.current_view != View::Home {
            self.state.current_view = View::Home;
        }
    }

    /// Run the local checks and hand the relay request to a background task
    fn start_submission(&mut self) {
        match self.contact.begin_submit(Utc::now()) {
            SubmitStart::Ready(ticket) => {
                let relay = Arc::clone(&self.relay);
                let (tx, rx) = oneshot::channel();
                tokio::spawn(async move {
                    let report = ticket.send(relay.as_ref()).await;
                    // A dropped receiver means the app is shutting down
                    let _ = tx.send(report);
                });
                self.pending = Some(rx);
            }
            SubmitStart::InFlight => {}
            SubmitStart::Rejected(ContactError::Validation(errors)) => {
                if let Some((key, _)) = errors.iter().next() {
                    self.state.contact_form.focus_error(*key);
                }
            }
            SubmitStart::Rejected(_) => {}
        }
    }

    /// Collect the background submission result, if it has arrived
    pub fn poll_submission(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok((ticket, result)) => {
                self.pending = None;
                let elapsed = Utc::now() - ticket.started_at();
                tracing::debug!(elapsed_ms = elapsed.num_milliseconds(), "Relay responded");
                if self.contact.finish(ticket, result) == SubmitOutcome::Delivered {
                    self.state.contact_form.reset_focus();
                    self.persist_ledger();
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                self.pending = None;
                self.contact.abandon();
            }
        }
    }

    fn persist_ledger(&self) {
        let (Some(path), Some(at)) = (&self.ledger_path, self.contact.last_submitted_at()) else {
            return;
        };
        let mut ledger = SubmissionLedger::load(path);
        ledger.record(at);
        match ledger.save(path) {
            Ok(()) => tracing::debug!("Saved submission ledger to {}", path.display()),
            Err(err) => tracing::warn!("Failed to save submission ledger: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChallengeSetting, ContactConfig};
    use crate::contact::{FieldName, Outcome, Phase, StatusView};
    use crate::relay::MockFormRelay;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;

    const ENDPOINT: &str = "https://formspree.io/f/test";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app_with(relay: MockFormRelay, ledger_path: Option<PathBuf>) -> App {
        let contact = ContactSession::new(ContactConfig::with_endpoint(ENDPOINT));
        App::with_parts(contact, Arc::new(relay), ledger_path)
    }

    fn contact_app(relay: MockFormRelay) -> App {
        let mut app = app_with(relay, None);
        app.apply(NavRequest::GoTo(View::Contact));
        app
    }

    fn fill_by_keys(app: &mut App) {
        type_text(app, "山田太郎");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "a@example.com");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "相談");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "よろしくお願いします");
    }

    async fn settle(app: &mut App) {
        for _ in 0..200 {
            app.poll_submission();
            if !app.is_submitting() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("submission did not finish");
    }

    fn scratch_ledger(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ailab-tui-app-{}-{name}", std::process::id()))
            .join("last_submission.json")
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_contact_and_back() {
            let mut app = app_with(MockFormRelay::new(), None);
            assert_eq!(app.state.current_view, View::Home);

            app.handle_key(key(KeyCode::Char('c')));
            assert_eq!(app.state.current_view, View::Contact);

            app.handle_key(key(KeyCode::Esc));
            assert_eq!(app.state.current_view, View::Home);
            assert!(app.state.view_history.is_empty());
        }

        #[test]
        fn test_go_to_current_view_is_noop() {
            let mut app = app_with(MockFormRelay::new(), None);
            app.apply(NavRequest::GoTo(View::Home));
            assert!(app.state.view_history.is_empty());
        }

        #[test]
        fn test_anchor_shortcut_scrolls_home() {
            let mut app = app_with(MockFormRelay::new(), None);
            app.handle_key(key(KeyCode::Char('3')));
            assert_eq!(
                app.state.home_scroll,
                HomeContent::build().anchor_line(Anchor::Vision)
            );

            app.handle_key(key(KeyCode::Char('1')));
            assert_eq!(app.state.home_scroll, 0);
        }

        #[test]
        fn test_scroll_to_from_contact_returns_home() {
            let mut app = contact_app(MockFormRelay::new());
            app.apply(NavRequest::ScrollTo(Anchor::Cta));
            assert_eq!(app.state.current_view, View::Home);
            assert_eq!(
                app.state.home_scroll,
                HomeContent::build().anchor_line(Anchor::Cta)
            );
        }

        #[test]
        fn test_scroll_keys() {
            let mut app = app_with(MockFormRelay::new(), None);
            app.handle_key(key(KeyCode::Char('j')));
            app.handle_key(key(KeyCode::Char('j')));
            assert_eq!(app.state.home_scroll, 2);
            app.handle_key(key(KeyCode::Char('k')));
            assert_eq!(app.state.home_scroll, 1);
            app.handle_key(key(KeyCode::Char('u')));
            assert_eq!(app.state.home_scroll, 0);

            for _ in 0..500 {
                app.handle_key(key(KeyCode::Char('d')));
            }
            assert_eq!(
                app.state.home_scroll,
                HomeContent::build().line_count() - 1
            );
        }

        #[test]
        fn test_q_quits_only_on_home() {
            let mut app = contact_app(MockFormRelay::new());
            app.handle_key(key(KeyCode::Char('q')));
            assert!(!app.should_quit());
            assert_eq!(app.contact.fields().name, "q");

            app.handle_key(key(KeyCode::Esc));
            app.handle_key(key(KeyCode::Char('q')));
            assert!(app.should_quit());
        }

        #[test]
        fn test_double_ctrl_c_quits() {
            let mut app = contact_app(MockFormRelay::new());
            app.handle_key(ctrl('c'));
            assert!(!app.should_quit());
            assert!(app.status_message.is_some());

            app.handle_key(ctrl('c'));
            assert!(app.should_quit());
        }

        #[test]
        fn test_error_dialog_is_modal() {
            let mut app = app_with(MockFormRelay::new(), None);
            app.push_error("設定ファイルを読み込めませんでした");

            app.handle_key(key(KeyCode::Char('c')));
            assert_eq!(app.state.current_view, View::Home);

            app.handle_key(key(KeyCode::Enter));
            assert!(!app.state.has_errors());
            app.handle_key(key(KeyCode::Char('c')));
            assert_eq!(app.state.current_view, View::Contact);
        }
    }

    mod contact_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_typing_edits_active_field() {
            let mut app = contact_app(MockFormRelay::new());
            fill_by_keys(&mut app);
            app.handle_key(key(KeyCode::Backspace));

            let fields = app.contact.fields();
            assert_eq!(fields.name, "山田太郎");
            assert_eq!(fields.email, "a@example.com");
            assert_eq!(fields.subject, "相談");
            assert_eq!(fields.message, "よろしくお願いしま");
        }

        #[test]
        fn test_enter_in_message_inserts_newline() {
            let mut app = contact_app(MockFormRelay::new());
            for _ in 0..3 {
                app.handle_key(key(KeyCode::Tab));
            }
            type_text(&mut app, "a");
            app.handle_key(key(KeyCode::Enter));
            type_text(&mut app, "b");
            assert_eq!(app.contact.fields().message, "a\nb");
        }

        #[test]
        fn test_enter_on_single_line_field_moves_on() {
            let mut app = contact_app(MockFormRelay::new());
            app.handle_key(key(KeyCode::Enter));
            assert_eq!(
                app.state.contact_form.active(),
                FormRow::Field(FieldName::Email)
            );
        }

        #[test]
        fn test_challenge_row_toggles_with_space() {
            let config = ContactConfig {
                challenge: ChallengeSetting::Required {
                    site_key: Some("site-key".into()),
                },
                ..ContactConfig::with_endpoint(ENDPOINT)
            };
            let contact = ContactSession::new(config)
                .with_challenge_provider(Box::new(CheckboxChallenge::new("site-key")));
            let mut app = App::with_parts(contact, Arc::new(MockFormRelay::new()), None);
            app.apply(NavRequest::GoTo(View::Contact));

            app.handle_key(key(KeyCode::BackTab));
            app.handle_key(key(KeyCode::BackTab));
            assert_eq!(app.state.contact_form.active(), FormRow::Challenge);

            app.handle_key(key(KeyCode::Char(' ')));
            assert!(app.contact.challenge().is_verified());
            app.handle_key(key(KeyCode::Char(' ')));
            assert!(!app.contact.challenge().is_verified());
        }

        #[tokio::test]
        async fn test_empty_submit_focuses_first_error_without_network() {
            let mut relay = MockFormRelay::new();
            relay.expect_deliver().times(0);
            let mut app = contact_app(relay);
            app.handle_key(key(KeyCode::BackTab));
            assert_eq!(app.state.contact_form.active(), FormRow::Submit);

            app.handle_key(key(KeyCode::Enter));

            assert!(!app.is_submitting());
            assert_eq!(app.contact.errors().len(), 4);
            assert_eq!(
                app.state.contact_form.active(),
                FormRow::Field(FieldName::Name)
            );
        }

        #[tokio::test]
        async fn test_successful_submission_persists_ledger() {
            let path = scratch_ledger("success");
            let mut relay = MockFormRelay::new();
            relay.expect_deliver().times(1).returning(|_, _| Ok(()));
            let mut app = app_with(relay, Some(path.clone()));
            app.apply(NavRequest::GoTo(View::Contact));
            fill_by_keys(&mut app);

            app.handle_key(ctrl('s'));
            assert!(app.is_submitting());
            assert_eq!(app.contact.status().phase(), Phase::Submitting);

            settle(&mut app).await;

            assert_eq!(app.contact.status().outcome(), Some(Outcome::Success));
            assert!(app.contact.fields().is_empty());
            let saved = SubmissionLedger::load(&path);
            assert_eq!(saved.last_submitted_at, app.contact.last_submitted_at());
            assert!(saved.last_submitted_at.is_some());

            // Enter on the success panel starts a new inquiry
            app.handle_key(key(KeyCode::Enter));
            assert_eq!(app.contact.status().phase(), Phase::Idle);
            let _ = std::fs::remove_dir_all(path.parent().unwrap());
        }

        #[tokio::test]
        async fn test_second_submit_while_pending_is_ignored() {
            let mut relay = MockFormRelay::new();
            relay.expect_deliver().times(1).returning(|_, _| Ok(()));
            let mut app = contact_app(relay);
            fill_by_keys(&mut app);

            app.handle_key(ctrl('s'));
            app.handle_key(ctrl('s'));
            settle(&mut app).await;

            assert_eq!(app.contact.status().outcome(), Some(Outcome::Success));
        }

        #[tokio::test]
        async fn test_failure_then_retry() {
            let mut seq = Sequence::new();
            let mut relay = MockFormRelay::new();
            relay
                .expect_deliver()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| {
                    Err(RelayError::Rejected {
                        status: 503,
                        detail: Some("try later".into()),
                    })
                });
            relay
                .expect_deliver()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
            let mut app = contact_app(relay);
            fill_by_keys(&mut app);

            app.handle_key(ctrl('s'));
            settle(&mut app).await;
            assert!(matches!(
                app.contact.status_view(),
                StatusView::Failed { message } if message.contains("try later")
            ));
            assert_eq!(app.contact.fields().name, "山田太郎");

            app.handle_key(key(KeyCode::Tab));
            assert_eq!(app.state.contact_form.active(), FormRow::Submit);
            app.handle_key(key(KeyCode::Enter));
            settle(&mut app).await;

            assert_eq!(app.contact.status().outcome(), Some(Outcome::Success));
        }

        struct CrashingRelay;

        #[async_trait::async_trait]
        impl FormRelay for CrashingRelay {
            async fn deliver(
                &self,
                _endpoint: &str,
                _payload: &crate::relay::SubmissionPayload,
            ) -> Result<(), RelayError> {
                panic!("relay crashed")
            }
        }

        #[tokio::test]
        async fn test_crashed_task_reports_failure() {
            let contact = ContactSession::new(ContactConfig::with_endpoint(ENDPOINT));
            let mut app = App::with_parts(contact, Arc::new(CrashingRelay), None);
            app.apply(NavRequest::GoTo(View::Contact));
            fill_by_keys(&mut app);

            app.handle_key(ctrl('s'));
            settle(&mut app).await;

            assert_eq!(
                app.contact.status().message(),
                ContactError::submission(None).to_string()
            );
            assert!(!app.contact.is_in_flight());
        }

        #[test]
        fn test_session_submit_blocking() {
            let mut relay = MockFormRelay::new();
            relay.expect_deliver().times(1).returning(|_, _| Ok(()));
            let mut app = contact_app(MockFormRelay::new());
            fill_by_keys(&mut app);

            let outcome = tokio_test::block_on(app.contact.submit(&relay, Utc::now()));
            assert_eq!(outcome, SubmitOutcome::Delivered);
        }
    }
}

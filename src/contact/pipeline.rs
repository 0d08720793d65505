//! Submission orchestration for one contact form session

use super::challenge::{ChallengeProvider, ChallengeState};
use super::error::ContactError;
use super::fields::{ErrorKey, FieldName, FormFields, ValidationErrors};
use super::rate_limit::RateLimiter;
use super::status::{Notice, Outcome, Phase, StatusView, SubmissionStatus};
use super::validation::RuleSet;
use crate::config::ContactConfig;
use crate::relay::{FormRelay, RelayError, SubmissionPayload};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mutual-exclusion flag for the one outstanding submission
#[derive(Debug, Clone, Default)]
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn try_acquire(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(Arc::clone(&self.0)))
    }

    fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the in-flight flag when dropped, on every exit path
#[derive(Debug)]
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A submission that passed every local check and holds the in-flight flag.
/// The payload is captured here, so later field edits cannot change it.
#[derive(Debug)]
pub struct SubmitTicket {
    endpoint: String,
    payload: SubmissionPayload,
    started_at: DateTime<Utc>,
    guard: InFlightGuard,
}

impl SubmitTicket {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Post the captured payload. The ticket comes back so the caller can `finish` it.
    pub async fn send(self, relay: &dyn FormRelay) -> (Self, Result<(), RelayError>) {
        let result = relay.deliver(self.endpoint(), self.payload()).await;
        (self, result)
    }
}

/// Result of the local half of a submit attempt
#[derive(Debug)]
pub enum SubmitStart {
    /// Another submission is outstanding; nothing changed
    InFlight,
    Rejected(ContactError),
    Ready(SubmitTicket),
}

/// Result of a whole submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission is outstanding; nothing changed
    InFlight,
    /// Stopped before the network: configuration, cool-down or validation
    Rejected(ContactError),
    Delivered,
    Failed(ContactError),
}

/// State and behavior of one contact form view
pub struct ContactSession {
    config: ContactConfig,
    rules: RuleSet,
    limiter: RateLimiter,
    provider: Option<Box<dyn ChallengeProvider>>,
    fields: FormFields,
    errors: ValidationErrors,
    challenge: ChallengeState,
    status: SubmissionStatus,
    notice: Option<Notice>,
    last_submitted_at: Option<DateTime<Utc>>,
    in_flight: InFlight,
}

impl ContactSession {
    pub fn new(config: ContactConfig) -> Self {
        let rules = RuleSet::from(config.validation_policy);
        Self {
            config,
            rules,
            limiter: RateLimiter::default(),
            provider: None,
            fields: FormFields::default(),
            errors: ValidationErrors::default(),
            challenge: ChallengeState::default(),
            status: SubmissionStatus::default(),
            notice: None,
            last_submitted_at: None,
            in_flight: InFlight::default(),
        }
    }

    pub fn with_challenge_provider(mut self, provider: Box<dyn ChallengeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Seed the cool-down from a previous run
    pub fn with_last_submission(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_submitted_at = at;
        self
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn challenge(&self) -> &ChallengeState {
        &self.challenge
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn last_submitted_at(&self) -> Option<DateTime<Utc>> {
        self.last_submitted_at
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_held()
    }

    pub fn has_challenge_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn challenge_checked(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_checked())
    }

    /// Replace a field value and clear its error
    #[allow(dead_code)]
    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) {
        self.fields.set(field, value);
        self.after_edit(field);
    }

    pub fn input_char(&mut self, field: FieldName, c: char) {
        self.fields.get_mut(field).push(c);
        self.after_edit(field);
    }

    pub fn backspace(&mut self, field: FieldName) {
        self.fields.get_mut(field).pop();
        self.after_edit(field);
    }

    fn after_edit(&mut self, field: FieldName) {
        self.errors.clear_key(field);

        // The spam rule reads the subject as well, so a shown message error may be stale
        if field == FieldName::Subject && self.errors.get(FieldName::Message).is_some() {
            let fresh = self.rules.validate(&self.fields, None);
            match fresh.get(FieldName::Message) {
                Some(message) => self.errors.insert(FieldName::Message, message),
                None => self.errors.clear_key(FieldName::Message),
            }
        }
    }

    /// Let the visitor interact with the challenge widget and apply its notification
    pub fn interact_challenge(&mut self) {
        let Some(provider) = self.provider.as_mut() else {
            return;
        };
        let token = provider.interact();
        tracing::debug!(
            site_key = provider.site_key(),
            verified = token.is_some(),
            "Challenge interaction"
        );
        self.on_challenge_token(token);
    }

    /// Provider callback: a token verifies, an empty value un-verifies
    pub fn on_challenge_token(&mut self, token: Option<String>) {
        self.challenge.apply(token);
        if self.challenge.is_verified() {
            self.errors.clear_key(ErrorKey::Challenge);
        }
    }

    /// Validate the current fields without touching session state
    pub fn validate(&self) -> ValidationErrors {
        let challenge = self
            .config
            .challenge_required()
            .then_some(self.challenge());
        self.rules.validate(&self.fields, challenge)
    }

    /// Run every local check and, if all pass, mark the session as submitting.
    ///
    /// Accepted from `Idle` and from `Done`; a rejection returns the form to `Idle`.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> SubmitStart {
        let Some(guard) = self.in_flight.try_acquire() else {
            tracing::debug!("Submit ignored: a submission is already in flight");
            return SubmitStart::InFlight;
        };

        self.notice = None;

        if let Some(setting) = self.config.missing_setting() {
            return self.reject(ContactError::Configuration { setting });
        }
        let Some(endpoint) = self.config.endpoint.clone() else {
            return self.reject(ContactError::Configuration {
                setting: "form_endpoint",
            });
        };

        if !self.limiter.allow(now, self.last_submitted_at) {
            tracing::debug!(
                window_secs = self.limiter.window().num_seconds(),
                "Cool-down since the last submission is still open"
            );
            let remaining_secs = self
                .limiter
                .retry_after(now, self.last_submitted_at)
                .map(|d| (d.num_milliseconds() + 999) / 1000)
                .unwrap_or_default();
            return self.reject(ContactError::RateLimited { remaining_secs });
        }

        let errors = self.validate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return self.reject(ContactError::Validation(errors));
        }
        self.errors = ValidationErrors::default();

        self.status = SubmissionStatus::Submitting;
        tracing::info!("Submitting contact form to relay");

        SubmitStart::Ready(SubmitTicket {
            endpoint,
            payload: SubmissionPayload::from_fields(&self.fields, &self.config.subject_prefix),
            started_at: now,
            guard,
        })
    }

    fn reject(&mut self, error: ContactError) -> SubmitStart {
        if let ContactError::Validation(errors) = &error {
            let fields: Vec<&str> = errors.iter().map(|(key, _)| key.key()).collect();
            tracing::info!(count = errors.len(), "Validation failed: {}", fields.join(", "));
        } else {
            tracing::info!("Submit rejected before sending: {error}");
            self.notice = Some(Notice::from(&error));
        }
        self.status = SubmissionStatus::Idle;
        SubmitStart::Rejected(error)
    }

    /// Reduce the relay result to a final status and release the in-flight flag
    pub fn finish(&mut self, ticket: SubmitTicket, result: Result<(), RelayError>) -> SubmitOutcome {
        let SubmitTicket {
            started_at, guard, ..
        } = ticket;

        let outcome = match result {
            Ok(()) => {
                self.status = SubmissionStatus::succeeded();
                self.fields.clear();
                self.errors = ValidationErrors::default();
                self.challenge.reset();
                if let Some(provider) = self.provider.as_mut() {
                    provider.reset();
                }
                self.last_submitted_at = Some(match self.last_submitted_at {
                    Some(prev) if prev > started_at => prev,
                    _ => started_at,
                });
                tracing::info!("Contact form delivered");
                SubmitOutcome::Delivered
            }
            Err(err) => {
                tracing::warn!("Contact form delivery failed: {err}");
                let error = ContactError::submission(err.detail());
                self.status = SubmissionStatus::failed(&error);
                SubmitOutcome::Failed(error)
            }
        };

        drop(guard);
        outcome
    }

    /// The submission task went away without reporting. Treat it as a failure.
    pub fn abandon(&mut self) {
        if self.status == SubmissionStatus::Submitting {
            tracing::warn!("Submission task ended without a result");
            self.status = SubmissionStatus::failed(&ContactError::submission(None));
        }
    }

    /// Run one complete submit attempt against `relay`
    #[allow(dead_code)]
    pub async fn submit(&mut self, relay: &dyn FormRelay, now: DateTime<Utc>) -> SubmitOutcome {
        let ticket = match self.begin_submit(now) {
            SubmitStart::Ready(ticket) => ticket,
            SubmitStart::InFlight => return SubmitOutcome::InFlight,
            SubmitStart::Rejected(err) => return SubmitOutcome::Rejected(err),
        };
        let (ticket, result) = ticket.send(relay).await;
        self.finish(ticket, result)
    }

    /// Leave `Done` for a fresh, empty form. No effect in other phases.
    pub fn reset(&mut self) {
        if self.status.outcome().is_none() {
            return;
        }
        self.status = SubmissionStatus::Idle;
        self.fields.clear();
        self.errors = ValidationErrors::default();
        self.notice = None;
    }

    pub fn status_view(&self) -> StatusView<'_> {
        match (self.status.phase(), self.status.outcome()) {
            (Phase::Idle, _) => StatusView::Editing {
                errors: &self.errors,
                notice: self.notice(),
            },
            (Phase::Submitting, _) => StatusView::Submitting,
            (Phase::Done, Some(Outcome::Success)) => StatusView::Succeeded {
                message: self.status.message(),
            },
            (Phase::Done, _) => StatusView::Failed {
                message: self.status.message(),
            },
        }
    }
}

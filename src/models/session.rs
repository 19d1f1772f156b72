//! Audit session state machine
//!
//! One request/response cycle: submit → Pending → Ready | Failed. Every
//! accepted submit bumps a generation counter; responses carrying a stale
//! generation are discarded so a superseded request can never overwrite
//! newer session state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::action_plan::{build_action_plan, ActionPlanEntry};
use crate::models::audit::{AuditResult, ValidationError};

/// A single submission
///
/// Consumed by the session on submit; not retained after the call
/// completes.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub url: String,
}

impl AuditRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Pending,
    Ready,
    Failed,
}

/// Token tying an in-flight engine call to the submission that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Generation(pub u64);

/// Why a submission was rejected before any call was issued
///
/// The session stays in its current state; the consumer prompts for
/// correction or retries later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Audit URL must not be empty")]
    EmptyUrl,

    #[error("An audit is already in flight")]
    AuditInFlight,
}

/// Why the current request ended in `Failed`
///
/// Transport and validation failures are distinct categories so a consumer
/// can render "service unreachable" differently from "unexpected
/// response".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The call succeeded but the payload did not conform
    Validation(ValidationError),
    /// The call itself failed (connectivity, timeout, non-2xx, non-JSON)
    Transport(String),
}

impl FailureReason {
    pub fn category(&self) -> &'static str {
        match self {
            FailureReason::Validation(_) => "validation",
            FailureReason::Transport(_) => "transport",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Validation(err) => write!(f, "{}", err),
            FailureReason::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

/// Single-audit session state holder
///
/// Holds at most one request in flight. Not designed for concurrent
/// mutation; callers sharing a session across tasks wrap it in a lock.
#[derive(Debug)]
pub struct AuditSession {
    state: SessionState,
    generation: u64,
    submitted_url: Option<String>,
    result: Option<AuditResult>,
    action_plan: Vec<ActionPlanEntry>,
    failure: Option<FailureReason>,
    transitioned_at: DateTime<Utc>,
}

impl AuditSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            generation: 0,
            submitted_url: None,
            result: None,
            action_plan: Vec::new(),
            failure: None,
            transitioned_at: Utc::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// URL of the most recently accepted submission
    pub fn url(&self) -> Option<&str> {
        self.submitted_url.as_deref()
    }

    /// Present only in `Ready`
    pub fn result(&self) -> Option<&AuditResult> {
        self.result.as_ref()
    }

    /// Non-trivial only in `Ready`; empty in `Ready` means "no major
    /// technical defects"
    pub fn action_plan(&self) -> &[ActionPlanEntry] {
        &self.action_plan
    }

    /// Present only in `Failed`
    pub fn failure(&self) -> Option<&FailureReason> {
        self.failure.as_ref()
    }

    /// When the session last changed state
    pub fn transitioned_at(&self) -> DateTime<Utc> {
        self.transitioned_at
    }

    /// Accept a submission and move to `Pending`
    ///
    /// Rejected with no state change when the trimmed URL is empty or an
    /// audit is already in flight. On acceptance the prior result, plan
    /// and failure are cleared (never merged or queued) and the returned
    /// generation token must accompany the eventual `complete`/`fail`.
    pub fn submit(&mut self, request: AuditRequest) -> Result<Generation, SubmitError> {
        if request.url.trim().is_empty() {
            return Err(SubmitError::EmptyUrl);
        }
        if self.state == SessionState::Pending {
            return Err(SubmitError::AuditInFlight);
        }

        self.generation += 1;
        self.state = SessionState::Pending;
        self.submitted_url = Some(request.url);
        self.result = None;
        self.action_plan.clear();
        self.failure = None;
        self.transitioned_at = Utc::now();

        Ok(Generation(self.generation))
    }

    /// Apply a successful engine response
    ///
    /// Validates the payload: moves to `Ready` with the model and freshly
    /// derived action plan, or to `Failed` with a validation-category
    /// reason when the payload does not conform. Returns false when the
    /// response belongs to a superseded submission and was discarded.
    pub fn complete(&mut self, token: Generation, payload: &serde_json::Value) -> bool {
        if !self.accepts(token) {
            return false;
        }

        match AuditResult::parse(payload) {
            Ok(result) => {
                self.action_plan = build_action_plan(&result.critiques);
                self.result = Some(result);
                self.state = SessionState::Ready;
            }
            Err(err) => {
                self.failure = Some(FailureReason::Validation(err));
                self.state = SessionState::Failed;
            }
        }
        self.transitioned_at = Utc::now();
        true
    }

    /// Apply a transport failure
    ///
    /// Returns false when the failure belongs to a superseded submission
    /// and was discarded.
    pub fn fail(&mut self, token: Generation, message: impl Into<String>) -> bool {
        if !self.accepts(token) {
            return false;
        }

        self.failure = Some(FailureReason::Transport(message.into()));
        self.state = SessionState::Failed;
        self.transitioned_at = Utc::now();
        true
    }

    // Stale-response guard: only the in-flight generation may resolve the
    // pending state.
    fn accepts(&self, token: Generation) -> bool {
        self.state == SessionState::Pending && token.0 == self.generation
    }
}

impl Default for AuditSession {
    fn default() -> Self {
        Self::new()
    }
}

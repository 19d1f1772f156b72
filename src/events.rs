//! Audit lifecycle events
//!
//! Shared event definitions and EventBus for broadcasting session
//! lifecycle changes to consumers (SSE clients).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Audit lifecycle event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuditEvent {
    /// A submission was accepted and the engine call issued
    AuditStarted {
        /// Generation of the accepted submission
        generation: u64,
        /// URL being audited
        url: String,
        /// When the submission was accepted
        timestamp: DateTime<Utc>,
    },

    /// The engine payload validated; result and action plan are available
    AuditCompleted {
        /// Generation of the completed submission
        generation: u64,
        /// Audited URL echoed by the engine
        url: String,
        /// 0-100 composite score
        global_score: f64,
        /// Number of critiques in the result
        critique_count: usize,
        /// Number of remediable issues in the derived plan
        action_plan_size: usize,
        /// When the result became available
        timestamp: DateTime<Utc>,
    },

    /// The request ended in `Failed`
    AuditFailed {
        /// Generation of the failed submission
        generation: u64,
        /// "transport" or "validation"
        category: String,
        /// Human-readable failure description
        message: String,
        /// When the failure was recorded
        timestamp: DateTime<Utc>,
    },
}

impl AuditEvent {
    /// Event name used for SSE event typing
    pub fn event_type(&self) -> &'static str {
        match self {
            AuditEvent::AuditStarted { .. } => "AuditStarted",
            AuditEvent::AuditCompleted { .. } => "AuditCompleted",
            AuditEvent::AuditFailed { .. } => "AuditFailed",
        }
    }
}

/// Broadcast bus for audit events
///
/// Wraps tokio::broadcast: subscribers receive events emitted after they
/// subscribe; events past the channel capacity are dropped for slow
/// subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AuditEvent>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<AuditEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` when at least one subscriber exists,
    /// `Err` when nobody is listening.
    pub fn emit(
        &self,
        event: AuditEvent,
    ) -> Result<usize, broadcast::error::SendError<AuditEvent>> {
        self.tx.send(event)
    }
}

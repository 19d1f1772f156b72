//! # webaudit library
//!
//! Website audit service core:
//! - Audit result model and payload validation
//! - Severity classification and action plan derivation
//! - Audit session state machine with stale-response guarding
//! - Analysis engine client
//! - HTTP + SSE presentation boundary

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::events::EventBus;
use crate::models::session::AuditSession;
use crate::services::EngineClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The single audit session, serialized behind a lock
    pub session: Arc<RwLock<AuditSession>>,
    /// Client for the remote analysis engine
    pub engine: Arc<EngineClient>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: EngineClient, event_bus: EventBus) -> Self {
        Self {
            session: Arc::new(RwLock::new(AuditSession::new())),
            engine: Arc::new(engine),
            event_bus,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::audit_routes())
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .with_state(state)
}

//! Audit API handlers
//!
//! POST /audit submits a URL for analysis; GET /audit returns the current
//! session snapshot.

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::events::AuditEvent;
use crate::models::action_plan::ActionPlanEntry;
use crate::models::audit::{AuditResult, CritiqueItem};
use crate::models::session::{AuditRequest, Generation, SessionState};
use crate::models::severity::{classify, SeverityTier};
use crate::AppState;

/// POST /audit request
#[derive(Debug, Deserialize)]
pub struct SubmitAuditRequest {
    pub url: String,
}

/// POST /audit response
#[derive(Debug, Serialize)]
pub struct SubmitAuditResponse {
    /// Token correlating SSE events with this submission
    pub generation: u64,
    pub state: SessionState,
    pub url: String,
}

/// GET /audit response
#[derive(Debug, Serialize)]
pub struct AuditSnapshot {
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AuditResultView>,
    pub action_plan: Vec<ActionPlanEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureSnapshot>,
    pub transitioned_at: DateTime<Utc>,
}

/// Audit result with display classification attached per critique
///
/// The rendering surface maps tiers to colors and iconography; it never
/// branches on raw status values.
#[derive(Debug, Serialize)]
pub struct AuditResultView {
    pub global_score: f64,
    pub url: String,
    pub critiques: Vec<CritiqueView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_analysis: Option<String>,
}

/// One critique plus its severity tiers
#[derive(Debug, Serialize)]
pub struct CritiqueView {
    #[serde(flatten)]
    pub item: CritiqueItem,
    pub color_tier: SeverityTier,
    pub dot_tier: SeverityTier,
}

impl AuditResultView {
    fn from_result(result: &AuditResult) -> Self {
        let critiques = result
            .critiques
            .iter()
            .map(|item| {
                let classification = classify(item.status);
                CritiqueView {
                    item: item.clone(),
                    color_tier: classification.color_tier,
                    dot_tier: classification.dot_tier,
                }
            })
            .collect();

        Self {
            global_score: result.global_score,
            url: result.url.clone(),
            critiques,
            narrative_analysis: result.narrative_analysis.clone(),
        }
    }
}

/// Failure details within a snapshot
#[derive(Debug, Serialize)]
pub struct FailureSnapshot {
    /// "transport" or "validation"
    pub category: String,
    pub message: String,
}

/// POST /audit
///
/// Accepts a URL, moves the session to pending and spawns the engine
/// call. Returns 400 for an empty URL, 409 while an audit is in flight.
pub async fn submit_audit(
    State(state): State<AppState>,
    Json(request): Json<SubmitAuditRequest>,
) -> ApiResult<Json<SubmitAuditResponse>> {
    let url = request.url.clone();

    let generation = {
        let mut session = state.session.write().await;
        session.submit(AuditRequest::new(request.url))?
    };

    tracing::info!(generation = generation.0, url = %url, "Audit submission accepted");

    let _ = state.event_bus.emit(AuditEvent::AuditStarted {
        generation: generation.0,
        url: url.clone(),
        timestamp: Utc::now(),
    });

    // The engine round trip runs in the background; the generation token
    // keeps a superseded response from touching newer session state.
    let task_state = state.clone();
    let task_url = url.clone();
    tokio::spawn(async move {
        run_audit(task_state, generation, task_url).await;
    });

    Ok(Json(SubmitAuditResponse {
        generation: generation.0,
        state: SessionState::Pending,
        url,
    }))
}

/// GET /audit
///
/// Current session state, the result and derived action plan when ready,
/// the failure reason when failed.
pub async fn audit_snapshot(State(state): State<AppState>) -> Json<AuditSnapshot> {
    let session = state.session.read().await;

    Json(AuditSnapshot {
        state: session.state(),
        url: session.url().map(str::to_string),
        result: session.result().map(AuditResultView::from_result),
        action_plan: session.action_plan().to_vec(),
        failure: session.failure().map(|f| FailureSnapshot {
            category: f.category().to_string(),
            message: f.to_string(),
        }),
        transitioned_at: session.transitioned_at(),
    })
}

/// Background task: one engine round trip, applied under the session lock
async fn run_audit(state: AppState, generation: Generation, url: String) {
    match state.engine.analyze(&url).await {
        Ok(payload) => {
            let mut session = state.session.write().await;
            if !session.complete(generation, &payload) {
                tracing::debug!(generation = generation.0, "Discarded stale engine response");
                return;
            }

            if let Some(result) = session.result() {
                tracing::info!(
                    generation = generation.0,
                    url = %result.url,
                    global_score = result.global_score,
                    critiques = result.critiques.len(),
                    "Audit ready"
                );
                let _ = state.event_bus.emit(AuditEvent::AuditCompleted {
                    generation: generation.0,
                    url: result.url.clone(),
                    global_score: result.global_score,
                    critique_count: result.critiques.len(),
                    action_plan_size: session.action_plan().len(),
                    timestamp: Utc::now(),
                });
            } else if let Some(failure) = session.failure() {
                tracing::warn!(
                    generation = generation.0,
                    url = %url,
                    error = %failure,
                    "Engine payload failed validation"
                );
                let _ = state.event_bus.emit(AuditEvent::AuditFailed {
                    generation: generation.0,
                    category: failure.category().to_string(),
                    message: failure.to_string(),
                    timestamp: Utc::now(),
                });
            }
        }
        Err(err) => {
            tracing::warn!(generation = generation.0, url = %url, error = %err, "Engine call failed");

            let mut session = state.session.write().await;
            if session.fail(generation, err.to_string()) {
                let _ = state.event_bus.emit(AuditEvent::AuditFailed {
                    generation: generation.0,
                    category: "transport".to_string(),
                    message: err.to_string(),
                    timestamp: Utc::now(),
                });
            } else {
                tracing::debug!(generation = generation.0, "Discarded stale engine failure");
            }
        }
    }
}

/// Build audit routes
pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/audit", post(submit_audit).get(audit_snapshot))
}

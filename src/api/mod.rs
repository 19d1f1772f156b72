//! HTTP API handlers

mod audit;
mod health;
mod sse;

pub use audit::{
    audit_routes, AuditResultView, AuditSnapshot, CritiqueView, SubmitAuditRequest,
    SubmitAuditResponse,
};
pub use health::health_routes;
pub use sse::event_stream;

//! webaudit - Website Audit Service
//!
//! Accepts a website URL, forwards it to the remote analysis engine, and
//! exposes the validated result, severity classification and derived
//! action plan over HTTP + SSE.

use anyhow::Result;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use webaudit::config::ServiceConfig;
use webaudit::events::EventBus;
use webaudit::services::EngineClient;
use webaudit::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting webaudit (Website Audit) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::load()?;
    info!("Analysis engine endpoint: {}", config.engine_url);

    let engine = EngineClient::new(
        config.engine_url.as_str(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    // Event bus for SSE broadcasting
    let event_bus = EventBus::new(100);

    let state = AppState::new(engine, event_bus);
    let app = webaudit::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr.as_str()).await?;
    info!("Listening on http://{}", config.listen_addr);
    info!("Health check: http://{}/health", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

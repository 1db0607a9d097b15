//! toolplan-service: HTTP entry point for the tool planner.
//!
//! Reads configuration from environment variables (and `.env`):
//!   LLM_API_KEY          model API key (required, falls back to GROQ_API_KEY)
//!   LLM_PROVIDER         groq | openai (default: groq)
//!   PLANNER_BIND_ADDR    listen address (default: 0.0.0.0:8088)
//!
//! See `PlannerSettings` for the full list.

use anyhow::Context;
use tokio::net::TcpListener;
use toolplan_llm::create_provider;
use toolplan_service::{build_router, AppState, PlanOrchestrator, PlannerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,toolplan_service=debug".into()),
        )
        .init();

    let settings = PlannerSettings::from_env().context("invalid configuration")?;
    tracing::info!(settings = ?settings, "configuration loaded");
    if !settings.strict_json {
        tracing::debug!("PLANNER_STRICT_JSON=false has no effect; output is always parsed as JSON");
    }

    let provider = create_provider(settings.provider_config())
        .map_err(|e| anyhow::anyhow!("failed to create model provider: {}", e))?;
    let orchestrator = PlanOrchestrator::from_settings(&settings, provider);
    let app = build_router(AppState::new(orchestrator));

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", settings.bind_addr))?;
    tracing::info!(
        "toolplan-service listening on {} (provider={}, model={})",
        settings.bind_addr,
        settings.provider,
        settings.model
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("toolplan-service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

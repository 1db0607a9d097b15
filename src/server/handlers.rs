//! Request handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use toolplan_core::{PlannerInput, ToolPlan};
use tracing::debug;

use super::error::ApiError;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "toolplan-service";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub provider: String,
    pub model: String,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let orchestrator = state.orchestrator();
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        provider: orchestrator.provider_name().to_string(),
        model: orchestrator.model().to_string(),
    })
}

/// POST /v1/plan (and /plan)
///
/// The raw body is decoded here so malformed JSON is reported in the same
/// envelope as every other planner failure.
pub async fn plan(State(state): State<AppState>, body: Bytes) -> Result<Json<ToolPlan>, ApiError> {
    let input = parse_planner_input(&body)?;
    debug!(
        conversation_id = input.meta.conversation_id.as_deref().unwrap_or(""),
        max_steps = input.constraints.max_steps,
        "plan request"
    );

    let plan = state.orchestrator().generate_plan(&input).await?;
    Ok(Json(plan))
}

/// Decode and validate a planner input document.
pub fn parse_planner_input(body: &[u8]) -> AppResult<PlannerInput> {
    let input: PlannerInput = serde_json::from_slice(body)
        .map_err(|e| AppError::input_validation(format!("invalid request body: {}", e)))?;
    input.validate()?;
    Ok(input)
}

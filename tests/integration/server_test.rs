//! HTTP Boundary Integration Tests
//!
//! Exercises the axum router in-process with `tower::ServiceExt::oneshot`:
//! - `POST /v1/plan` and the `/plan` alias
//! - Error envelopes for input, transport, and exhaustion failures
//! - `GET /health`

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use toolplan_llm::LlmError;
use toolplan_service::{build_router, AppState, PlanOrchestrator, PlannerSettings};

use super::support::{planner_input_json, ScriptedProvider, VALID_PLAN};

fn app(provider: Arc<ScriptedProvider>) -> Router {
    let settings = PlannerSettings::default();
    build_router(AppState::new(PlanOrchestrator::from_settings(
        &settings, provider,
    )))
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_plan_returns_tool_plan() {
    let provider = ScriptedProvider::with_texts(&[VALID_PLAN]);
    let resp = app(provider)
        .oneshot(post_json("/v1/plan", planner_input_json(5).to_string()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["schema"], "tool_plan.v1");
    assert_eq!(body["steps"][0]["tool"], "finance.getBudgetSnapshot");
    assert_eq!(body["uiIntent"]["component_tree"]["name"], "column");
    assert_eq!(
        body["uiIntent"]["component_tree"]["children"][0]["name"],
        "KpiCard"
    );
}

#[tokio::test]
async fn test_plan_alias_route() {
    let provider = ScriptedProvider::with_texts(&[VALID_PLAN]);
    let resp = app(provider)
        .oneshot(post_json("/plan", planner_input_json(5).to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_body_is_input_validation_error() {
    let provider = ScriptedProvider::with_texts(&[VALID_PLAN]);
    let resp = app(provider.clone())
        .oneshot(post_json("/v1/plan", "{\"userPrompt\": "))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "InputValidationError");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Planner failed: InputValidationError: "));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_out_of_range_max_steps_is_rejected_before_model_call() {
    let provider = ScriptedProvider::with_texts(&[VALID_PLAN]);
    let resp = app(provider.clone())
        .oneshot(post_json("/v1/plan", planner_input_json(50).to_string()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "InputValidationError");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("constraints.maxSteps"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_transport_error_envelope() {
    let provider = ScriptedProvider::with_responses(vec![Err(LlmError::ServerError {
        message: "upstream unavailable".to_string(),
        status: Some(503),
    })]);
    let resp = app(provider)
        .oneshot(post_json("/v1/plan", planner_input_json(5).to_string()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "TransportError");
    assert_eq!(
        body["error"]["message"],
        "Planner failed: TransportError: Server error (503): upstream unavailable"
    );
}

#[tokio::test]
async fn test_exhausted_error_envelope() {
    let invalid = r#"{"rationale": "ok", "steps": [{"id": "step_1"}]}"#;
    let provider = ScriptedProvider::with_texts(&[invalid, invalid, invalid]);
    let resp = app(provider.clone())
        .oneshot(post_json("/v1/plan", planner_input_json(5).to_string()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "PlannerExhaustedError");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Planner failed: PlannerExhaustedError: "));
    assert!(message.contains("steps.0.tool: field required"));
    assert_eq!(provider.calls().len(), 3);
}

#[tokio::test]
async fn test_health() {
    let provider = ScriptedProvider::with_texts(&[]);
    let resp = app(provider.clone())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "toolplan-service");
    assert_eq!(body["provider"], "scripted");
    assert_eq!(body["model"], "scripted-model");
    assert!(provider.calls().is_empty());
}

//! Planner Pipeline Integration Tests
//!
//! Drives `PlanOrchestrator` through the model-backed repairer with a
//! scripted provider:
//! - First-try success with normalization
//! - Repair after unparseable output
//! - Budget exhaustion with an exact number of model calls
//! - maxSteps clamping

use std::sync::Arc;

use toolplan_core::{NodeKind, PlannerInput};
use toolplan_llm::LlmError;
use toolplan_service::services::planner::{PLANNER_SYSTEM_PROMPT, REPAIR_SYSTEM_PROMPT};
use toolplan_service::{AppError, PlanOrchestrator, PlannerSettings};

use super::support::{planner_input_json, ScriptedProvider, VALID_PLAN};

fn planner(provider: Arc<ScriptedProvider>, repair_attempts: u32) -> PlanOrchestrator {
    let settings = PlannerSettings {
        repair_attempts,
        ..Default::default()
    };
    PlanOrchestrator::from_settings(&settings, provider)
}

fn input(max_steps: u32) -> PlannerInput {
    serde_json::from_value(planner_input_json(max_steps)).unwrap()
}

// ============================================================================
// Success paths
// ============================================================================

#[tokio::test]
async fn test_first_response_is_normalized_and_returned() {
    let provider = ScriptedProvider::with_texts(&[VALID_PLAN]);
    let plan = planner(provider.clone(), 2)
        .generate_plan(&input(5))
        .await
        .unwrap();

    let ui = plan.ui_intent.as_ref().expect("uiIntent synthesized from components");
    assert_eq!(ui.component_tree.kind, NodeKind::Layout);
    assert_eq!(ui.component_tree.name, "column");
    assert_eq!(ui.component_names(), vec!["KpiCard"]);
    assert!(ui.bindings.is_none());

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_deref(), Some(PLANNER_SYSTEM_PROMPT));
    assert!(calls[0].1.contains("How much budget do I have left this month?"));
    assert!(calls[0].1.contains("finance.getBudgetSnapshot"));
}

#[tokio::test]
async fn test_no_tool_answer_plan() {
    let provider = ScriptedProvider::with_texts(&[r#"{
        "schema": "tool_plan.v1",
        "rationale": "General knowledge question; tools are not required.",
        "steps": [],
        "uiIntent": null,
        "safety": {"needAssistantAnswer": true, "reason": "Answer from knowledge."}
    }"#]);
    let plan = planner(provider, 2).generate_plan(&input(5)).await.unwrap();
    assert!(plan.steps.is_empty());
    assert!(plan.ui_intent.is_none());
    assert!(plan.needs_assistant_answer());
}

#[tokio::test]
async fn test_integral_float_ttl_needs_no_repair() {
    let provider = ScriptedProvider::with_texts(&[r#"{
        "schema": "tool_plan.v1",
        "rationale": "Cached budget lookup.",
        "steps": [{"id": "step_1", "tool": "finance.getBudgetSnapshot", "args": {}, "cache_ttl_seconds": 60.0}],
        "uiIntent": null
    }"#]);
    let plan = planner(provider.clone(), 2)
        .generate_plan(&input(5))
        .await
        .unwrap();
    assert_eq!(plan.steps[0].cache_ttl_seconds, Some(60));
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn test_unparseable_output_is_repaired_once() {
    let provider = ScriptedProvider::with_texts(&[
        "Step one: call the budget tool. Step two: show a card.",
        VALID_PLAN,
    ]);
    let plan = planner(provider.clone(), 2)
        .generate_plan(&input(5))
        .await
        .unwrap();
    assert_eq!(plan.steps[0].id, "step_1");

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0.as_deref(), Some(REPAIR_SYSTEM_PROMPT));
    assert!(calls[1].1.contains("JSON parse failed"));
    assert!(calls[1].1.contains("Step one: call the budget tool."));
}

#[tokio::test]
async fn test_invalid_plan_is_repaired_with_normalized_document() {
    let provider = ScriptedProvider::with_texts(&[
        r#"{"rationale": "r", "steps": [{"id": "step_1"}]}"#,
        VALID_PLAN,
    ]);
    planner(provider.clone(), 2)
        .generate_plan(&input(5))
        .await
        .unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    let repair_prompt = &calls[1].1;
    assert!(repair_prompt.contains("steps.0.tool: field required"));
    // The repair sees the normalized document, with defaults already filled in.
    assert!(repair_prompt.contains("\"schema\":\"tool_plan.v1\""));
    assert!(repair_prompt.contains("\"cache_ttl_seconds\":null"));
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_exhaustion_makes_exactly_one_plus_budget_calls() {
    let invalid = r#"{"rationale": "", "steps": []}"#;
    let provider = ScriptedProvider::with_texts(&[invalid, invalid, invalid, VALID_PLAN]);

    let err = planner(provider.clone(), 2)
        .generate_plan(&input(5))
        .await
        .unwrap_err();

    match err {
        AppError::PlannerExhausted { attempts, last_error } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("rationale: string should not be empty"));
        }
        other => panic!("expected PlannerExhausted, got {:?}", other),
    }
    assert_eq!(provider.calls().len(), 3);
}

#[tokio::test]
async fn test_parse_repair_spends_shared_budget() {
    let invalid = r#"{"rationale": "", "steps": []}"#;
    let provider = ScriptedProvider::with_texts(&["not json", invalid, invalid, VALID_PLAN]);

    let err = planner(provider.clone(), 2)
        .generate_plan(&input(5))
        .await
        .unwrap_err();

    match err {
        AppError::PlannerExhausted { attempts, last_error } => {
            assert_eq!(attempts, 2);
            assert!(last_error.contains("rationale: string should not be empty"));
        }
        other => panic!("expected PlannerExhausted, got {:?}", other),
    }
    assert_eq!(provider.calls().len(), 3);
}

#[tokio::test]
async fn test_unparseable_repair_fails_run() {
    let provider = ScriptedProvider::with_texts(&["nope", "still nope"]);
    let err = planner(provider.clone(), 2)
        .generate_plan(&input(5))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ParseError");
    assert_eq!(provider.calls().len(), 2);
}

#[tokio::test]
async fn test_transport_failure_stops_run() {
    let provider = ScriptedProvider::with_responses(vec![Err(LlmError::RateLimited {
        message: "slow down".to_string(),
        retry_after: Some(5),
    })]);
    let err = planner(provider.clone(), 2)
        .generate_plan(&input(5))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "TransportError");
    assert!(err.to_string().contains("Rate limited"));
    assert_eq!(provider.calls().len(), 1);
}

// ============================================================================
// Constraints
// ============================================================================

#[tokio::test]
async fn test_requested_max_steps_is_clamped_to_ceiling() {
    let provider = ScriptedProvider::with_texts(&[VALID_PLAN]);
    let mut request = input(5);
    request.constraints.max_steps = 50;

    planner(provider.clone(), 2).generate_plan(&request).await.unwrap();

    let prompt = &provider.calls()[0].1;
    assert!(prompt.contains("\"maxSteps\": 8"));
    assert!(!prompt.contains("\"maxSteps\": 50"));
}

#[tokio::test]
async fn test_smaller_request_is_kept() {
    let provider = ScriptedProvider::with_texts(&[VALID_PLAN]);
    planner(provider.clone(), 2).generate_plan(&input(3)).await.unwrap();
    assert!(provider.calls()[0].1.contains("\"maxSteps\": 3"));
}

//! Scripted LLM provider shared by the integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use toolplan_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig,
};

/// A recorded call: (system prompt, user prompt).
pub type RecordedCall = (Option<String>, String);

/// Returns queued responses in order and records every call.
pub struct ScriptedProvider {
    config: ProviderConfig,
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn with_texts(texts: &[&str]) -> Arc<Self> {
        Self::with_responses(
            texts
                .iter()
                .map(|t| Ok(LlmResponse::text(*t, "scripted-model")))
                .collect(),
        )
    }

    pub fn with_responses(responses: Vec<LlmResult<LlmResponse>>) -> Arc<Self> {
        Arc::new(Self {
            config: ProviderConfig {
                model: "scripted-model".to_string(),
                ..Default::default()
            },
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let user = messages
            .iter()
            .map(|m| m.joined_text())
            .collect::<Vec<_>>()
            .join("\n");
        self.calls.lock().unwrap().push((system, user));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(LlmError::Other {
                message: "No more scripted responses available".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

pub const VALID_PLAN: &str = r#"{
    "schema": "tool_plan.v1",
    "rationale": "Need budget data to answer and show it.",
    "steps": [
        {"id": "step_1", "tool": "finance.getBudgetSnapshot", "args": {}, "cache_ttl_seconds": null}
    ],
    "uiIntent": {
        "components": [{"name": "KpiCard", "props": {"title": "Budget left"}}]
    },
    "safety": {"needAssistantAnswer": false, "reason": ""}
}"#;

pub fn planner_input_json(max_steps: u32) -> serde_json::Value {
    serde_json::json!({
        "schema": "planner_input.v1",
        "userPrompt": "How much budget do I have left this month?",
        "conversationContext": {"locale": "en-US"},
        "toolCatalog": {"tools": [
            {"name": "finance.getBudgetSnapshot", "description": "Returns user budget info"},
            {"name": "shop.searchProducts", "description": "Search products by query and filters"}
        ]},
        "uiComponentCatalog": {"components": [{"name": "KpiCard"}, {"name": "DataTableCard"}]},
        "constraints": {"maxSteps": max_steps},
        "meta": {"conversationId": "conv_123", "userId": "user_1"}
    })
}

//! Defect Repairer
//!
//! Asks the model to fix its own invalid output. One model call per repair
//! round; the result is parsed but not normalized or validated here.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::json_extract::parse_model_json;
use super::model_client::ModelClient;
use crate::utils::error::{AppError, AppResult};

/// System instruction for repair calls.
pub const REPAIR_SYSTEM_PROMPT: &str = "You are a JSON repair assistant. Output ONLY valid JSON matching the required schema. No markdown, no extra text.";

/// Turns an invalid document plus a defect description into a new document.
#[async_trait]
pub trait DefectRepairer: Send + Sync {
    async fn repair(&self, document: &str, defect: &str) -> AppResult<Value>;
}

/// Build the repair user prompt.
pub fn build_repair_prompt(document: &str, defect: &str) -> String {
    format!(
        "The previous JSON is invalid.\n\n\
         Validation error:\n{}\n\n\
         Here is the invalid JSON (or near-JSON):\n{}\n\n\
         Return ONLY corrected JSON with required fields: schema, rationale, \
         steps[].id, steps[].tool, steps[].args, uiIntent.component_tree or uiIntent=null.",
        defect, document
    )
}

/// Repairer backed by the planning model.
pub struct ModelRepairer {
    client: ModelClient,
}

impl ModelRepairer {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DefectRepairer for ModelRepairer {
    async fn repair(&self, document: &str, defect: &str) -> AppResult<Value> {
        let prompt = build_repair_prompt(document, defect);
        let text = self.client.complete(REPAIR_SYSTEM_PROMPT, &prompt).await?;
        debug!(len = text.len(), "repair response received");

        parse_model_json(&text)
            .map_err(|e| AppError::parse(format!("repair output is not valid JSON: {}", e)))
    }
}

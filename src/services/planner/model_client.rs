//! Model Client
//!
//! One round trip to the hosted model per call. Decoding parameters come from
//! the provider configuration; the call is bounded by a timeout. Failures of
//! any kind surface as `AppError::Transport` and are never retried here.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use toolplan_llm::{LlmProvider, LlmRequestOptions, LlmResponse, Message};

use crate::utils::error::{AppError, AppResult};

/// Thin wrapper over an `LlmProvider` that returns the response text.
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Send `system` + `user` and return the response text.
    pub async fn complete(&self, system: &str, user: &str) -> AppResult<String> {
        let messages = vec![Message::user(user)];
        let call = self.provider.send_message(
            messages,
            Some(system.to_string()),
            LlmRequestOptions::default(),
        );

        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                AppError::transport(format!(
                    "model call timed out after {}s",
                    self.timeout.as_secs_f32()
                ))
            })??;

        extract_response_text(&response)
    }
}

/// The response text, falling back to the thinking field for reasoning
/// models that leave `content` empty.
fn extract_response_text(response: &LlmResponse) -> AppResult<String> {
    if response.content.as_deref().map_or(true, |t| t.trim().is_empty())
        && response.text_output().is_some()
    {
        debug!(model = %response.model, "content field empty, falling back to thinking field");
    }

    response.text_output().map(str::to_string).ok_or_else(|| {
        AppError::transport(format!(
            "model response contained no text content (model: {}, stop_reason: {:?})",
            response.model, response.stop_reason
        ))
    })
}

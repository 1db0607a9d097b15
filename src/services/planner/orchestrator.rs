//! Plan Orchestrator
//!
//! Drives a single planning run:
//!
//! ```text
//! Drafting -> Parsing -> Normalizing -> Validating -> Done
//!                 |                          |
//!                 +-------> Repairing <------+
//! ```
//!
//! Repairing loops back through parsing, normalizing and validating, and is
//! bounded by the repair budget. An initial parse failure spends one round of
//! that budget. Exhaustion after `n` repair rounds means exactly `n + 1`
//! validation attempts when the first response parsed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use toolplan_core::{PlannerInput, ToolPlan};
use toolplan_llm::LlmProvider;

use super::json_extract::parse_model_json;
use super::model_client::ModelClient;
use super::normalizer::normalize_tool_plan;
use super::prompt::{build_planner_prompt, PLANNER_SYSTEM_PROMPT};
use super::repairer::{DefectRepairer, ModelRepairer};
use super::validator::{audit_plan, validate_tool_plan};
use crate::models::PlannerSettings;
use crate::utils::error::{AppError, AppResult};

/// Stateless planner shared across requests.
pub struct PlanOrchestrator {
    client: ModelClient,
    repairer: Arc<dyn DefectRepairer>,
    max_steps: u32,
    repair_attempts: u32,
}

impl PlanOrchestrator {
    pub fn new(
        client: ModelClient,
        repairer: Arc<dyn DefectRepairer>,
        max_steps: u32,
        repair_attempts: u32,
    ) -> Self {
        Self {
            client,
            repairer,
            max_steps,
            repair_attempts,
        }
    }

    /// Wire a model-backed orchestrator from settings and a provider.
    pub fn from_settings(settings: &PlannerSettings, provider: Arc<dyn LlmProvider>) -> Self {
        let client = ModelClient::new(provider, Duration::from_secs(settings.timeout_seconds));
        let repairer = Arc::new(ModelRepairer::new(client.clone()));
        Self::new(client, repairer, settings.max_steps, settings.repair_attempts)
    }

    pub fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Produce a validated plan for `input`.
    ///
    /// The input is assumed to have passed boundary validation; `maxSteps` is
    /// clamped to the ceiling here regardless of what was requested.
    pub async fn generate_plan(&self, input: &PlannerInput) -> AppResult<ToolPlan> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "plan_run",
            %run_id,
            conversation_id = input.meta.conversation_id.as_deref().unwrap_or("")
        );
        self.run(input).instrument(span).await
    }

    async fn run(&self, input: &PlannerInput) -> AppResult<ToolPlan> {
        let mut effective = input.clone();
        effective.constraints = input.constraints.clamped(self.max_steps);

        debug!(
            state = "drafting",
            requested_max_steps = input.constraints.max_steps,
            max_steps = effective.constraints.max_steps
        );
        let prompt = build_planner_prompt(&effective);
        let text = self
            .client
            .complete(PLANNER_SYSTEM_PROMPT, &prompt)
            .await
            .inspect_err(|e| warn!(error = %e, "planning call failed"))?;

        let mut budget = RepairBudget::new(self.repair_attempts);

        debug!(state = "parsing", len = text.len());
        let raw = match parse_model_json(&text) {
            Ok(value) => value,
            Err(e) => {
                let defect = format!("JSON parse failed: {}", e);
                let Some(round) = budget.take() else {
                    warn!(error = %defect, "model output is not JSON and no repair budget remains");
                    return Err(AppError::parse(defect));
                };
                info!(round, defect = %defect, "repairing unparseable output");
                self.repairer.repair(&text, &defect).await?
            }
        };

        debug!(state = "normalizing");
        let mut doc = normalize_tool_plan(&raw);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            debug!(state = "validating", attempt = attempts);

            let detail = match validate_tool_plan(&doc) {
                Ok(plan) => {
                    for finding in audit_plan(&plan, &effective) {
                        warn!(finding = %finding, "plan audit");
                    }
                    debug!(state = "done", steps = plan.steps.len(), attempts);
                    return Ok(plan);
                }
                Err(AppError::SchemaValidation(detail)) => detail,
                Err(other) => return Err(other),
            };

            let Some(round) = budget.take() else {
                warn!(attempts, error = %detail, "repair budget exhausted");
                return Err(AppError::PlannerExhausted {
                    attempts,
                    last_error: detail,
                });
            };

            info!(round, attempt = attempts, "repairing invalid plan");
            let repaired = self.repairer.repair(&doc.to_string(), &detail).await?;
            debug!(state = "normalizing", round);
            doc = normalize_tool_plan(&repaired);
        }
    }
}

/// Remaining repair rounds for one run.
struct RepairBudget {
    total: u32,
    used: u32,
}

impl RepairBudget {
    fn new(total: u32) -> Self {
        Self { total, used: 0 }
    }

    /// Consume a round, returning its 1-based number.
    fn take(&mut self) -> Option<u32> {
        (self.used < self.total).then(|| {
            self.used += 1;
            self.used
        })
    }
}

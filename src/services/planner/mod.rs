//! Tool Planner
//!
//! The plan-generation pipeline: prompt construction, model round trips,
//! JSON extraction, normalization, validation, and bounded self-repair.

pub mod json_extract;
pub mod model_client;
pub mod normalizer;
pub mod orchestrator;
pub mod prompt;
pub mod repairer;
pub mod validator;

pub use json_extract::parse_model_json;
pub use model_client::ModelClient;
pub use normalizer::normalize_tool_plan;
pub use orchestrator::PlanOrchestrator;
pub use prompt::{build_planner_prompt, PLANNER_SYSTEM_PROMPT};
pub use repairer::{build_repair_prompt, DefectRepairer, ModelRepairer, REPAIR_SYSTEM_PROMPT};
pub use validator::{audit_plan, validate_tool_plan};

//! Tool Planner Core
//!
//! Data contracts and error types for the planner workspace. This crate has
//! no I/O and no dependencies on model providers or the HTTP layer.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `schema` - Planner input and tool plan documents (`PlannerInput`, `ToolPlan`, ...)

pub mod error;
pub mod schema;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Plan Schema ────────────────────────────────────────────────────────
pub use schema::{
    Binding, ComponentNode, NodeKind, PlannerConstraints, PlannerInput, PlannerMeta,
    RefreshAction, Subscription, ToolPlan, ToolStep, UiIntent, DEFAULT_MAX_STEPS, MAX_MAX_STEPS,
    MIN_MAX_STEPS, PLANNER_INPUT_SCHEMA, TOOL_PLAN_SCHEMA,
};

//! Plan Schema
//!
//! Data contracts exchanged with the planner: the `planner_input.v1` request
//! document and the `tool_plan.v1` result document. Field names follow the
//! wire format (camelCase for the input, mixed for the plan).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// Schema tag carried by every planner input.
pub const PLANNER_INPUT_SCHEMA: &str = "planner_input.v1";

/// Schema tag carried by every tool plan.
pub const TOOL_PLAN_SCHEMA: &str = "tool_plan.v1";

/// Lowest accepted `constraints.maxSteps`.
pub const MIN_MAX_STEPS: u32 = 1;

/// Highest accepted `constraints.maxSteps`.
pub const MAX_MAX_STEPS: u32 = 32;

/// `constraints.maxSteps` when the caller omits it.
pub const DEFAULT_MAX_STEPS: u32 = 8;

fn default_input_schema() -> String {
    PLANNER_INPUT_SCHEMA.to_string()
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

// ============================================================================
// Planner input
// ============================================================================

/// Request document for a single planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerInput {
    #[serde(default = "default_input_schema")]
    pub schema: String,
    pub user_prompt: String,
    #[serde(default)]
    pub conversation_context: Map<String, Value>,
    /// Expected shape: `{"tools": [{"name": ..., "description": ...}]}`
    #[serde(default)]
    pub tool_catalog: Map<String, Value>,
    /// Expected shape: `{"components": [{"name": ..., ...}]}`
    #[serde(default)]
    pub ui_component_catalog: Map<String, Value>,
    #[serde(default)]
    pub constraints: PlannerConstraints,
    #[serde(default)]
    pub meta: PlannerMeta,
}

impl PlannerInput {
    /// Create an input with default catalogs and constraints.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            schema: default_input_schema(),
            user_prompt: user_prompt.into(),
            conversation_context: Map::new(),
            tool_catalog: Map::new(),
            ui_component_catalog: Map::new(),
            constraints: PlannerConstraints::default(),
            meta: PlannerMeta::default(),
        }
    }

    /// Check the schema tag and the `maxSteps` range.
    pub fn validate(&self) -> CoreResult<()> {
        if self.schema != PLANNER_INPUT_SCHEMA {
            return Err(CoreError::validation(format!(
                "schema: expected \"{}\", got \"{}\"",
                PLANNER_INPUT_SCHEMA, self.schema
            )));
        }
        let max_steps = self.constraints.max_steps;
        if !(MIN_MAX_STEPS..=MAX_MAX_STEPS).contains(&max_steps) {
            return Err(CoreError::validation(format!(
                "constraints.maxSteps: must be between {} and {}, got {}",
                MIN_MAX_STEPS, MAX_MAX_STEPS, max_steps
            )));
        }
        Ok(())
    }

    /// Names listed under `toolCatalog.tools[].name`.
    pub fn tool_names(&self) -> Vec<&str> {
        catalog_names(&self.tool_catalog, "tools")
    }

    /// Names listed under `uiComponentCatalog.components[].name`.
    pub fn component_names(&self) -> Vec<&str> {
        catalog_names(&self.ui_component_catalog, "components")
    }
}

fn catalog_names<'a>(catalog: &'a Map<String, Value>, key: &str) -> Vec<&'a str> {
    catalog
        .get(key)
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("name").and_then(|n| n.as_str()))
                .collect()
        })
        .unwrap_or_default()
}

/// Caller-supplied limits for the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerConstraints {
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

impl Default for PlannerConstraints {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl PlannerConstraints {
    /// Constraints with `maxSteps` capped at `ceiling`.
    pub fn clamped(&self, ceiling: u32) -> Self {
        Self {
            max_steps: self.max_steps.min(ceiling),
        }
    }
}

/// Opaque caller identifiers, used only for log correlation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerMeta {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

// ============================================================================
// Tool plan
// ============================================================================

/// Validated planner output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPlan {
    pub schema: String,
    pub rationale: String,
    #[serde(default)]
    pub steps: Vec<ToolStep>,
    #[serde(rename = "uiIntent", default)]
    pub ui_intent: Option<UiIntent>,
    #[serde(default)]
    pub safety: Option<Map<String, Value>>,
}

impl ToolPlan {
    /// Whether the plan asks the caller to answer without tools.
    pub fn needs_assistant_answer(&self) -> bool {
        self.safety
            .as_ref()
            .and_then(|s| s.get("needAssistantAnswer"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// One tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStep {
    /// Unique within the plan (e.g. `step_1`).
    pub id: String,
    pub tool: String,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub cache_ttl_seconds: Option<i64>,
}

/// Abstract UI layout the downstream composer turns into a rendered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiIntent {
    pub component_tree: ComponentNode,
    #[serde(default)]
    pub bindings: Option<Vec<Binding>>,
    #[serde(default)]
    pub subscriptions: Option<Vec<Subscription>>,
}

impl UiIntent {
    /// Component names used anywhere in the tree, depth-first.
    pub fn component_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.component_tree.collect_component_names(&mut names);
        names
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Layout,
    Component,
}

/// A node of the component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default)]
    pub children: Vec<ComponentNode>,
}

impl ComponentNode {
    fn collect_component_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.kind == NodeKind::Component {
            out.push(&self.name);
        }
        for child in &self.children {
            child.collect_component_names(out);
        }
    }
}

/// Maps a tool result key onto a component prop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub component_path: String,
    pub prop: String,
    pub from: String,
}

/// Event-driven refresh declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub event: String,
    pub refresh: Vec<RefreshAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshAction {
    pub tool: String,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub patch_path: Option<String>,
}

//! Plan Validator
//!
//! Structural validation of normalized model output against the tool plan
//! shape. Every defect is reported with a dotted path so the repair prompt can
//! point the model at the exact field (`steps.1.tool: field required`).

use std::collections::HashSet;

use serde_json::{Map, Value};
use toolplan_core::{PlannerInput, ToolPlan, TOOL_PLAN_SCHEMA};

use crate::utils::error::{AppError, AppResult};

/// Validate a document and convert it into a typed plan.
pub fn validate_tool_plan(doc: &Value) -> AppResult<ToolPlan> {
    let mut defects = Defects::default();
    check_plan(doc, &mut defects);

    if !defects.is_empty() {
        return Err(AppError::schema_validation(defects.render()));
    }

    serde_json::from_value::<ToolPlan>(with_integer_ttls(doc)).map_err(|e| {
        let mut defects = Defects::default();
        defects.push("(root)", e.to_string());
        AppError::schema_validation(defects.render())
    })
}

/// Copy of `doc` with integral float TTLs (`60.0`) rewritten as integers.
fn with_integer_ttls(doc: &Value) -> Value {
    let mut doc = doc.clone();
    if let Some(steps) = doc.get_mut("steps").and_then(Value::as_array_mut) {
        for step in steps.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(ttl) = step.get_mut("cache_ttl_seconds") {
                if let Some(secs) = integral_ttl(ttl) {
                    *ttl = Value::from(secs);
                }
            }
        }
    }
    doc
}

/// Whole-number value of a TTL, whether written as `60` or `60.0`.
fn integral_ttl(value: &Value) -> Option<i64> {
    if let Some(secs) = value.as_i64() {
        return Some(secs);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Catalog consistency findings for a structurally valid plan.
///
/// Advisory only: the caller logs these and still returns the plan. Catalog
/// checks are skipped when the corresponding catalog lists nothing.
pub fn audit_plan(plan: &ToolPlan, input: &PlannerInput) -> Vec<String> {
    let mut findings = Vec::new();

    let tools: HashSet<&str> = input.tool_names().into_iter().collect();
    if !tools.is_empty() {
        for step in &plan.steps {
            if !tools.contains(step.tool.as_str()) {
                findings.push(format!(
                    "step '{}' uses tool '{}' which is not in the tool catalog",
                    step.id, step.tool
                ));
            }
        }
    }

    if let Some(ui) = &plan.ui_intent {
        let components: HashSet<&str> = input.component_names().into_iter().collect();
        if !components.is_empty() {
            for name in ui.component_names() {
                if !components.contains(name) {
                    findings.push(format!(
                        "component '{}' is not in the UI component catalog",
                        name
                    ));
                }
            }
        }
        if plan.steps.is_empty() {
            findings.push("uiIntent is set but the plan has no steps".to_string());
        }
    }

    let max_steps = input.constraints.max_steps as usize;
    if plan.steps.len() > max_steps {
        findings.push(format!(
            "plan has {} steps, above maxSteps {}",
            plan.steps.len(),
            max_steps
        ));
    }

    findings
}

#[derive(Default)]
struct Defects(Vec<(String, String)>);

impl Defects {
    fn push(&mut self, path: impl Into<String>, msg: impl Into<String>) {
        self.0.push((path.into(), msg.into()));
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn render(&self) -> String {
        let mut out = format!("{} validation error(s) for ToolPlan", self.0.len());
        for (path, msg) in &self.0 {
            out.push('\n');
            out.push_str(path);
            out.push_str(": ");
            out.push_str(msg);
        }
        out
    }
}

const REQUIRED: &str = "field required";

fn join(path: &str, key: impl std::fmt::Display) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn check_plan(doc: &Value, defects: &mut Defects) {
    let Some(obj) = doc.as_object() else {
        defects.push("(root)", "input should be a valid dictionary");
        return;
    };

    match obj.get("schema") {
        None => defects.push("schema", REQUIRED),
        Some(Value::String(s)) if s == TOOL_PLAN_SCHEMA => {}
        Some(_) => defects.push("schema", format!("input should be '{}'", TOOL_PLAN_SCHEMA)),
    }

    match obj.get("rationale") {
        None => defects.push("rationale", REQUIRED),
        Some(Value::String(s)) if s.trim().is_empty() => {
            defects.push("rationale", "string should not be empty")
        }
        Some(Value::String(_)) => {}
        Some(_) => defects.push("rationale", "input should be a valid string"),
    }

    match obj.get("steps") {
        None => {}
        Some(Value::Array(steps)) => check_steps(steps, defects),
        Some(_) => defects.push("steps", "input should be a valid list"),
    }

    match obj.get("uiIntent") {
        None | Some(Value::Null) => {}
        Some(Value::Object(ui)) => check_ui_intent(ui, "uiIntent", defects),
        Some(_) => defects.push("uiIntent", "input should be a valid dictionary or null"),
    }

    match obj.get("safety") {
        None | Some(Value::Null) | Some(Value::Object(_)) => {}
        Some(_) => defects.push("safety", "input should be a valid dictionary or null"),
    }
}

fn check_steps(steps: &[Value], defects: &mut Defects) {
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, step) in steps.iter().enumerate() {
        let path = join("steps", i);
        let Some(step) = step.as_object() else {
            defects.push(path, "input should be a valid dictionary");
            continue;
        };

        match step.get("id") {
            None => defects.push(join(&path, "id"), REQUIRED),
            Some(Value::String(id)) if id.trim().is_empty() => {
                defects.push(join(&path, "id"), "string should not be empty")
            }
            Some(Value::String(id)) => {
                if !seen.insert(id.as_str()) {
                    defects.push(join(&path, "id"), format!("duplicate step id '{}'", id));
                }
            }
            Some(_) => defects.push(join(&path, "id"), "input should be a valid string"),
        }

        check_required_string(step, &path, "tool", defects);
        check_optional_object(step, &path, "args", defects);

        match step.get("cache_ttl_seconds") {
            None | Some(Value::Null) => {}
            Some(v) if integral_ttl(v).is_some() => {}
            Some(_) => defects.push(
                join(&path, "cache_ttl_seconds"),
                "input should be a valid integer or null",
            ),
        }
    }
}

fn check_ui_intent(ui: &Map<String, Value>, path: &str, defects: &mut Defects) {
    match ui.get("component_tree") {
        None => defects.push(join(path, "component_tree"), REQUIRED),
        Some(node) => check_node(node, &join(path, "component_tree"), defects),
    }

    match ui.get("bindings") {
        None | Some(Value::Null) => {}
        Some(Value::Array(bindings)) => {
            for (i, binding) in bindings.iter().enumerate() {
                let path = join(&join(path, "bindings"), i);
                match binding.as_object() {
                    Some(b) => {
                        for key in ["componentPath", "prop", "from"] {
                            check_required_string(b, &path, key, defects);
                        }
                    }
                    None => defects.push(path, "input should be a valid dictionary"),
                }
            }
        }
        Some(_) => defects.push(join(path, "bindings"), "input should be a valid list or null"),
    }

    match ui.get("subscriptions") {
        None | Some(Value::Null) => {}
        Some(Value::Array(subs)) => {
            for (i, sub) in subs.iter().enumerate() {
                check_subscription(sub, &join(&join(path, "subscriptions"), i), defects);
            }
        }
        Some(_) => defects.push(
            join(path, "subscriptions"),
            "input should be a valid list or null",
        ),
    }
}

fn check_subscription(sub: &Value, path: &str, defects: &mut Defects) {
    let Some(sub) = sub.as_object() else {
        defects.push(path, "input should be a valid dictionary");
        return;
    };

    check_required_string(sub, path, "event", defects);

    match sub.get("refresh") {
        None => defects.push(join(path, "refresh"), REQUIRED),
        Some(Value::Array(actions)) => {
            for (i, action) in actions.iter().enumerate() {
                let path = join(&join(path, "refresh"), i);
                let Some(action) = action.as_object() else {
                    defects.push(path, "input should be a valid dictionary");
                    continue;
                };
                check_required_string(action, &path, "tool", defects);
                check_optional_object(action, &path, "args", defects);
                match action.get("patchPath") {
                    None | Some(Value::Null) | Some(Value::String(_)) => {}
                    Some(_) => defects.push(
                        join(&path, "patchPath"),
                        "input should be a valid string or null",
                    ),
                }
            }
        }
        Some(_) => defects.push(join(path, "refresh"), "input should be a valid list"),
    }
}

fn check_node(node: &Value, path: &str, defects: &mut Defects) {
    let Some(node) = node.as_object() else {
        defects.push(path, "input should be a valid dictionary");
        return;
    };

    match node.get("type") {
        None => defects.push(join(path, "type"), REQUIRED),
        Some(Value::String(t)) if t == "layout" || t == "component" => {}
        Some(_) => defects.push(join(path, "type"), "input should be 'layout' or 'component'"),
    }

    check_required_string(node, path, "name", defects);
    check_optional_object(node, path, "props", defects);

    match node.get("children") {
        None => {}
        Some(Value::Array(children)) => {
            for (i, child) in children.iter().enumerate() {
                check_node(child, &join(&join(path, "children"), i), defects);
            }
        }
        Some(_) => defects.push(join(path, "children"), "input should be a valid list"),
    }
}

fn check_required_string(obj: &Map<String, Value>, path: &str, key: &str, defects: &mut Defects) {
    match obj.get(key) {
        None => defects.push(join(path, key), REQUIRED),
        Some(Value::String(_)) => {}
        Some(_) => defects.push(join(path, key), "input should be a valid string"),
    }
}

fn check_optional_object(obj: &Map<String, Value>, path: &str, key: &str, defects: &mut Defects) {
    match obj.get(key) {
        None | Some(Value::Object(_)) => {}
        Some(_) => defects.push(join(path, key), "input should be a valid dictionary"),
    }
}

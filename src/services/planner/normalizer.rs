//! Output Normalizer
//!
//! Deterministic fix-ups for common model mistakes, applied before
//! validation. Normalization is total and pure: any JSON value goes in, a new
//! value comes out, and the input is never modified. Applying it twice gives
//! the same result as applying it once.

use serde_json::{json, Map, Value};
use toolplan_core::TOOL_PLAN_SCHEMA;

/// Rationale inserted when the model omits one.
pub const DEFAULT_RATIONALE: &str =
    "Planned tool steps based on the user request and available tools/components.";

/// Normalize a raw model document toward the tool plan structure.
pub fn normalize_tool_plan(raw: &Value) -> Value {
    let mut doc = raw.as_object().cloned().unwrap_or_default();

    doc.entry("schema")
        .or_insert_with(|| Value::String(TOOL_PLAN_SCHEMA.to_string()));
    doc.entry("rationale")
        .or_insert_with(|| Value::String(DEFAULT_RATIONALE.to_string()));

    let steps = normalize_steps(doc.get("steps"));
    doc.insert("steps".to_string(), Value::Array(steps));

    // Absent or null uiIntent leaves safety untouched.
    let ui = match doc.get("uiIntent") {
        None | Some(Value::Null) => {
            doc.insert("uiIntent".to_string(), Value::Null);
            return Value::Object(doc);
        }
        Some(ui) => normalize_ui_intent(ui),
    };
    doc.insert("uiIntent".to_string(), ui);

    doc.entry("safety")
        .or_insert_with(|| Value::Object(Map::new()));

    Value::Object(doc)
}

fn normalize_steps(steps: Option<&Value>) -> Vec<Value> {
    let Some(Value::Array(steps)) = steps else {
        return Vec::new();
    };

    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let position = i + 1;
            match step.as_object() {
                Some(step) => {
                    let mut step = step.clone();
                    step.entry("id")
                        .or_insert_with(|| Value::String(format!("step_{}", position)));
                    step.entry("args")
                        .or_insert_with(|| Value::Object(Map::new()));
                    step.entry("cache_ttl_seconds").or_insert(Value::Null);
                    Value::Object(step)
                }
                None => json!({
                    "id": format!("step_{}", position),
                    "tool": "",
                    "args": {},
                    "cache_ttl_seconds": null,
                }),
            }
        })
        .collect()
}

fn normalize_ui_intent(ui: &Value) -> Value {
    let Some(ui) = ui.as_object() else {
        return Value::Null;
    };
    let mut ui = ui.clone();

    // Models often emit a flat `components` list instead of a tree.
    if !ui.contains_key("component_tree") {
        if let Some(Value::Array(components)) = ui.get("components") {
            let tree = column_layout(components);
            ui.remove("components");
            ui.insert("component_tree".to_string(), tree);
        }
    }

    if !ui.contains_key("component_tree") {
        return Value::Null;
    }

    ui.entry("bindings").or_insert(Value::Null);
    ui.entry("subscriptions").or_insert(Value::Null);
    Value::Object(ui)
}

fn column_layout(components: &[Value]) -> Value {
    let children: Vec<Value> = components
        .iter()
        .filter_map(|c| c.as_object())
        .map(|c| {
            json!({
                "type": "component",
                "name": c.get("name").cloned().unwrap_or_else(|| json!("unknown")),
                "props": c.get("props").cloned().unwrap_or_else(|| json!({})),
                "children": [],
            })
        })
        .collect();

    json!({
        "type": "layout",
        "name": "column",
        "props": {"gap": 12},
        "children": children,
    })
}

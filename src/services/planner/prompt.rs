//! Planner Prompt
//!
//! Builds the instruction prompt sent to the model for a planning run.
//! The prompt is a pure function of the input: the same input always yields
//! the same text.

use serde::Serialize;
use toolplan_core::PlannerInput;

/// System instruction for the initial planning call.
pub const PLANNER_SYSTEM_PROMPT: &str = "You are a strict JSON planner.";

/// Build the planner user prompt.
///
/// Catalogs, context and constraints are embedded verbatim as pretty JSON.
/// `input.constraints` must already be clamped to the configured ceiling.
pub fn build_planner_prompt(input: &PlannerInput) -> String {
    let user_prompt = input.user_prompt.trim();
    let conversation_context = pretty(&input.conversation_context);
    let tool_catalog = pretty(&input.tool_catalog);
    let ui_catalog = pretty(&input.ui_component_catalog);
    let constraints = pretty(&input.constraints);

    format!(
        r#"You are a PLANNER for a microservice system.
You DO NOT answer the user directly.
You DO NOT execute tools.
You ONLY output a plan JSON that the backend will execute.

## INPUT
User prompt:
{user_prompt}

Conversation context:
{conversation_context}

Available tools (authoritative):
{tool_catalog}

Available UI components (authoritative):
{ui_catalog}

Constraints:
{constraints}

{rules}"#,
        rules = RULES
    )
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

const RULES: &str = r#"## CRITICAL RULES (STRICT)
1) Output MUST be VALID JSON. Output ONLY JSON. No markdown, no comments, no extra text.
2) Use ONLY tools listed in toolCatalog.tools[].name. NEVER invent tools.
3) Use ONLY UI components listed in uiComponentCatalog.components[].name. NEVER invent components.
4) Steps must be <= constraints.maxSteps.
5) If UI is not requested or not appropriate, set "uiIntent": null.
6) Tool usage rule (VERY IMPORTANT):
   - ONLY add tool steps when tools are NECESSARY to fulfill the user request.
   - If the user asks a general knowledge question, opinion, explanation, or anything that tools cannot answer,
     then return:
       - "steps": []
       - "uiIntent": null
     and put in "safety": {"needAssistantAnswer": true, "reason": "..."}.
   - If tools are available and relevant, plan the minimal set of tool calls needed.
7) NEVER invent data. If tools are needed to compute numbers or fetch products, use tools.
8) Do NOT generate HTML or code.

## OUTPUT SCHEMA (MUST MATCH EXACTLY)
{
  "schema": "tool_plan.v1",
  "rationale": "string (required, short)",
  "steps": [
    {
      "id": "step_1",
      "tool": "tool.name",
      "args": { },
      "cache_ttl_seconds": null
    }
  ],
  "uiIntent": null OR {
    "component_tree": {
      "type": "layout|component",
      "name": "string",
      "props": { },
      "children": [ ... ]
    },
    "bindings": [ ... ],
    "subscriptions": [ ... ]
  },
  "safety": {
    "needAssistantAnswer": false,
    "reason": "optional string"
  }
}

## REQUIRED FIELD RULES
- Always include "schema", "rationale", "steps", "uiIntent", "safety".
- Every step MUST include: id, tool, args, cache_ttl_seconds (cache_ttl_seconds can be null).
- Step ids MUST be unique within the plan.
- If steps is empty, uiIntent MUST be null.

## component_tree conventions
- For layouts use:
  {"type":"layout","name":"column|row|grid","props":{"gap":12},"children":[...]}
- For components use:
  {"type":"component","name":"<componentNameFromCatalog>","props":{...},"children":[]}

## bindings conventions
- A binding maps UI props to tool result keys or computed keys:
  {
    "componentPath": "/root/children/0",
    "prop": "dataKey",
    "from": "toolResultKeyOrComputedKey"
  }

## subscriptions conventions
- A subscription declares event-driven refresh (only if relevant):
  {
    "event": "<subject>",
    "refresh": [
      { "tool": "<toolName>", "args": { }, "patchPath": "/data/<toolName>" }
    ]
  }

## EXAMPLES (DO NOT COPY VERBATIM)

Example A: General knowledge question (no tools)
{
  "schema": "tool_plan.v1",
  "rationale": "This is a general knowledge question; tools are not required.",
  "steps": [],
  "uiIntent": null,
  "safety": {
    "needAssistantAnswer": true,
    "reason": "Answer should come from assistant knowledge, not tools."
  }
}

Example B: Tool-backed question (minimal tools + optional UI)
{
  "schema": "tool_plan.v1",
  "rationale": "Need tool data to compute the answer and present it visually.",
  "steps": [
    { "id":"step_1","tool":"<tool1>","args":{},"cache_ttl_seconds":null },
    { "id":"step_2","tool":"<tool2>","args":{"rangeDays":30},"cache_ttl_seconds":null }
  ],
  "uiIntent": {
    "component_tree": {
      "type":"layout",
      "name":"column",
      "props":{"gap":12},
      "children":[
        {"type":"component","name":"<componentFromCatalog>","props":{"title":"..."},"children":[]}
      ]
    },
    "bindings": [],
    "subscriptions": []
  },
  "safety": {
    "needAssistantAnswer": false,
    "reason": ""
  }
}

Return ONLY JSON."#;

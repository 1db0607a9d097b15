//! Settings Models
//!
//! Service configuration, read once from the environment at startup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use toolplan_core::{DEFAULT_MAX_STEPS, MAX_MAX_STEPS, MIN_MAX_STEPS};
use toolplan_llm::{ProviderConfig, ProviderType};

use crate::utils::error::{AppError, AppResult};

/// Effective planner configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Model API key (`LLM_API_KEY`, falling back to `GROQ_API_KEY`)
    #[serde(skip_serializing)]
    pub api_key: String,
    /// `groq` or `openai`
    pub provider: ProviderType,
    /// Endpoint override
    pub base_url: Option<String>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Ceiling applied to every request's `constraints.maxSteps`
    pub max_steps: u32,
    /// Repair rounds allowed per run
    pub repair_attempts: u32,
    /// Reserved; parsed and logged only
    pub strict_json: bool,
    /// Listen address for the HTTP server
    pub bind_addr: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            provider: ProviderType::Groq,
            base_url: None,
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.2,
            timeout_seconds: 20,
            max_tokens: 1200,
            max_steps: DEFAULT_MAX_STEPS,
            repair_attempts: 2,
            strict_json: true,
            bind_addr: "0.0.0.0:8088".to_string(),
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for PlannerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerSettings")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_tokens", &self.max_tokens)
            .field("max_steps", &self.max_steps)
            .field("repair_attempts", &self.repair_attempts)
            .field("strict_json", &self.strict_json)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl PlannerSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_key = get("LLM_API_KEY")
            .or_else(|| get("GROQ_API_KEY"))
            .ok_or_else(|| AppError::config("LLM_API_KEY (or GROQ_API_KEY) is required"))?;

        let provider = match get("LLM_PROVIDER") {
            Some(raw) => raw
                .parse::<ProviderType>()
                .map_err(|e| AppError::config(format!("LLM_PROVIDER: {}", e)))?,
            None => defaults.provider,
        };

        let settings = Self {
            api_key,
            provider,
            base_url: get("LLM_BASE_URL"),
            model: get("LLM_MODEL").unwrap_or(defaults.model),
            temperature: parse_var(&get, "LLM_TEMPERATURE", defaults.temperature)?,
            timeout_seconds: parse_var(&get, "LLM_TIMEOUT_SECONDS", defaults.timeout_seconds)?,
            max_tokens: parse_var(&get, "LLM_MAX_TOKENS", defaults.max_tokens)?,
            max_steps: parse_var(&get, "PLANNER_MAX_STEPS", defaults.max_steps)?,
            repair_attempts: parse_var(&get, "PLANNER_REPAIR_ATTEMPTS", defaults.repair_attempts)?,
            strict_json: parse_bool(&get, "PLANNER_STRICT_JSON", defaults.strict_json)?,
            bind_addr: get("PLANNER_BIND_ADDR").unwrap_or(defaults.bind_addr),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Range checks that apply however the settings were built.
    pub fn validate(&self) -> AppResult<()> {
        if !(MIN_MAX_STEPS..=MAX_MAX_STEPS).contains(&self.max_steps) {
            return Err(AppError::config(format!(
                "PLANNER_MAX_STEPS must be between {} and {}, got {}",
                MIN_MAX_STEPS, MAX_MAX_STEPS, self.max_steps
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(AppError::config("LLM_TIMEOUT_SECONDS must be positive"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::config(format!(
                "LLM_TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Provider configuration for the model client.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider,
            api_key: Some(self.api_key.clone()),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_seconds: self.timeout_seconds,
        }
    }
}

fn parse_var<T, G>(get: &G, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| AppError::config(format!("{}: invalid value '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_bool<G>(get: &G, key: &str, default: bool) -> AppResult<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::config(format!(
                "{}: invalid boolean '{}'",
                key, v
            ))),
        },
    }
}

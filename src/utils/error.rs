//! Error Handling
//!
//! Unified error types for the planner service.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;
use toolplan_core::CoreError;
use toolplan_llm::LlmError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad request document (malformed JSON, wrong schema tag, maxSteps out of range)
    #[error("{0}")]
    InputValidation(String),

    /// Model call failed (network, timeout, non-2xx, empty body)
    #[error("{0}")]
    Transport(String),

    /// Model output is not JSON, even after brace extraction
    #[error("{0}")]
    Parse(String),

    /// Document does not match the tool plan structure
    #[error("{0}")]
    SchemaValidation(String),

    /// Repair budget spent without producing a valid plan
    #[error("Planner output invalid after {attempts} validation attempt(s): {last_error}")]
    PlannerExhausted { attempts: u32, last_error: String },

    /// Configuration errors
    #[error("{0}")]
    Config(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an input validation error
    pub fn input_validation(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a schema validation error
    pub fn schema_validation(msg: impl Into<String>) -> Self {
        Self::SchemaValidation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable kind name, used as the error code at the HTTP boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputValidation(_) => "InputValidationError",
            Self::Transport(_) => "TransportError",
            Self::Parse(_) => "ParseError",
            Self::SchemaValidation(_) => "SchemaValidationError",
            Self::PlannerExhausted { .. } => "PlannerExhaustedError",
            Self::Config(_) => "ConfigError",
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let CoreError::Validation(msg) = err;
        Self::InputValidation(msg)
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        Self::Transport(err.to_string())
    }
}

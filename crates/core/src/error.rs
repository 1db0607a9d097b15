//! Core Error Types
//!
//! Defines the foundational error type used across the planner workspace.
//! It is dependency-free (only thiserror + std) to keep the core crate
//! lightweight.
//!
//! The service crate extends it with the planner pipeline taxonomy
//! (transport, parse, schema validation, exhaustion).

use thiserror::Error;

/// Core error type for the planner workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

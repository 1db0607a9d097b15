//! HTTP boundary
//!
//! - `POST /v1/plan` (alias `POST /plan`): planner input in, tool plan out
//! - `GET /health`: liveness plus the configured provider and model

pub mod error;
pub mod handlers;
pub mod router;

pub use error::{ApiError, ApiErrorBody, ApiErrorResponse};
pub use router::build_router;

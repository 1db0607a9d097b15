//! Tool Planner Service
//!
//! HTTP microservice that turns a user message plus tool and UI catalogs into
//! a validated `tool_plan.v1` document. It includes:
//! - The planning pipeline (prompt, normalize, validate, repair)
//! - The axum HTTP boundary
//! - Environment-based settings
//! - Error taxonomy

pub mod models;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;

pub use models::PlannerSettings;
pub use server::build_router;
pub use services::planner::PlanOrchestrator;
pub use state::AppState;
pub use utils::error::{AppError, AppResult};

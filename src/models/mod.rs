//! Data Models
//!
//! Service-level configuration models. Request and plan documents live in
//! `toolplan-core`.

pub mod settings;

pub use settings::PlannerSettings;

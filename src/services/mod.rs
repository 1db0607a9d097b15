//! Services
//!
//! Business logic of the planner service.

pub mod planner;

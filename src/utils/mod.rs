//! Utilities
//!
//! Common utilities used throughout the service.

pub mod error;

pub use error::*;

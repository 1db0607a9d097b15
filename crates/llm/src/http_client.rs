//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with a request timeout.

use std::time::Duration;

use super::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` for model calls.
///
/// - `Some(timeout)` -> every request is aborted after `timeout`
/// - `None` -> no client-level timeout
pub fn build_http_client(timeout: Option<Duration>) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| LlmError::Other {
        message: format!("failed to build HTTP client: {}", e),
    })
}

//! Tool Planner LLM
//!
//! Provides a unified interface for hosted chat-completion models:
//! - Groq (OpenAI-compatible endpoint)
//! - OpenAI
//!
//! Also includes the HTTP client factory and the provider factory.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::{create_provider, LlmProvider};
pub use types::*;

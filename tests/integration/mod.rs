//! Integration Tests Module
//!
//! End-to-end tests for the tool planner service. Model calls are served by a
//! scripted in-process provider; no network access is needed.

// Shared scripted provider
mod support;

// Planning pipeline tests (prompt -> model -> normalize -> validate -> repair)
mod planner_test;

// HTTP boundary tests (routing, envelopes, health)
mod server_test;

//! Application State
//!
//! Shared state handed to every HTTP handler.

use std::sync::Arc;

use crate::services::planner::PlanOrchestrator;

/// Cloneable handle to the shared planner.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<PlanOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: PlanOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn orchestrator(&self) -> &PlanOrchestrator {
        &self.orchestrator
    }
}

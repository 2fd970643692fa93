//! Shared application state for handlers

use noether_engine::EvolutionScheduler;
use std::sync::Arc;

/// State threaded through every handler
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<EvolutionScheduler>,
}

impl AppState {
    pub fn new(scheduler: Arc<EvolutionScheduler>) -> Self {
        Self { scheduler }
    }
}

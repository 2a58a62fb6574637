//! Shared application state for the Axum API server.

use std::sync::Arc;

use duewise_common::config::AppConfig;
use duewise_engine::ReminderEngine;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReminderEngine>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(engine: ReminderEngine, config: AppConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config,
        }
    }
}

use std::sync::Arc;

use crate::config::Config;
use crate::extraction::engine::SkillEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Extraction engine: compiled catalog plus the process-wide result cache.
    pub engine: Arc<SkillEngine>,
    pub config: Config,
}

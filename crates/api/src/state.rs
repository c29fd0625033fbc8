use std::sync::Arc;

use atelier_pipeline::GenerationOrchestrator;
use atelier_store::EntityStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// In-memory store of users, projects and images.
    pub store: Arc<EntityStore>,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Generation pipeline, sharing `store` with the handlers.
    pub orchestrator: Arc<GenerationOrchestrator>,
}

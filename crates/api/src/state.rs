use std::sync::Arc;

use ghost_core::taxonomy::Taxonomy;
use ghost_db::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL or in-memory).
    pub store: Arc<dyn Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Category taxonomy loaded at startup.
    pub taxonomy: Arc<Taxonomy>,
}

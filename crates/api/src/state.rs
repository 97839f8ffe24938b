use std::sync::Arc;

use presence_db::PresenceStore;
use presence_engine::{AttendanceEngine, Directory, PresenceEngine};
use presence_events::BroadcastHub;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn PresenceStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fan-out of presence and attendance events to WebSocket clients.
    pub hub: Arc<BroadcastHub>,
    pub presence: PresenceEngine,
    pub attendance: AttendanceEngine,
    pub directory: Directory,
}

impl AppState {
    /// Wire the engines over `store` and `hub` using the presence settings
    /// from `config`.
    pub fn new(
        store: Arc<dyn PresenceStore>,
        hub: Arc<BroadcastHub>,
        config: ServerConfig,
    ) -> Self {
        let settings = config.presence.clone();
        let presence = PresenceEngine::new(Arc::clone(&store), Arc::clone(&hub), settings.clone());
        let attendance =
            AttendanceEngine::new(Arc::clone(&store), Arc::clone(&hub), presence.clone());
        let directory = Directory::new(Arc::clone(&store), attendance.clone(), settings);

        Self {
            store,
            config: Arc::new(config),
            hub,
            presence,
            attendance,
            directory,
        }
    }
}

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presence_api::config::ServerConfig;
use presence_api::router::build_app_router;
use presence_api::state::AppState;
use presence_api::{bootstrap, ws};
use presence_db::{PgStore, PresenceStore};
use presence_events::BroadcastHub;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presence_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        timezone = %config.presence.timezone,
        profile = ?config.presence.profile,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = presence_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    presence_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    presence_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let store: Arc<dyn PresenceStore> = Arc::new(PgStore::new(pool));

    // --- Bootstrap admin ---
    if let Some(admin) = &config.bootstrap_admin {
        bootstrap::ensure_admin(store.as_ref(), admin)
            .await
            .expect("Failed to provision bootstrap admin");
    }

    // --- Broadcast hub ---
    let hub = Arc::new(BroadcastHub::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&hub));

    // --- App state ---
    let state = AppState::new(store, Arc::clone(&hub), config.clone());
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let shutdown = Arc::clone(&shutdown);
        async move { shutdown.notified().await }
    })
    .into_future();
    tokio::pin!(server);

    // Open WebSockets keep graceful shutdown waiting, so close them once the
    // signal arrives and bound the drain.
    tokio::select! {
        result = &mut server => result.expect("Server error"),
        () = shutdown_signal() => {
            shutdown.notify_one();
            let ws_count = hub.subscriber_count().await;
            tracing::info!(ws_count, "Closing remaining WebSocket connections");
            hub.shutdown_all().await;

            let drain = Duration::from_secs(config.shutdown_timeout_secs);
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => result.expect("Server error"),
                Err(_) => tracing::warn!(
                    timeout_secs = config.shutdown_timeout_secs,
                    "Connections still open after shutdown timeout"
                ),
            }
        }
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

use std::net::SocketAddr;
use std::sync::Arc;

use ghost_db::{MemoryStore, PgStore, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ghost_api::bootstrap::{load_taxonomy, seed_bootstrap_admin};
use ghost_api::config::ServerConfig;
use ghost_api::router::build_app_router;
use ghost_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghost_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => {
            let pool = ghost_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            ghost_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            ghost_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, using the in-memory store (data is lost on exit)");
            Arc::new(MemoryStore::new())
        }
    };

    // --- Taxonomy ---
    let taxonomy = load_taxonomy(config.taxonomy_path.as_deref()).expect("Failed to load taxonomy");
    tracing::info!(categories = taxonomy.categories().len(), "Taxonomy loaded");

    // --- Bootstrap admin ---
    if let Some(bootstrap) = &config.bootstrap_admin {
        seed_bootstrap_admin(store.as_ref(), bootstrap)
            .await
            .expect("Failed to seed bootstrap admin");
    }

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        taxonomy: Arc::new(taxonomy),
    };

    // --- Router ---
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

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

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

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keygate_api::config::{ServerConfig, StoreConfig};
use keygate_api::router::build_app_router;
use keygate_api::state::AppState;
use keygate_core::store::CredentialStore;
use keygate_db::{MemoryCredentialStore, PgCredentialStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keygate_api=debug,keygate_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        host = %config.host,
        port = %config.port,
        secret_scheme = %config.secret_scheme,
        token_ttl_hours = config.jwt.token_ttl_hours,
        "Loaded server configuration"
    );

    // --- Credential store ---
    let store = connect_store(&config.store).await?;

    // --- App state + router ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    let state = AppState::new(config, store);
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Build the credential store once; every request shares it.
async fn connect_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn CredentialStore>> {
    match config {
        StoreConfig::Postgres {
            connect,
            max_connections,
        } => {
            let pool = keygate_db::create_pool(connect.clone(), *max_connections)
                .await
                .context("Failed to connect to database")?;
            tracing::info!(
                host = connect.get_host(),
                database = connect.get_database(),
                max_connections,
                "Database connection pool created"
            );

            keygate_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            keygate_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgCredentialStore::new(pool)))
        }
        StoreConfig::Memory => {
            tracing::warn!(
                "No database configured; using the in-memory credential store (data is lost on restart)"
            );
            Ok(Arc::new(MemoryCredentialStore::new()))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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

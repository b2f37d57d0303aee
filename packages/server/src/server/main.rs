// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use substitution_core::domains::substitutions::{
    DocumentSources, RefreshOrchestrator, SnapshotStore,
};
use substitution_core::kernel::scheduled_tasks::{spawn_startup_refresh, start_scheduler};
use substitution_core::kernel::ServerDeps;
use substitution_core::{server::build_app, server::AxumAppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,substitution_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting substitution plan API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        strategy = ?config.extraction_strategy,
        today_url = %config.today_url,
        tomorrow_url = %config.tomorrow_url,
        "Configuration loaded"
    );

    // Wire the refresh pipeline
    let deps = ServerDeps::from_config(&config).context("Failed to build server dependencies")?;
    let store = Arc::new(SnapshotStore::new());
    let orchestrator = Arc::new(RefreshOrchestrator::new(
        deps,
        DocumentSources::from_config(&config),
        store,
    ));

    // Periodic refresh + one at startup (stale/empty answers until it lands are fine)
    let mut scheduler = start_scheduler(orchestrator.clone(), &config.refresh_schedule)
        .await
        .context("Failed to start scheduler")?;
    spawn_startup_refresh(orchestrator.clone());

    // Build application
    let app = build_app(AxumAppState::new(orchestrator, config.is_development()));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/api/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Stopping scheduler");
    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "Scheduler did not shut down cleanly");
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received, shutting down gracefully"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully"),
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Los Complejos API Server

use complejos_backend::{
    config::{Config, StorageBackend},
    db::DocumentDb,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Los Complejos API");

    // The process does not start without a database
    let db = match config.storage {
        StorageBackend::Mongo => {
            tracing::info!(uri = %config.masked_mongo_uri(), database = %config.database_name, "Connecting to MongoDB");
            DocumentDb::connect(&config.mongo_uri, &config.database_name)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Failed to connect to MongoDB"))?
        }
        StorageBackend::Memory => DocumentDb::in_memory(),
    };

    let state = Arc::new(AppState::new(config.clone(), db.clone()));

    // Build router
    let app = complejos_backend::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, closing database");
    if let Err(e) = db.close().await {
        tracing::error!(error = %e, "Error closing the database connection");
    }
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("complejos_backend=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode, sync::Arc, time::Duration};

use axum_server::Handle;

use job_portal_server::{
    api::router,
    config::AppConfig,
    logging,
    state::AppState,
    storage::{MemoryStore, RedbStore, Store},
};

/// Grace period for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    // Logging is not up yet, so configuration errors go to stderr
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_format);
    tracing::info!(?config, "configuration loaded");

    let store: Arc<dyn Store> = match &config.database_path {
        Some(path) => match RedbStore::open(path) {
            Ok(store) => Arc::new(store),
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to open database");
                return ExitCode::FAILURE;
            }
        },
        None => {
            tracing::warn!("DATABASE_PATH not set; data is kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    let backend = store.backend_name();

    let state = match AppState::from_config(&config, store) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "refusing to start without a signing key");
            return ExitCode::FAILURE;
        }
    };

    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(error = %err, "invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let handle: Handle<SocketAddr> = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    tracing::info!(%addr, backend, "job portal server listening (docs at /docs)");

    if let Err(err) = axum_server::bind(addr)
        .handle(handle)
        .serve(router(state).into_make_service())
        .await
    {
        tracing::error!(error = %err, "server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_on_ctrl_c(handle: Handle<SocketAddr>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

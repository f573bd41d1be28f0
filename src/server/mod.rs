//! HTTP API for Reflog
//!
//! [`build_router`] assembles the routes with per-request tracing;
//! [`serve`] binds the listener and runs until SIGINT or SIGTERM.

pub mod auth;
pub mod error;
pub mod routes;
mod trace;

pub use error::ApiError;

use crate::coach::TurnController;
use crate::config::Config;
use crate::error::Result;
use crate::providers::Provider;
use crate::storage::SqliteStorage;
use anyhow::Context;
use axum::{middleware, Router};
use std::sync::Arc;
use tracing::{info, warn};

/// State shared by every handler
pub struct AppState {
    pub storage: SqliteStorage,
    pub controller: TurnController,
    pub config: Config,
}

impl AppState {
    /// Wire the turn controller to the store and provider
    pub fn new(config: Config, storage: SqliteStorage, provider: Arc<dyn Provider>) -> Self {
        let controller = TurnController::new(storage.clone(), provider, config.coach.clone());
        Self {
            storage,
            controller,
            config,
        }
    }
}

/// Run synchronous store work on the blocking pool
///
/// SQLite calls block the calling thread, so handlers hand them to
/// `spawn_blocking` instead of running them on a runtime worker.
pub(crate) async fn run_blocking<T, F>(state: &Arc<AppState>, work: F) -> Result<T>
where
    F: FnOnce(&AppState) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .context("Storage task failed")?
}

/// Build the complete router
pub fn build_router(state: Arc<AppState>) -> Router {
    routes::router()
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

/// Serve the API on `bind_address` until a shutdown signal arrives
pub async fn serve(state: Arc<AppState>, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}

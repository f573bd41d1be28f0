use super::open_storage;
use crate::config::Config;
use crate::error::Result;
use crate::providers::create_provider;
use crate::server::{self, AppState};
use std::sync::Arc;

/// Run the HTTP API until a shutdown signal arrives
///
/// # Arguments
///
/// * `config` - Validated configuration (consumed)
/// * `bind` - Optional bind address overriding `server.bind_address`
pub async fn run_serve(config: Config, bind: Option<String>) -> Result<()> {
    let storage = open_storage(&config)?;
    let provider = create_provider(&config.provider)?;
    let bind_address = bind.unwrap_or_else(|| config.server.bind_address.clone());

    tracing::info!(
        model = %config.provider.model,
        database = %storage.path().display(),
        "Starting Reflog server"
    );

    let state = Arc::new(AppState::new(config, storage, provider));
    server::serve(state, &bind_address).await
}

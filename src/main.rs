//! Reflog - daily reflection journal with a guided AI coach
//!
//! Main entry point for the Reflog server and admin CLI.

use anyhow::Result;

use reflog::cli::{Cli, Commands};
use reflog::commands;
use reflog::config::Config;
use reflog::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load and validate configuration; warnings raised while loading go
    // through a temporary subscriber until the configured one is installed
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = tracing::subscriber::with_default(logging::bootstrap_subscriber(), || {
        Config::load(config_path, &cli)
    })?;
    config.validate()?;

    logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Serve { bind } => {
            tracing::info!("Starting HTTP server");
            commands::serve::run_serve(config, bind).await
        }
        Commands::Prompt { date, all } => commands::prompt::show_prompt(date.as_deref(), all),
        Commands::Users { command } => {
            tracing::debug!("Starting user command");
            commands::users::handle_users(&config, command)
        }
        Commands::Sessions { command } => {
            tracing::debug!("Starting session command");
            commands::sessions::handle_sessions(&config, command)
        }
    }
}

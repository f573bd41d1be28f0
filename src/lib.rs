//! Reflog - daily reflection journal with a guided AI coach
//!
//! Each day the user is offered one reflection prompt. A journaling session
//! is a short conversation with a language-model coach that ends with a
//! structured summary once the coach has replied a fixed number of times.
//!
//! # Architecture
//!
//! - `prompts`: Daily prompt pool and model directives
//! - `coach`: Turn controller, session lifecycle and summary parsing
//! - `providers`: Language model gateway (OpenAI-compatible)
//! - `storage`: SQLite persistence for users, tokens, sessions and messages
//! - `auth`: Access token minting and resolution
//! - `server`: Axum HTTP API
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use reflog::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod coach;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompts;
pub mod providers;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use coach::{TurnController, TurnStatus};
pub use config::Config;
pub use error::{ReflogError, Result};

#[cfg(test)]
pub mod test_utils;

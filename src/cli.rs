//! Command-line interface definition for Reflog
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for running the server and administering users.

use clap::{Parser, Subcommand};

/// Reflog - daily reflection journal with a guided AI coach
#[derive(Parser, Debug, Clone)]
#[command(name = "reflog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the SQLite database path
    #[arg(long, env = "REFLOG_DATABASE")]
    pub database: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Reflog
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Override the bind address from config (e.g. 0.0.0.0:8080)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Print the reflection prompt for a date
    Prompt {
        /// Date in YYYY-MM-DD format (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Print the whole prompt pool instead
        #[arg(long)]
        all: bool,
    },

    /// Manage users and access tokens
    Users {
        /// User subcommand
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Inspect journaling sessions
    Sessions {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },
}

/// User management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    /// Register a user and print a new access token
    Add {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Name shown in the UI
        #[arg(short, long)]
        display_name: String,
    },

    /// Mint an additional access token for an existing user
    Token {
        /// Email address of the user
        #[arg(short, long)]
        email: String,
    },
}

/// Session inspection subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List a user's sessions, newest first
    List {
        /// Email address of the owner
        #[arg(short, long)]
        email: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            database: None,
            command: Commands::Prompt {
                date: None,
                all: false,
            },
        }
    }
}

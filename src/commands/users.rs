use super::open_storage;
use crate::auth;
use crate::cli::UserCommand;
use crate::config::Config;
use crate::error::{Result, ReflogError};
use colored::Colorize;

/// Handle user commands
pub fn handle_users(config: &Config, command: UserCommand) -> Result<()> {
    let storage = open_storage(config)?;

    match command {
        UserCommand::Add {
            email,
            display_name,
        } => {
            let (user, token) = auth::register_user(&storage, &email, &display_name)?;
            println!(
                "{}",
                format!("Created user {} <{}>", user.display_name, user.email).green()
            );
            println!("Access token (shown once):");
            println!("{}", token);
        }
        UserCommand::Token { email } => {
            let user = storage
                .find_user_by_email(&email)?
                .ok_or_else(|| ReflogError::InvalidInput(format!("No user with email {}", email)))?;
            let token = auth::issue_token(&storage, &user.id)?;
            println!("Access token for {} (shown once):", user.email.cyan());
            println!("{}", token);
        }
    }

    Ok(())
}

use super::open_storage;
use crate::cli::SessionCommand;
use crate::config::Config;
use crate::error::{Result, ReflogError};
use colored::Colorize;
use prettytable::{format, Table};

/// Shorten `text` to `max` characters, marking the cut with an ellipsis
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

/// Handle session commands
pub fn handle_sessions(config: &Config, command: SessionCommand) -> Result<()> {
    let storage = open_storage(config)?;

    match command {
        SessionCommand::List { email } => {
            let user = storage
                .find_user_by_email(&email)?
                .ok_or_else(|| ReflogError::InvalidInput(format!("No user with email {}", email)))?;
            let sessions = storage.list_sessions(&user.id)?;

            if sessions.is_empty() {
                println!("{}", "No sessions found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "ID".bold(),
                "Prompt".bold(),
                "Title".bold(),
                "Status".bold(),
                "Created".bold()
            ]);

            for session in sessions {
                let id_short: String = session.id.chars().take(8).collect();
                let title = session
                    .title
                    .as_deref()
                    .map(|t| truncate_chars(t, 40))
                    .unwrap_or_else(|| "-".to_string());
                let status = if session.summary.is_some() {
                    "closed".green()
                } else {
                    "open".yellow()
                };
                let created = session.created_at.format("%Y-%m-%d %H:%M").to_string();

                table.add_row(prettytable::row![
                    id_short.cyan(),
                    session.prompt_id,
                    title,
                    status,
                    created
                ]);
            }

            println!("\nSessions for {}:", user.email);
            table.printstd();
            println!();
        }
    }

    Ok(())
}

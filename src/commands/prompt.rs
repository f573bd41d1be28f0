use crate::error::{Result, ReflogError};
use crate::prompts;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use prettytable::{format, Table};

/// Parse a `YYYY-MM-DD` date, defaulting to today
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|e| {
            ReflogError::InvalidInput(format!("Invalid date '{}': {}", d, e)).into()
        }),
        None => Ok(Local::now().date_naive()),
    }
}

/// Print the prompt for a date, or the whole pool
pub fn show_prompt(date: Option<&str>, all: bool) -> Result<()> {
    if all {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row!["ID".bold(), "Prompt".bold()]);
        for prompt in prompts::all_prompts() {
            table.add_row(prettytable::row![prompt.id.cyan(), prompt.text]);
        }
        table.printstd();
        return Ok(());
    }

    let date = resolve_date(date)?;
    let prompt = prompts::daily_prompt(date);
    println!("{} {}", date.format("%Y-%m-%d").to_string().dimmed(), prompt.id.cyan());
    println!("{}", prompt.text);
    Ok(())
}

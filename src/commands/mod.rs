/*!
Command handlers for the CLI

- `serve`: run the HTTP API
- `prompt`: print the daily reflection prompt
- `users`: register users and mint access tokens
- `sessions`: inspect a user's journaling sessions
*/

pub mod prompt;
pub mod serve;
pub mod sessions;
pub mod users;

use crate::config::Config;
use crate::error::Result;
use crate::storage::SqliteStorage;

/// Open the database named by configuration
pub(crate) fn open_storage(config: &Config) -> Result<SqliteStorage> {
    let storage = SqliteStorage::open(config.server.database_path.as_deref())?;
    tracing::debug!(path = %storage.path().display(), "Opened database");
    Ok(storage)
}

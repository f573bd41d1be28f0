//! Session store backed by SQLite
//!
//! Holds users, access tokens, journaling sessions and their messages.
//! Every session query that takes a user id is owner scoped: a session owned
//! by someone else is indistinguishable from a missing one.

use crate::error::{Result, ReflogError};
use crate::providers::Role;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use directories::ProjectDirs;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

pub mod types;
pub use types::{Session, SessionListItem, StoredMessage, User};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS access_tokens (
    token_hash TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    prompt_id TEXT NOT NULL,
    title TEXT,
    summary TEXT,
    key_points TEXT,
    next_questions TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id, created_at);
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL REFERENCES sessions(id),
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id, created_at);
";

/// Storage backend for sessions, messages and users
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Create a storage instance in the user's data directory
    ///
    /// # Errors
    ///
    /// Returns `ReflogError::Storage` if the directory or schema cannot be
    /// created
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "reflog", "reflog")
            .ok_or_else(|| ReflogError::Storage("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join("reflog.db"))
    }

    /// Create a storage instance that uses the specified database path.
    ///
    /// # Examples
    ///
    /// ```
    /// use reflog::storage::SqliteStorage;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let storage = SqliteStorage::new_with_path(dir.path().join("reflog.db")).unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ReflogError::Storage(format!(
                    "Failed to create parent directory for database: {}",
                    e
                ))
            })?;
        }

        let storage = Self { db_path };
        storage.init()?;
        Ok(storage)
    }

    /// Open the configured database, falling back to the data directory
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::new_with_path(p),
            None => Self::new(),
        }
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .map_err(|e| ReflogError::Storage(format!("Failed to open database: {}", e)))?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(|e| ReflogError::Storage(format!("Failed to set busy timeout: {}", e)))?;
        Ok(conn)
    }

    fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| ReflogError::Storage(format!("Failed to create tables: {}", e)))?;
        Ok(())
    }

    // ── users and tokens ─────────────────────────────────────────────────────

    /// Register a user
    ///
    /// Emails are stored lowercased.
    ///
    /// # Errors
    ///
    /// Returns `ReflogError::InvalidInput` if the email is already taken
    pub fn create_user(&self, email: &str, display_name: &str) -> Result<User> {
        let conn = self.connect()?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_lowercase(),
            display_name: display_name.trim().to_string(),
            created_at: now(),
        };

        conn.execute(
            "INSERT INTO users (id, email, display_name, created_at) VALUES (?, ?, ?, ?)",
            params![
                user.id,
                user.email,
                user.display_name,
                format_timestamp(&user.created_at)
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                ReflogError::InvalidInput(format!("Email is already registered: {}", user.email))
            }
            other => ReflogError::Storage(format!("Failed to insert user: {}", other)),
        })?;

        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT id, email, display_name, created_at FROM users WHERE email = ?",
            params![email.trim().to_lowercase()],
            user_from_row,
        )
        .optional()
        .map_err(|e| ReflogError::Storage(format!("Failed to query user: {}", e)).into())
    }

    /// Record the digest of an access token for a user
    pub fn insert_access_token(&self, user_id: &str, token_hash: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO access_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)",
            params![token_hash, user_id, format_timestamp(&now())],
        )
        .map_err(|e| ReflogError::Storage(format!("Failed to insert access token: {}", e)))?;
        Ok(())
    }

    /// Resolve a token digest to its user id
    pub fn user_id_for_token(&self, token_hash: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT user_id FROM access_tokens WHERE token_hash = ?",
            params![token_hash],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| ReflogError::Storage(format!("Failed to query access token: {}", e)).into())
    }

    // ── sessions ─────────────────────────────────────────────────────────────

    /// Create an open, untitled session
    pub fn create_session(&self, user_id: &str, prompt_id: &str) -> Result<Session> {
        let conn = self.connect()?;
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            prompt_id: prompt_id.to_string(),
            title: None,
            summary: None,
            key_points: None,
            next_questions: None,
            created_at: now(),
        };

        conn.execute(
            "INSERT INTO sessions (id, user_id, prompt_id, created_at) VALUES (?, ?, ?, ?)",
            params![
                session.id,
                session.user_id,
                session.prompt_id,
                format_timestamp(&session.created_at)
            ],
        )
        .map_err(|e| ReflogError::Storage(format!("Failed to insert session: {}", e)))?;

        Ok(session)
    }

    /// Load a session owned by `user_id`
    pub fn get_session(&self, session_id: &str, user_id: &str) -> Result<Option<Session>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT id, user_id, prompt_id, title, summary, key_points, next_questions, created_at
             FROM sessions WHERE id = ? AND user_id = ?",
            params![session_id, user_id],
            session_from_row,
        )
        .optional()
        .map_err(|e| ReflogError::Storage(format!("Failed to query session: {}", e)).into())
    }

    /// List a user's sessions, newest first
    pub fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionListItem>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, prompt_id, title, summary, created_at
                 FROM sessions WHERE user_id = ?
                 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(|e| ReflogError::Storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(SessionListItem {
                    id: row.get(0)?,
                    prompt_id: row.get(1)?,
                    title: row.get(2)?,
                    summary: row.get(3)?,
                    created_at: parse_timestamp(row, 4)?,
                })
            })
            .map_err(|e| ReflogError::Storage(format!("Failed to query sessions: {}", e)))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ReflogError::Storage(format!("Failed to read session row: {}", e)).into())
    }

    /// Set the title unless one is already present
    ///
    /// Returns whether the title was written.
    pub fn set_title_if_missing(&self, session_id: &str, title: &str) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn
            .execute(
                "UPDATE sessions SET title = ? WHERE id = ? AND title IS NULL",
                params![title, session_id],
            )
            .map_err(|e| ReflogError::Storage(format!("Failed to update title: {}", e)))?;
        Ok(changed == 1)
    }

    /// Store the summary fields, closing the session
    ///
    /// # Errors
    ///
    /// Returns `ReflogError::SessionClosed` if the session already has a
    /// summary (or does not exist), so the open-to-closed transition happens
    /// at most once.
    pub fn close_session(
        &self,
        session_id: &str,
        summary: &str,
        key_points: &[String],
        next_questions: &[String],
    ) -> Result<()> {
        let conn = self.connect()?;
        let key_points = serde_json::to_string(key_points)?;
        let next_questions = serde_json::to_string(next_questions)?;

        let changed = conn
            .execute(
                "UPDATE sessions SET summary = ?, key_points = ?, next_questions = ?
                 WHERE id = ? AND summary IS NULL",
                params![summary, key_points, next_questions, session_id],
            )
            .map_err(|e| ReflogError::Storage(format!("Failed to store summary: {}", e)))?;

        if changed == 0 {
            return Err(ReflogError::SessionClosed(session_id.to_string()).into());
        }
        Ok(())
    }

    // ── messages ─────────────────────────────────────────────────────────────

    /// Append a message to a session
    pub fn append_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<StoredMessage> {
        let conn = self.connect()?;
        let message = StoredMessage {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            created_at: now(),
        };

        conn.execute(
            "INSERT INTO messages (id, session_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)",
            params![
                message.id,
                message.session_id,
                message.role.as_str(),
                message.content,
                format_timestamp(&message.created_at)
            ],
        )
        .map_err(|e| ReflogError::Storage(format!("Failed to insert message: {}", e)))?;

        Ok(message)
    }

    /// All messages of a session in creation order
    pub fn list_messages(&self, session_id: &str) -> Result<Vec<StoredMessage>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, session_id, role, content, created_at
                 FROM messages WHERE session_id = ?
                 ORDER BY created_at ASC, rowid ASC",
            )
            .map_err(|e| ReflogError::Storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![session_id], message_from_row)
            .map_err(|e| ReflogError::Storage(format!("Failed to query messages: {}", e)))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ReflogError::Storage(format!("Failed to read message row: {}", e)).into())
    }

    /// Number of messages with the given role in a session
    pub fn count_messages(&self, session_id: &str, role: Role) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM messages WHERE session_id = ? AND role = ?",
                params![session_id, role.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| ReflogError::Storage(format!("Failed to count messages: {}", e)))?;
        Ok(count as usize)
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// Fixed-width UTC timestamps sort lexically in creation order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_string_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Vec<String>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|json| {
        serde_json::from_str(&json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        user_id: row.get(1)?,
        prompt_id: row.get(2)?,
        title: row.get(3)?,
        summary: row.get(4)?,
        key_points: parse_string_list(row, 5)?,
        next_questions: parse_string_list(row, 6)?,
        created_at: parse_timestamp(row, 7)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<StoredMessage> {
    let role: String = row.get(2)?;
    let role = role
        .parse::<Role>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(StoredMessage {
        id: row.get(0)?,
        session_id: row.get(1)?,
        role,
        content: row.get(3)?,
        created_at: parse_timestamp(row, 4)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        created_at: parse_timestamp(row, 3)?,
    })
}

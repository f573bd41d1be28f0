use crate::providers::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One journaling thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Daily prompt the session was started from
    pub prompt_id: String,
    /// Derived from the first user message
    pub title: Option<String>,
    /// Present once the session is closed
    pub summary: Option<String>,
    pub key_points: Option<Vec<String>>,
    pub next_questions: Option<Vec<String>>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session is closed once it carries a summary
    pub fn is_closed(&self) -> bool {
        self.summary.is_some()
    }
}

/// Row of the session list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionListItem {
    pub id: String,
    pub prompt_id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One turn of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

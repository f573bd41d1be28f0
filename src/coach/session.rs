//! Session lifecycle operations outside of a turn

use crate::error::{Result, ReflogError};
use crate::prompts;
use crate::storage::{Session, SqliteStorage, StoredMessage};
use serde::Serialize;

use super::controller::normalize_session_id;

/// A session together with its messages
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    /// Text of the prompt the session was started from, if still in the pool
    pub prompt_text: Option<String>,
    pub messages: Vec<StoredMessage>,
}

/// Start a session for `user_id`
///
/// Without a prompt id, today's prompt is used.
///
/// # Errors
///
/// Returns `ReflogError::InvalidInput` if the prompt id is not in the pool
pub fn start_session(
    storage: &SqliteStorage,
    user_id: &str,
    prompt_id: Option<&str>,
) -> Result<Session> {
    let prompt = match prompt_id {
        Some(id) => prompts::find_prompt(id)
            .ok_or_else(|| ReflogError::InvalidInput(format!("Unknown prompt: {}", id)))?,
        None => prompts::daily_prompt_today(),
    };

    let session = storage.create_session(user_id, prompt.id)?;
    tracing::info!(session_id = %session.id, prompt_id = prompt.id, "Session started");
    Ok(session)
}

/// Load a session owned by `user_id` with its ordered messages
///
/// # Errors
///
/// Returns `ReflogError::SessionNotFound` if the id is malformed, unknown,
/// or owned by someone else
pub fn session_detail(
    storage: &SqliteStorage,
    user_id: &str,
    session_id: &str,
) -> Result<SessionDetail> {
    let Some(id) = normalize_session_id(session_id) else {
        return Err(ReflogError::SessionNotFound(session_id.to_string()).into());
    };

    let session = storage
        .get_session(&id, user_id)?
        .ok_or_else(|| ReflogError::SessionNotFound(session_id.to_string()))?;
    let messages = storage.list_messages(&id)?;
    let prompt_text = prompts::find_prompt(&session.prompt_id).map(|p| p.text.to_string());

    Ok(SessionDetail {
        session,
        prompt_text,
        messages,
    })
}

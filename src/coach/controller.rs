//! Conversation turn controller
//!
//! A turn appends the user's message, then either asks the model for another
//! coaching reply or, once the session has used its assistant budget, asks
//! for a structured summary and closes the session.
//!
//! A turn is not atomic: if anything after the user message is stored
//! fails, the user message stays and the error is returned as-is.

use super::summary::SessionSummary;
use crate::config::CoachConfig;
use crate::error::{Result, ReflogError};
use crate::prompts;
use crate::providers::{ChatMessage, Provider, Role};
use crate::storage::{Session, SqliteStorage, StoredMessage};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of a successful turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    /// A coaching reply was stored; the session stays open
    Ok,
    /// A summary was stored; the session is closed
    Summarized,
}

/// What the controller asks the model for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMode {
    Continuation,
    Summarization,
}

/// Decide the mode from the number of assistant messages already stored
///
/// The last assistant message of a session is the summary, so summarization
/// starts once `max_assistant_messages - 1` replies exist.
///
/// # Examples
///
/// ```
/// use reflog::coach::{select_mode, TurnMode};
///
/// assert_eq!(select_mode(1, 3), TurnMode::Continuation);
/// assert_eq!(select_mode(2, 3), TurnMode::Summarization);
/// ```
pub fn select_mode(assistant_count: usize, max_assistant_messages: usize) -> TurnMode {
    if assistant_count >= max_assistant_messages.saturating_sub(1) {
        TurnMode::Summarization
    } else {
        TurnMode::Continuation
    }
}

/// Canonical lowercase hyphenated form of a session id
///
/// Any form `Uuid::parse_str` accepts (uppercase, simple, braced, urn) maps
/// to the form ids are stored in.
pub fn normalize_session_id(session_id: &str) -> Option<String> {
    Uuid::parse_str(session_id)
        .ok()
        .map(|id| id.hyphenated().to_string())
}

/// Validate the inputs of a turn submission
///
/// Returns the normalized session id.
///
/// # Errors
///
/// Returns `ReflogError::InvalidInput` if the session id is not a UUID, or
/// the content is blank or longer than `max_chars` characters
pub fn validate_turn_input(session_id: &str, content: &str, max_chars: usize) -> Result<String> {
    let Some(session_id) = normalize_session_id(session_id) else {
        return Err(ReflogError::InvalidInput("sessionId must be a UUID".to_string()).into());
    };
    if content.trim().is_empty() {
        return Err(ReflogError::InvalidInput("content cannot be empty".to_string()).into());
    }
    if content.chars().count() > max_chars {
        return Err(ReflogError::InvalidInput(format!(
            "content must be at most {} characters",
            max_chars
        ))
        .into());
    }
    Ok(session_id)
}

/// First `max_chars` characters of the text
pub fn derive_title(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Drives one turn of a journaling session
pub struct TurnController {
    storage: SqliteStorage,
    provider: Arc<dyn Provider>,
    config: CoachConfig,
}

impl TurnController {
    /// Creates a controller over a store and a provider
    pub fn new(storage: SqliteStorage, provider: Arc<dyn Provider>, config: CoachConfig) -> Self {
        Self {
            storage,
            provider,
            config,
        }
    }

    /// The coaching limits in effect
    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Submit a user message to a session owned by `user_id`
    ///
    /// # Errors
    ///
    /// - `ReflogError::InvalidInput` for malformed input
    /// - `ReflogError::SessionNotFound` if the session is missing or not owned
    /// - `ReflogError::SessionClosed` if the session already has a summary
    /// - any provider or storage error, wrapped with a short description of
    ///   the step that failed
    pub async fn submit_turn(
        &self,
        user_id: &str,
        session_id: &str,
        content: &str,
    ) -> Result<TurnStatus> {
        let session_id = validate_turn_input(session_id, content, self.config.max_message_chars)?;
        let session_id = session_id.as_str();

        let session = self
            .storage
            .get_session(session_id, user_id)?
            .ok_or_else(|| ReflogError::SessionNotFound(session_id.to_string()))?;

        if session.is_closed() {
            return Err(ReflogError::SessionClosed(session_id.to_string()).into());
        }

        self.storage
            .append_message(session_id, Role::User, content)
            .context("Failed to save the message")?;

        let assistant_count = self
            .storage
            .count_messages(session_id, Role::Assistant)
            .context("Failed to load the conversation")?;
        let history = self
            .storage
            .list_messages(session_id)
            .context("Failed to load the conversation")?;

        let mode = select_mode(assistant_count, self.config.max_assistant_messages);
        info!(
            session_id = %session_id,
            assistant_count,
            ?mode,
            "Processing turn"
        );

        match mode {
            TurnMode::Continuation => {
                self.continue_session(&session, &history, content).await?;
                Ok(TurnStatus::Ok)
            }
            TurnMode::Summarization => {
                self.summarize_session(&session, &history).await?;
                Ok(TurnStatus::Summarized)
            }
        }
    }

    async fn continue_session(
        &self,
        session: &Session,
        history: &[StoredMessage],
        content: &str,
    ) -> Result<()> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(prompts::generate_coach_prompt(
            self.config.max_assistant_messages,
        )));
        messages.extend(history.iter().map(|m| ChatMessage {
            role: m.role,
            content: m.content.clone(),
        }));

        let reply = self
            .provider
            .complete(&messages)
            .await
            .context("Failed to generate a coaching reply")?;

        self.storage
            .append_message(&session.id, Role::Assistant, reply.trim_end())
            .context("Failed to save the coach's reply")?;

        if session.title.is_none() {
            let title = derive_title(content, self.config.title_max_chars);
            if let Err(e) = self.storage.set_title_if_missing(&session.id, &title) {
                warn!(session_id = %session.id, error = %e, "Failed to set session title");
            }
        }

        Ok(())
    }

    async fn summarize_session(&self, session: &Session, history: &[StoredMessage]) -> Result<()> {
        let transcript = history
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let messages = [
            ChatMessage::system(prompts::generate_summary_prompt()),
            ChatMessage::user(format!("Conversation:\n{}", transcript)),
        ];

        let raw = self
            .provider
            .complete(&messages)
            .await
            .context("Failed to generate the session summary")?;

        let summary = SessionSummary::from_model_output(&raw);

        self.storage
            .append_message(
                &session.id,
                Role::Assistant,
                &format!("Here is a summary of this session.\n\n{}", summary.summary),
            )
            .context("Failed to save the summary message")?;

        self.storage
            .close_session(
                &session.id,
                &summary.summary,
                &summary.key_points,
                &summary.next_questions,
            )
            .context("Failed to save the session summary")?;

        info!(session_id = %session.id, "Session summarized");
        Ok(())
    }
}

//! Base provider trait and common message types for Reflog
//!
//! This module defines the Provider trait that language model gateways
//! implement, along with the role/text message type passed to them.

use crate::error::{Result, ReflogError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Journaling user
    User,
    /// AI coach
    Assistant,
    /// Directive to the model
    System,
}

impl Role {
    /// Lowercase wire and storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ReflogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(ReflogError::Storage(format!("Unknown message role: {}", other))),
        }
    }
}

/// Message structure for a completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use reflog::providers::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("Hello, coach!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Language model gateway
///
/// A single stateless call: ordered messages in, generated text out.
/// Implementations do not retry.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use reflog::error::Result;
/// use reflog::providers::{ChatMessage, Provider};
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
///         Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generates a reply for the given conversation
    ///
    /// # Errors
    ///
    /// Returns error if the provider is unreachable, answers with a
    /// non-success status, or returns no generated text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

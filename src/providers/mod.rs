//! Provider module for Reflog
//!
//! This module contains the language model gateway abstraction and its
//! OpenAI-compatible implementation.

pub mod base;
pub mod openai;

pub use base::{ChatMessage, Provider, Role};
pub use openai::OpenAiProvider;

use crate::config::ProviderConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create the configured provider
///
/// # Errors
///
/// Returns error if provider initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    Ok(Arc::new(OpenAiProvider::new(config.clone())?))
}

//! OpenAI-compatible provider implementation for Reflog
//!
//! Sends a non-streaming request to `{api_base}/chat/completions` and returns
//! the first choice's text. The API key is read from the environment on every
//! call, so a missing key surfaces as an error on the first turn rather than
//! at startup.

use crate::config::ProviderConfig;
use crate::error::{Result, ReflogError};
use crate::providers::{ChatMessage, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat completions provider
///
/// # Examples
///
/// ```
/// use reflog::config::ProviderConfig;
/// use reflog::providers::OpenAiProvider;
///
/// let provider = OpenAiProvider::new(ProviderConfig::default());
/// assert!(provider.is_ok());
/// ```
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
}

/// Request body for `/chat/completions`
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
}

/// Response body from `/chat/completions`
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("reflog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReflogError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn api_key(&self) -> Result<String> {
        match std::env::var(&self.config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ReflogError::MissingCredentials(format!(
                "{} is not set",
                self.config.api_key_env
            ))
            .into()),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let api_key = self.api_key()?;

        let request = CompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages,
        };

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Chat completion request failed: {}", e);
                ReflogError::Provider(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Provider returned error {}: {}", status, error_text);
            return Err(ReflogError::Provider(format!(
                "Provider returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: CompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse chat completion response: {}", e);
            ReflogError::Provider(format!("Failed to parse response: {}", e))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ReflogError::Provider("Response contained no generated text".to_string()).into()
            })
    }
}

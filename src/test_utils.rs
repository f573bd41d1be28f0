//! Test utilities for Reflog
//!
//! Temporary storage, a scripted provider, and assertion helpers shared by
//! unit tests.

use crate::error::{Result, ReflogError};
use crate::providers::{ChatMessage, Provider};
use crate::storage::SqliteStorage;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a storage instance in a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the storage is used.
pub fn temp_storage() -> (SqliteStorage, TempDir) {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let storage =
        SqliteStorage::new_with_path(dir.path().join("reflog.db")).expect("Failed to open storage");
    (storage, dir)
}

/// Provider that replays canned replies in order and records every request
///
/// Running out of replies is reported as a provider error.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<std::result::Result<String, ReflogError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<std::result::Result<String, ReflogError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every message list passed to `complete`, oldest first
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => Err(e.into()),
            None => Err(ReflogError::Provider("no scripted reply left".to_string()).into()),
        }
    }
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_storage_creates_database() {
        let (storage, _dir) = temp_storage();
        assert!(storage.path().exists());
    }

    #[tokio::test]
    async fn test_scripted_provider_replays_in_order() {
        let provider = ScriptedProvider::new(vec![Ok("a".to_string()), Ok("b".to_string())]);
        assert_eq!(provider.complete(&[]).await.unwrap(), "a");
        assert_eq!(provider.complete(&[]).await.unwrap(), "b");
        assert!(provider.complete(&[]).await.is_err());
        assert_eq!(provider.requests().len(), 3);
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(ReflogError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: Result<()> = Ok(());
        assert_error_contains(result, "error");
    }
}

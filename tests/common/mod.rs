use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use reflog::auth;
use reflog::config::Config;
use reflog::error::{ReflogError, Result};
use reflog::providers::{ChatMessage, Provider};
use reflog::server::AppState;
use reflog::storage::SqliteStorage;

#[allow(dead_code)]
pub fn create_temp_storage() -> (SqliteStorage, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("reflog.db");
    let storage =
        SqliteStorage::new_with_path(db_path).expect("failed to create sqlite storage with path");
    (storage, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Register a user and return `(user_id, token)`
#[allow(dead_code)]
pub fn register(storage: &SqliteStorage, email: &str) -> (String, String) {
    let (user, token) =
        auth::register_user(storage, email, "Tester").expect("failed to register user");
    (user.id, token)
}

/// Provider replaying canned replies and recording each request
#[allow(dead_code)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<std::result::Result<String, ReflogError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(replies: Vec<std::result::Result<String, ReflogError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

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

/// Application state over `storage` with the default configuration
#[allow(dead_code)]
pub fn app_state(storage: &SqliteStorage, provider: Arc<dyn Provider>) -> Arc<AppState> {
    Arc::new(AppState::new(Config::default(), storage.clone(), provider))
}

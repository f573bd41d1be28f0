//! Bearer access tokens
//!
//! Identity is established elsewhere; this module only mints opaque tokens
//! for registered users and resolves presented tokens back to a user id.
//! Tokens are never stored, only their SHA-256 digest.

use crate::error::{Result, ReflogError};
use crate::storage::{SqliteStorage, User};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

const MIN_DISPLAY_NAME_CHARS: usize = 2;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Validate registration input
///
/// # Errors
///
/// Returns `ReflogError::InvalidInput` for a malformed email or a display
/// name shorter than two characters
pub fn validate_registration(email: &str, display_name: &str) -> Result<()> {
    if !email_regex().is_match(email.trim()) {
        return Err(ReflogError::InvalidInput("Enter a valid email address".to_string()).into());
    }
    if display_name.trim().chars().count() < MIN_DISPLAY_NAME_CHARS {
        return Err(ReflogError::InvalidInput(format!(
            "Display name must be at least {} characters",
            MIN_DISPLAY_NAME_CHARS
        ))
        .into());
    }
    Ok(())
}

/// Generate a new random token (32 bytes, base64url)
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex-encoded SHA-256 digest of a token
pub fn hash_token(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Register a user and mint their first token
///
/// Returns the user and the plaintext token, which is not recoverable later.
pub fn register_user(
    storage: &SqliteStorage,
    email: &str,
    display_name: &str,
) -> Result<(User, String)> {
    validate_registration(email, display_name)?;
    let user = storage.create_user(email, display_name)?;
    let token = issue_token(storage, &user.id)?;
    tracing::info!(user_id = %user.id, "Registered user");
    Ok((user, token))
}

/// Mint an additional token for an existing user
pub fn issue_token(storage: &SqliteStorage, user_id: &str) -> Result<String> {
    let token = generate_token();
    storage.insert_access_token(user_id, &hash_token(&token))?;
    Ok(token)
}

/// Resolve a presented bearer token to a user id
///
/// # Errors
///
/// Returns `ReflogError::Unauthenticated` for an empty or unknown token
pub fn authenticate(storage: &SqliteStorage, token: &str) -> Result<String> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ReflogError::Unauthenticated.into());
    }
    storage
        .user_id_for_token(&hash_token(token))?
        .ok_or_else(|| ReflogError::Unauthenticated.into())
}

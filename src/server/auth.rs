//! Bearer token extraction

use super::error::ApiError;
use super::{run_blocking, AppState};
use crate::auth;
use crate::error::{Result, ReflogError};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use std::sync::Arc;

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Token of a `Bearer` credential; the scheme name is case-insensitive
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolve the `Authorization: Bearer <token>` header to a user id
///
/// # Errors
///
/// Returns `ReflogError::Unauthenticated` for a missing, malformed or
/// unknown credential
pub fn authenticate_headers(state: &AppState, headers: &HeaderMap) -> Result<AuthUser> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or(ReflogError::Unauthenticated)?;

    let user_id = auth::authenticate(&state.storage, token)?;
    Ok(AuthUser { user_id })
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let headers = parts.headers.clone();
        Ok(run_blocking(state, move |state| authenticate_headers(state, &headers)).await?)
    }
}

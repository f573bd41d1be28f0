//! Route handlers and their JSON shapes

use super::auth::{authenticate_headers, AuthUser};
use super::error::ApiError;
use super::{run_blocking, AppState};
use crate::coach::{self, TurnStatus};
use crate::prompts::{self, DailyPrompt};
use crate::storage::{Session, SessionListItem, StoredMessage};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

// ── Schemas ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub id: &'static str,
    pub text: &'static str,
}

impl From<&DailyPrompt> for PromptResponse {
    fn from(p: &DailyPrompt) -> Self {
        Self {
            id: p.id,
            text: p.text,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub prompt_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub prompt_id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub key_points: Vec<String>,
    pub next_questions: Vec<String>,
    pub closed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        let closed = s.is_closed();
        Self {
            id: s.id,
            prompt_id: s.prompt_id,
            title: s.title,
            summary: s.summary,
            key_points: s.key_points.unwrap_or_default(),
            next_questions: s.next_questions.unwrap_or_default(),
            closed,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListEntry {
    pub id: String,
    pub prompt_id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SessionListItem> for SessionListEntry {
    fn from(s: SessionListItem) -> Self {
        Self {
            id: s.id,
            prompt_id: s.prompt_id,
            title: s.title,
            summary: s.summary,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredMessage> for MessageResponse {
    fn from(m: StoredMessage) -> Self {
        Self {
            id: m.id,
            role: m.role.as_str().to_string(),
            content: m.content,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetailResponse {
    pub session: SessionResponse,
    pub prompt_text: Option<String>,
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub status: TurnStatus,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Register every route
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/prompts/today", get(today_prompt))
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/chat", post(chat))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn today_prompt() -> Json<PromptResponse> {
    Json(prompts::daily_prompt_today().into())
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    // The body is optional; an empty one means today's prompt.
    let req: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let session = run_blocking(&state, move |state| {
        coach::start_session(&state.storage, &user.user_id, req.prompt_id.as_deref())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<SessionListEntry>>, ApiError> {
    let sessions =
        run_blocking(&state, move |state| state.storage.list_sessions(&user.user_id)).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionDetailResponse>, ApiError> {
    let detail = run_blocking(&state, move |state| {
        coach::session_detail(&state.storage, &user.user_id, &id)
    })
    .await?;
    Ok(Json(SessionDetailResponse {
        session: detail.session.into(),
        prompt_text: detail.prompt_text,
        messages: detail.messages.into_iter().map(Into::into).collect(),
    }))
}

/// Submit one turn
///
/// The body is validated before the caller is authenticated, so a malformed
/// request is a 400 even without a token.
async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    coach::validate_turn_input(
        &req.session_id,
        &req.content,
        state.controller.config().max_message_chars,
    )?;

    let user = run_blocking(&state, move |state| authenticate_headers(state, &headers)).await?;
    let status = state
        .controller
        .submit_turn(&user.user_id, &req.session_id, &req.content)
        .await?;

    Ok(Json(ChatResponse { status }))
}

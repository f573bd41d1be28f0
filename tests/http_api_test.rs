mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{app_state, create_temp_storage, register, ScriptedProvider};
use reflog::error::ReflogError;
use reflog::prompts;
use reflog::server::build_router;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

const SUMMARY_JSON: &str = r#"{"summary": "You noticed how much rest matters.", "key_points": ["sleep", "guilt about resting"], "next_questions": ["What would a real day off look like?"]}"#;

#[tokio::test]
async fn test_health_and_today_prompt_are_public() {
    let (storage, _tmp) = create_temp_storage();
    let app = build_router(app_state(&storage, ScriptedProvider::replying(&[])));

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/api/prompts/today", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap();
    let prompt = prompts::find_prompt(id).expect("prompt from the pool");
    assert_eq!(body["text"], prompt.text);
}

#[tokio::test]
async fn test_sessions_require_a_known_token() {
    let (storage, _tmp) = create_temp_storage();
    let app = build_router(app_state(&storage, ScriptedProvider::replying(&[])));

    let (status, body) = send(&app, "POST", "/api/sessions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/sessions", Some("made-up"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_session_defaults_to_today_and_starts_untitled() {
    let (storage, _tmp) = create_temp_storage();
    let (_, token) = register(&storage, "ana@example.com");
    let app = build_router(app_state(&storage, ScriptedProvider::replying(&[])));

    let (status, body) = send(&app, "POST", "/api/sessions", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["promptId"], prompts::daily_prompt_today().id);
    assert!(body["title"].is_null());
    assert_eq!(body["closed"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(token.as_str()),
        Some(json!({ "promptId": "gratitude-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["promptId"], "gratitude-1");
}

#[tokio::test]
async fn test_create_session_rejects_unknown_prompt() {
    let (storage, _tmp) = create_temp_storage();
    let (_, token) = register(&storage, "ana@example.com");
    let app = build_router(app_state(&storage, ScriptedProvider::replying(&[])));

    let (status, body) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(token.as_str()),
        Some(json!({ "promptId": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_three_turns_close_the_session() {
    let (storage, _tmp) = create_temp_storage();
    let (_, token) = register(&storage, "ana@example.com");
    let provider = ScriptedProvider::replying(&[
        "What does rest mean to you?  \n",
        "When did you last feel rested?",
        SUMMARY_JSON,
    ]);
    let app = build_router(app_state(&storage, provider.clone()));

    let (_, session) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(token.as_str()),
        Some(json!({ "promptId": "rest-1" })),
    )
    .await;
    let session_id = session["id"].as_str().unwrap().to_string();

    for (content, expected) in [
        ("I never feel like I deserve a break.", "ok"),
        ("Probably on holiday last summer.", "ok"),
        ("I want to rest without guilt.", "summarized"),
    ] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/chat",
            Some(token.as_str()),
            Some(json!({ "sessionId": session_id, "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "turn '{}' failed: {}", content, body);
        assert_eq!(body["status"], expected);
    }

    let (status, detail) = send(
        &app,
        "GET",
        &format!("/api/sessions/{}", session_id),
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["session"]["closed"], true);
    assert_eq!(
        detail["session"]["summary"],
        "You noticed how much rest matters."
    );
    assert_eq!(detail["session"]["keyPoints"], json!(["sleep", "guilt about resting"]));
    assert_eq!(
        detail["session"]["title"],
        "I never feel like I deserve a br"
    );

    let messages = detail["messages"].as_array().unwrap();
    let roles: Vec<&str> = messages
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(
        roles,
        vec!["user", "assistant", "user", "assistant", "user", "assistant"]
    );
    assert_eq!(messages[1]["content"], "What does rest mean to you?");
    assert_eq!(provider.requests().len(), 3);

    let (status, _) = send(
        &app,
        "POST",
        "/api/chat",
        Some(token.as_str()),
        Some(json!({ "sessionId": session_id, "content": "One more thing" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_validates_body_before_authenticating() {
    let (storage, _tmp) = create_temp_storage();
    let app = build_router(app_state(&storage, ScriptedProvider::replying(&[])));

    let (status, _) = send(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(json!({ "sessionId": "not-a-uuid", "content": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/chat", None, Some(json!({ "content": "hi" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(json!({ "sessionId": uuid::Uuid::new_v4().to_string(), "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let too_long = "a".repeat(2001);
    let (status, _) = send(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(json!({ "sessionId": uuid::Uuid::new_v4().to_string(), "content": too_long })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(json!({ "sessionId": uuid::Uuid::new_v4().to_string(), "content": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chat_on_unowned_or_unknown_session_is_not_found() {
    let (storage, _tmp) = create_temp_storage();
    let (_, owner_token) = register(&storage, "owner@example.com");
    let (_, other_token) = register(&storage, "other@example.com");
    let provider = ScriptedProvider::replying(&["reply"]);
    let app = build_router(app_state(&storage, provider.clone()));

    let (_, session) = send(&app, "POST", "/api/sessions", Some(owner_token.as_str()), None).await;
    let session_id = session["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/chat",
        Some(other_token.as_str()),
        Some(json!({ "sessionId": session_id, "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/chat",
        Some(owner_token.as_str()),
        Some(json!({ "sessionId": uuid::Uuid::new_v4().to_string(), "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/sessions/{}", session_id),
        Some(other_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_provider_failure_is_500_and_keeps_user_message() {
    let (storage, _tmp) = create_temp_storage();
    let (user_id, token) = register(&storage, "ana@example.com");
    let provider = ScriptedProvider::new(vec![Err(ReflogError::Provider(
        "upstream returned 502".to_string(),
    ))]);
    let app = build_router(app_state(&storage, provider));

    let (_, session) = send(&app, "POST", "/api/sessions", Some(token.as_str()), None).await;
    let session_id = session["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/chat",
        Some(token.as_str()),
        Some(json!({ "sessionId": session_id, "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate a coaching reply");

    let messages = storage.list_messages(session_id).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hello");
    let session = storage.get_session(session_id, &user_id).unwrap().unwrap();
    assert!(!session.is_closed());
}

#[tokio::test]
async fn test_list_sessions_only_returns_own_sessions() {
    let (storage, _tmp) = create_temp_storage();
    let (_, ana) = register(&storage, "ana@example.com");
    let (_, ben) = register(&storage, "ben@example.com");
    let app = build_router(app_state(&storage, ScriptedProvider::replying(&[])));

    send(&app, "POST", "/api/sessions", Some(ana.as_str()), None).await;
    send(&app, "POST", "/api/sessions", Some(ana.as_str()), None).await;
    send(&app, "POST", "/api/sessions", Some(ben.as_str()), None).await;

    let (status, body) = send(&app, "GET", "/api/sessions", Some(ana.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/sessions", Some(ben.as_str()), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_chat_accepts_uppercase_session_id() {
    let (storage, _tmp) = create_temp_storage();
    let (_, token) = register(&storage, "ana@example.com");
    let app = build_router(app_state(&storage, ScriptedProvider::replying(&["Go on."])));

    let (_, session) = send(&app, "POST", "/api/sessions", Some(token.as_str()), None).await;
    let session_id = session["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/chat",
        Some(token.as_str()),
        Some(json!({ "sessionId": session_id.to_uppercase(), "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "ok");

    let (status, detail) = send(
        &app,
        "GET",
        &format!("/api/sessions/{}", session_id.to_uppercase()),
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["session"]["id"], session_id);
    assert_eq!(detail["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_summary_failure_is_500_and_session_stays_open() {
    let (storage, _tmp) = create_temp_storage();
    let (user_id, token) = register(&storage, "ana@example.com");
    let provider = ScriptedProvider::new(vec![
        Ok("First question?".to_string()),
        Ok("Second question?".to_string()),
        Err(ReflogError::Provider("upstream returned 502".to_string())),
        Ok(SUMMARY_JSON.to_string()),
    ]);
    let app = build_router(app_state(&storage, provider));

    let (_, session) = send(&app, "POST", "/api/sessions", Some(token.as_str()), None).await;
    let session_id = session["id"].as_str().unwrap().to_string();
    let chat = |content: &str| json!({ "sessionId": session_id, "content": content });

    for content in ["u1", "u2"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/chat",
            Some(token.as_str()),
            Some(chat(content)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) =
        send(&app, "POST", "/api/chat", Some(token.as_str()), Some(chat("u3"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate the session summary");

    let stored = storage.get_session(&session_id, &user_id).unwrap().unwrap();
    assert!(!stored.is_closed());
    let messages = storage.list_messages(&session_id).unwrap();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[4].content, "u3");

    let (status, body) =
        send(&app, "POST", "/api/chat", Some(token.as_str()), Some(chat("u4"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "summarized");
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let (storage, _tmp) = create_temp_storage();
    let (_, token) = register(&storage, "ana@example.com");
    let app = build_router(app_state(&storage, ScriptedProvider::replying(&[])));

    let request = Request::builder()
        .method("GET")
        .uri("/api/sessions")
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

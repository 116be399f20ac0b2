//! Chat endpoint integration tests
//!
//! Tests for `POST /api/chat`:
//! - Mock mode replies when no API key is configured
//! - Session creation and continuation
//! - History cap on what is sent upstream
//! - Request validation before any upstream call
//! - Upstream failures surfacing as apology replies
//! - Standard and vendor wire formats
//! - Concurrent requests sharing one session

use axum::http::StatusCode;
use mcp_chat::{
    completion::mock::{MockProvider, MOCK_REPLY_PREFIX},
    config::UpstreamFormat,
    session::Role,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{
    mock_mode_config, mock_mode_server, server_for, spawn_app, upstream_config, upstream_server,
};
use crate::mocks::MockUpstream;

#[tokio::test]
async fn test_mock_mode_echoes_message() {
    let server = mock_mode_server();

    let response = server
        .post("/api/chat")
        .json(&json!({"message": "Hello, gateway"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["error"].is_null());
    assert_eq!(
        body["data"]["response"],
        MockProvider::reply_for("Hello, gateway").as_str()
    );
    assert!(body["data"]["response"]
        .as_str()
        .unwrap()
        .starts_with(MOCK_REPLY_PREFIX));
}

#[tokio::test]
async fn test_missing_session_id_creates_new_one() {
    let server = mock_mode_server();

    let first: Value = server
        .post("/api/chat")
        .json(&json!({"message": "one"}))
        .await
        .json();
    let second: Value = server
        .post("/api/chat")
        .json(&json!({"message": "two"}))
        .await
        .json();

    let first_id = first["data"]["session_id"].as_str().unwrap();
    let second_id = second["data"]["session_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(first_id).is_ok());
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_empty_session_id_is_replaced() {
    let server = mock_mode_server();

    let body: Value = server
        .post("/api/chat")
        .json(&json!({"message": "hi", "session_id": ""}))
        .await
        .json();

    assert!(!body["data"]["session_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_id_continues_history() {
    let upstream = MockUpstream::start().await;
    upstream.mock_chat_reply("Nice to meet you.").await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    let first: Value = server
        .post("/api/chat")
        .json(&json!({"message": "My name is Ada."}))
        .await
        .json();
    let session_id = first["data"]["session_id"].as_str().unwrap().to_string();

    let second: Value = server
        .post("/api/chat")
        .json(&json!({"message": "What is my name?", "session_id": session_id}))
        .await
        .json();

    assert_eq!(second["data"]["session_id"], session_id.as_str());
    assert_eq!(
        upstream.last_messages().await,
        vec![
            json!({"role": "user", "content": "My name is Ada."}),
            json!({"role": "assistant", "content": "Nice to meet you."}),
            json!({"role": "user", "content": "What is my name?"}),
        ]
    );
}

#[tokio::test]
async fn test_client_supplied_session_id_is_kept() {
    let server = mock_mode_server();

    let body: Value = server
        .post("/api/chat")
        .json(&json!({"message": "hi", "session_id": "memory-42"}))
        .await
        .json();

    assert_eq!(body["data"]["session_id"], "memory-42");
}

#[tokio::test]
async fn test_history_sent_upstream_is_capped() {
    let upstream = MockUpstream::start().await;
    upstream.mock_chat_reply("ok").await;
    let mut config = upstream_config(&upstream, UpstreamFormat::Standard);
    config.max_session_turns = 4;
    let server = server_for(config);

    for i in 0..5 {
        server
            .post("/api/chat")
            .json(&json!({"message": format!("message {}", i), "session_id": "capped"}))
            .await
            .assert_status_ok();
    }

    let bodies = upstream.received_bodies().await;
    assert_eq!(bodies.len(), 5);
    for body in &bodies {
        assert!(body["messages"].as_array().unwrap().len() <= 4);
    }

    let last = upstream.last_messages().await;
    assert_eq!(last.len(), 4);
    assert_eq!(last[0], json!({"role": "assistant", "content": "ok"}));
    assert_eq!(last[3], json!({"role": "user", "content": "message 4"}));
}

#[tokio::test]
async fn test_sessions_do_not_share_history() {
    let upstream = MockUpstream::start().await;
    upstream.mock_chat_reply("ok").await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    server
        .post("/api/chat")
        .json(&json!({"message": "for a", "session_id": "a"}))
        .await;
    server
        .post("/api/chat")
        .json(&json!({"message": "for b", "session_id": "b"}))
        .await;

    assert_eq!(
        upstream.last_messages().await,
        vec![json!({"role": "user", "content": "for b"})]
    );
}

#[tokio::test]
async fn test_default_temperature_and_max_tokens_sent_upstream() {
    let upstream = MockUpstream::start().await;
    upstream.mock_chat_reply("ok").await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    server
        .post("/api/chat")
        .json(&json!({"message": "hi"}))
        .await
        .assert_status_ok();

    let body = upstream.received_bodies().await.pop().unwrap();
    assert_eq!(body["temperature"], 0.7);
    assert_eq!(body["max_tokens"], 1000);
    assert_eq!(body["model"], "gpt-3.5-turbo");
    assert!(body.get("stream").is_none());
}

#[tokio::test]
async fn test_temperature_out_of_range_is_rejected_before_upstream() {
    let upstream = MockUpstream::start().await;
    upstream.mock_chat_reply("should not be used").await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    for temperature in [-0.5, 2.5] {
        let response = server
            .post("/api/chat")
            .json(&json!({"message": "hi", "temperature": temperature}))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert!(body["error"].as_str().unwrap().contains("temperature"));
    }

    assert!(upstream.received_bodies().await.is_empty());
}

#[tokio::test]
async fn test_boundary_temperatures_are_accepted() {
    let server = mock_mode_server();

    for temperature in [0.0, 2.0] {
        server
            .post("/api/chat")
            .json(&json!({"message": "hi", "temperature": temperature}))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_invalid_body_is_rejected() {
    let server = mock_mode_server();

    let response = server.post("/api/chat").text("not json").await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["success"], false);

    let response = server
        .post("/api/chat")
        .json(&json!({"session_id": "no-message"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_upstream_error_becomes_apology_reply() {
    let upstream = MockUpstream::start().await;
    upstream.mock_status(503, "model overloaded").await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    let response = server
        .post("/api/chat")
        .json(&json!({"message": "hi", "session_id": "failing"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let reply = body["data"]["response"].as_str().unwrap();
    assert!(reply.starts_with("Sorry"));
    assert!(reply.contains("503"));
    assert!(reply.contains("model overloaded"));
}

#[tokio::test]
async fn test_failed_reply_is_not_recorded_in_history() {
    let upstream = MockUpstream::start().await;
    upstream.mock_status(500, "boom").await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    for message in ["first", "second"] {
        server
            .post("/api/chat")
            .json(&json!({"message": message, "session_id": "s"}))
            .await
            .assert_status_ok();
    }

    assert_eq!(
        upstream.last_messages().await,
        vec![
            json!({"role": "user", "content": "first"}),
            json!({"role": "user", "content": "second"}),
        ]
    );
}

#[tokio::test]
async fn test_malformed_upstream_body_becomes_apology_reply() {
    let upstream = MockUpstream::start().await;
    upstream.mock_malformed_body().await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    let body: Value = server
        .post("/api/chat")
        .json(&json!({"message": "hi"}))
        .await
        .json();

    assert_eq!(body["success"], true);
    let reply = body["data"]["response"].as_str().unwrap();
    assert!(!reply.is_empty());
    assert!(reply.starts_with("Sorry"));
}

#[tokio::test]
async fn test_text_completion_shape_is_understood() {
    let upstream = MockUpstream::start().await;
    upstream.mock_text_reply("plain text reply").await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    let body: Value = server
        .post("/api/chat")
        .json(&json!({"message": "hi"}))
        .await
        .json();

    assert_eq!(body["data"]["response"], "plain text reply");
}

#[tokio::test]
async fn test_vendor_format_round_trip() {
    let upstream = MockUpstream::start().await;
    upstream.mock_vendor_reply("vendor says hi").await;
    let server = upstream_server(&upstream, UpstreamFormat::Vendor);

    let body: Value = server
        .post("/api/chat")
        .json(&json!({"message": "hi", "temperature": 1.5}))
        .await
        .json();

    assert_eq!(body["data"]["response"], "vendor says hi");

    let sent = upstream.received_bodies().await.pop().unwrap();
    assert_eq!(sent["stream"], false);
    assert_eq!(sent["temperature"], 1.5);
    assert_eq!(sent["messages"], json!([{"role": "user", "content": "hi"}]));
}

#[tokio::test]
async fn test_unknown_upstream_shape_returns_raw_json() {
    let upstream = MockUpstream::start().await;
    upstream.mock_json(json!({"output": {"answer": 42}})).await;
    let server = upstream_server(&upstream, UpstreamFormat::Standard);

    let body: Value = server
        .post("/api/chat")
        .json(&json!({"message": "hi"}))
        .await
        .json();

    let reply = body["data"]["response"].as_str().unwrap();
    let reparsed: Value = serde_json::from_str(reply).unwrap();
    assert_eq!(reparsed, json!({"output": {"answer": 42}}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_chats_on_one_session_keep_turns_paired() {
    let (base_url, state) = spawn_app(mock_mode_config()).await;
    let client = reqwest::Client::new();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..40 {
        let client = client.clone();
        let url = format!("{}/api/chat", base_url);
        tasks.spawn(async move {
            client
                .post(url)
                .json(&json!({"message": format!("msg-{}", i), "session_id": "shared"}))
                .send()
                .await
                .expect("request failed")
                .json::<Value>()
                .await
                .expect("body was not JSON")
        });
    }

    while let Some(result) = tasks.join_next().await {
        let body = result.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["session_id"], "shared");
    }

    assert_eq!(state.sessions.len(), 1);
    let turns = state.sessions.get_or_create("shared").await;
    assert_eq!(turns.len(), 20);

    for pair in turns.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Assistant);
        assert_eq!(pair[1].content, MockProvider::reply_for(&pair[0].content));
    }
}

//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, message history, sessions).

mod fixtures;
use fixtures::{TestServer, chat_payload, recv_text, send_text};

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_messages_endpoint_missing_log() {
    // テスト項目: ログ未作成の場合、/api/messages は空配列を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/messages", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_messages_endpoint_after_relay() {
    // テスト項目: 中継されたメッセージが /api/messages に追記順で現れる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (mut alice, _) = server.connect().await;
    let (mut bob, _) = server.connect().await;

    // when (操作):
    send_text(&mut alice, &chat_payload("alice", "t1", "one")).await;
    recv_text(&mut bob).await;
    send_text(&mut alice, &chat_payload("alice", "t2", "two")).await;
    recv_text(&mut bob).await;

    let response = client
        .get(format!("{}/api/messages", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        serde_json::json!([
            {"time": "t1", "who": "alice", "what": "one"},
            {"time": "t2", "who": "alice", "what": "two"},
        ])
    );
}

#[tokio::test]
async fn test_sessions_endpoint() {
    // テスト項目: /api/sessions が接続中のセッション数を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (_alice, _) = server.connect().await;
    let (_bob, _) = server.connect().await;

    // when (操作):
    let response = client
        .get(format!("{}/api/sessions", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 2);
}

//! Test helpers for the HTTP API tests.
//!
//! Builds an in-process server over an in-memory SQLite database with cheap
//! Argon2 parameters, plus shortcuts for creating threads and replies.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use anonboard::config::{SecretConfig, ServerConfig};
use anonboard::web::WebServer;
use anonboard::{Argon2Verifier, BoardService, Database, SqliteBoardRepository};

/// Argon2 parameters small enough to keep tests fast.
pub fn cheap_secret_config() -> SecretConfig {
    SecretConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

/// Create a board service over a fresh in-memory database.
pub async fn create_test_service() -> BoardService {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let repo = Arc::new(SqliteBoardRepository::new(db.pool()));
    let verifier =
        Arc::new(Argon2Verifier::new(&cheap_secret_config()).expect("valid secret config"));
    BoardService::new(repo, verifier)
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> TestServer {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
    };
    let web = WebServer::new(&config, create_test_service().await)
        .expect("Failed to create web server");
    TestServer::new(web.router()).expect("Failed to create test server")
}

/// Create a thread through the API and return its id.
pub async fn create_thread(server: &TestServer, board: &str, text: &str, password: &str) -> String {
    let response = server
        .post(&format!("/api/threads/{board}"))
        .json(&json!({ "text": text, "delete_password": password }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    body["_id"]
        .as_str()
        .expect("thread id in response")
        .to_string()
}

/// Reply to a thread through the API and return the updated thread.
pub async fn create_reply(
    server: &TestServer,
    board: &str,
    thread_id: &str,
    text: &str,
    password: &str,
) -> Value {
    let response = server
        .post(&format!("/api/replies/{board}"))
        .json(&json!({
            "thread_id": thread_id,
            "text": text,
            "delete_password": password
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

/// Fetch a thread with all of its replies.
pub async fn view_thread(server: &TestServer, board: &str, thread_id: &str) -> Value {
    let response = server
        .get(&format!("/api/replies/{board}"))
        .add_query_param("thread_id", thread_id)
        .await;
    response.assert_status_ok();
    response.json()
}

/// Assert that a JSON object carries none of the private fields.
pub fn assert_redacted(value: &Value) {
    let obj = value.as_object().expect("JSON object");
    assert!(!obj.contains_key("reported"), "reported leaked: {value}");
    assert!(!obj.contains_key("secret_hash"), "secret_hash leaked: {value}");
    assert!(
        !obj.contains_key("delete_password"),
        "delete_password leaked: {value}"
    );
}

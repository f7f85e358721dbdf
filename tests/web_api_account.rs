//! Web API account, Telegram link and storage usage tests.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

use common::{account_email_header, account_id_header, create_test_app};

#[tokio::test]
async fn test_auth_user_creates_account_from_headers() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/api/auth/user")
        .add_header(account_id_header(), "alice")
        .add_header(account_email_header(), "alice@example.com")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["id"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["telegram_connected"], false);
}

#[tokio::test]
async fn test_auth_user_merges_profile_on_repeat_calls() {
    let app = create_test_app().await;

    app.server
        .get("/api/auth/user")
        .add_header(account_id_header(), "alice")
        .add_header(account_email_header(), "alice@example.com")
        .await
        .assert_status_ok();

    // Second call without the email header keeps the stored value
    let response = app
        .server
        .get("/api/auth/user")
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_auth_user_requires_identity() {
    let app = create_test_app().await;

    let response = app.server.get("/api/auth/user").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_storage_usage_starts_empty_on_base_tier() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/api/storage/usage")
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["used"], 0);
    assert_eq!(body["data"]["limit"], 16_106_127_360_i64);
    assert_eq!(body["data"]["percentage"], 0.0);
    assert_eq!(body["data"]["linked"], false);
}

#[tokio::test]
async fn test_storage_usage_tracks_uploads() {
    let app = create_test_app().await;

    let part = Part::bytes(b"0123456789".to_vec())
        .file_name("a.txt".to_string())
        .mime_type("text/plain".to_string());
    app.server
        .post("/api/files/upload")
        .add_header(account_id_header(), "alice")
        .multipart(MultipartForm::new().add_part("file", part))
        .await
        .assert_status_ok();

    let response = app
        .server
        .get("/api/storage/usage")
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["used"], 10);
}

#[tokio::test]
async fn test_connect_telegram_upgrades_quota() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/telegram/connect")
        .add_header(account_id_header(), "alice")
        .json(&json!({
            "telegram_user_id": "tg-42",
            "telegram_username": "ada",
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["telegram_connected"], true);
    assert_eq!(body["data"]["telegram_user_id"], "tg-42");

    let response = app
        .server
        .get("/api/storage/usage")
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["limit"], 107_374_182_400_i64);
    assert_eq!(body["data"]["linked"], true);
}

#[tokio::test]
async fn test_connect_telegram_rejects_empty_user_id() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/telegram/connect")
        .add_header(account_id_header(), "alice")
        .json(&json!({ "telegram_user_id": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_disconnect_telegram_is_idempotent() {
    let app = create_test_app().await;

    app.server
        .post("/api/telegram/connect")
        .add_header(account_id_header(), "alice")
        .json(&json!({ "telegram_user_id": "tg-42" }))
        .await
        .assert_status_ok();

    let response = app
        .server
        .post("/api/telegram/disconnect")
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["telegram_connected"], false);
    assert!(body["data"]["telegram_user_id"].is_null());

    // Second disconnect on an already unlinked account still succeeds
    let response = app
        .server
        .post("/api/telegram/disconnect")
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    // Back on the base tier
    let response = app
        .server
        .get("/api/storage/usage")
        .add_header(account_id_header(), "alice")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["limit"], 16_106_127_360_i64);
}

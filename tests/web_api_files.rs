//! Web API file tests.
//!
//! Integration tests for upload, listing, download and deletion,
//! including cross-account isolation.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::Value;

use common::{account_id_header, create_test_app, TestApp};
use cumulus::FileRepository;

/// Upload a file as the given account and return the response JSON.
async fn upload(
    app: &TestApp,
    account: &str,
    filename: &str,
    mime: &str,
    bytes: &[u8],
) -> Value {
    let part = Part::bytes(bytes.to_vec())
        .file_name(filename.to_string())
        .mime_type(mime.to_string());
    let form = MultipartForm::new().add_part("file", part);

    let response = app
        .server
        .post("/api/files/upload")
        .add_header(account_id_header(), account.to_string())
        .multipart(form)
        .await;

    response.assert_status_ok();
    response.json::<Value>()
}

#[tokio::test]
async fn test_upload_text_file() {
    let app = create_test_app().await;

    let body = upload(&app, "alice", "a.txt", "text/plain", b"0123456789").await;

    let file = &body["data"];
    assert_eq!(file["filename"], "a.txt");
    assert_eq!(file["size"], 10);
    assert_eq!(file["mime_type"], "text/plain");
    assert_eq!(file["source"], "web");
    assert!(file["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_upload_without_file_part_is_bad_request() {
    let app = create_test_app().await;

    let form = MultipartForm::new().add_text("comment", "no file here");
    let response = app
        .server
        .post("/api/files/upload")
        .add_header(account_id_header(), "alice")
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_identity() {
    let app = create_test_app().await;

    let form = MultipartForm::new().add_part("file", Part::bytes(b"x".to_vec()));
    let response = app.server.post("/api/files/upload").multipart(form).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_files_newest_first() {
    let app = create_test_app().await;

    upload(&app, "alice", "first.txt", "text/plain", b"one").await;
    upload(&app, "alice", "second.txt", "text/plain", b"two").await;
    upload(&app, "bob", "other.txt", "text/plain", b"three").await;

    let response = app
        .server
        .get("/api/files")
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let files = body["data"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["filename"], "second.txt");
    assert_eq!(files[1]["filename"], "first.txt");
}

#[tokio::test]
async fn test_get_file_metadata() {
    let app = create_test_app().await;

    let body = upload(&app, "alice", "a.txt", "text/plain", b"hello").await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .server
        .get(&format!("/api/files/{id}"))
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["filename"], "a.txt");
    assert_eq!(body["data"]["size"], 5);
}

#[tokio::test]
async fn test_get_file_of_other_account_is_not_found() {
    let app = create_test_app().await;

    let body = upload(&app, "bob", "secret.txt", "text/plain", b"secret").await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .server
        .get(&format!("/api/files/{id}"))
        .add_header(account_id_header(), "alice")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_returns_bytes_and_headers() {
    let app = create_test_app().await;

    let body = upload(&app, "alice", "a.txt", "text/plain", b"0123456789").await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .server
        .get(&format!("/api/files/{id}/download"))
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    assert_eq!(response.as_bytes().as_ref(), b"0123456789");

    let content_type = response.header("content-type");
    assert_eq!(content_type.to_str().unwrap(), "text/plain");

    let disposition = response.header("content-disposition");
    assert_eq!(
        disposition.to_str().unwrap(),
        "attachment; filename=\"a.txt\""
    );
}

#[tokio::test]
async fn test_download_with_missing_object_is_not_found() {
    let app = create_test_app().await;

    let body = upload(&app, "alice", "a.txt", "text/plain", b"hello").await;
    let id = body["data"]["id"].as_i64().unwrap();

    // Remove the physical object out from under the catalog
    let file = FileRepository::new(app.db.pool())
        .get_by_id_for_owner(id, "alice")
        .await
        .unwrap()
        .unwrap();
    std::fs::remove_file(app.store_dir.path().join(&file.stored_name)).unwrap();

    let response = app
        .server
        .get(&format!("/api/files/{id}/download"))
        .add_header(account_id_header(), "alice")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_file_removes_row_and_object() {
    let app = create_test_app().await;

    let body = upload(&app, "alice", "a.txt", "text/plain", b"hello").await;
    let id = body["data"]["id"].as_i64().unwrap();

    let stored_name = FileRepository::new(app.db.pool())
        .get_by_id_for_owner(id, "alice")
        .await
        .unwrap()
        .unwrap()
        .stored_name;
    assert!(app.store_dir.path().join(&stored_name).exists());

    let response = app
        .server
        .delete(&format!("/api/files/{id}"))
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "File deleted successfully");

    assert!(!app.store_dir.path().join(&stored_name).exists());
    assert!(FileRepository::new(app.db.pool())
        .get_by_id_for_owner(id, "alice")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_delete_file_of_other_account_leaves_it_untouched() {
    let app = create_test_app().await;

    let body = upload(&app, "bob", "secret.txt", "text/plain", b"secret").await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .server
        .delete(&format!("/api/files/{id}"))
        .add_header(account_id_header(), "alice")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // Bob's file and its bytes survive
    let file = FileRepository::new(app.db.pool())
        .get_by_id_for_owner(id, "bob")
        .await
        .unwrap()
        .unwrap();
    assert!(app.store_dir.path().join(&file.stored_name).exists());
}

#[tokio::test]
async fn test_mime_falls_back_to_extension_table() {
    let app = create_test_app().await;

    // No declared type; the .pdf extension decides
    let part = Part::bytes(b"%PDF-1.4".to_vec()).file_name("doc.pdf".to_string());
    let form = MultipartForm::new().add_part("file", part);

    let response = app
        .server
        .post("/api/files/upload")
        .add_header(account_id_header(), "alice")
        .multipart(form)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["mime_type"], "application/pdf");
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

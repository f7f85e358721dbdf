//! File handlers for the Web API.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::header,
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::db::{FileRepository, UploadSource};
use crate::ingest::IngestRequest;
use crate::web::dto::{ApiResponse, FileResponse, MessageResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthIdentity;

/// Generate a safe Content-Disposition header value for downloads.
///
/// Removes control characters (CR/LF header injection), escapes quotes
/// and backslashes, and adds an RFC 5987 filename* parameter for
/// non-ASCII names.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' => '_',
            '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// GET /api/files - List the caller's files, newest first.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let account = state.ensure_account(&identity).await?;

    let files = FileRepository::new(state.db.pool())
        .list_by_owner(&account.id)
        .await?;

    let responses = files.into_iter().map(FileResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/files/upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" field.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let account = state.ensure_account(&identity).await?;

    // Extract the file part from the multipart body
    let mut filename: Option<String> = None;
    let mut declared_mime: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        if field.name() == Some("file") {
            filename = field.file_name().map(|s| s.to_string());
            declared_mime = field.content_type().map(|s| s.to_string());
            content = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to read file content: {}", e);
                        ApiError::bad_request("Failed to read file")
                    })?
                    .to_vec(),
            );
        }
    }

    let content = content.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    let filename = filename.unwrap_or_else(|| "file".to_string());
    let declared_size = Some(content.len() as i64);

    let file = state
        .ingest
        .ingest(IngestRequest {
            owner_id: account.id,
            bytes: content,
            filename,
            declared_mime,
            declared_size,
            source: UploadSource::Web,
        })
        .await?;

    Ok(Json(ApiResponse::new(file.into())))
}

/// GET /api/files/:id - Get file metadata.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let account = state.ensure_account(&identity).await?;

    let file = FileRepository::new(state.db.pool())
        .get_by_id_for_owner(file_id, &account.id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    Ok(Json(ApiResponse::new(file.into())))
}

/// GET /api/files/:id/download - Download file content.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
    Path(file_id): Path<i64>,
) -> Result<Response<Body>, ApiError> {
    let account = state.ensure_account(&identity).await?;

    let file = FileRepository::new(state.db.pool())
        .get_by_id_for_owner(file_id, &account.id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    // A catalog row whose object is gone surfaces as NotFound here
    // rather than serving stale content.
    let content = match state.ingest.store().load(&file.stored_name) {
        Ok(content) => content,
        Err(crate::CumulusError::NotFound(_)) => {
            tracing::warn!(
                "Catalog entry {} references missing object {}",
                file.id,
                file.stored_name
            );
            return Err(ApiError::not_found("File data not found"));
        }
        Err(e) => return Err(e.into()),
    };

    let response = Response::builder()
        .header(header::CONTENT_TYPE, file.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&file.filename),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// DELETE /api/files/:id - Delete a file.
///
/// The physical object is removed first, then the catalog row. A crash
/// in between leaves a row whose download reports NotFound, never a
/// dangling object served as live data.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
    Path(file_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let account = state.ensure_account(&identity).await?;

    let repo = FileRepository::new(state.db.pool());
    let file = repo
        .get_by_id_for_owner(file_id, &account.id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    // Best-effort physical delete; a missing object counts as removed
    if let Err(e) = state.ingest.store().delete(&file.stored_name) {
        tracing::error!("Failed to delete object {}: {}", file.stored_name, e);
        return Err(ApiError::internal("Failed to delete file"));
    }

    let deleted = repo.delete_by_id_for_owner(file_id, &account.id).await?;
    if !deleted {
        return Err(ApiError::internal("Failed to delete file"));
    }

    Ok(Json(MessageResponse::new("File deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_plain_ascii() {
        assert_eq!(
            content_disposition_header("report.pdf"),
            "attachment; filename=\"report.pdf\""
        );
    }

    #[test]
    fn test_content_disposition_strips_header_injection() {
        let header = content_disposition_header("evil\r\nSet-Cookie: x.txt");
        assert!(!header.contains('\r'));
        assert!(!header.contains('\n'));
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let header = content_disposition_header("a\"b.txt");
        assert!(header.contains("a_b.txt"));
    }

    #[test]
    fn test_content_disposition_non_ascii_uses_rfc5987() {
        let header = content_disposition_header("資料.pdf");
        assert!(header.contains("filename*=UTF-8''"));
    }
}

//! Telegram link handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::AccountRepository;
use crate::web::dto::{AccountResponse, ApiResponse, ConnectTelegramRequest};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthIdentity;

/// POST /api/telegram/connect - Link a Telegram account.
pub async fn connect_telegram(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
    Json(req): Json<ConnectTelegramRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    if req.telegram_user_id.trim().is_empty() {
        return Err(ApiError::bad_request("Telegram user ID is required"));
    }

    let account = state.ensure_account(&identity).await?;

    let updated = AccountRepository::new(state.db.pool())
        .connect_telegram(
            &account.id,
            req.telegram_user_id.trim(),
            req.telegram_username.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(ApiResponse::new(updated.into())))
}

/// POST /api/telegram/disconnect - Clear the Telegram link.
///
/// Idempotent: disconnecting an unlinked account succeeds.
pub async fn disconnect_telegram(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state.ensure_account(&identity).await?;

    let updated = AccountRepository::new(state.db.pool())
        .disconnect_telegram(&account.id)
        .await?;

    Ok(Json(ApiResponse::new(updated.into())))
}

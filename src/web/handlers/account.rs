//! Account and usage handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::quota::{self, StorageUsage};
use crate::web::dto::{AccountResponse, ApiResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthIdentity;

/// GET /api/auth/user - Get (and refresh) the authenticated account.
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state.ensure_account(&identity).await?;
    Ok(Json(ApiResponse::new(account.into())))
}

/// GET /api/storage/usage - Current usage against the quota tier.
///
/// Recomputed from the catalog on every call; there is no cached
/// counter to drift.
pub async fn storage_usage(
    State(state): State<Arc<AppState>>,
    identity: AuthIdentity,
) -> Result<Json<ApiResponse<StorageUsage>>, ApiError> {
    let account = state.ensure_account(&identity).await?;
    let usage = quota::account_usage(state.db.pool(), &account).await?;
    Ok(Json(ApiResponse::new(usage)))
}

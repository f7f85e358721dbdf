//! Response DTOs for the Web API.

use serde::Serialize;

use crate::db::{Account, StoredFile};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain message response (e.g. for deletions).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Account information in responses.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account identity.
    pub id: String,
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Profile image URL.
    pub profile_image_url: Option<String>,
    /// Linked Telegram user ID.
    pub telegram_user_id: Option<String>,
    /// Linked Telegram username.
    pub telegram_username: Option<String>,
    /// Whether a Telegram account is linked.
    pub telegram_connected: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            first_name: a.first_name,
            last_name: a.last_name,
            profile_image_url: a.profile_image_url,
            telegram_user_id: a.telegram_user_id,
            telegram_username: a.telegram_username,
            telegram_connected: a.telegram_connected,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// File information in responses. The physical object key stays
/// internal.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    /// File ID.
    pub id: i64,
    /// Original display name.
    pub filename: String,
    /// Media type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Ingestion channel: "web" or "telegram".
    pub source: String,
    /// When the file was stored.
    pub created_at: String,
}

impl From<StoredFile> for FileResponse {
    fn from(f: StoredFile) -> Self {
        Self {
            id: f.id,
            filename: f.filename,
            mime_type: f.mime_type,
            size: f.size,
            source: f.source.as_str().to_string(),
            created_at: f.created_at,
        }
    }
}

//! Request DTOs for the Web API.

use serde::Deserialize;

/// Telegram connect request.
#[derive(Debug, Deserialize)]
pub struct ConnectTelegramRequest {
    /// Telegram user ID to link.
    pub telegram_user_id: String,
    /// Telegram username (optional).
    #[serde(default)]
    pub telegram_username: Option<String>,
}

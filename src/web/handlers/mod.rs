//! API handlers for the Web API.

pub mod account;
pub mod file;
pub mod telegram;

pub use account::*;
pub use file::*;
pub use telegram::*;

use std::sync::Arc;

use crate::db::{Account, AccountRepository};
use crate::ingest::IngestService;
use crate::web::error::ApiError;
use crate::web::middleware::AuthIdentity;
use crate::Database;

/// Application state shared across handlers.
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Shared ingestion pipeline.
    pub ingest: Arc<IngestService>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, ingest: Arc<IngestService>) -> Self {
        Self { db, ingest }
    }

    /// Insert-or-update the account for an authenticated identity.
    ///
    /// Every authenticated request passes through here so the catalog's
    /// ownership reference always exists, regardless of which endpoint
    /// a fresh session hits first.
    pub async fn ensure_account(&self, identity: &AuthIdentity) -> Result<Account, ApiError> {
        let repo = AccountRepository::new(self.db.pool());
        let account = repo.upsert(&identity.to_new_account()).await?;
        Ok(account)
    }
}

//! Account entity and repository.
//!
//! An account is created or refreshed on first authentication and owns
//! the optional Telegram link that selects the quota tier.

use super::DbPool;
use crate::{CumulusError, Result};

/// An account owning zero or more stored files.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Opaque identity assigned by the auth layer.
    pub id: String,
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Profile image URL.
    pub profile_image_url: Option<String>,
    /// Linked Telegram user ID (None when unlinked).
    pub telegram_user_id: Option<String>,
    /// Linked Telegram username.
    pub telegram_username: Option<String>,
    /// Whether a Telegram account is linked. True iff telegram_user_id is set.
    pub telegram_connected: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Profile data for creating or refreshing an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Opaque identity assigned by the auth layer.
    pub id: String,
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Profile image URL.
    pub profile_image_url: Option<String>,
}

impl NewAccount {
    /// Create a new NewAccount with only an identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            first_name: None,
            last_name: None,
            profile_image_url: None,
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the first name.
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Set the last name.
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Set the profile image URL.
    pub fn with_profile_image_url(mut self, url: impl Into<String>) -> Self {
        self.profile_image_url = Some(url.into());
        self
    }
}

const ACCOUNT_COLUMNS: &str = "id, email, first_name, last_name, profile_image_url, \
     telegram_user_id, telegram_username, telegram_connected, created_at, updated_at";

/// Repository for account operations.
pub struct AccountRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert an account, or merge profile fields when the identity
    /// already exists. Safe for concurrent calls with the same identity.
    pub async fn upsert(&self, account: &NewAccount) -> Result<Account> {
        sqlx::query(
            "INSERT INTO accounts (id, email, first_name, last_name, profile_image_url)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT(id) DO UPDATE SET
                 email = COALESCE(excluded.email, accounts.email),
                 first_name = COALESCE(excluded.first_name, accounts.first_name),
                 last_name = COALESCE(excluded.last_name, accounts.last_name),
                 profile_image_url = COALESCE(excluded.profile_image_url, accounts.profile_image_url),
                 updated_at = datetime('now')",
        )
        .bind(&account.id)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.profile_image_url)
        .execute(self.pool)
        .await?;

        self.get_by_id(&account.id)
            .await?
            .ok_or_else(|| CumulusError::NotFound("account".into()))
    }

    /// Get an account by identity.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Get the account linked to a Telegram user ID.
    pub async fn get_by_telegram_id(&self, telegram_user_id: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE telegram_user_id = $1"
        ))
        .bind(telegram_user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Link a Telegram account. All three link fields are set in one
    /// atomic row update.
    pub async fn connect_telegram(
        &self,
        id: &str,
        telegram_user_id: &str,
        telegram_username: &str,
    ) -> Result<Account> {
        let result = sqlx::query(
            "UPDATE accounts SET
                 telegram_user_id = $2,
                 telegram_username = $3,
                 telegram_connected = 1,
                 updated_at = datetime('now')
             WHERE id = $1",
        )
        .bind(id)
        .bind(telegram_user_id)
        .bind(telegram_username)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CumulusError::NotFound("account".into()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| CumulusError::NotFound("account".into()))
    }

    /// Clear the Telegram link. Idempotent: disconnecting an already
    /// unlinked account succeeds and leaves the link fields cleared.
    pub async fn disconnect_telegram(&self, id: &str) -> Result<Account> {
        let result = sqlx::query(
            "UPDATE accounts SET
                 telegram_user_id = NULL,
                 telegram_username = NULL,
                 telegram_connected = 0,
                 updated_at = datetime('now')
             WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CumulusError::NotFound("account".into()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| CumulusError::NotFound("account".into()))
    }
}

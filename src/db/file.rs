//! Stored file entity and catalog repository.
//!
//! The catalog maps each stored file to its physical object and owner.
//! Ownership checks are part of every read and delete query, never a
//! post-filter.

use super::DbPool;
use crate::Result;

/// The channel a file arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSource {
    /// Direct web upload.
    Web,
    /// Telegram bot relay.
    Telegram,
}

impl UploadSource {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadSource::Web => "web",
            UploadSource::Telegram => "telegram",
        }
    }
}

impl TryFrom<String> for UploadSource {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        match s.as_str() {
            "web" => Ok(UploadSource::Web),
            "telegram" => Ok(UploadSource::Telegram),
            other => Err(format!("unknown upload source: {other}")),
        }
    }
}

/// A catalog entry plus the key of its physical object.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredFile {
    /// Unique file ID across all accounts.
    pub id: i64,
    /// Owning account identity. Immutable after creation.
    pub owner_id: String,
    /// Original display name (may collide across files).
    pub filename: String,
    /// System-assigned unique object key.
    pub stored_name: String,
    /// Media type.
    pub mime_type: String,
    /// Size in bytes as observed at persist time.
    pub size: i64,
    /// Ingestion channel.
    #[sqlx(try_from = "String")]
    pub source: UploadSource,
    /// When the file was stored.
    pub created_at: String,
}

/// Data for creating a new catalog entry.
#[derive(Debug, Clone)]
pub struct NewStoredFile {
    /// Owning account identity.
    pub owner_id: String,
    /// Original display name.
    pub filename: String,
    /// System-assigned unique object key.
    pub stored_name: String,
    /// Media type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Ingestion channel.
    pub source: UploadSource,
}

const FILE_COLUMNS: &str = "id, owner_id, filename, stored_name, mime_type, size, source, created_at";

/// Repository for catalog operations.
pub struct FileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a catalog entry and return the full record.
    pub async fn create(&self, file: &NewStoredFile) -> Result<StoredFile> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO files (owner_id, filename, stored_name, mime_type, size, source)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&file.owner_id)
        .bind(&file.filename)
        .bind(&file.stored_name)
        .bind(&file.mime_type)
        .bind(file.size)
        .bind(file.source.as_str())
        .fetch_one(self.pool)
        .await?;

        let created = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// List all files for an owner, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<StoredFile>> {
        let files = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// Get a file by ID, constrained to the given owner.
    ///
    /// A file owned by a different account is reported as absent.
    pub async fn get_by_id_for_owner(&self, id: i64, owner_id: &str) -> Result<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// Delete a file by ID, constrained to the given owner.
    ///
    /// Returns true iff a row was removed. A missing or foreign ID
    /// returns false, not an error.
    pub async fn delete_by_id_for_owner(&self, id: i64, owner_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total bytes stored by an owner. Zero for an owner with no files.
    pub async fn sum_size_by_owner(&self, owner_id: &str) -> Result<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(size), 0) FROM files WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(self.pool)
                .await?;

        Ok(total)
    }
}

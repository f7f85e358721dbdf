//! Channel-agnostic ingestion pipeline.
//!
//! Both front-ends (web multipart, Telegram relay) adapt their
//! transport into an [`IngestRequest`]; size validation, storage-name
//! generation, media-type derivation and the catalog commit happen here
//! exactly once.
//!
//! Ordering matters: the physical object is written before the catalog
//! row is committed. A crash between the two leaves an orphaned object
//! (reclaimable out of band), never a catalog row pointing at missing
//! data.

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use crate::db::{FileRepository, NewStoredFile, StoredFile, UploadSource};
use crate::quota::MAX_FILE_SIZE;
use crate::storage::ObjectStore;
use crate::{CumulusError, Database, Result};

/// A validated ingestion request from either channel.
#[derive(Debug)]
pub struct IngestRequest {
    /// Owning account identity, resolved by the channel adapter.
    pub owner_id: String,
    /// Full file content.
    pub bytes: Vec<u8>,
    /// Original display name.
    pub filename: String,
    /// Media type declared by the transport, if any.
    pub declared_mime: Option<String>,
    /// Size declared by the transport, if any. Used only for the
    /// ceiling check; the committed size is the actual byte count.
    pub declared_size: Option<i64>,
    /// Ingestion channel.
    pub source: UploadSource,
}

/// The ingestion pipeline shared by all channels.
pub struct IngestService {
    db: Arc<Database>,
    store: ObjectStore,
}

impl IngestService {
    /// Create a new ingestion service.
    pub fn new(db: Arc<Database>, store: ObjectStore) -> Self {
        Self { db, store }
    }

    /// Get the underlying object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Turn an ingestion request into a committed catalog entry.
    ///
    /// Quota is not enforced here; usage is advisory and recomputed on
    /// read. Only the hard per-file ceiling rejects an upload.
    pub async fn ingest(&self, request: IngestRequest) -> Result<StoredFile> {
        let declared = request.declared_size.unwrap_or(request.bytes.len() as i64);
        if declared > MAX_FILE_SIZE || request.bytes.len() as i64 > MAX_FILE_SIZE {
            return Err(CumulusError::Validation(
                "file too large: maximum size is 2 GiB".to_string(),
            ));
        }

        let stored_name = generate_stored_name(&request.filename);
        self.store.save(&stored_name, &request.bytes)?;

        let mime_type = resolve_mime(request.declared_mime.as_deref(), &request.filename);

        // The committed size is the byte count actually persisted, not
        // the transport's declaration.
        let new_file = NewStoredFile {
            owner_id: request.owner_id,
            filename: request.filename,
            stored_name: stored_name.clone(),
            mime_type,
            size: request.bytes.len() as i64,
            source: request.source,
        };

        let file = match FileRepository::new(self.db.pool()).create(&new_file).await {
            Ok(file) => file,
            Err(e) => {
                // Roll back the object write so no orphan survives a
                // failed commit on this path.
                if let Err(cleanup) = self.store.delete(&stored_name) {
                    warn!("Failed to clean up object {}: {}", stored_name, cleanup);
                }
                return Err(e);
            }
        };

        info!(
            "Stored file {} ({} bytes, {}) for {} via {}",
            file.id,
            file.size,
            file.mime_type,
            file.owner_id,
            file.source.as_str()
        );

        Ok(file)
    }
}

/// Generate a collision-resistant storage name.
///
/// Format: `{unix-millis}-{random}{original extension}`. Uniqueness is
/// probabilistic, not transactionally enforced against the store.
pub fn generate_stored_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);

    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{millis}-{suffix}.{ext}"),
        None => format!("{millis}-{suffix}"),
    }
}

/// Derive a media type: the transport's declaration wins, then the
/// known-extension table, then a generic fallback.
pub fn resolve_mime(declared: Option<&str>, filename: &str) -> String {
    if let Some(mime) = declared {
        if !mime.is_empty() {
            return mime.to_string();
        }
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    if let Some(ext) = ext {
        let known = match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "mp4" => Some("video/mp4"),
            "mp3" => Some("audio/mpeg"),
            "ogg" => Some("audio/ogg"),
            "pdf" => Some("application/pdf"),
            "txt" => Some("text/plain"),
            _ => None,
        };
        if let Some(mime) = known {
            return mime.to_string();
        }
    }

    mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

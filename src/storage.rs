//! Physical object storage for cumulus.
//!
//! Stored objects live in a flat directory keyed by their unique stored
//! name. Name generation belongs to the ingestion pipeline; this module
//! only reads and writes bytes under a given key.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{CumulusError, Result};

/// Object store backed by a local directory.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    /// Base directory for stored objects.
    base_path: PathBuf,
}

impl ObjectStore {
    /// Create a new ObjectStore with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write content under the given stored name.
    pub fn save(&self, stored_name: &str, content: &[u8]) -> Result<()> {
        let file_path = self.file_path(stored_name);
        fs::write(&file_path, content)?;
        Ok(())
    }

    /// Load the content stored under the given name.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let file_path = self.file_path(stored_name);

        match fs::read(&file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(CumulusError::NotFound(format!("object {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it didn't
    /// exist. A missing object is not an error.
    pub fn delete(&self, stored_name: &str) -> Result<bool> {
        let file_path = self.file_path(stored_name);

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if an object exists.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.file_path(stored_name).exists()
    }

    /// Get the full path for a stored name.
    pub fn file_path(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(stored_name)
    }
}

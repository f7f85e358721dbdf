//! Cumulus - personal cloud file storage.
//!
//! Accounts store binary files against a tiered quota that depends on
//! an optional Telegram link. Two ingestion channels, a web multipart
//! upload and a Telegram bot relay, converge on one per-account
//! catalog and one usage accounting.

pub mod bot;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod quota;
pub mod storage;
pub mod web;

pub use config::Config;
pub use db::{
    Account, AccountRepository, Database, FileRepository, NewAccount, NewStoredFile, StoredFile,
    UploadSource,
};
pub use error::{CumulusError, Result};
pub use ingest::{IngestRequest, IngestService};
pub use quota::{account_usage, quota_for, StorageUsage};
pub use storage::ObjectStore;
pub use web::WebServer;

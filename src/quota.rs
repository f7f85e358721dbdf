//! Quota tiers and usage accounting.
//!
//! Quota is derived from the account's Telegram link state, never
//! stored. Usage is recomputed from the catalog on every call so that
//! concurrent uploads can never leave a stale counter behind; the cost
//! is one aggregate query per read.

use serde::Serialize;

use crate::db::{Account, DbPool, FileRepository};
use crate::Result;

const GIB: i64 = 1024 * 1024 * 1024;

/// Base storage quota: 15 GiB.
pub const BASE_QUOTA: i64 = 15 * GIB;

/// Upgraded storage quota for Telegram-linked accounts: 100 GiB.
pub const LINKED_QUOTA: i64 = 100 * GIB;

/// Hard per-file size ceiling: 2 GiB. A transport-level bound,
/// independent of the account quota.
pub const MAX_FILE_SIZE: i64 = 2 * GIB;

/// Storage quota for an account's link state.
pub fn quota_for(linked: bool) -> i64 {
    if linked {
        LINKED_QUOTA
    } else {
        BASE_QUOTA
    }
}

/// A point-in-time view of an account's storage usage.
#[derive(Debug, Clone, Serialize)]
pub struct StorageUsage {
    /// Consumed bytes.
    pub used: i64,
    /// Quota ceiling in bytes.
    pub limit: i64,
    /// used / limit * 100. Not clamped; clamping is a display concern.
    pub percentage: f64,
    /// Whether a Telegram account is linked.
    pub linked: bool,
}

/// Compute current usage for an account from the catalog.
pub async fn account_usage(pool: &DbPool, account: &Account) -> Result<StorageUsage> {
    let used = FileRepository::new(pool)
        .sum_size_by_owner(&account.id)
        .await?;
    let limit = quota_for(account.telegram_connected);

    Ok(StorageUsage {
        used,
        limit,
        percentage: used as f64 / limit as f64 * 100.0,
        linked: account.telegram_connected,
    })
}

/// Format a byte count for human-readable replies (e.g. "1.5 MB").
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes <= 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

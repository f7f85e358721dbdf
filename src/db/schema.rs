//! Database schema and migrations for cumulus.
//!
//! Migrations are applied sequentially when the database is opened.
//! The schema_version table tracks which migrations have been applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Accounts table - one row per authenticated identity
    r#"
-- Accounts table for identity and Telegram link state
CREATE TABLE accounts (
    id                  TEXT PRIMARY KEY,        -- opaque identity from the auth layer
    email               TEXT,
    first_name          TEXT,
    last_name           TEXT,
    profile_image_url   TEXT,
    telegram_user_id    TEXT,
    telegram_username   TEXT,
    telegram_connected  INTEGER NOT NULL DEFAULT 0,
    created_at          TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at          TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_accounts_telegram_user_id ON accounts(telegram_user_id);
"#,
    // v2: Files table - the per-account catalog
    r#"
-- Files table mapping catalog entries to stored objects
CREATE TABLE files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id    TEXT NOT NULL REFERENCES accounts(id),
    filename    TEXT NOT NULL,            -- original display name
    stored_name TEXT NOT NULL UNIQUE,     -- physical object key
    mime_type   TEXT NOT NULL,
    size        INTEGER NOT NULL CHECK (size >= 0),
    source      TEXT NOT NULL,            -- 'web' or 'telegram'
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_owner_id ON files(owner_id);
CREATE INDEX idx_files_created_at ON files(created_at);
"#,
];

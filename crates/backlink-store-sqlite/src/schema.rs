//! SQL schema for the backlink SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per (source, target) pair. Rows are never deleted; invalidation
-- clears `current` and keeps the last fetched content.
CREATE TABLE IF NOT EXISTS mentions (
    mention_id   TEXT PRIMARY KEY,
    source       TEXT NOT NULL,
    target       TEXT NOT NULL,
    status_code  TEXT NOT NULL DEFAULT '',
    body         TEXT NOT NULL DEFAULT '',
    current      INTEGER NOT NULL DEFAULT 0,
    reviewed     INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,   -- RFC 3339 UTC
    modified_at  TEXT NOT NULL,   -- RFC 3339 UTC
    UNIQUE (source, target)
);

CREATE INDEX IF NOT EXISTS mentions_target_idx   ON mentions(target);
CREATE INDEX IF NOT EXISTS mentions_modified_idx ON mentions(modified_at);

PRAGMA user_version = 1;
";

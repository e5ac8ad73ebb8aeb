//! SQL schema for the Chirp SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS identities (
    identity_id INTEGER PRIMARY KEY AUTOINCREMENT,
    nickname    TEXT NOT NULL UNIQUE,
    email       TEXT NOT NULL UNIQUE,
    about_me    TEXT,
    last_seen   TEXT                -- RFC 3339 UTC, microseconds, or NULL
);

-- One row per ordered pair; self-edges are refused.
CREATE TABLE IF NOT EXISTS follows (
    follower_id INTEGER NOT NULL REFERENCES identities(identity_id),
    followed_id INTEGER NOT NULL REFERENCES identities(identity_id),
    PRIMARY KEY (follower_id, followed_id),
    CHECK (follower_id != followed_id)
) WITHOUT ROWID;

-- Posts are never updated or deleted.
CREATE TABLE IF NOT EXISTS posts (
    post_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id INTEGER NOT NULL REFERENCES identities(identity_id),
    body      TEXT NOT NULL,
    timestamp TEXT NOT NULL          -- fixed-width RFC 3339 UTC; sorts lexically
);

CREATE INDEX IF NOT EXISTS follows_followed_idx ON follows(followed_id);
CREATE INDEX IF NOT EXISTS posts_author_idx     ON posts(author_id, timestamp);
CREATE INDEX IF NOT EXISTS posts_timestamp_idx  ON posts(timestamp);

PRAGMA user_version = 1;
";

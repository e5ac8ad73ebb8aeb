//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! fraction, so `ORDER BY` on the text column is chronological.

use chirp_core::{
  identity::{Identity, IdentityId},
  post::{Post, PostId},
};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const IDENTITY_COLUMNS: &str = "identity_id, nickname, email, about_me, last_seen";

/// Raw values read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id: i64,
  pub nickname:    String,
  pub email:       String,
  pub about_me:    Option<String>,
  pub last_seen:   Option<String>,
}

impl RawIdentity {
  /// Column order must match [`IDENTITY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      identity_id: row.get(0)?,
      nickname:    row.get(1)?,
      email:       row.get(2)?,
      about_me:    row.get(3)?,
      last_seen:   row.get(4)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      identity_id: IdentityId(self.identity_id),
      nickname:    self.nickname,
      email:       self.email,
      about_me:    self.about_me,
      last_seen:   self.last_seen.as_deref().map(decode_dt).transpose()?,
    })
  }
}

pub const POST_COLUMNS: &str = "post_id, author_id, body, timestamp";

/// Raw values read directly from a `posts` row.
pub struct RawPost {
  pub post_id:   i64,
  pub author_id: i64,
  pub body:      String,
  pub timestamp: String,
}

impl RawPost {
  /// Column order must match [`POST_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:   row.get(0)?,
      author_id: row.get(1)?,
      body:      row.get(2)?,
      timestamp: row.get(3)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:   PostId(self.post_id),
      author_id: IdentityId(self.author_id),
      body:      self.body,
      timestamp: decode_dt(&self.timestamp)?,
    })
  }
}

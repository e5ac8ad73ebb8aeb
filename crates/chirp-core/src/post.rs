//! Posts: short, immutable bodies of text with exactly one author.

use std::fmt;

use chrono::{DateTime, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, error::check_text, identity::IdentityId};

pub const BODY_MAX: usize = 140;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub post_id:   PostId,
  pub author_id: IdentityId,
  pub body:      String,
  pub timestamp: DateTime<Utc>,
}

/// Input to [`crate::store::PostStore::create_post`].
#[derive(Debug, Clone)]
pub struct NewPost {
  pub author_id: IdentityId,
  pub body:      String,
  pub timestamp: DateTime<Utc>,
}

impl NewPost {
  /// A post stamped with the current time. The body must be non-blank and at
  /// most [`BODY_MAX`] characters.
  pub fn new(author_id: IdentityId, body: impl Into<String>) -> Result<Self> {
    let body = body.into();
    check_text("body", &body, BODY_MAX)?;
    Ok(Self { author_id, body, timestamp: crate::now() })
  }

  /// Override the creation timestamp (imports, fixtures).
  pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
    self.timestamp = timestamp.trunc_subsecs(6);
    self
  }
}

/// Newest first; equal timestamps fall back to the higher id.
pub fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
  b.timestamp
    .cmp(&a.timestamp)
    .then_with(|| b.post_id.cmp(&a.post_id))
}

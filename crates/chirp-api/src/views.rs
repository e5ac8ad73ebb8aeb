//! Response shapes shared by several handlers.

use chirp_core::{
  avatar::AvatarResolver,
  identity::{Identity, IdentityId},
  post::Post,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An identity as shown to API clients. The email is only included when the
/// identity is the caller's own.
#[derive(Debug, Serialize)]
pub struct IdentityView {
  pub identity_id: IdentityId,
  pub nickname:    String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:       Option<String>,
  pub about_me:    Option<String>,
  pub last_seen:   Option<DateTime<Utc>>,
  pub avatar_url:  String,
}

impl IdentityView {
  pub fn public(identity: &Identity, avatar: &dyn AvatarResolver, size: u32) -> Self {
    Self {
      identity_id: identity.identity_id,
      nickname:    identity.nickname.clone(),
      email:       None,
      about_me:    identity.about_me.clone(),
      last_seen:   identity.last_seen,
      avatar_url:  avatar.avatar_url(&identity.email, size),
    }
  }

  pub fn own(identity: &Identity, avatar: &dyn AvatarResolver, size: u32) -> Self {
    Self { email: Some(identity.email.clone()), ..Self::public(identity, avatar, size) }
  }
}

/// A post with its author joined in for display.
#[derive(Debug, Serialize)]
pub struct FeedEntry {
  #[serde(flatten)]
  pub post:   Post,
  pub author: IdentityView,
}

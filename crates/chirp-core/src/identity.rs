//! Identity: a registered account.
//!
//! Identities are created on first login and never deleted. Edges and posts
//! refer to them by [`IdentityId`] only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, error::check_text, nickname::is_reserved};

pub const NICKNAME_MAX: usize = 64;
pub const EMAIL_MAX: usize = 120;
pub const ABOUT_ME_MAX: usize = 140;

/// Store-assigned numeric identifier of an [`Identity`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IdentityId(pub i64);

impl fmt::Display for IdentityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub identity_id: IdentityId,
  pub nickname:    String,
  pub email:       String,
  pub about_me:    Option<String>,
  /// Stamped on every authenticated request.
  pub last_seen:   Option<DateTime<Utc>>,
}

/// Input to [`crate::store::IdentityStore::create`].
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub nickname: String,
  pub email:    String,
}

impl NewIdentity {
  pub fn new(nickname: impl Into<String>, email: impl Into<String>) -> Result<Self> {
    let nickname = clean_nickname(&nickname.into())?;
    let email = email.into();
    check_text("email", &email, EMAIL_MAX)?;
    Ok(Self { nickname, email })
  }
}

/// Trim surrounding whitespace and reject nicknames that are empty, too long
/// or contain a reserved character.
fn clean_nickname(nickname: &str) -> Result<String> {
  let nickname = nickname.trim();
  check_text("nickname", nickname, NICKNAME_MAX)?;
  if let Some(character) = nickname.chars().find(|&c| is_reserved(c)) {
    return Err(Error::InvalidCharacter { field: "nickname", character });
  }
  Ok(nickname.to_owned())
}

/// A profile edit submitted by the identity itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEdit {
  pub nickname: String,
  #[serde(default)]
  pub about_me: Option<String>,
}

impl ProfileEdit {
  /// Validate the edit and apply it to `identity` in memory. The nickname is
  /// trimmed; an empty `about_me` clears the field.
  pub fn apply_to(self, identity: &mut Identity) -> Result<()> {
    let nickname = clean_nickname(&self.nickname)?;
    let about_me = match self.about_me {
      Some(text) if text.trim().is_empty() => None,
      Some(text) => {
        check_text("about_me", &text, ABOUT_ME_MAX)?;
        Some(text)
      }
      None => None,
    };
    identity.nickname = nickname;
    identity.about_me = about_me;
    Ok(())
  }
}

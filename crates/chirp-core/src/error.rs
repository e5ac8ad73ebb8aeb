//! Error types for `chirp-core`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The unique column a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Constraint {
  Nickname,
  Email,
}

impl fmt::Display for Constraint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Nickname => f.write_str("nickname"),
      Self::Email => f.write_str("email"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// A create or update collided with an existing nickname or email. The
  /// caller decides whether to retry with another nickname or report it.
  #[error("{0} is already taken")]
  ConstraintViolation(Constraint),

  #[error("an identity cannot follow itself")]
  SelfFollow,

  #[error("{field} must not be empty")]
  Empty { field: &'static str },

  #[error("{field} must be at most {max} characters")]
  TooLong { field: &'static str, max: usize },

  #[error("{field} must not contain {character:?}")]
  InvalidCharacter { field: &'static str, character: char },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Lift a backend error into the core taxonomy.
  pub(crate) fn from_store<E: Into<Self>>(e: E) -> Self { e.into() }
}

/// Reject empty (after trimming) or over-long text fields. Length is counted
/// in Unicode scalar values, not bytes.
pub(crate) fn check_text(field: &'static str, value: &str, max: usize) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Empty { field });
  }
  if value.chars().count() > max {
    return Err(Error::TooLong { field, max });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn check_text_counts_chars_not_bytes() {
    let body = "é".repeat(140);
    assert!(body.len() > 140);
    assert!(check_text("body", &body, 140).is_ok());
  }

  #[test]
  fn check_text_rejects_blank_and_long() {
    assert!(matches!(
      check_text("body", "   ", 140),
      Err(Error::Empty { field: "body" })
    ));
    assert!(matches!(
      check_text("body", &"x".repeat(141), 140),
      Err(Error::TooLong { field: "body", max: 140 })
    ));
  }
}

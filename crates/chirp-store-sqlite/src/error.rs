//! Error type for `chirp-store-sqlite`.

use chirp_core::Constraint;
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] chirp_core::Error),

  #[error("{0} is already taken")]
  Constraint(Constraint),

  /// A post or edge referenced an identity that does not exist, or an update
  /// targeted one.
  #[error("referenced identity does not exist")]
  UnknownIdentity,

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Classify SQLite constraint failures by the message SQLite attaches to
/// them, e.g. `UNIQUE constraint failed: identities.nickname`.
impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, Some(msg))) =
      &e
      && failure.code == ErrorCode::ConstraintViolation
    {
      if msg.contains("identities.nickname") {
        return Error::Constraint(Constraint::Nickname);
      }
      if msg.contains("identities.email") {
        return Error::Constraint(Constraint::Email);
      }
      if msg.starts_with("FOREIGN KEY") {
        return Error::UnknownIdentity;
      }
      if msg.starts_with("CHECK") {
        return Error::Core(chirp_core::Error::SelfFollow);
      }
    }
    Error::Database(e)
  }
}

impl From<Error> for chirp_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::Constraint(c) => chirp_core::Error::ConstraintViolation(c),
      other => chirp_core::Error::Store(Box::new(other)),
    }
  }
}

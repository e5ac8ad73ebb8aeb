//! The authenticated-caller extractor.
//!
//! Authentication happens upstream: a federated-login proxy vouches for the
//! caller's email (and optionally a preferred nickname) in trusted request
//! headers. This extractor turns that assertion into an [`Identity`],
//! registering it on first sight and stamping `last_seen` on every request.

use axum::{extract::FromRequestParts, http::request::Parts};
use chirp_core::{
  accounts::{Accounts, LoginAssertion},
  identity::Identity,
  store::Store,
};

use crate::{ApiState, error::ApiError};

pub const EMAIL_HEADER: &str = "x-authenticated-email";
pub const NICKNAME_HEADER: &str = "x-authenticated-nickname";

/// The identity making the request.
pub struct Caller(pub Identity);

/// Read the login assertion from `parts`. `None` when no email header is
/// present or it is not valid UTF-8.
pub fn assertion_from_parts(parts: &Parts) -> Option<LoginAssertion> {
  let header = |name: &str| {
    parts
      .headers
      .get(name)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .map(str::to_owned)
  };
  Some(LoginAssertion { email: header(EMAIL_HEADER)?, nickname: header(NICKNAME_HEADER) })
}

impl<S> FromRequestParts<ApiState<S>> for Caller
where
  S: Store + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let assertion = assertion_from_parts(parts).ok_or(ApiError::Unauthorized)?;
    let accounts = Accounts::new(&*state.store);
    let identity = accounts.login(assertion).await?;
    let identity = accounts.touch(identity).await?;
    Ok(Caller(identity))
  }
}

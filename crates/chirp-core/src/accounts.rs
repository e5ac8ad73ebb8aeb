//! Account lifecycle around an external login: first-sight registration,
//! last-seen stamping and profile edits.

use serde::Deserialize;

use crate::{
  Constraint, Error, Result,
  identity::{Identity, NewIdentity, ProfileEdit},
  nickname,
  store::IdentityStore,
};

/// How many times registration re-resolves a nickname after losing a race
/// for it before giving up.
pub const MAX_REGISTRATION_ATTEMPTS: usize = 5;

/// What the upstream login provider vouches for.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginAssertion {
  pub email:    String,
  /// The provider's idea of a display name, if it sent one.
  pub nickname: Option<String>,
}

pub struct Accounts<'s, I> {
  identities: &'s I,
}

impl<'s, I: IdentityStore> Accounts<'s, I> {
  pub fn new(identities: &'s I) -> Self { Self { identities } }

  /// Return the identity owning the asserted email, registering one on first
  /// sight. Emails are matched case-insensitively: they are trimmed and
  /// lower-cased before lookup and storage.
  pub async fn login(&self, assertion: LoginAssertion) -> Result<Identity> {
    let email = assertion.email.trim().to_lowercase();
    let email = email.as_str();
    if email.is_empty() {
      return Err(Error::Empty { field: "email" });
    }
    if let Some(existing) = self.find_by_email(email).await? {
      return Ok(existing);
    }

    let base = nickname::base_nickname(assertion.nickname.as_deref(), email);
    let mut attempt = 1;
    loop {
      let nickname = nickname::make_unique_nickname(self.identities, &base).await?;
      let input = NewIdentity::new(nickname.clone(), email)?;

      match self.identities.create(input).await.map_err(Error::from_store) {
        Ok(identity) => {
          tracing::info!(
            identity_id = %identity.identity_id,
            nickname = %identity.nickname,
            "registered identity"
          );
          return Ok(identity);
        }
        Err(Error::ConstraintViolation(Constraint::Nickname))
          if attempt < MAX_REGISTRATION_ATTEMPTS =>
        {
          tracing::warn!(%nickname, attempt, "nickname taken during registration, retrying");
          attempt += 1;
        }
        // Someone registered the same email between our lookup and insert.
        Err(Error::ConstraintViolation(Constraint::Email)) => {
          return self
            .find_by_email(email)
            .await?
            .ok_or(Error::ConstraintViolation(Constraint::Email));
        }
        Err(e) => return Err(e),
      }
    }
  }

  /// Stamp `last_seen` with the current time and persist it.
  pub async fn touch(&self, mut identity: Identity) -> Result<Identity> {
    identity.last_seen = Some(crate::now());
    self
      .identities
      .update(&identity)
      .await
      .map_err(Error::from_store)?;
    Ok(identity)
  }

  /// Validate and persist a profile edit. `identity` is only modified when
  /// the write succeeds.
  pub async fn edit_profile(&self, identity: &mut Identity, edit: ProfileEdit) -> Result<()> {
    let mut edited = identity.clone();
    edit.apply_to(&mut edited)?;
    self
      .identities
      .update(&edited)
      .await
      .map_err(Error::from_store)?;
    tracing::info!(identity_id = %edited.identity_id, "profile updated");
    *identity = edited;
    Ok(())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
    self
      .identities
      .find_by_email(email)
      .await
      .map_err(Error::from_store)
  }
}

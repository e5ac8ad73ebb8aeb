//! The social graph service: follow, unfollow, is-following and nickname
//! resolution over an identity store and a follow-edge store.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  identity::Identity,
  nickname,
  store::{FollowStore, IdentityStore},
};

/// Result of a follow or unfollow. A redundant request is a silent success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  /// The edge set changed.
  Applied,
  /// The desired state already held; nothing was written.
  NoOp,
}

impl Outcome {
  pub fn is_noop(self) -> bool { matches!(self, Self::NoOp) }
}

/// Read/write facade over the follow graph. Holds borrowed store handles and
/// is cheap to build per request.
pub struct SocialGraph<'s, I, F> {
  identities: &'s I,
  follows:    &'s F,
}

impl<'s, I, F> SocialGraph<'s, I, F>
where
  I: IdentityStore,
  F: FollowStore,
{
  pub fn new(identities: &'s I, follows: &'s F) -> Self { Self { identities, follows } }

  pub async fn is_following(&self, follower: &Identity, target: &Identity) -> Result<bool> {
    self
      .follows
      .exists(follower.identity_id, target.identity_id)
      .await
      .map_err(Error::from_store)
  }

  /// Add the edge `follower -> target`. Following someone already followed
  /// is [`Outcome::NoOp`]; following yourself is [`Error::SelfFollow`].
  pub async fn follow(&self, follower: &Identity, target: &Identity) -> Result<Outcome> {
    if follower.identity_id == target.identity_id {
      return Err(Error::SelfFollow);
    }
    if self.is_following(follower, target).await? {
      tracing::debug!(
        follower_id = %follower.identity_id,
        followed_id = %target.identity_id,
        "already following"
      );
      return Ok(Outcome::NoOp);
    }

    // A concurrent identical follow may land between the check and the
    // insert; the pair constraint turns that into a write of zero rows.
    let inserted = self
      .follows
      .insert(follower.identity_id, target.identity_id)
      .await
      .map_err(Error::from_store)?;
    if !inserted {
      return Ok(Outcome::NoOp);
    }

    tracing::info!(
      follower_id = %follower.identity_id,
      followed_id = %target.identity_id,
      "followed"
    );
    Ok(Outcome::Applied)
  }

  /// Remove the edge `follower -> target`, if present.
  pub async fn unfollow(&self, follower: &Identity, target: &Identity) -> Result<Outcome> {
    if follower.identity_id == target.identity_id {
      return Err(Error::SelfFollow);
    }
    if !self.is_following(follower, target).await? {
      tracing::debug!(
        follower_id = %follower.identity_id,
        followed_id = %target.identity_id,
        "not following"
      );
      return Ok(Outcome::NoOp);
    }

    let deleted = self
      .follows
      .delete(follower.identity_id, target.identity_id)
      .await
      .map_err(Error::from_store)?;
    if !deleted {
      return Ok(Outcome::NoOp);
    }

    tracing::info!(
      follower_id = %follower.identity_id,
      followed_id = %target.identity_id,
      "unfollowed"
    );
    Ok(Outcome::Applied)
  }

  /// See [`nickname::make_unique_nickname`].
  pub async fn make_unique_nickname(&self, candidate: &str) -> Result<String> {
    nickname::make_unique_nickname(self.identities, candidate).await
  }

  /// `(followers, following)` for a profile page.
  pub async fn counts(&self, identity: &Identity) -> Result<(usize, usize)> {
    let followers = self
      .follows
      .follower_ids(identity.identity_id)
      .await
      .map_err(Error::from_store)?;
    let following = self
      .follows
      .followed_ids(identity.identity_id)
      .await
      .map_err(Error::from_store)?;
    Ok((followers.len(), following.len()))
  }
}

//! Store traits for identities, follow edges and posts.
//!
//! Implemented by storage backends (e.g. `chirp-store-sqlite`). The services
//! in this crate and the HTTP layer depend on these abstractions, never on a
//! concrete backend.
//!
//! All methods return `Send` futures so the traits can be used from
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  feed::FeedPage,
  identity::{Identity, IdentityId, NewIdentity},
  post::{NewPost, Post},
};

/// What every backend shares: a single error type that converts into
/// [`crate::Error`], so that constraint violations keep their meaning when
/// they cross into the services.
pub trait StoreBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;
}

// ─── Identities ──────────────────────────────────────────────────────────────

pub trait IdentityStore: StoreBackend {
  /// Exact match. `None` on miss.
  fn find_by_nickname<'a>(
    &'a self,
    nickname: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Exact match. `None` on miss.
  fn find_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  fn find_by_id(
    &self,
    id: IdentityId,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Persist a new identity. Fails with a constraint violation if the
  /// nickname or email is already present.
  fn create(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Persist the mutable fields of `identity`. Last writer wins; a nickname
  /// or email collision is a constraint violation.
  fn update<'a>(
    &'a self,
    identity: &'a Identity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Follow edges ────────────────────────────────────────────────────────────

/// Directed (follower, followed) pairs. The backend enforces at most one
/// edge per ordered pair.
pub trait FollowStore: StoreBackend {
  fn exists(
    &self,
    follower: IdentityId,
    followed: IdentityId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` when the edge already existed and nothing was written.
  fn insert(
    &self,
    follower: IdentityId,
    followed: IdentityId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` when there was no edge to delete.
  fn delete(
    &self,
    follower: IdentityId,
    followed: IdentityId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Everyone `follower` follows.
  fn followed_ids(
    &self,
    follower: IdentityId,
  ) -> impl Future<Output = Result<Vec<IdentityId>, Self::Error>> + Send + '_;

  /// Everyone following `followed`.
  fn follower_ids(
    &self,
    followed: IdentityId,
  ) -> impl Future<Output = Result<Vec<IdentityId>, Self::Error>> + Send + '_;
}

// ─── Posts ───────────────────────────────────────────────────────────────────

pub trait PostStore: StoreBackend {
  /// Persist a post. The author must exist.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// All posts by one author, newest first.
  fn find_by_author(
    &self,
    author: IdentityId,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// All posts by any of `authors`, newest first (ties: higher id first).
  fn find_feed_candidates<'a>(
    &'a self,
    authors: &'a [IdentityId],
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + 'a;

  /// One window of the posts by everyone `follower` follows, in the same
  /// order as [`Self::find_feed_candidates`]. Only the window is loaded.
  fn find_followed_page(
    &self,
    follower: IdentityId,
    page: FeedPage,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;
}

/// A backend providing all three stores, as the HTTP layer needs.
pub trait Store: IdentityStore + FollowStore + PostStore {}

impl<T: IdentityStore + FollowStore + PostStore> Store for T {}

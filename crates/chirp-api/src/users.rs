//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/{nickname}` | Profile, counts, posts; 404 if unknown |
//! | `POST` | `/users/{nickname}/follow` | 400 on self-follow; redundant follow is a no-op |
//! | `POST` | `/users/{nickname}/unfollow` | Redundant unfollow is a no-op |

use axum::{
  Json,
  extract::{Path, State},
};
use chirp_core::{
  graph::{Outcome, SocialGraph},
  identity::Identity,
  post::Post,
  store::{IdentityStore, PostStore, Store},
};
use serde::Serialize;

use crate::{
  ApiState,
  auth::Caller,
  error::{ApiError, store_err},
  views::IdentityView,
};

async fn find_user<S: IdentityStore>(store: &S, nickname: &str) -> Result<Identity, ApiError> {
  store
    .find_by_nickname(nickname)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("user {nickname} not found")))
}

// ─── Profile ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UserPage {
  pub user:         IdentityView,
  pub followers:    usize,
  pub following:    usize,
  /// Whether the caller follows this user. Always `false` on your own page.
  pub is_following: bool,
  pub posts:        Vec<Post>,
}

/// `GET /users/{nickname}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Caller(me): Caller,
  Path(nickname): Path<String>,
) -> Result<Json<UserPage>, ApiError>
where
  S: Store + Clone + 'static,
{
  let store = &*state.store;
  let user = find_user(store, &nickname).await?;
  let graph = SocialGraph::new(store, store);

  let (followers, following) = graph.counts(&user).await?;
  let is_following =
    me.identity_id != user.identity_id && graph.is_following(&me, &user).await?;
  let posts = store.find_by_author(user.identity_id).await.map_err(store_err)?;

  let size = state.config.profile_avatar_size;
  let view = if me.identity_id == user.identity_id {
    IdentityView::own(&user, &*state.avatar, size)
  } else {
    IdentityView::public(&user, &*state.avatar, size)
  };

  Ok(Json(UserPage { user: view, followers, following, is_following, posts }))
}

// ─── Follow / unfollow ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FollowResponse {
  pub nickname:  String,
  pub outcome:   Outcome,
  /// The edge state after the request.
  pub following: bool,
}

/// `POST /users/{nickname}/follow`
pub async fn follow<S>(
  State(state): State<ApiState<S>>,
  Caller(me): Caller,
  Path(nickname): Path<String>,
) -> Result<Json<FollowResponse>, ApiError>
where
  S: Store + Clone + 'static,
{
  let store = &*state.store;
  let target = find_user(store, &nickname).await?;
  let outcome = SocialGraph::new(store, store).follow(&me, &target).await?;
  Ok(Json(FollowResponse { nickname: target.nickname, outcome, following: true }))
}

/// `POST /users/{nickname}/unfollow`
pub async fn unfollow<S>(
  State(state): State<ApiState<S>>,
  Caller(me): Caller,
  Path(nickname): Path<String>,
) -> Result<Json<FollowResponse>, ApiError>
where
  S: Store + Clone + 'static,
{
  let store = &*state.store;
  let target = find_user(store, &nickname).await?;
  let outcome = SocialGraph::new(store, store).unfollow(&me, &target).await?;
  Ok(Json(FollowResponse { nickname: target.nickname, outcome, following: false }))
}

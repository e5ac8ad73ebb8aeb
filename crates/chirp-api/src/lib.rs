//! JSON REST API for Chirp.
//!
//! Exposes an axum [`Router`] backed by any [`chirp_core::store::Store`].
//! Authentication is upstream's job: every route expects the caller's email
//! in the [`auth::EMAIL_HEADER`] header. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", chirp_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod feed;
pub mod me;
pub mod posts;
pub mod users;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use chirp_core::{avatar::AvatarResolver, store::Store};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Presentation knobs for the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Avatar size, in pixels, on profile responses.
  pub profile_avatar_size: u32,
  /// Avatar size, in pixels, next to each feed entry.
  pub post_avatar_size:    u32,
  /// Feed entries returned when the request names no `limit`.
  pub feed_page_size:      usize,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self { profile_avatar_size: 128, post_avatar_size: 50, feed_page_size: 50 }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub avatar: Arc<dyn AvatarResolver>,
  pub config: Arc<ApiConfig>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      avatar: Arc::clone(&self.avatar),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: Store + Clone + 'static,
{
  Router::new()
    .route("/me", get(me::get::<S>).put(me::edit::<S>))
    .route("/users/{nickname}", get(users::get_one::<S>))
    .route("/users/{nickname}/follow", post(users::follow::<S>))
    .route("/users/{nickname}/unfollow", post(users::unfollow::<S>))
    .route("/feed", get(feed::list::<S>))
    .route("/posts", post(posts::create::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use chirp_core::avatar::Gravatar;
  use chirp_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use crate::auth::{EMAIL_HEADER, NICKNAME_HEADER};

  async fn make_state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    ApiState {
      store:  Arc::new(store),
      avatar: Arc::new(Gravatar),
      config: Arc::new(ApiConfig::default()),
    }
  }

  async fn call(
    state: ApiState<SqliteStore>,
    method: &str,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = caller {
      builder = builder.header(EMAIL_HEADER, email);
    }
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    api_router(state).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Caller context ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_caller_header_returns_401() {
    let state = make_state().await;
    let resp = call(state, "GET", "/me", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn first_request_registers_caller() {
    let state = make_state().await;
    let resp = call(state.clone(), "GET", "/me", Some("ann@example.com"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let me = json_body(resp).await;
    assert_eq!(me["nickname"], "ann");
    assert_eq!(me["email"], "ann@example.com");
    assert!(me["last_seen"].is_string());
    assert!(
      me["avatar_url"].as_str().unwrap().ends_with("?d=mm&s=128"),
      "{me}"
    );
  }

  #[tokio::test]
  async fn asserted_nickname_is_used_on_registration() {
    let state = make_state().await;
    let req = Request::builder()
      .uri("/me")
      .header(EMAIL_HEADER, "x123@example.com")
      .header(NICKNAME_HEADER, "annie")
      .body(Body::empty())
      .unwrap();
    let resp = api_router(state).oneshot(req).await.unwrap();
    assert_eq!(json_body(resp).await["nickname"], "annie");
  }

  // ── Profiles ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_user_returns_404() {
    let state = make_state().await;
    let resp = call(state, "GET", "/users/ghost", Some("ann@example.com"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn edit_profile_to_taken_nickname_returns_409() {
    let state = make_state().await;
    call(state.clone(), "GET", "/me", Some("bob@example.com"), None).await;

    let resp = call(
      state,
      "PUT",
      "/me",
      Some("ann@example.com"),
      Some(json!({ "nickname": "bob", "about_me": "hi" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn edit_profile_updates_about_me() {
    let state = make_state().await;
    let resp = call(
      state.clone(),
      "PUT",
      "/me",
      Some("ann@example.com"),
      Some(json!({ "nickname": "ann", "about_me": "hello there" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let page = call(state, "GET", "/users/ann", Some("bob@example.com"), None).await;
    let page = json_body(page).await;
    assert_eq!(page["user"]["about_me"], "hello there");
    assert!(page["user"].get("email").is_none(), "{page}");
  }

  #[tokio::test]
  async fn edit_profile_trims_and_rejects_slash() {
    let state = make_state().await;
    let resp = call(
      state.clone(),
      "PUT",
      "/me",
      Some("ann@example.com"),
      Some(json!({ "nickname": "ann/admin" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = call(
      state.clone(),
      "PUT",
      "/me",
      Some("ann@example.com"),
      Some(json!({ "nickname": "  annie " })),
    )
    .await;
    assert_eq!(json_body(resp).await["nickname"], "annie");

    let page = call(state, "GET", "/users/annie", Some("bob@example.com"), None).await;
    assert_eq!(page.status(), StatusCode::OK);
  }

  // ── Follow graph ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn follow_then_refollow_is_noop() {
    let state = make_state().await;
    call(state.clone(), "GET", "/me", Some("bob@example.com"), None).await;

    let first = call(state.clone(), "POST", "/users/bob/follow", Some("ann@example.com"), None).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(json_body(first).await["outcome"], "applied");

    let second = call(state.clone(), "POST", "/users/bob/follow", Some("ann@example.com"), None).await;
    assert_eq!(json_body(second).await["outcome"], "no_op");

    let page = call(state, "GET", "/users/bob", Some("ann@example.com"), None).await;
    let page = json_body(page).await;
    assert_eq!(page["is_following"], true);
    assert_eq!(page["followers"], 1);
  }

  #[tokio::test]
  async fn unfollow_when_not_following_is_noop() {
    let state = make_state().await;
    call(state.clone(), "GET", "/me", Some("bob@example.com"), None).await;

    let resp = call(state, "POST", "/users/bob/unfollow", Some("ann@example.com"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["outcome"], "no_op");
    assert_eq!(body["following"], false);
  }

  #[tokio::test]
  async fn self_follow_returns_400() {
    let state = make_state().await;
    let resp = call(state, "POST", "/users/ann/follow", Some("ann@example.com"), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn follow_unknown_user_returns_404() {
    let state = make_state().await;
    let resp = call(state, "POST", "/users/ghost/follow", Some("ann@example.com"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Posts and feed ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_too_long_returns_400() {
    let state = make_state().await;
    let resp = call(
      state,
      "POST",
      "/posts",
      Some("ann@example.com"),
      Some(json!({ "body": "x".repeat(141) })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn feed_shows_followed_posts_with_authors() {
    let state = make_state().await;
    for (email, body) in [
      ("bob@example.com", "from bob"),
      ("cat@example.com", "from cat"),
      ("ann@example.com", "from ann"),
    ] {
      let resp = call(state.clone(), "POST", "/posts", Some(email), Some(json!({ "body": body }))).await;
      assert_eq!(resp.status(), StatusCode::CREATED);
    }
    call(state.clone(), "POST", "/users/bob/follow", Some("ann@example.com"), None).await;

    let resp = call(state, "GET", "/feed", Some("ann@example.com"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let feed = json_body(resp).await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["body"], "from bob");
    assert_eq!(feed[0]["author"]["nickname"], "bob");
    assert!(feed[0]["author"]["avatar_url"].as_str().unwrap().ends_with("s=50"));
  }

  #[tokio::test]
  async fn feed_respects_limit() {
    let state = make_state().await;
    for n in 0..3 {
      call(
        state.clone(),
        "POST",
        "/posts",
        Some("bob@example.com"),
        Some(json!({ "body": format!("post {n}") })),
      )
      .await;
    }
    call(state.clone(), "POST", "/users/bob/follow", Some("ann@example.com"), None).await;

    let resp = call(state, "GET", "/feed?limit=2", Some("ann@example.com"), None).await;
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 2);
  }
}

//! Handler for `GET /feed`.

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Query, State},
};
use chirp_core::{
  feed::{FeedComposer, FeedPage},
  identity::{Identity, IdentityId},
  store::{IdentityStore, Store},
};
use serde::Deserialize;

use crate::{
  ApiState,
  auth::Caller,
  error::{ApiError, store_err},
  views::{FeedEntry, IdentityView},
};

#[derive(Debug, Deserialize, Default)]
pub struct FeedParams {
  /// Defaults to the configured page size.
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /feed[?limit=...][&offset=...]`: posts from everyone the caller
/// follows, newest first, each with its author.
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Caller(me): Caller,
  Query(params): Query<FeedParams>,
) -> Result<Json<Vec<FeedEntry>>, ApiError>
where
  S: Store + Clone + 'static,
{
  let store = &*state.store;
  let page = FeedPage {
    limit:  params.limit.unwrap_or(state.config.feed_page_size),
    offset: params.offset.unwrap_or(0),
  };
  let posts = FeedComposer::new(store, store)
    .followed_posts_page(&me, page)
    .await?;

  let mut authors: HashMap<IdentityId, Identity> = HashMap::new();
  for post in &posts {
    if authors.contains_key(&post.author_id) {
      continue;
    }
    if let Some(author) = store.find_by_id(post.author_id).await.map_err(store_err)? {
      authors.insert(post.author_id, author);
    }
  }

  let size = state.config.post_avatar_size;
  let entries = posts
    .into_iter()
    .filter_map(|post| {
      let Some(author) = authors.get(&post.author_id) else {
        tracing::warn!(post_id = %post.post_id, author_id = %post.author_id, "post author missing");
        return None;
      };
      let author = IdentityView::public(author, &*state.avatar, size);
      Some(FeedEntry { post, author })
    })
    .collect();

  Ok(Json(entries))
}

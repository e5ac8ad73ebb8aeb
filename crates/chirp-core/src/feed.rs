//! The feed composer: posts from everyone a viewer follows, newest first.

use serde::Deserialize;

use crate::{
  Error, Result,
  identity::Identity,
  post::{self, Post},
  store::{FollowStore, PostStore},
};

/// A window into a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeedPage {
  pub limit:  usize,
  #[serde(default)]
  pub offset: usize,
}

pub struct FeedComposer<'s, F, P> {
  follows: &'s F,
  posts:   &'s P,
}

impl<'s, F, P> FeedComposer<'s, F, P>
where
  F: FollowStore,
  P: PostStore,
{
  pub fn new(follows: &'s F, posts: &'s P) -> Self { Self { follows, posts } }

  /// Every post authored by someone `viewer` follows, ordered by timestamp
  /// descending with ties broken by post id descending. The viewer's own
  /// posts only appear through a follow edge, and self-edges are refused.
  pub async fn followed_posts(&self, viewer: &Identity) -> Result<Vec<Post>> {
    let followed = self
      .follows
      .followed_ids(viewer.identity_id)
      .await
      .map_err(Error::from_store)?;
    if followed.is_empty() {
      return Ok(Vec::new());
    }

    let mut posts = self
      .posts
      .find_feed_candidates(&followed)
      .await
      .map_err(Error::from_store)?;
    // Backends already sort; re-sorting pins the tie-break regardless.
    posts.sort_by(post::newest_first);

    tracing::debug!(
      viewer_id = %viewer.identity_id,
      authors = followed.len(),
      posts = posts.len(),
      "composed feed"
    );
    Ok(posts)
  }

  /// [`Self::followed_posts`], windowed by the store so a page never loads
  /// the whole timeline.
  pub async fn followed_posts_page(
    &self,
    viewer: &Identity,
    page: FeedPage,
  ) -> Result<Vec<Post>> {
    let posts = self
      .posts
      .find_followed_page(viewer.identity_id, page)
      .await
      .map_err(Error::from_store)?;
    tracing::debug!(
      viewer_id = %viewer.identity_id,
      limit = page.limit,
      offset = page.offset,
      posts = posts.len(),
      "composed feed page"
    );
    Ok(posts)
  }
}

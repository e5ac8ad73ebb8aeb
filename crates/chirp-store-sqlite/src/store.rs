//! [`SqliteStore`], the SQLite implementation of the Chirp store traits.

use std::path::Path;

use chirp_core::{
  feed::FeedPage,
  identity::{Identity, IdentityId, NewIdentity},
  post::{NewPost, Post, PostId},
  store::{FollowStore, IdentityStore, PostStore, StoreBackend},
};
use rusqlite::{OptionalExtension as _, types::Value};

use crate::{
  Error, Result,
  encode::{IDENTITY_COLUMNS, POST_COLUMNS, RawIdentity, RawPost, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Identities, follow edges and posts in a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }

  /// Fetch at most one identity matching `column = value`.
  async fn find_identity(&self, column: &'static str, value: Value) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE {column} = ?1"),
              rusqlite::params![value],
              RawIdentity::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  /// Ids from a two-column edge query keyed on one endpoint.
  async fn edge_ids(&self, sql: &'static str, key: IdentityId) -> Result<Vec<IdentityId>> {
    let ids: Vec<i64> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![key.0], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids.into_iter().map(IdentityId).collect())
  }
}

impl StoreBackend for SqliteStore {
  type Error = Error;
}

// ─── IdentityStore impl ──────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Identity>> {
    self
      .find_identity("nickname", Value::Text(nickname.to_owned()))
      .await
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
    self.find_identity("email", Value::Text(email.to_owned())).await
  }

  async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>> {
    self.find_identity("identity_id", Value::Integer(id.0)).await
  }

  async fn create(&self, input: NewIdentity) -> Result<Identity> {
    let nickname = input.nickname.clone();
    let email = input.email.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO identities (nickname, email) VALUES (?1, ?2)",
          rusqlite::params![nickname, email],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Identity {
      identity_id: IdentityId(id),
      nickname:    input.nickname,
      email:       input.email,
      about_me:    None,
      last_seen:   None,
    })
  }

  async fn update(&self, identity: &Identity) -> Result<()> {
    let id        = identity.identity_id.0;
    let nickname  = identity.nickname.clone();
    let email     = identity.email.clone();
    let about_me  = identity.about_me.clone();
    let last_seen = identity.last_seen.map(encode_dt);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE identities
           SET nickname = ?1, email = ?2, about_me = ?3, last_seen = ?4
           WHERE identity_id = ?5",
          rusqlite::params![nickname, email, about_me, last_seen, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::UnknownIdentity);
    }
    Ok(())
  }
}

// ─── FollowStore impl ────────────────────────────────────────────────────────

impl FollowStore for SqliteStore {
  async fn exists(&self, follower: IdentityId, followed: IdentityId) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
              rusqlite::params![follower.0, followed.0],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn insert(&self, follower: IdentityId, followed: IdentityId) -> Result<bool> {
    // Only the pair conflict is swallowed; CHECK and foreign-key failures
    // still surface.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO follows (follower_id, followed_id) VALUES (?1, ?2)
           ON CONFLICT (follower_id, followed_id) DO NOTHING",
          rusqlite::params![follower.0, followed.0],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn delete(&self, follower: IdentityId, followed: IdentityId) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
          rusqlite::params![follower.0, followed.0],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn followed_ids(&self, follower: IdentityId) -> Result<Vec<IdentityId>> {
    self
      .edge_ids(
        "SELECT followed_id FROM follows WHERE follower_id = ?1 ORDER BY followed_id",
        follower,
      )
      .await
  }

  async fn follower_ids(&self, followed: IdentityId) -> Result<Vec<IdentityId>> {
    self
      .edge_ids(
        "SELECT follower_id FROM follows WHERE followed_id = ?1 ORDER BY follower_id",
        followed,
      )
      .await
  }
}

// ─── PostStore impl ──────────────────────────────────────────────────────────

impl PostStore for SqliteStore {
  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let author_id = input.author_id.0;
    let body      = input.body.clone();
    let timestamp = encode_dt(input.timestamp);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (author_id, body, timestamp) VALUES (?1, ?2, ?3)",
          rusqlite::params![author_id, body, timestamp],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(post_id = id, author_id, "post created");
    Ok(Post {
      post_id:   PostId(id),
      author_id: input.author_id,
      body:      input.body,
      timestamp: input.timestamp,
    })
  }

  async fn find_by_author(&self, author: IdentityId) -> Result<Vec<Post>> {
    self.find_feed_candidates(&[author]).await
  }

  async fn find_feed_candidates(&self, authors: &[IdentityId]) -> Result<Vec<Post>> {
    if authors.is_empty() {
      return Ok(Vec::new());
    }
    let ids: Vec<i64> = authors.iter().map(|id| id.0).collect();

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
          "SELECT {POST_COLUMNS}
           FROM posts
           WHERE author_id IN ({placeholders})
           ORDER BY timestamp DESC, post_id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(ids), RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn find_followed_page(&self, follower: IdentityId, page: FeedPage) -> Result<Vec<Post>> {
    let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS}
           FROM posts
           JOIN follows ON follows.followed_id = posts.author_id
           WHERE follows.follower_id = ?1
           ORDER BY timestamp DESC, post_id DESC
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![follower.0, limit, offset], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }
}
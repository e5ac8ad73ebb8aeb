//! Handler for `POST /posts`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chirp_core::{
  post::NewPost,
  store::{PostStore, Store},
};
use serde::Deserialize;

use crate::{
  ApiState,
  auth::Caller,
  error::{ApiError, store_err},
};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub body: String,
}

/// `POST /posts` with body `{"body":"..."}`. Returns 201 and the stored post.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Caller(me): Caller,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + 'static,
{
  let input = NewPost::new(me.identity_id, body.body)?;
  let post = state.store.create_post(input).await.map_err(store_err)?;
  tracing::info!(post_id = %post.post_id, author_id = %me.identity_id, "posted");
  Ok((StatusCode::CREATED, Json(post)))
}

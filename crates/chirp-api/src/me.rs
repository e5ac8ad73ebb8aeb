//! Handlers for `/me`: the caller's own profile.

use axum::{Json, extract::State};
use chirp_core::{accounts::Accounts, identity::ProfileEdit, store::Store};

use crate::{ApiState, auth::Caller, error::ApiError, views::IdentityView};

/// `GET /me`
pub async fn get<S>(
  State(state): State<ApiState<S>>,
  Caller(me): Caller,
) -> Json<IdentityView>
where
  S: Store + Clone + 'static,
{
  Json(IdentityView::own(&me, &*state.avatar, state.config.profile_avatar_size))
}

/// `PUT /me` with body `{"nickname":"...","about_me":"..."}`. 409 if the
/// nickname is taken.
pub async fn edit<S>(
  State(state): State<ApiState<S>>,
  Caller(mut me): Caller,
  Json(edit): Json<ProfileEdit>,
) -> Result<Json<IdentityView>, ApiError>
where
  S: Store + Clone + 'static,
{
  Accounts::new(&*state.store).edit_profile(&mut me, edit).await?;
  Ok(Json(IdentityView::own(&me, &*state.avatar, state.config.profile_avatar_size)))
}

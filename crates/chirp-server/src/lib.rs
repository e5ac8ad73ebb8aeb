//! HTTP server wiring for Chirp.
//!
//! Loads [`ServerConfig`] and mounts the JSON API from `chirp-api` under
//! `/api`, wrapped in request tracing.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use chirp_api::{ApiConfig, ApiState};
use chirp_core::{avatar::Gravatar, store::Store};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CHIRP_*` environment variables (nested keys use `__`, e.g.
/// `CHIRP_API__FEED_PAGE_SIZE`).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub api:        ApiConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("chirp.db"),
      api:        ApiConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Read `path` if it exists, then apply environment overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("CHIRP")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router over `store`.
pub fn router<S>(store: S, config: &ServerConfig) -> Router
where
  S: Store + Clone + 'static,
{
  let state = ApiState {
    store:  Arc::new(store),
    avatar: Arc::new(Gravatar),
    config: Arc::new(config.api.clone()),
  };

  Router::new()
    .nest("/api", chirp_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

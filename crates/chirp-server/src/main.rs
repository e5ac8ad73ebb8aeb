//! chirp-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the JSON API over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chirp_server::ServerConfig;
use chirp_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Chirp microblog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;
  serve(server_cfg).await
}

async fn serve(server_cfg: ServerConfig) -> anyhow::Result<()> {
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = %store_path.display(), "store ready");

  let address = server_cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Listening on http://{address}/api");

  axum::serve(listener, chirp_server::router(store, &server_cfg))
    .await
    .context("server error")
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

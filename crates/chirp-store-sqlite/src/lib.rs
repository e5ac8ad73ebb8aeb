//! SQLite backend for the Chirp stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. One [`SqliteStore`] implements the
//! identity, follow-edge and post stores over the same connection.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

//! Core types, store traits and services for the Chirp microblog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement the traits in [`store`]; the services in
//! [`graph`], [`feed`] and [`accounts`] are constructed with explicit store
//! handles and never reach for process-wide state.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod accounts;
pub mod avatar;
pub mod error;
pub mod feed;
pub mod graph;
pub mod identity;
pub mod nickname;
pub mod post;
pub mod store;

pub use error::{Constraint, Error, Result};

use chrono::{DateTime, SubsecRound as _, Utc};

/// The current time, cut to the microsecond precision stores keep, so a
/// value handed back from a write equals the same value read back later.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

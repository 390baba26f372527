//! Core types and trait definitions for the Thicket topic site.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store, site and admin crates all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod content;
pub mod error;
pub mod paths;
pub mod record;
pub mod resolve;
pub mod store;
pub mod topic;

pub use error::{Error, Result};

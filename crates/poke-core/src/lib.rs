//! poke core: transport-agnostic response writer and handler contracts.
//!
//! This crate defines the writer decorator that observes the status code a
//! handler sends, the synchronous handler contract the metrics middleware
//! wraps, and the error surface shared by the workspace. It carries no
//! metrics or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod handler;
pub mod response;
pub mod writer;

/// Shared result type.
pub use error::{PokeError, Result};
pub use handler::{handler_fn, Handler, HandlerFn};
pub use response::BufferedResponse;
pub use writer::{ResponseWriter, StatusRecorder};

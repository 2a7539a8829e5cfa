//! Transport layer (HTTP).
//!
//! Bridges synchronous handlers onto the axum/tower service stack.

pub mod handler;

pub use handler::HandlerService;

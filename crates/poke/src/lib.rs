//! Top-level facade crate for poke.
//!
//! Re-exports the writer/handler contracts and the metrics middleware so users can depend on a single crate.

pub mod core {
    pub use poke_core::*;
}

pub mod metrics {
    pub use poke_metrics::*;
}

pub use poke_core::{handler_fn, Handler, ResponseWriter, StatusRecorder};
pub use poke_metrics::{DurationPrecision, Metrics, Middleware};

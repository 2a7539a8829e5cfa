//! Request metrics: the recorder, the handler middleware and the tower layer.
//!
//! Aggregation and exposition belong to the `prometheus` crate; this module
//! only registers collectors and feeds them one observation per request.

pub mod layer;
pub mod metrics;
pub mod middleware;

pub use layer::{MetricsLayer, MetricsService};
pub use metrics::{DurationPrecision, Metrics, LABELS};
pub use middleware::Middleware;

//! poke request metrics library entry.
//!
//! Records request count and latency for HTTP handlers into `prometheus`
//! collectors labeled by path, method and status code. The synchronous
//! middleware (`obs::Middleware`) and the tower layer (`obs::MetricsLayer`)
//! share one recorder (`obs::Metrics`). The config, router and transport
//! modules wire a reference server used by the binary and integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
pub mod transport;

pub use obs::{DurationPrecision, Metrics, MetricsLayer, Middleware};

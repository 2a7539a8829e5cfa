//! Shared error type across poke crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, PokeError>;

/// Unified error type used by core and metrics.
///
/// Every variant is a configuration-time failure. Request handling never
/// produces a `PokeError`.
#[derive(Debug, Error)]
pub enum PokeError {
    /// Middleware requested before any aggregator was configured.
    #[error("at least one of `with_counter_vec`, `with_histogram_vec` must be called before building the middleware")]
    NoMetricConfigured,
    /// The metrics registry refused a collector (duplicate name, bad buckets).
    #[error("metric registration failed: {0}")]
    Registration(String),
    /// Configuration could not be parsed or failed validation.
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PokeError {
    /// Stable short code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            PokeError::NoMetricConfigured => "NO_METRIC_CONFIGURED",
            PokeError::Registration(_) => "REGISTRATION",
            PokeError::BadConfig(_) => "BAD_CONFIG",
            PokeError::Internal(_) => "INTERNAL",
        }
    }
}

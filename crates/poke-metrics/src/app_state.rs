//! Shared application state for the reference server.
//!
//! Startup errors are explicit (`Result` instead of panic): a duplicate metric
//! name or an unconfigured recorder stops `main` before the listener binds.

use std::sync::Arc;

use prometheus::Registry;

use poke_core::error::Result;

use crate::config::PokeConfig;
use crate::obs::Metrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: PokeConfig,
    metrics: Metrics,
}

impl AppState {
    /// Register the configured collectors in `registry` and build the state.
    pub fn new(cfg: PokeConfig, registry: Registry) -> Result<Self> {
        let metrics = Metrics::from_config(&cfg.metrics, registry)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, metrics }),
        })
    }

    pub fn cfg(&self) -> &PokeConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    pub fn registry(&self) -> &Registry {
        self.inner.metrics.registry()
    }
}

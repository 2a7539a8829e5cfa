use std::net::SocketAddr;

use prometheus::{HistogramOpts, Opts};
use serde::Deserialize;

use poke_core::error::{PokeError, Result};

use crate::obs::metrics::{counter_opts, histogram_opts, DurationPrecision};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PokeConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    pub metrics: MetricsSection,
}

impl PokeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PokeError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<SocketAddr>().map_err(|e| {
            PokeError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}"))
        })?;
        if self.max_body_bytes == 0 {
            return Err(PokeError::BadConfig(
                "server.max_body_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default)]
    pub precision: DurationPrecision,

    #[serde(default)]
    pub counter: Option<CounterSection>,

    #[serde(default)]
    pub histogram: Option<HistogramSection>,
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.counter.is_none() && self.histogram.is_none() {
            return Err(PokeError::BadConfig(
                "metrics must configure at least one of counter, histogram".into(),
            ));
        }
        if let Some(c) = &self.counter {
            validate_name("metrics.counter.name", &c.name)?;
        }
        if let Some(h) = &self.histogram {
            validate_name("metrics.histogram.name", &h.name)?;
            validate_buckets(&h.buckets)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterSection {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub subsystem: String,
    pub name: String,
    #[serde(default)]
    pub help: Option<String>,
}

impl CounterSection {
    pub fn opts(&self) -> Opts {
        let mut opts = counter_opts(&self.namespace, &self.subsystem, &self.name);
        if let Some(help) = &self.help {
            opts.help = help.clone();
        }
        opts
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramSection {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub subsystem: String,
    pub name: String,
    #[serde(default)]
    pub help: Option<String>,
    pub buckets: Vec<f64>,
}

impl HistogramSection {
    pub fn opts(&self) -> HistogramOpts {
        let mut opts = histogram_opts(
            &self.namespace,
            &self.subsystem,
            &self.name,
            self.buckets.clone(),
        );
        if let Some(help) = &self.help {
            opts.common_opts.help = help.clone();
        }
        opts
    }
}

fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PokeError::BadConfig(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_buckets(buckets: &[f64]) -> Result<()> {
    if buckets.is_empty() {
        return Err(PokeError::BadConfig(
            "metrics.histogram.buckets must not be empty".into(),
        ));
    }
    if buckets.iter().any(|b| !b.is_finite()) {
        return Err(PokeError::BadConfig(
            "metrics.histogram.buckets must be finite".into(),
        ));
    }
    if buckets.windows(2).any(|w| w[0] >= w[1]) {
        return Err(PokeError::BadConfig(
            "metrics.histogram.buckets must be strictly increasing".into(),
        ));
    }
    Ok(())
}

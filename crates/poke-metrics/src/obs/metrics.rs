//! Request metrics recorder.
//!
//! Holds an optional request counter and an optional request-duration
//! histogram, both labeled by `(path, method, status_code)`. Collectors are
//! registered in a caller-supplied `prometheus::Registry`; storage, aggregation
//! and exposition all stay inside the `prometheus` crate.

use std::time::Duration;

use http::{Method, StatusCode};
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use serde::Deserialize;

use poke_core::error::{PokeError, Result};
use poke_core::Handler;

use crate::config::MetricsSection;

use super::layer::MetricsLayer;
use super::middleware::Middleware;

/// Label names, in the order values are supplied.
pub const LABELS: [&str; 3] = ["path", "method", "status_code"];

/// How an elapsed duration is turned into the observed value (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPrecision {
    /// Truncate to whole seconds; 1.4s is observed as 1.
    #[default]
    WholeSeconds,
    /// Keep sub-second precision.
    Fractional,
}

impl DurationPrecision {
    pub fn seconds(self, elapsed: Duration) -> f64 {
        match self {
            DurationPrecision::WholeSeconds => elapsed.as_secs() as f64,
            DurationPrecision::Fractional => elapsed.as_secs_f64(),
        }
    }
}

fn default_help(name: &str) -> String {
    format!("{name} by path, method and status code")
}

/// Counter options with the default help text.
pub fn counter_opts(namespace: &str, subsystem: &str, name: &str) -> Opts {
    Opts::new(name, default_help(name))
        .namespace(namespace)
        .subsystem(subsystem)
}

/// Histogram options with the default help text.
pub fn histogram_opts(namespace: &str, subsystem: &str, name: &str, buckets: Vec<f64>) -> HistogramOpts {
    HistogramOpts::new(name, default_help(name))
        .namespace(namespace)
        .subsystem(subsystem)
        .buckets(buckets)
}

fn registration_err(e: prometheus::Error) -> PokeError {
    PokeError::Registration(e.to_string())
}

/// Request metrics recorder.
///
/// Built once at startup through the `with_*` methods, then shared by every
/// middleware and layer it produces. Cloning is cheap: the aggregators and the
/// registry are reference counted.
///
/// ```ignore
/// let metrics = Metrics::new(prometheus::Registry::new())
///     .with_counter_vec("app", "http", "requests_total")?
///     .with_histogram_vec("app", "http", "request_duration_seconds", vec![0.0, 1.0, 2.0, 5.0])?;
/// let handler = metrics.middleware(my_handler);
/// ```
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    counter: Option<CounterVec>,
    histogram: Option<HistogramVec>,
    precision: DurationPrecision,
}

impl Metrics {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            counter: None,
            histogram: None,
            precision: DurationPrecision::default(),
        }
    }

    /// Build a recorder from a validated `metrics` config section.
    pub fn from_config(section: &MetricsSection, registry: Registry) -> Result<Self> {
        let mut metrics = Metrics::new(registry).with_duration_precision(section.precision);
        if let Some(c) = &section.counter {
            metrics = metrics.with_counter_opts(c.opts())?;
        }
        if let Some(h) = &section.histogram {
            metrics = metrics.with_histogram_opts(h.opts())?;
        }
        metrics.ensure_configured()?;
        Ok(metrics)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn counter(&self) -> Option<&CounterVec> {
        self.counter.as_ref()
    }

    pub fn histogram(&self) -> Option<&HistogramVec> {
        self.histogram.as_ref()
    }

    pub fn precision(&self) -> DurationPrecision {
        self.precision
    }

    /// Register a request counter. Replaces a previously configured counter;
    /// the old collector stays registered.
    pub fn with_counter_vec(self, namespace: &str, subsystem: &str, name: &str) -> Result<Self> {
        self.with_counter_opts(counter_opts(namespace, subsystem, name))
    }

    pub fn with_counter_opts(mut self, opts: Opts) -> Result<Self> {
        let fq_name = opts.fq_name();
        let counter = CounterVec::new(opts, &LABELS).map_err(registration_err)?;
        self.registry
            .register(Box::new(counter.clone()))
            .map_err(registration_err)?;

        tracing::info!(metric = %fq_name, "request counter registered");
        self.counter = Some(counter);
        Ok(self)
    }

    /// Register a request-duration histogram with explicit bucket bounds.
    /// Replaces a previously configured histogram; the old collector stays
    /// registered.
    pub fn with_histogram_vec(
        self,
        namespace: &str,
        subsystem: &str,
        name: &str,
        buckets: Vec<f64>,
    ) -> Result<Self> {
        self.with_histogram_opts(histogram_opts(namespace, subsystem, name, buckets))
    }

    pub fn with_histogram_opts(mut self, opts: HistogramOpts) -> Result<Self> {
        let fq_name = opts.common_opts.fq_name();
        let histogram = HistogramVec::new(opts, &LABELS).map_err(registration_err)?;
        self.registry
            .register(Box::new(histogram.clone()))
            .map_err(registration_err)?;

        tracing::info!(metric = %fq_name, "request duration histogram registered");
        self.histogram = Some(histogram);
        Ok(self)
    }

    pub fn with_duration_precision(mut self, precision: DurationPrecision) -> Self {
        self.precision = precision;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.counter.is_some() || self.histogram.is_some()
    }

    pub fn ensure_configured(&self) -> Result<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(PokeError::NoMetricConfigured)
        }
    }

    /// Wrap `next` so every request it serves is recorded.
    ///
    /// # Panics
    /// If neither a counter nor a histogram was configured.
    pub fn middleware<H: Handler>(&self, next: H) -> Middleware<H> {
        match self.try_middleware(next) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_middleware<H: Handler>(&self, next: H) -> Result<Middleware<H>> {
        self.ensure_configured()?;
        Ok(Middleware::new(self.clone(), next))
    }

    /// Tower layer recording requests of native async services.
    ///
    /// # Panics
    /// If neither a counter nor a histogram was configured.
    pub fn layer(&self) -> MetricsLayer {
        match self.try_layer() {
            Ok(l) => l,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_layer(&self) -> Result<MetricsLayer> {
        self.ensure_configured()?;
        Ok(MetricsLayer::new(self.clone()))
    }

    /// Record one finished request into every configured aggregator.
    pub fn record(&self, path: &str, method: &Method, status: StatusCode, elapsed: Duration) {
        let status_code = status.as_u16().to_string();
        let labels = [path, method.as_str(), status_code.as_str()];

        if let Some(counter) = &self.counter {
            counter.with_label_values(&labels).inc();
        }
        if let Some(histogram) = &self.histogram {
            histogram
                .with_label_values(&labels)
                .observe(self.precision.seconds(elapsed));
        }

        tracing::trace!(
            path,
            method = %method,
            status = %status_code,
            elapsed_ms = elapsed.as_millis() as u64,
            "request recorded"
        );
    }
}

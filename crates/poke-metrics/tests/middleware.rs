//! Metrics middleware recording behavior.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::Write;
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, StatusCode};
use prometheus::proto::MetricFamily;
use prometheus::Registry;

use poke_core::{handler_fn, BufferedResponse, Handler, PokeError, ResponseWriter};
use poke_metrics::{DurationPrecision, Metrics};

fn req(method: Method, path: &str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

fn status_handler(status: StatusCode) -> impl Handler {
    handler_fn(move |w: &mut dyn ResponseWriter, _req: &Request<Bytes>| {
        w.write_status(status);
    })
}

fn body_only_handler() -> impl Handler {
    handler_fn(|w: &mut dyn ResponseWriter, _req: &Request<Bytes>| {
        w.write_all(b"ok").unwrap();
    })
}

fn counter_only(registry: Registry) -> Metrics {
    Metrics::new(registry)
        .with_counter_vec("test", "http", "requests_total")
        .unwrap()
}

fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
    families
        .iter()
        .find(|f| f.get_name() == name)
        .unwrap_or_else(|| panic!("metric family {name} not gathered"))
}

fn count(metrics: &Metrics, labels: &[&str]) -> f64 {
    metrics.counter().unwrap().with_label_values(labels).get()
}

#[test]
fn handler_without_status_records_200() {
    let metrics = counter_only(Registry::new());
    let mw = metrics.middleware(body_only_handler());

    let mut res = BufferedResponse::new();
    mw.serve(&mut res, &req(Method::GET, "/plain"));

    assert_eq!(res.body(), b"ok");
    assert_eq!(count(&metrics, &["/plain", "GET", "200"]), 1.0);
}

#[test]
fn explicit_status_is_recorded_and_forwarded() {
    let metrics = counter_only(Registry::new());
    let mw = metrics.middleware(status_handler(StatusCode::IM_A_TEAPOT));

    let mut res = BufferedResponse::new();
    mw.serve(&mut res, &req(Method::POST, "/brew"));

    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(count(&metrics, &["/brew", "POST", "418"]), 1.0);
    assert_eq!(count(&metrics, &["/brew", "POST", "200"]), 0.0);
}

#[test]
#[should_panic(expected = "at least one of")]
fn middleware_without_aggregators_panics() {
    let metrics = Metrics::new(Registry::new());
    let _ = metrics.middleware(body_only_handler());
}

#[test]
fn try_middleware_without_aggregators_errors() {
    let metrics = Metrics::new(Registry::new());
    assert!(!metrics.is_configured());

    let err = metrics.try_middleware(body_only_handler()).err().unwrap();
    assert!(matches!(err, PokeError::NoMetricConfigured));
    assert!(matches!(metrics.try_layer().err().unwrap(), PokeError::NoMetricConfigured));
}

#[test]
fn counter_counts_every_request() {
    let metrics = counter_only(Registry::new());
    let mw = metrics.middleware(body_only_handler());

    for _ in 0..25 {
        let mut res = BufferedResponse::new();
        mw.serve(&mut res, &req(Method::GET, "/items"));
    }

    assert_eq!(count(&metrics, &["/items", "GET", "200"]), 25.0);
    assert_eq!(count(&metrics, &["/items", "POST", "200"]), 0.0);
}

#[test]
fn histogram_truncates_to_whole_seconds() {
    let registry = Registry::new();
    let metrics = Metrics::new(registry.clone())
        .with_histogram_vec("test", "http", "duration_seconds", vec![0.0, 1.0, 2.0, 5.0])
        .unwrap();
    assert!(metrics.counter().is_none());

    let slow = handler_fn(|w: &mut dyn ResponseWriter, _req: &Request<Bytes>| {
        thread::sleep(Duration::from_millis(1400));
        w.write_status(StatusCode::OK);
    });
    let mw = metrics.middleware(slow);

    let mut res = BufferedResponse::new();
    mw.serve(&mut res, &req(Method::GET, "/slow"));

    let hist = metrics
        .histogram()
        .unwrap()
        .with_label_values(&["/slow", "GET", "200"]);
    assert_eq!(hist.get_sample_count(), 1);
    assert_eq!(hist.get_sample_sum(), 1.0);

    let families = registry.gather();
    let fam = family(&families, "test_http_duration_seconds");
    let buckets = fam.get_metric()[0].get_histogram().get_bucket();
    assert_eq!(buckets[0].get_upper_bound(), 0.0);
    assert_eq!(buckets[0].get_cumulative_count(), 0);
    assert_eq!(buckets[1].get_upper_bound(), 1.0);
    assert_eq!(buckets[1].get_cumulative_count(), 1);
}

#[test]
fn fractional_precision_keeps_sub_second_durations() {
    let metrics = Metrics::new(Registry::new())
        .with_histogram_vec("test", "http", "duration_seconds", vec![0.01, 0.1, 1.0])
        .unwrap()
        .with_duration_precision(DurationPrecision::Fractional);

    let nap = handler_fn(|_w: &mut dyn ResponseWriter, _req: &Request<Bytes>| {
        thread::sleep(Duration::from_millis(50));
    });
    let mw = metrics.middleware(nap);

    let mut res = BufferedResponse::new();
    mw.serve(&mut res, &req(Method::GET, "/nap"));

    let sum = metrics
        .histogram()
        .unwrap()
        .with_label_values(&["/nap", "GET", "200"])
        .get_sample_sum();
    assert!(sum >= 0.05, "sum = {sum}");
    assert!(sum < 1.0, "sum = {sum}");
}

#[test]
fn counter_and_histogram_fast_no_content() {
    let registry = Registry::new();
    let metrics = Metrics::new(registry.clone())
        .with_counter_vec("app", "http", "requests")
        .unwrap()
        .with_histogram_vec("app", "http", "requests_duration_seconds", vec![0.0, 1.0, 2.0, 5.0])
        .unwrap();

    let mw = metrics.middleware(status_handler(StatusCode::NO_CONTENT));
    let mut res = BufferedResponse::new();
    mw.serve(&mut res, &req(Method::GET, "/health"));

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(count(&metrics, &["/health", "GET", "204"]), 1.0);

    let families = registry.gather();
    let fam = family(&families, "app_http_requests_duration_seconds");
    let metric = &fam.get_metric()[0];

    let labels: Vec<(&str, &str)> = metric
        .get_label()
        .iter()
        .map(|l| (l.get_name(), l.get_value()))
        .collect();
    assert!(labels.contains(&("path", "/health")));
    assert!(labels.contains(&("method", "GET")));
    assert!(labels.contains(&("status_code", "204")));

    let hist = metric.get_histogram();
    assert_eq!(hist.get_sample_count(), 1);
    assert_eq!(hist.get_bucket()[0].get_upper_bound(), 0.0);
    assert_eq!(hist.get_bucket()[0].get_cumulative_count(), 1);
}

#[test]
fn counter_and_histogram_cannot_share_a_name() {
    let err = Metrics::new(Registry::new())
        .with_counter_vec("app", "http", "requests")
        .unwrap()
        .with_histogram_vec("app", "http", "requests", vec![0.0, 1.0])
        .err()
        .unwrap();
    assert!(matches!(err, PokeError::Registration(_)));
}

#[test]
fn duplicate_registration_fails() {
    let registry = Registry::new();
    let _first = counter_only(registry.clone());

    let err = Metrics::new(registry)
        .with_counter_vec("test", "http", "requests_total")
        .err()
        .unwrap();
    assert!(matches!(err, PokeError::Registration(_)));
    assert_eq!(err.code(), "REGISTRATION");
}

#[test]
fn reconfiguring_counter_replaces_it() {
    let metrics = counter_only(Registry::new())
        .with_counter_vec("test", "http", "requests_v2_total")
        .unwrap();
    let mw = metrics.middleware(body_only_handler());

    let mut res = BufferedResponse::new();
    mw.serve(&mut res, &req(Method::GET, "/v2"));

    assert_eq!(count(&metrics, &["/v2", "GET", "200"]), 1.0);
}

#[test]
fn request_reaches_handler_unchanged_and_body_passes_through() {
    let metrics = counter_only(Registry::new());
    let echo = handler_fn(|w: &mut dyn ResponseWriter, req: &Request<Bytes>| {
        assert_eq!(*req.method(), Method::PUT);
        assert_eq!(req.uri().query(), Some("x=1"));
        w.write_status(StatusCode::CREATED);
        w.write_all(b"head:").unwrap();
        w.write_all(req.body()).unwrap();
    });
    let mw = metrics.middleware(echo);

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/echo?x=1")
        .body(Bytes::from_static(b"\x01\x02payload"))
        .unwrap();
    let mut res = BufferedResponse::new();
    mw.serve(&mut res, &request);

    assert_eq!(res.body(), b"head:\x01\x02payload");
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(count(&metrics, &["/echo", "PUT", "201"]), 1.0);
}

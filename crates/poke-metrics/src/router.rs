//! Axum router wiring.
//!
//! `/v1/poke` is a synchronous handler wrapped by the metrics middleware;
//! `/healthz` is a native axum route recorded through the tower layer.
//! `/metrics` itself is not recorded.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, services::PokeHandler, transport::HandlerService};

pub fn build_router(state: AppState) -> Router {
    let metrics = state.metrics().clone();

    let poke = HandlerService::new(metrics.middleware(PokeHandler::new()))
        .max_body_bytes(state.cfg().server.max_body_bytes);

    let native = Router::new()
        .route("/healthz", get(ops::healthz))
        .layer(metrics.layer());

    Router::new()
        .route("/metrics", get(ops::metrics))
        .route_service("/v1/poke", poke)
        .merge(native)
        .with_state(state)
}

//! poke-metrics reference server.
//!
//! - Config: `poke.yaml`, or the path given as the first argument
//! - `/v1/poke?status=NNN` served through the metrics middleware
//! - `/metrics` scrape endpoint

use std::net::SocketAddr;

use prometheus::Registry;
use tracing_subscriber::{fmt, EnvFilter};

use poke_metrics::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "poke.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.server.listen.parse()?;

    // Misconfiguration ends the process here, before any request is accepted.
    let state = app_state::AppState::new(cfg, Registry::new())?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "poke-metrics starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

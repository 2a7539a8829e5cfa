//! Config loader (strict parsing).

pub mod schema;

use std::fs;

use poke_core::error::{PokeError, Result};

pub use schema::{CounterSection, HistogramSection, MetricsSection, PokeConfig, ServerSection};

pub fn load_from_file(path: &str) -> Result<PokeConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PokeError::BadConfig(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PokeConfig> {
    let cfg: PokeConfig = serde_yaml::from_str(s)
        .map_err(|e| PokeError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

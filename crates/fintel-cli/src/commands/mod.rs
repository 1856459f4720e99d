//! CLI subcommands.

pub mod analyze;
pub mod config;
pub mod schemas;
pub mod serve;

use std::path::Path;

use fintel_core::FintelConfig;

/// Load configuration from an explicit path, the default location, or
/// built-in defaults, in that order.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FintelConfig> {
    if let Some(path) = config_path {
        return Ok(FintelConfig::from_file(Path::new(path))?);
    }
    let default_path = config::default_config_path();
    if default_path.exists() {
        return Ok(FintelConfig::from_file(&default_path)?);
    }
    Ok(FintelConfig::default())
}

pub mod report;
pub mod stats;

use anyhow::{Context, Result};
use std::path::Path;
use urlstat_core::Config;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Load the run configuration
///
/// An explicitly given file must exist. Without one, `./config.toml` is used
/// when present and the built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display())),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Config::from_file(default_path).with_context(|| {
                    format!("Failed to load config file {}", default_path.display())
                })
            } else {
                Ok(Config::default())
            }
        }
    }
}

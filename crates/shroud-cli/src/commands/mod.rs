//! CLI command implementations for Shroud.

pub mod catalog;
pub mod config;
pub mod provision;

use anyhow::{Context, Result};
use serde::Serialize;
use shroud_core::ShroudConfig;
use std::path::Path;

/// Configuration file picked up from the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "shroud.yaml";

/// Load configuration from an explicit path, `./shroud.yaml`, or defaults.
///
/// An explicit path must exist. The implicit file is optional so that a
/// purely environment-driven setup works.
pub fn load_config(path: Option<&Path>) -> Result<ShroudConfig> {
    match path {
        Some(path) => ShroudConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                ShroudConfig::from_file(default)
                    .with_context(|| format!("failed to load config from {}", default.display()))
            } else {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(ShroudConfig::default())
            }
        }
    }
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

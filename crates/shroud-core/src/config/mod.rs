//! Configuration types for Shroud.
//!
//! Configuration is loaded from a single YAML file (`shroud.yaml` by default)
//! into a [`ShroudConfig`]. Every section is optional and falls back to
//! defaults, so an empty file is a valid configuration as long as the
//! workspace identifier and API key are available from the environment.

pub mod masking;
pub mod platform;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use masking::{MaskingDefaults, ModelConfig, TimestampDefaults};
pub use platform::PlatformConfig;

/// Complete Shroud configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShroudConfig {
    /// Anonymization platform connection.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Literal defaults used when building replacements.
    #[serde(default)]
    pub masking: MaskingDefaults,

    /// Plan compilation behavior.
    #[serde(default)]
    pub compile: CompileOptions,
}

/// Options controlling plan compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Fail a port instead of skipping it when its table is not in the
    /// workspace, or when a masking directive names an unknown generator.
    #[serde(default)]
    pub strict: bool,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing {field}: set it in the config file or via ${env_var}")]
    Missing { field: String, env_var: String },
}

impl ShroudConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }
}

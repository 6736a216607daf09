//! Anonymization platform connection settings.
//!
//! Workspace identifier and API key are resolved in order of precedence:
//! 1. the explicit value in `shroud.yaml`
//! 2. the environment variable named by the matching `*_env` field

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Connection settings for the anonymization platform REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `api-version` query parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Workspace holding the target tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    /// Environment variable containing the workspace identifier.
    #[serde(default = "default_workspace_id_env")]
    pub workspace_id_env: String,

    /// API key. Prefer `api_key_env` outside of tests.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable containing the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Sent as `isScaled` when triggering data generation.
    #[serde(default = "default_true")]
    pub is_scaled: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            workspace_id: None,
            workspace_id_env: default_workspace_id_env(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
            is_scaled: true,
        }
    }
}

impl PlatformConfig {
    /// Resolve the workspace identifier.
    pub fn resolve_workspace_id(&self) -> Result<String, ConfigError> {
        resolve(&self.workspace_id, &self.workspace_id_env, "workspace_id")
    }

    /// Resolve the API key.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        resolve(&self.api_key, &self.api_key_env, "api_key")
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn resolve(explicit: &Option<String>, env_var: &str, field: &str) -> Result<String, ConfigError> {
    if let Some(value) = explicit.as_deref().filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }
    match env::var(env_var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing {
            field: field.to_string(),
            env_var: env_var.to_string(),
        }),
    }
}

fn default_base_url() -> String {
    "https://app.tonic.ai".to_string()
}

fn default_api_version() -> String {
    "v2024.01.0".to_string()
}

fn default_workspace_id_env() -> String {
    "workspaceId".to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

//! `shroud config check` command implementation.

use anyhow::Result;
use serde_json::json;
use shroud_core::ShroudConfig;
use std::process::ExitCode;

use super::print_json;

/// Outcome of resolving credentials. The API key itself is never kept,
/// only where it came from.
#[derive(Debug, Default)]
struct Resolution {
    workspace_id: Option<String>,
    api_key_source: Option<&'static str>,
    problems: Vec<String>,
}

fn resolve(config: &ShroudConfig) -> Resolution {
    let mut resolution = Resolution::default();

    match config.platform.resolve_workspace_id() {
        Ok(id) => resolution.workspace_id = Some(id),
        Err(e) => resolution.problems.push(e.to_string()),
    }
    match config.platform.resolve_api_key() {
        Ok(_) => {
            let inline = config.platform.api_key.as_deref().is_some_and(|k| !k.is_empty());
            resolution.api_key_source = Some(if inline { "config" } else { "environment" });
        }
        Err(e) => resolution.problems.push(e.to_string()),
    }
    resolution
}

/// Print the effective configuration and report unresolved credentials.
pub fn check(config: &ShroudConfig) -> Result<ExitCode> {
    let Resolution {
        workspace_id,
        api_key_source,
        problems,
    } = resolve(config);

    print_json(&json!({
        "platform": {
            "baseUrl": config.platform.base_url(),
            "apiVersion": config.platform.api_version,
            "workspaceId": workspace_id,
            "apiKeySource": api_key_source,
            "timeoutSeconds": config.platform.timeout_seconds,
            "isScaled": config.platform.is_scaled,
        },
        "masking": config.masking,
        "compile": config.compile,
        "problems": problems,
    }))?;

    if problems.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        for problem in &problems {
            tracing::error!("{}", problem);
        }
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_credentials_resolve() {
        let config = ShroudConfig::from_yaml("platform:\n  workspace_id: ws-1\n  api_key: secret\n").unwrap();
        let resolution = resolve(&config);
        assert!(resolution.problems.is_empty());
        assert_eq!(resolution.workspace_id.as_deref(), Some("ws-1"));
        assert_eq!(resolution.api_key_source, Some("config"));
    }

    #[test]
    fn test_missing_credentials_reported() {
        let config = ShroudConfig::from_yaml(
            "platform:\n  workspace_id_env: SHROUD_CLI_TEST_NO_WS\n  api_key_env: SHROUD_CLI_TEST_NO_KEY\n",
        )
        .unwrap();
        let resolution = resolve(&config);
        assert_eq!(resolution.problems.len(), 2);
        assert!(resolution.problems[1].contains("SHROUD_CLI_TEST_NO_KEY"));
    }
}

//! `shroud provision` command implementation.

use anyhow::{Context, Result};
use shroud_core::{Descriptor, ProvisioningRequest, ShroudConfig};
use shroud_runtime::Provisioner;
use shroud_tonic::TonicClient;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use super::print_json;

/// Read a descriptor from disk, either bare or wrapped in a provisioning
/// request envelope.
pub fn load_descriptor(path: &Path, request: bool) -> Result<Descriptor> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    if request {
        let envelope: ProvisioningRequest = serde_yaml::from_str(&content)
            .with_context(|| format!("{} is not a provisioning request", path.display()))?;
        if let Some(kind) = &envelope.descriptor_kind {
            tracing::debug!(descriptor_kind = %kind, "Unwrapping provisioning request");
        }
        envelope
            .parse_descriptor()
            .context("embedded descriptor is not valid YAML")
    } else {
        Descriptor::from_yaml(&content)
            .with_context(|| format!("{} is not a valid descriptor", path.display()))
    }
}

pub async fn run(config: &ShroudConfig, file: &Path, request: bool, dry_run: bool) -> Result<ExitCode> {
    let descriptor = load_descriptor(file, request)?;
    let client = Arc::new(TonicClient::new(&config.platform)?);
    let provisioner = Provisioner::new(client.clone(), client, config.masking.clone(), config.compile);

    let report = provisioner.provision(&descriptor, dry_run).await?;
    tracing::info!(
        ports = report.ports.len(),
        applied = report.applied_count(),
        skipped = report.skipped_count(),
        dry_run,
        "Provisioning finished"
    );
    print_json(&report)?;

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

//! `shroud catalog`, `shroud replacements` and `shroud privacy` command
//! implementations.

use anyhow::Result;
use shroud_core::{PlanTarget, ShroudConfig};
use shroud_tonic::TonicClient;

use super::print_json;

pub async fn tables(config: &ShroudConfig) -> Result<()> {
    let client = TonicClient::new(&config.platform)?;
    let tables = client.workspace_tables().await?;
    tracing::info!(workspace_id = %client.workspace_id(), tables = tables.len(), "Fetched workspace tables");
    print_json(&tables)
}

pub async fn generators(config: &ShroudConfig) -> Result<()> {
    let client = TonicClient::new(&config.platform)?;
    let generators = client.generators().await?;
    tracing::info!(generators = generators.len(), "Fetched generator catalog");
    print_json(&generators)
}

/// Print the privacy analysis, or the sensitive columns of one table.
pub async fn privacy(config: &ShroudConfig, target: Option<(&str, &str)>) -> Result<()> {
    let client = TonicClient::new(&config.platform)?;
    let analysis = client.privacy_analysis().await?;
    tracing::info!(
        tables = analysis.tables.len(),
        at_risk_columns = analysis.at_risk_column_count,
        "Fetched privacy analysis"
    );

    match target {
        Some((schema, table)) => {
            let target = PlanTarget::new(schema, table);
            if analysis.table(&target).is_none() {
                tracing::warn!(schema, table, "Table not present in privacy analysis");
            }
            print_json(&analysis.sensitive_columns(&target))
        }
        None => print_json(&analysis),
    }
}

pub async fn replacements(config: &ShroudConfig, schema: &str, table: &str) -> Result<()> {
    let client = TonicClient::new(&config.platform)?;
    let existing = client.table_replacements(&PlanTarget::new(schema, table)).await?;
    print_json(&existing)
}

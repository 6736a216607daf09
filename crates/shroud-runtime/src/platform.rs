use async_trait::async_trait;
use serde::Serialize;
use shroud_core::{CatalogSnapshot, Generator, GeneratorCatalog, PlanTarget, Replacement, WorkspaceTable};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Opaque response to a generation trigger. Not a completion status.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationAck(pub serde_json::Value);

/// Read side of the anonymization workspace.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Schema/table/column snapshot of the workspace.
    async fn fetch_workspace_tables(&self) -> anyhow::Result<Vec<WorkspaceTable>>;

    /// Generators offered by the platform.
    async fn fetch_generators(&self) -> anyhow::Result<Vec<Generator>>;
}

/// Write side of the anonymization workspace.
///
/// Implementations perform one remote call per method and must not retry
/// across methods; sequencing is owned by [`PlanSubmitter`](crate::PlanSubmitter).
#[async_trait]
pub trait MaskingPlatform: Send + Sync {
    /// Flag columns as sensitive. Idempotent.
    async fn mark_sensitive_columns(&self, target: &PlanTarget, columns: &[String]) -> anyhow::Result<()>;

    /// Upsert the replacement set for a table.
    async fn upsert_replacements(
        &self,
        target: &PlanTarget,
        replacements: &BTreeMap<String, Replacement>,
    ) -> anyhow::Result<()>;

    /// Start synthetic data generation.
    async fn trigger_generation(
        &self,
        replacements: &BTreeMap<String, Replacement>,
        dirty_columns: &[String],
    ) -> anyhow::Result<GenerationAck>;
}

// One client usually serves both seams; share it behind an Arc.
#[async_trait]
impl<T: CatalogSource + ?Sized> CatalogSource for Arc<T> {
    async fn fetch_workspace_tables(&self) -> anyhow::Result<Vec<WorkspaceTable>> {
        (**self).fetch_workspace_tables().await
    }

    async fn fetch_generators(&self) -> anyhow::Result<Vec<Generator>> {
        (**self).fetch_generators().await
    }
}

#[async_trait]
impl<T: MaskingPlatform + ?Sized> MaskingPlatform for Arc<T> {
    async fn mark_sensitive_columns(&self, target: &PlanTarget, columns: &[String]) -> anyhow::Result<()> {
        (**self).mark_sensitive_columns(target, columns).await
    }

    async fn upsert_replacements(
        &self,
        target: &PlanTarget,
        replacements: &BTreeMap<String, Replacement>,
    ) -> anyhow::Result<()> {
        (**self).upsert_replacements(target, replacements).await
    }

    async fn trigger_generation(
        &self,
        replacements: &BTreeMap<String, Replacement>,
        dirty_columns: &[String],
    ) -> anyhow::Result<GenerationAck> {
        (**self).trigger_generation(replacements, dirty_columns).await
    }
}

/// Fetch both halves of the catalog snapshot.
pub async fn fetch_snapshot(source: &dyn CatalogSource) -> anyhow::Result<CatalogSnapshot> {
    let tables = source.fetch_workspace_tables().await?;
    let generators = GeneratorCatalog::new(source.fetch_generators().await?);
    tracing::info!(
        tables = tables.len(),
        generators = generators.len(),
        "Fetched workspace catalog"
    );
    if generators.is_empty() {
        tracing::warn!("Generator catalog is empty, every masking directive will be skipped");
    }
    Ok(CatalogSnapshot::new(tables, generators))
}

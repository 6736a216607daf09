//! Read-only snapshot of the anonymization workspace.
//!
//! Both halves are fetched once per provisioning run and shared, unmodified,
//! by every plan assembled during that run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Table known to the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTable {
    pub table_name: String,
    pub schema_of_table: String,
    #[serde(default)]
    pub columns: Vec<WorkspaceColumn>,
}

impl WorkspaceTable {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            table_name: table.into(),
            schema_of_table: schema.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(WorkspaceColumn {
            column_name: name.into(),
            data_type: None,
            is_nullable: None,
        });
        self
    }

    pub fn matches(&self, schema: &str, table: &str) -> bool {
        self.schema_of_table == schema && self.table_name == table
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceColumn {
    pub column_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
}

/// Anonymization strategy offered by the platform.
///
/// Capability flags are carried for inspection only; the compiler matches
/// generators by identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    pub generator_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub can_be_differentially_private: bool,
    #[serde(default)]
    pub can_be_consistent: bool,
    #[serde(default)]
    pub can_link: bool,
    #[serde(default)]
    pub has_fallback: bool,
    #[serde(default)]
    pub fallback_generator_ids: Vec<String>,
}

impl Generator {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            generator_id: id.into(),
            generator_label: None,
            description: None,
            can_be_differentially_private: false,
            can_be_consistent: false,
            can_link: false,
            has_fallback: false,
            fallback_generator_ids: Vec::new(),
        }
    }
}

/// Generators indexed by identifier.
#[derive(Debug, Clone, Default)]
pub struct GeneratorCatalog {
    generators: Vec<Generator>,
    ids: HashSet<String>,
}

impl GeneratorCatalog {
    pub fn new(generators: Vec<Generator>) -> Self {
        let ids = generators.iter().map(|g| g.generator_id.clone()).collect();
        Self { generators, ids }
    }

    /// Exact, case-sensitive identifier lookup.
    pub fn contains(&self, generator_id: &str) -> bool {
        self.ids.contains(generator_id)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl FromIterator<Generator> for GeneratorCatalog {
    fn from_iter<I: IntoIterator<Item = Generator>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Workspace tables plus generator catalog for one run.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub tables: Vec<WorkspaceTable>,
    pub generators: GeneratorCatalog,
}

impl CatalogSnapshot {
    pub fn new(tables: Vec<WorkspaceTable>, generators: GeneratorCatalog) -> Self {
        Self { tables, generators }
    }

    /// First table whose schema and name both match exactly.
    pub fn find_table(&self, schema: &str, table: &str) -> Option<&WorkspaceTable> {
        self.tables.iter().find(|t| t.matches(schema, table))
    }

    pub fn has_generator(&self, generator_id: &str) -> bool {
        self.generators.contains(generator_id)
    }
}

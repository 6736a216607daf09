//! Request and response bodies of the platform REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shroud_core::{PlanTarget, Replacement, WorkspaceTable};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkspaceTablesResponse {
    #[serde(default)]
    pub tables: Vec<WorkspaceTable>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ColumnKey<'a> {
    pub schema: &'a str,
    pub table: &'a str,
    pub column_name: &'a str,
}

/// Body of `POST /api/Privacy/set`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrivacySetRequest<'a> {
    pub column_keys: Vec<ColumnKey<'a>>,
    pub workspace_id: &'a str,
}

impl<'a> PrivacySetRequest<'a> {
    pub fn new(workspace_id: &'a str, target: &'a PlanTarget, columns: &'a [String]) -> Self {
        Self {
            column_keys: columns
                .iter()
                .map(|column| ColumnKey {
                    schema: &target.schema,
                    table: &target.table,
                    column_name: column,
                })
                .collect(),
            workspace_id,
        }
    }
}

/// Body of `PUT /api/Workspace/{id}/update_replacements/{schema}/{table}`.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateReplacementsRequest<'a> {
    pub replacements: &'a BTreeMap<String, Replacement>,
}

/// Body of `POST /api/generateddata`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateDataRequest<'a> {
    pub replacements: Vec<&'a Replacement>,
    pub workspace_id: &'a str,
    pub is_scaled: bool,
    pub dirty_columns: &'a [String],
    /// One empty sample list per dirty column.
    pub data: BTreeMap<&'a str, Vec<Value>>,
}

impl<'a> GenerateDataRequest<'a> {
    pub fn new(
        workspace_id: &'a str,
        is_scaled: bool,
        replacements: &'a BTreeMap<String, Replacement>,
        dirty_columns: &'a [String],
    ) -> Self {
        Self {
            replacements: replacements.values().collect(),
            workspace_id,
            is_scaled,
            dirty_columns,
            data: dirty_columns.iter().map(|c| (c.as_str(), Vec::new())).collect(),
        }
    }
}

/// Body of `GET /api/Privacy/analysis`.
///
/// Every field is optional on the wire; counts default to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyAnalysis {
    pub tables: BTreeMap<String, PrivacyTable>,
    pub not_included_column_count: u64,
    pub not_sensitive_column_count: u64,
    pub at_risk_column_count: u64,
    pub protected_column_count: u64,
    pub column_count_by_privacy_rank: BTreeMap<String, u64>,
    pub not_included_table_count: u64,
    pub not_sensitive_table_count: u64,
    pub at_risk_table_count: u64,
    pub protected_table_count: u64,
    pub partially_masked_table_count: u64,
    pub fully_masked_table_count: u64,
    pub anonymized_table_count: u64,
}

impl PrivacyAnalysis {
    pub fn table(&self, target: &PlanTarget) -> Option<&PrivacyTable> {
        self.tables
            .values()
            .find(|t| t.schema == target.schema && t.table == target.table)
    }

    /// Columns the workspace currently flags as sensitive, in column key order.
    pub fn sensitive_columns(&self, target: &PlanTarget) -> Vec<&str> {
        self.table(target)
            .map(|t| {
                t.columns
                    .values()
                    .filter(|c| c.is_sensitive)
                    .map(|c| c.column.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyTable {
    pub schema: String,
    pub table: String,
    pub table_mode: Option<String>,
    pub privacy_status: Option<String>,
    pub table_protection: Option<String>,
    pub columns: BTreeMap<String, PrivacyColumn>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyColumn {
    pub column: String,
    pub schema: String,
    pub table: String,
    pub data_type: Option<String>,
    pub is_included: bool,
    pub is_sensitive: bool,
    pub tonic_detected_sensitivity: bool,
    pub sensitive_type: Option<String>,
    pub is_protected: bool,
    pub generator: Option<String>,
    pub is_differentially_private: bool,
    pub privacy_status: Option<String>,
    pub privacy_rank: Option<String>,
}

/// Interpret a response body as JSON, falling back to a string.
pub(crate) fn acknowledgement(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

//! Masking plan types.
//!
//! A [`MaskingPlan`] is everything needed to commit one output port to the
//! anonymization workspace: the columns to flag as sensitive, the replacement
//! (generator assignment) for each column, and the columns whose synthetic
//! output must be regenerated.

use crate::config::ModelConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Generator applied to columns with no masking directive.
pub const PASSTHROUGH_GENERATOR_ID: &str = "PassthroughGenerator";

/// Schema and table a plan is committed against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanTarget {
    pub schema: String,
    pub table: String,
}

impl PlanTarget {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for PlanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Binding of a generator to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub column: String,
    pub table: String,
    pub schema: String,
    pub metadata: Map<String, Value>,
}

/// Generator assignment for a column, in the platform's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replacement {
    pub name: String,
    pub links: Vec<Link>,
    #[serde(default)]
    pub fallback_links: Vec<Value>,
    pub table: String,
    pub schema: String,
    #[serde(default)]
    pub partitions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nn_model_config: Option<ModelConfig>,
}

impl Replacement {
    /// Build a single-link replacement seeded with the base metadata:
    /// `generatorId`, `presetId` (same value) and `isDifferentiallyPrivate: false`.
    pub fn new(target: &PlanTarget, column: &str, generator_id: &str, model: ModelConfig) -> Self {
        Self {
            name: column.to_string(),
            links: vec![Link {
                column: column.to_string(),
                table: target.table.clone(),
                schema: target.schema.clone(),
                metadata: base_metadata(generator_id),
            }],
            fallback_links: Vec::new(),
            table: target.table.clone(),
            schema: target.schema.clone(),
            partitions: Vec::new(),
            nn_model_config: Some(model),
        }
    }

    /// Generator of the primary link.
    pub fn generator_id(&self) -> Option<&str> {
        self.links
            .first()
            .and_then(|l| l.metadata.get("generatorId"))
            .and_then(Value::as_str)
    }
}

/// Metadata every link starts from.
pub fn base_metadata(generator_id: &str) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("generatorId".into(), Value::from(generator_id));
    metadata.insert("presetId".into(), Value::from(generator_id));
    metadata.insert("isDifferentiallyPrivate".into(), Value::Bool(false));
    metadata
}

/// Column left out of the replacement set because its generator is not in
/// the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedColumn {
    pub column: String,
    pub generator_id: String,
}

/// Non-fatal findings gathered while assembling a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDiagnostics {
    pub skipped_columns: Vec<SkippedColumn>,
    /// Contract positions (zero-based) of columns with a blank name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unnamed_columns: Vec<usize>,
}

impl PlanDiagnostics {
    /// Columns left out of the plan for any reason.
    pub fn skipped_count(&self) -> usize {
        self.skipped_columns.len() + self.unnamed_columns.len()
    }
}

/// Unit of work submitted to the anonymization workspace.
#[derive(Debug, Clone, Serialize)]
pub struct MaskingPlan {
    pub target: PlanTarget,
    /// Sensitive column names in contract order; duplicates preserved.
    pub sensitive_columns: Vec<String>,
    replacements: BTreeMap<String, Replacement>,
    /// Columns whose generated output must be recomputed.
    pub dirty_columns: Vec<String>,
    pub diagnostics: PlanDiagnostics,
}

impl MaskingPlan {
    pub fn new(target: PlanTarget) -> Self {
        Self {
            target,
            sensitive_columns: Vec::new(),
            replacements: BTreeMap::new(),
            dirty_columns: Vec::new(),
            diagnostics: PlanDiagnostics::default(),
        }
    }

    /// Insert a replacement under a freshly generated key and return the key.
    ///
    /// Keys are random v4 UUIDs; a collision with an existing key draws again.
    pub fn insert_replacement(&mut self, replacement: Replacement) -> String {
        loop {
            let key = Uuid::new_v4().to_string();
            if !self.replacements.contains_key(&key) {
                self.replacements.insert(key.clone(), replacement);
                return key;
            }
        }
    }

    /// Replacements keyed by plan key. Key order carries no meaning.
    pub fn replacements(&self) -> &BTreeMap<String, Replacement> {
        &self.replacements
    }

    pub fn replacement_for(&self, column: &str) -> Option<&Replacement> {
        self.replacements.values().find(|r| r.name == column)
    }
}

//! Generator-specific link metadata.
//!
//! Each generator that needs tuning has an entry in [`PROFILES`]. Generators
//! without an entry (passthrough included) keep the base metadata unchanged.

use crate::error::CompileError;
use serde_json::{Map, Value};
use shroud_core::{ContractColumn, TimestampDefaults};

/// Generators whose metadata is extended, keyed by catalog identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorProfile {
    Name,
    Categorical,
    Email,
    RandomTimestamp,
    RandomInteger,
}

pub const PROFILES: &[(&str, GeneratorProfile)] = &[
    ("NameGenerator", GeneratorProfile::Name),
    ("CategoricalGenerator", GeneratorProfile::Categorical),
    ("EmailGenerator", GeneratorProfile::Email),
    ("RandomTimestampGenerator", GeneratorProfile::RandomTimestamp),
    ("RandomIntegerGenerator", GeneratorProfile::RandomInteger),
];

impl GeneratorProfile {
    pub fn lookup(generator_id: &str) -> Option<Self> {
        PROFILES
            .iter()
            .find(|(id, _)| *id == generator_id)
            .map(|(_, profile)| *profile)
    }
}

/// Extends base link metadata per generator.
#[derive(Debug, Clone, Default)]
pub struct MetadataCustomizer {
    timestamp: TimestampDefaults,
}

impl MetadataCustomizer {
    pub fn new(timestamp: TimestampDefaults) -> Self {
        Self { timestamp }
    }

    /// Return `metadata` extended for `generator_id`.
    ///
    /// Existing keys are kept unless the generator overwrites them. Fails with
    /// [`CompileError::MissingParameter`] when the generator reads a directive
    /// parameter the column does not carry.
    pub fn customize(
        &self,
        mut metadata: Map<String, Value>,
        generator_id: &str,
        column: &ContractColumn,
    ) -> Result<Map<String, Value>, CompileError> {
        let Some(profile) = GeneratorProfile::lookup(generator_id) else {
            return Ok(metadata);
        };

        let entries: Vec<(&str, Value)> = match profile {
            GeneratorProfile::Name => vec![
                ("preserveCapitalization", Value::Bool(false)),
                ("nameType", Value::String(display_value(param(column, generator_id, "part")?))),
            ],
            GeneratorProfile::Categorical => vec![
                ("epsilon", Value::from(1)),
                ("turinBound", Value::from(0)),
            ],
            GeneratorProfile::Email => vec![
                ("replaceInvalidEmails", Value::Bool(false)),
                ("turinBound", Value::from(0)),
            ],
            GeneratorProfile::RandomTimestamp => {
                let t = &self.timestamp;
                vec![
                    ("minDate", Value::from(t.min_date.as_str())),
                    ("maxDate", Value::from(t.max_date.as_str())),
                    ("minTime", Value::from(t.min_time.as_str())),
                    ("maxTime", Value::from(t.max_time.as_str())),
                    ("dateTimeFormat", Value::from(t.date_time_format.as_str())),
                    ("unixTimestampFormat", Value::from(t.unix_timestamp_format.as_str())),
                ]
            }
            GeneratorProfile::RandomInteger => vec![
                ("min", param(column, generator_id, "minimum")?.clone()),
                ("max", param(column, generator_id, "maximum")?.clone()),
            ],
        };

        for (key, value) in entries {
            metadata.insert(key.to_string(), value);
        }
        Ok(metadata)
    }
}

fn param<'c>(
    column: &'c ContractColumn,
    generator_id: &str,
    key: &str,
) -> Result<&'c Value, CompileError> {
    column
        .masking
        .as_ref()
        .and_then(|m| m.specific.get(key))
        .ok_or_else(|| CompileError::missing_parameter(generator_id, key, &column.name))
}

// Strings are taken as-is; other scalars use their JSON rendering.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

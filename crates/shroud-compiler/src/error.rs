//! Error types for plan compilation.

use thiserror::Error;

/// Errors that abort compilation of a single output port.
///
/// Sibling ports are compiled independently, so one failure never aborts the
/// rest of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A generator needs a directive parameter the column does not supply.
    #[error("generator '{generator_id}' requires parameter '{parameter}' (column '{column}')")]
    MissingParameter {
        generator_id: String,
        parameter: String,
        column: String,
    },

    /// The port's table is not in the workspace. Strict mode only.
    #[error("table '{schema}.{table}' is not present in the workspace")]
    UnmatchedTable { schema: String, table: String },

    /// A masking directive names a generator missing from the catalog.
    /// Strict mode only.
    #[error("column '{column}' requests generator '{generator_id}', which is not in the catalog")]
    UnknownGenerator { column: String, generator_id: String },
}

impl CompileError {
    pub fn missing_parameter(generator_id: &str, parameter: &str, column: &str) -> Self {
        Self::MissingParameter {
            generator_id: generator_id.to_string(),
            parameter: parameter.to_string(),
            column: column.to_string(),
        }
    }
}

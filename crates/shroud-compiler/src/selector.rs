//! Generator selection.
//!
//! A masking directive of type `X` resolves to generator `XGenerator`, which
//! must exist in the catalog. Columns without a directive pass through.

use shroud_core::{ContractColumn, GeneratorCatalog, PASSTHROUGH_GENERATOR_ID};

const GENERATOR_SUFFIX: &str = "Generator";

/// Outcome of resolving a column's generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Generator to apply.
    Resolved(String),
    /// The directive's generator is not in the catalog; carries the
    /// identifier that was looked up.
    NotFound(String),
}

/// Catalog identifier for a directive's generator type.
pub fn candidate_id(generator_type: &str) -> String {
    format!("{generator_type}{GENERATOR_SUFFIX}")
}

/// Resolve the generator for a column.
pub fn select(column: &ContractColumn, catalog: &GeneratorCatalog) -> Selection {
    let Some(masking) = &column.masking else {
        return Selection::Resolved(PASSTHROUGH_GENERATOR_ID.to_string());
    };

    let candidate = candidate_id(&masking.generator_type);
    if catalog.contains(&candidate) {
        Selection::Resolved(candidate)
    } else {
        Selection::NotFound(candidate)
    }
}

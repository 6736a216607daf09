//! Shroud plan compiler
//!
//! Turns the column-level data contract of a data product's output ports into
//! masking plans for the anonymization workspace:
//!
//! 1. **Classification** - a column is sensitive iff it carries a `PII` or
//!    `Sensitive` tag ([`classifier`])
//! 2. **Selection** - a masking directive of type `X` resolves to catalog
//!    generator `XGenerator`; no directive means passthrough ([`selector`])
//! 3. **Customization** - generator-specific link metadata ([`customizer`])
//! 4. **Assembly** - one [`MaskingPlan`](shroud_core::MaskingPlan) per matched
//!    output port ([`assembler`])
//!
//! Everything here is synchronous and free of I/O. Fetching the catalog and
//! committing plans is the job of `shroud-runtime`.

pub mod assembler;
pub mod classifier;
pub mod customizer;
pub mod error;
pub mod selector;

pub use assembler::{CompiledPort, PlanAssembler, PortCompilation, SkipReason};
pub use classifier::is_sensitive;
pub use customizer::{GeneratorProfile, MetadataCustomizer};
pub use error::CompileError;
pub use selector::{Selection, select};

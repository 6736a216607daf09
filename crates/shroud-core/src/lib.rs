// Configuration types shared across all Shroud crates
pub mod config;

pub mod catalog;
pub mod descriptor;
pub mod plan;

pub use catalog::{CatalogSnapshot, Generator, GeneratorCatalog, WorkspaceColumn, WorkspaceTable};
pub use config::{
    CompileOptions, ConfigError, MaskingDefaults, ModelConfig, PlatformConfig, ShroudConfig,
    TimestampDefaults,
};
pub use descriptor::{
    Component, ContractColumn, DataContract, DataProduct, Descriptor, MaskingDirective,
    OutputPort, PortRejection, ProvisioningRequest, Tag, OUTPUT_PORT_KIND,
};
pub use plan::{
    Link, MaskingPlan, PASSTHROUGH_GENERATOR_ID, PlanDiagnostics, PlanTarget, Replacement,
    SkippedColumn,
};

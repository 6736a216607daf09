//! Shroud runtime
//!
//! Connects the pure plan compiler to the anonymization workspace through two
//! trait seams: [`CatalogSource`] (read) and [`MaskingPlatform`] (write).
//! `shroud-tonic` provides the HTTP implementation; tests use in-memory fakes.

pub mod platform;
pub mod provisioner;
pub mod submitter;

pub use platform::{CatalogSource, GenerationAck, MaskingPlatform, fetch_snapshot};
pub use provisioner::{PortReport, PortStatus, ProvisionReport, Provisioner};
pub use submitter::{PlanSubmitter, SubmitError, SubmitStep};

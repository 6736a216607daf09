//! # shroud-tonic
//!
//! HTTP implementation of the Shroud runtime collaborators for the Tonic
//! anonymization platform.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | workspace tables | `GET /api/table?workspaceId=` |
//! | generator catalog | `GET /api/GeneratorMetadata` |
//! | privacy analysis | `GET /api/Privacy/analysis?workspaceId=` |
//! | existing replacements | `GET /api/Workspace/{id}/replacements/{schema}/{table}` |
//! | mark sensitive | `POST /api/Privacy/set` |
//! | upsert replacements | `PUT /api/Workspace/{id}/update_replacements/{schema}/{table}` |
//! | trigger generation | `POST /api/generateddata` |
//!
//! ```rust,no_run
//! use shroud_core::ShroudConfig;
//! use shroud_runtime::Provisioner;
//! use shroud_tonic::TonicClient;
//! use std::sync::Arc;
//!
//! # async fn example(descriptor: shroud_core::Descriptor) -> anyhow::Result<()> {
//! let config = ShroudConfig::from_file("shroud.yaml")?;
//! let client = Arc::new(TonicClient::new(&config.platform)?);
//! let provisioner = Provisioner::new(
//!     client.clone(),
//!     client,
//!     config.masking.clone(),
//!     config.compile,
//! );
//! let _report = provisioner.provision(&descriptor, false).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
mod wire;

pub use client::TonicClient;
pub use error::TonicError;
pub use wire::{PrivacyAnalysis, PrivacyColumn, PrivacyTable};

//! Error types for the platform client.

use shroud_core::ConfigError;
use thiserror::Error;

/// Errors raised by [`TonicClient`](crate::TonicClient).
#[derive(Debug, Error)]
pub enum TonicError {
    /// Workspace identifier or API key could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The API key contains characters not allowed in a header.
    #[error("invalid API key header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The base URL cannot be used to build endpoints.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport failure (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

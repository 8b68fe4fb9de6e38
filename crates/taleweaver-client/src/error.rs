//! Client construction errors.

use thiserror::Error;

/// Failure to configure or build the HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

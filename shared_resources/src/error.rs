//! Error types shared across the workspace.

use thiserror::Error;

use crate::Floor;

/// Rejections raised while constructing a [`Request`](crate::Request).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The origin or one of the destinations lies outside `[0, total_floors)`.
    #[error("Floor out of range")]
    OutOfRange { floor: Floor, total_floors: Floor },

    /// No destination floor was given, so no direction can be derived.
    #[error("No destination floors")]
    NoDestination,
}

/// Failures while loading the fleet configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

//! Error types for the taxonomy tooling

use thiserror::Error;

/// Errors that can occur while building or applying the taxonomy
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// The source YAML could not be parsed
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The parsed tree violates the taxonomy shape
    #[error("Invalid taxonomy tree: {0}")]
    InvalidTree(String),

    /// No normalizer is registered for the wiki
    #[error("Unknown wiki database: {0}")]
    UnknownWiki(String),

    /// JSON serialization error while reading or writing dump lines
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading or writing dump files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API failure during the sitelink fetch
    #[error("API error: {0}")]
    Api(#[from] steward_api::ApiError),
}

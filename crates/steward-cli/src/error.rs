//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] steward_pipeline::PipelineError),

    /// API error
    #[error("API error: {0}")]
    Api(#[from] steward_api::ApiError),

    /// Taxonomy error
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] steward_taxonomy::TaxonomyError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

//! Error types for the evaluation pipelines

use thiserror::Error;

/// Errors that can abort an evaluation run.
///
/// Individual candidates with missing metadata are not errors; they are
/// data-quality events, logged and counted by the stage that drops them.
/// Errors here are the fatal kind: bad configuration (raised before any
/// network activity) or an API failure, which halts the run without
/// partial-result checkpointing.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// API communication or response failure
    #[error("API error: {0}")]
    Api(#[from] steward_api::ApiError),

    /// Invalid configuration, detected before any network activity
    #[error("Configuration error: {0}")]
    Config(String),
}

//! Steward Pipeline Layer
//!
//! The candidate evaluation pipelines: a multi-stage filter chain winnows
//! randomly sampled candidates down to a recommendation set while tracking
//! exclusion reasons, then the surviving and excluded populations are
//! cross-referenced against the knowledge base to measure gender and
//! region representation.
//!
//! # Execution model
//!
//! Strictly single-threaded and sequential: batches run one after another
//! with a cooperative inter-batch pause, counters are only ever touched by
//! the control flow that owns them, and an API failure aborts the current
//! run. There is no retry and no partial-result checkpointing.

#![warn(missing_docs)]

pub mod annotate;
pub mod captions;
pub mod config;
pub mod demographics;
pub mod descriptions;
pub mod error;
pub mod filters;
pub mod summary;

pub use captions::CaptionEval;
pub use config::{EvalConfig, SAMPLE_LIMIT};
pub use demographics::RepresentationLedger;
pub use descriptions::DescriptionEval;
pub use error::PipelineError;
pub use summary::{CaptionSummary, DescriptionSummary};

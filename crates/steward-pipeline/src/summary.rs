//! Run summaries accumulated across sampling rounds
//!
//! These are plain data: rendering (funnel percentages, sorted tables,
//! `N/A` guards) happens in the CLI's output layer.

use crate::demographics::RepresentationLedger;
use steward_domain::CategoryCounter;

/// Accumulated results of a caption evaluation run
#[derive(Debug, Clone, Default)]
pub struct CaptionSummary {
    /// Target wiki language
    pub lang: String,

    /// Sampling rounds executed
    pub rounds: usize,

    /// Candidates sampled across all rounds
    pub candidates: u64,

    /// Candidates surviving the media-type and protection filters
    pub images: u64,

    /// Surviving images in use on at least one article
    pub in_use: u64,

    /// Final recommended images
    pub recommendations: u64,

    /// Recommended images in use on at least one article
    pub in_use_recommendations: u64,

    /// Caption status distribution over surviving images
    pub caption_status: CategoryCounter,

    /// Exclusion reasons across all filter stages
    pub exclusions: CategoryCounter,

    /// Distinct articles using candidate images
    pub candidate_article_count: u64,

    /// Distinct articles using recommended images
    pub recommended_article_count: u64,

    /// Gender and region representation counters
    pub demographics: RepresentationLedger,
}

/// Accumulated results of a description evaluation run
#[derive(Debug, Clone, Default)]
pub struct DescriptionSummary {
    /// Target wiki language
    pub lang: String,

    /// Sampling rounds executed
    pub rounds: usize,

    /// Candidates sampled across all rounds
    pub candidates: u64,

    /// Candidates surviving the eligibility filter
    pub eligible: u64,

    /// Final recommended items
    pub recommendations: u64,

    /// Exclusion reasons across all filter stages
    pub exclusions: CategoryCounter,

    /// Gender and region representation counters
    pub demographics: RepresentationLedger,
}

//! Caption evaluation driver
//!
//! Simulates the recommendation flow that proposes media files for
//! caption additions: sample random files, keep editable images, join
//! existing caption data, and recommend files without a target-language
//! caption. Each round is independent; counters accumulate across rounds.

use crate::annotate::{annotate_captions, media_entity_id};
use crate::config::{EvalConfig, SAMPLE_LIMIT};
use crate::demographics::{tally_article_demographics, title_key, RepresentationLedger};
use crate::error::PipelineError;
use crate::filters::{filter_existing_captions, filter_images, filter_protections};
use crate::summary::CaptionSummary;
use std::collections::{HashMap, HashSet};
use steward_api::{chunked, EntityRecord, RegionApi, WikiApi, MAX_BATCH_SIZE};
use steward_domain::MediaCandidate;
use tracing::{debug, info};

/// Runs the caption recommendation evaluation.
pub struct CaptionEval<W, R>
where
    W: WikiApi,
    R: RegionApi,
{
    commons: W,
    wikidata: W,
    regions: R,
    config: EvalConfig,
}

impl<W, R> CaptionEval<W, R>
where
    W: WikiApi,
    R: RegionApi,
{
    /// Create a caption evaluation over the given collaborators.
    ///
    /// Fails fast on invalid configuration, before any network activity.
    pub fn new(commons: W, wikidata: W, regions: R, config: EvalConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            commons,
            wikidata,
            regions,
            config,
        })
    }

    /// The configuration this evaluation runs with
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run all sampling rounds and aggregate demographics.
    pub async fn run(&self) -> Result<CaptionSummary, PipelineError> {
        let throttle = self.config.throttle();
        let usage_site = self.config.usage_site();

        let mut summary = CaptionSummary {
            lang: self.config.lang.clone(),
            rounds: self.config.rounds,
            ..Default::default()
        };
        let mut candidate_articles: HashSet<String> = HashSet::new();
        let mut recommended_articles: HashSet<String> = HashSet::new();

        for round in 1..=self.config.rounds {
            info!("round {}/{}: sampling", round, self.config.rounds);
            let pages = self.commons.sample_files(&usage_site, SAMPLE_LIMIT).await?;
            let sampled: Vec<MediaCandidate> = pages
                .into_iter()
                .map(|page| page.into_media_candidate())
                .collect();
            summary.candidates += sampled.len() as u64;

            if sampled.is_empty() {
                info!("round {}: no candidates sampled", round);
                throttle.pause().await;
                continue;
            }

            debug!("round {}: filtering {} candidates", round, sampled.len());
            let outcome = filter_images(sampled);
            summary.exclusions.merge(&outcome.excluded);
            let images = outcome.survivors;
            for image in &images {
                for title in &image.used_in {
                    candidate_articles.insert(title_key(title));
                }
            }

            let outcome = filter_protections(images);
            summary.exclusions.merge(&outcome.excluded);
            if outcome.removed() > 0 {
                info!("round {}: {} removed for page protections", round, outcome.removed());
            }
            let mut editable = outcome.survivors;
            summary.images += editable.len() as u64;
            summary.in_use += editable.iter().filter(|c| c.is_in_use()).count() as u64;

            if !editable.is_empty() {
                debug!("round {}: annotating {} images", round, editable.len());
                let ids: Vec<String> = editable
                    .iter()
                    .map(|candidate| media_entity_id(candidate.page_id))
                    .collect();
                let mut entities: HashMap<String, EntityRecord> = HashMap::new();
                for (index, chunk) in chunked(&ids, MAX_BATCH_SIZE).enumerate() {
                    if index > 0 {
                        throttle.pause().await;
                    }
                    entities.extend(self.commons.entity_labels(chunk).await?);
                }
                annotate_captions(
                    &mut editable,
                    &entities,
                    &self.config.lang,
                    &mut summary.caption_status,
                );
            }

            let outcome = filter_existing_captions(editable);
            summary.exclusions.merge(&outcome.excluded);
            let recommendations = outcome.survivors;
            summary.recommendations += recommendations.len() as u64;
            for recommendation in &recommendations {
                if recommendation.is_in_use() {
                    summary.in_use_recommendations += 1;
                    for title in &recommendation.used_in {
                        recommended_articles.insert(title_key(title));
                    }
                }
            }

            throttle.pause().await;
        }

        info!(
            "aggregating demographics for {} candidate articles ({} recommended)",
            candidate_articles.len(),
            recommended_articles.len()
        );
        let mut demographics = RepresentationLedger::default();
        tally_article_demographics(
            &self.wikidata,
            &self.regions,
            &usage_site,
            &candidate_articles,
            &recommended_articles,
            &throttle,
            &mut demographics,
        )
        .await?;

        summary.candidate_article_count = candidate_articles.len() as u64;
        summary.recommended_article_count = recommended_articles.len() as u64;
        summary.demographics = demographics;

        info!(
            "caption evaluation complete: {} candidates, {} images, {} recommendations",
            summary.candidates, summary.images, summary.recommendations
        );
        Ok(summary)
    }
}

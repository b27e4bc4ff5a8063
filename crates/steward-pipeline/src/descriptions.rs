//! Description evaluation driver
//!
//! Simulates the recommendation flow that proposes knowledge-base items
//! for description additions: sample random articles, record gender and
//! region data for the whole candidate set, filter to eligible items,
//! join item protection state, and recommend unprotected items.
//!
//! The demographic annotation runs before any filtering: the recommended
//! counters are later fed from values recorded here, which keeps them a
//! strict subset of the candidate counters.

use crate::config::{EvalConfig, SAMPLE_LIMIT};
use crate::demographics::{
    annotate_genders, annotate_regions, tally_recommended, RepresentationLedger,
};
use crate::error::PipelineError;
use crate::filters::{filter_eligible_articles, filter_protected_items};
use crate::summary::DescriptionSummary;
use std::collections::HashMap;
use steward_api::{chunked, RegionApi, WikiApi, MAX_BATCH_SIZE};
use steward_domain::ArticleCandidate;
use tracing::{debug, info, warn};

/// Runs the description recommendation evaluation.
pub struct DescriptionEval<W, R>
where
    W: WikiApi,
    R: RegionApi,
{
    wiki: W,
    wikidata: W,
    regions: R,
    config: EvalConfig,
}

impl<W, R> DescriptionEval<W, R>
where
    W: WikiApi,
    R: RegionApi,
{
    /// Create a description evaluation over the given collaborators.
    ///
    /// Fails fast on invalid configuration, before any network activity.
    pub fn new(wiki: W, wikidata: W, regions: R, config: EvalConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            wiki,
            wikidata,
            regions,
            config,
        })
    }

    /// The configuration this evaluation runs with
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run all sampling rounds.
    pub async fn run(&self) -> Result<DescriptionSummary, PipelineError> {
        let throttle = self.config.throttle();

        let mut summary = DescriptionSummary {
            lang: self.config.lang.clone(),
            rounds: self.config.rounds,
            ..Default::default()
        };
        let mut ledger = RepresentationLedger::default();

        for round in 1..=self.config.rounds {
            info!("round {}/{}: sampling", round, self.config.rounds);
            let pages = self.wiki.sample_articles(SAMPLE_LIMIT).await?;
            let mut sampled: Vec<ArticleCandidate> = pages
                .into_iter()
                .map(|page| page.into_article_candidate())
                .collect();
            summary.candidates += sampled.len() as u64;

            if sampled.is_empty() {
                info!("round {}: no candidates sampled", round);
                throttle.pause().await;
                continue;
            }

            debug!("round {}: annotating {} candidates", round, sampled.len());
            annotate_genders(
                &self.wikidata,
                &mut sampled,
                &mut ledger.candidate_gender,
                &throttle,
            )
            .await?;
            annotate_regions(
                &self.regions,
                &mut sampled,
                &mut ledger.candidate_regions,
                &throttle,
            )
            .await?;

            debug!("round {}: filtering {} candidates", round, sampled.len());
            let outcome = filter_eligible_articles(sampled);
            summary.exclusions.merge(&outcome.excluded);
            let mut items = outcome.survivors;
            summary.eligible += items.len() as u64;

            if !items.is_empty() {
                self.join_item_protection(&mut items, &throttle).await?;
            }

            let outcome = filter_protected_items(items);
            summary.exclusions.merge(&outcome.excluded);
            let recommendations = outcome.survivors;
            summary.recommendations += recommendations.len() as u64;

            debug!(
                "round {}: aggregating {} recommendations",
                round,
                recommendations.len()
            );
            tally_recommended(&recommendations, &mut ledger);
            throttle.pause().await;
        }

        summary.demographics = ledger;
        info!(
            "description evaluation complete: {} candidates, {} eligible, {} recommendations",
            summary.candidates, summary.eligible, summary.recommendations
        );
        Ok(summary)
    }

    /// Join the protection state of each item's knowledge-base page.
    ///
    /// Items absent from the join response keep `item_protection == None`
    /// and are dropped (with a log line) by the next filter stage.
    async fn join_item_protection(
        &self,
        items: &mut [ArticleCandidate],
        throttle: &steward_api::Throttle,
    ) -> Result<(), PipelineError> {
        let qids: Vec<String> = items
            .iter()
            .filter_map(|item| item.item_id().map(String::from))
            .collect();

        let mut protection: HashMap<String, Option<Vec<String>>> = HashMap::new();
        for (index, chunk) in chunked(&qids, MAX_BATCH_SIZE).enumerate() {
            if index > 0 {
                throttle.pause().await;
            }
            for page in self.wikidata.page_protection(chunk).await? {
                protection.insert(page.title.clone(), page.protection_summaries());
            }
        }

        for item in items.iter_mut() {
            let qid = match item.item_id() {
                Some(qid) => qid.to_string(),
                None => continue,
            };
            match protection.get(&qid) {
                Some(Some(constraints)) => item.item_protection = Some(constraints.clone()),
                Some(None) => {
                    // Fail-closed: the page came back without a protection
                    // block, so the item stays unresolved
                    warn!("item {} returned without protection metadata", qid);
                }
                None => warn!("no page found for item {} in protection join", qid),
            }
        }
        Ok(())
    }
}

//! Demographic and geographic aggregation
//!
//! Resolves articles/items against the knowledge base and the region
//! service, and maintains two parallel counter sets: one over the full
//! candidate population, one restricted to the recommended population.
//! Recommended counts only ever come from identifiers already counted as
//! candidates, so recommended ≤ candidate holds per category by
//! construction.
//!
//! Gender is only derived for humans and never inferred: an item is human
//! iff any instance-of claim points at the human entity, and its gender is
//! the first sex/gender claim as ordered by the API. Region memberships
//! are not mutually exclusive: an item in two regions increments both.

use crate::error::PipelineError;
use std::collections::{HashMap, HashSet};
use steward_api::{chunked, EntityRecord, RegionApi, Throttle, WikiApi, MAX_BATCH_SIZE};
use steward_domain::{ArticleCandidate, CategoryCounter};
use tracing::warn;

/// Knowledge-base id of the human entity
pub const HUMAN_ITEM: &str = "Q5";

/// Property id of "instance of" claims
pub const INSTANCE_OF_PROPERTY: &str = "P31";

/// Property id of "sex or gender" claims
pub const GENDER_PROPERTY: &str = "P21";

/// Counter key for the humans total (humans without a recorded gender
/// count here but under no gender code)
pub const KEY_HUMANS: &str = "humans";

/// Counter key for the total of items with at least one region
pub const KEY_REGIONS: &str = "regions";

/// Human-readable label for a gender code; unknown codes render as-is
pub fn gender_label(code: &str) -> &str {
    match code {
        "Q6581097" => "Man",
        "Q6581072" => "Woman",
        other => other,
    }
}

/// Canonical set key for an article title (spaces become underscores)
pub fn title_key(title: &str) -> String {
    title.replace(' ', "_")
}

/// Human/gender classification of one knowledge-base item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanClassification {
    /// Whether any instance-of claim points at the human entity
    pub is_human: bool,

    /// First sex/gender claim value; only derived for humans
    pub gender: Option<String>,
}

/// Classify an entity from its claims.
///
/// Multiple instance-of values: human if any matches, first match wins.
/// Multiple gender claims: only the first (API ordering) is used, with no
/// voting or conflict resolution.
pub fn classify_human(entity: &EntityRecord) -> HumanClassification {
    let is_human = entity
        .claims_for(INSTANCE_OF_PROPERTY)
        .iter()
        .any(|claim| claim.target_id() == Some(HUMAN_ITEM));

    let gender = if is_human {
        entity
            .claims_for(GENDER_PROPERTY)
            .first()
            .and_then(|claim| claim.target_id())
            .map(String::from)
    } else {
        None
    };

    HumanClassification { is_human, gender }
}

/// Parallel candidate/recommended counter sets for gender and region
#[derive(Debug, Clone, Default)]
pub struct RepresentationLedger {
    /// Gender counts over the full candidate population
    pub candidate_gender: CategoryCounter,

    /// Region counts over the full candidate population
    pub candidate_regions: CategoryCounter,

    /// Gender counts restricted to the recommended population
    pub recommended_gender: CategoryCounter,

    /// Region counts restricted to the recommended population
    pub recommended_regions: CategoryCounter,
}

/// Annotate article candidates with human/gender data from their linked
/// items and tally the candidate population.
///
/// Candidates without a linked item, and items the response omitted, are
/// logged and left unannotated; they simply contribute nothing.
pub async fn annotate_genders<W: WikiApi>(
    wikidata: &W,
    candidates: &mut [ArticleCandidate],
    counter: &mut CategoryCounter,
    throttle: &Throttle,
) -> Result<(), PipelineError> {
    let ids: Vec<String> = candidates
        .iter()
        .filter_map(|c| c.item_id().map(String::from))
        .collect();

    let mut entities: HashMap<String, EntityRecord> = HashMap::new();
    for (index, chunk) in chunked(&ids, MAX_BATCH_SIZE).enumerate() {
        if index > 0 {
            throttle.pause().await;
        }
        entities.extend(wikidata.entity_claims(chunk).await?);
    }

    for candidate in candidates.iter_mut() {
        let qid = match candidate.item_id() {
            Some(qid) => qid.to_string(),
            None => continue,
        };
        match entities.get(&qid) {
            None => warn!("missing from gender data: {} ({})", candidate.title, qid),
            Some(entity) => {
                let classification = classify_human(entity);
                if classification.is_human {
                    candidate.is_human = true;
                    counter.increment(KEY_HUMANS);
                    if let Some(code) = classification.gender {
                        counter.increment(code.clone());
                        candidate.gender = Some(code);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Annotate article candidates with region memberships and tally the
/// candidate population.
pub async fn annotate_regions<R: RegionApi>(
    region_api: &R,
    candidates: &mut [ArticleCandidate],
    counter: &mut CategoryCounter,
    throttle: &Throttle,
) -> Result<(), PipelineError> {
    let ids: Vec<String> = candidates
        .iter()
        .filter_map(|c| c.item_id().map(String::from))
        .collect();

    let mut memberships: HashMap<String, Vec<String>> = HashMap::new();
    for (index, chunk) in chunked(&ids, MAX_BATCH_SIZE).enumerate() {
        if index > 0 {
            throttle.pause().await;
        }
        for record in region_api.regions_for(chunk).await? {
            if !record.regions.is_empty() {
                memberships.insert(record.qid, record.regions);
            }
        }
    }

    for candidate in candidates.iter_mut() {
        let qid = match candidate.item_id() {
            Some(qid) => qid.to_string(),
            None => continue,
        };
        if let Some(regions) = memberships.get(&qid) {
            candidate.regions = regions.clone();
            counter.increment(KEY_REGIONS);
            for region in regions {
                counter.increment(region.clone());
            }
        }
    }
    Ok(())
}

/// Tally the recommended population from values recorded during the
/// candidate pass.
///
/// Using only previously recorded annotations is what enforces the subset
/// invariant: a category can appear here only if the same item already
/// counted toward the candidate population.
pub fn tally_recommended(recommended: &[ArticleCandidate], ledger: &mut RepresentationLedger) {
    for item in recommended {
        if item.is_human {
            ledger.recommended_gender.increment(KEY_HUMANS);
            if let Some(code) = &item.gender {
                ledger.recommended_gender.increment(code.clone());
            }
        }
        if !item.regions.is_empty() {
            ledger.recommended_regions.increment(KEY_REGIONS);
            for region in &item.regions {
                ledger.recommended_regions.increment(region.clone());
            }
        }
    }
}

/// Resolve article titles to knowledge-base items and tally gender and
/// region representation for the candidate population, and for the
/// recommended subset of it.
///
/// Used by the caption pipeline, where populations are keyed by the
/// article titles that use a file. `recommended_articles` must be a
/// subset of `candidate_articles` (it is, by construction: recommended
/// files survive from the candidate set).
pub async fn tally_article_demographics<W: WikiApi, R: RegionApi>(
    wikidata: &W,
    region_api: &R,
    usage_site: &str,
    candidate_articles: &HashSet<String>,
    recommended_articles: &HashSet<String>,
    throttle: &Throttle,
    ledger: &mut RepresentationLedger,
) -> Result<(), PipelineError> {
    let mut titles: Vec<String> = candidate_articles.iter().cloned().collect();
    titles.sort();

    for (index, chunk) in chunked(&titles, MAX_BATCH_SIZE).enumerate() {
        if index > 0 {
            throttle.pause().await;
        }
        let entities = wikidata.entities_for_titles(usage_site, chunk).await?;

        // (item id, counted toward the recommended population)
        let mut chunk_items: Vec<(String, bool)> = Vec::new();
        for (id, entity) in &entities {
            if entity.is_missing() {
                warn!("entity {} reported missing in demographic lookup", id);
                continue;
            }
            let title = match entity.sitelink_title(usage_site) {
                Some(title) => title,
                None => {
                    warn!("entity {} carries no {} sitelink", id, usage_site);
                    continue;
                }
            };
            let recommended = recommended_articles.contains(&title_key(title));

            let classification = classify_human(entity);
            if classification.is_human {
                ledger.candidate_gender.increment(KEY_HUMANS);
                if recommended {
                    ledger.recommended_gender.increment(KEY_HUMANS);
                }
                if let Some(code) = classification.gender {
                    ledger.candidate_gender.increment(code.clone());
                    if recommended {
                        ledger.recommended_gender.increment(code);
                    }
                }
            }
            chunk_items.push((id.clone(), recommended));
        }

        if chunk_items.is_empty() {
            continue;
        }

        let ids: Vec<String> = chunk_items.iter().map(|(id, _)| id.clone()).collect();
        throttle.pause().await;
        let mut memberships: HashMap<String, Vec<String>> = HashMap::new();
        for record in region_api.regions_for(&ids).await? {
            if !record.regions.is_empty() {
                memberships.insert(record.qid, record.regions);
            }
        }
        for (id, recommended) in chunk_items {
            if let Some(regions) = memberships.get(&id) {
                ledger.candidate_regions.increment(KEY_REGIONS);
                if recommended {
                    ledger.recommended_regions.increment(KEY_REGIONS);
                }
                for region in regions {
                    ledger.candidate_regions.increment(region.clone());
                    if recommended {
                        ledger.recommended_regions.increment(region.clone());
                    }
                }
            }
        }
    }
    Ok(())
}

//! Steward API Layer
//!
//! HTTP collaborators for the evaluation pipelines: a wiki action-API
//! client, the region lookup client, and the chunked batch requester with
//! its throttle. The pipelines depend on the [`WikiApi`] and [`RegionApi`]
//! traits so tests can run against the in-memory mocks exported here.
//!
//! # Failure model
//!
//! No retries anywhere: a network failure or malformed response surfaces
//! as an [`ApiError`] and halts the current run. Identifiers absent from a
//! batch response are a caller-level concern (they signal a soft API
//! fault, distinct from an explicit not-found).

#![warn(missing_docs)]

pub mod batch;
pub mod mediawiki;
pub mod region;
pub mod types;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use batch::{chunked, Throttle, DEFAULT_BATCH_DELAY_SECS, MAX_BATCH_SIZE};
pub use mediawiki::MwClient;
pub use region::RegionClient;
pub use types::{EntityRecord, PageRecord, RegionRecord};

/// Errors that can occur while talking to the wiki or region services
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or transport error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code returned by the server
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Response body could not be parsed or was structurally invalid
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A batch exceeded the API's per-call limit
    #[error("Batch of {size} ids exceeds the API limit of {MAX_BATCH_SIZE}")]
    BatchTooLarge {
        /// Size of the offending batch
        size: usize,
    },
}

/// Wiki action-API operations used by the pipelines.
///
/// Implemented by [`MwClient`] over HTTP and by [`MockWikiApi`] in memory.
#[allow(async_fn_in_trait)]
pub trait WikiApi {
    /// Sample random files with media info, usage and protection state
    async fn sample_files(
        &self,
        usage_site: &str,
        limit: usize,
    ) -> Result<Vec<PageRecord>, ApiError>;

    /// Sample random articles with page properties and protection state
    async fn sample_articles(&self, limit: usize) -> Result<Vec<PageRecord>, ApiError>;

    /// Fetch entity labels for ≤50 entity ids
    async fn entity_labels(&self, ids: &[String])
        -> Result<HashMap<String, EntityRecord>, ApiError>;

    /// Fetch entity claims for ≤50 entity ids
    async fn entity_claims(&self, ids: &[String])
        -> Result<HashMap<String, EntityRecord>, ApiError>;

    /// Fetch entity sitelinks for ≤50 entity ids
    async fn entity_sitelinks(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError>;

    /// Resolve ≤50 page titles on `site` to entities with claims and
    /// sitelinks
    async fn entities_for_titles(
        &self,
        site: &str,
        titles: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError>;

    /// Fetch protection state for ≤50 page titles
    async fn page_protection(&self, titles: &[String]) -> Result<Vec<PageRecord>, ApiError>;
}

/// Region lookup operations used by the aggregator.
#[allow(async_fn_in_trait)]
pub trait RegionApi {
    /// Look up region memberships for ≤50 item ids.
    ///
    /// Items with no region are absent from the result, per the service
    /// contract.
    async fn regions_for(&self, ids: &[String]) -> Result<Vec<RegionRecord>, ApiError>;
}

fn title_key(title: &str) -> String {
    title.replace(' ', "_")
}

/// In-memory wiki API for deterministic testing.
///
/// Sampling pops pre-loaded pages round by round; entity lookups answer
/// from a fixture map, omitting unknown ids exactly like the real API
/// omits identifiers it failed to include.
#[derive(Debug, Clone, Default)]
pub struct MockWikiApi {
    samples: Arc<Mutex<VecDeque<Vec<PageRecord>>>>,
    entities: Arc<Mutex<HashMap<String, EntityRecord>>>,
    protection_pages: Arc<Mutex<HashMap<String, PageRecord>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockWikiApi {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one sampling round's worth of pages
    pub fn push_sample(&self, pages: Vec<PageRecord>) {
        self.samples.lock().unwrap().push_back(pages);
    }

    /// Register an entity under its id
    pub fn insert_entity(&self, id: impl Into<String>, entity: EntityRecord) {
        self.entities.lock().unwrap().insert(id.into(), entity);
    }

    /// Register a page record answered by protection lookups, keyed by title
    pub fn insert_protection_page(&self, page: PageRecord) {
        self.protection_pages
            .lock()
            .unwrap()
            .insert(page.title.clone(), page);
    }

    /// Number of API calls made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn record_call(&self) {
        *self.call_count.lock().unwrap() += 1;
    }

    fn entities_by_ids(&self, ids: &[String]) -> HashMap<String, EntityRecord> {
        let entities = self.entities.lock().unwrap();
        ids.iter()
            .filter_map(|id| entities.get(id).map(|e| (id.clone(), e.clone())))
            .collect()
    }
}

impl WikiApi for MockWikiApi {
    async fn sample_files(
        &self,
        _usage_site: &str,
        _limit: usize,
    ) -> Result<Vec<PageRecord>, ApiError> {
        self.record_call();
        Ok(self.samples.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn sample_articles(&self, _limit: usize) -> Result<Vec<PageRecord>, ApiError> {
        self.record_call();
        Ok(self.samples.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn entity_labels(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        self.record_call();
        Ok(self.entities_by_ids(ids))
    }

    async fn entity_claims(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        self.record_call();
        Ok(self.entities_by_ids(ids))
    }

    async fn entity_sitelinks(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        self.record_call();
        Ok(self.entities_by_ids(ids))
    }

    async fn entities_for_titles(
        &self,
        site: &str,
        titles: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        self.record_call();
        let wanted: Vec<String> = titles.iter().map(|t| title_key(t)).collect();
        let entities = self.entities.lock().unwrap();
        Ok(entities
            .iter()
            .filter(|(_, entity)| {
                entity
                    .sitelink_title(site)
                    .map(|title| wanted.contains(&title_key(title)))
                    .unwrap_or(false)
            })
            .map(|(id, entity)| (id.clone(), entity.clone()))
            .collect())
    }

    async fn page_protection(&self, titles: &[String]) -> Result<Vec<PageRecord>, ApiError> {
        self.record_call();
        let pages = self.protection_pages.lock().unwrap();
        Ok(titles
            .iter()
            .filter_map(|title| pages.get(title).cloned())
            .collect())
    }
}

/// In-memory region service for deterministic testing.
#[derive(Debug, Clone, Default)]
pub struct MockRegionApi {
    regions: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl MockRegionApi {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Register region memberships for an item
    pub fn insert_regions(&self, id: impl Into<String>, regions: Vec<String>) {
        self.regions.lock().unwrap().insert(id.into(), regions);
    }
}

impl RegionApi for MockRegionApi {
    async fn regions_for(&self, ids: &[String]) -> Result<Vec<RegionRecord>, ApiError> {
        let regions = self.regions.lock().unwrap();
        // Items without regions are absent from the response, per contract
        Ok(ids
            .iter()
            .filter_map(|id| {
                regions.get(id).filter(|r| !r.is_empty()).map(|r| RegionRecord {
                    qid: id.clone(),
                    regions: r.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sampling_pops_rounds_in_order() {
        let mock = MockWikiApi::new();
        mock.push_sample(vec![PageRecord {
            pageid: Some(1),
            title: "File:A.jpg".to_string(),
            ..Default::default()
        }]);
        mock.push_sample(vec![]);

        let first = mock.sample_files("enwiki", 50).await.unwrap();
        assert_eq!(first.len(), 1);
        let second = mock.sample_files("enwiki", 50).await.unwrap();
        assert!(second.is_empty());
        // Exhausted queue keeps returning empty pages
        let third = mock.sample_files("enwiki", 50).await.unwrap();
        assert!(third.is_empty());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_entity_lookup_omits_unknown_ids() {
        let mock = MockWikiApi::new();
        mock.insert_entity(
            "M1",
            EntityRecord {
                id: Some("M1".to_string()),
                ..Default::default()
            },
        );

        let ids = vec!["M1".to_string(), "M2".to_string()];
        let entities = mock.entity_labels(&ids).await.unwrap();
        assert!(entities.contains_key("M1"));
        // M2 is simply absent, like an API-layer omission
        assert!(!entities.contains_key("M2"));
    }

    #[tokio::test]
    async fn test_mock_titles_resolution_matches_sitelinks() {
        let mock = MockWikiApi::new();
        let entity: EntityRecord = serde_json::from_str(
            r#"{
                "id": "Q7",
                "sitelinks": {"enwiki": {"site": "enwiki", "title": "Ada Lovelace"}}
            }"#,
        )
        .unwrap();
        mock.insert_entity("Q7", entity);

        let titles = vec!["Ada_Lovelace".to_string()];
        let entities = mock.entities_for_titles("enwiki", &titles).await.unwrap();
        assert!(entities.contains_key("Q7"));

        let miss = mock
            .entities_for_titles("enwiki", &["Unrelated".to_string()])
            .await
            .unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn test_mock_regions_skip_items_without_membership() {
        let mock = MockRegionApi::new();
        mock.insert_regions("Q1", vec!["Europe".to_string(), "Asia".to_string()]);
        mock.insert_regions("Q2", vec![]);

        let ids = vec!["Q1".to_string(), "Q2".to_string(), "Q3".to_string()];
        let records = mock.regions_for(&ids).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].qid, "Q1");
        assert_eq!(records[0].regions.len(), 2);
    }
}

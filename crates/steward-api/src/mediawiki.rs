//! Wiki action-API client
//!
//! Thin async client over a MediaWiki-compatible `api.php` endpoint.
//! All calls are blocking from the pipeline's point of view (sequential
//! awaits); nothing here retries, and a failed request propagates to the
//! caller and halts the current run.

use crate::batch::MAX_BATCH_SIZE;
use crate::types::{EntitiesResponse, EntityRecord, PageRecord, QueryResponse};
use crate::{ApiError, WikiApi};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Default timeout for API requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for one wiki's action API (e.g. the media commons, the
/// knowledge base, or a language wiki).
pub struct MwClient {
    endpoint: String,
    client: reqwest::Client,
}

impl MwClient {
    /// Create a client for the wiki at `endpoint` (scheme + host, without
    /// the `/w/api.php` path), identifying as `user_agent`.
    pub fn new(endpoint: impl Into<String>, user_agent: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.into())
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The wiki endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, ApiError> {
        let url = format!("{}/w/api.php", self.endpoint);
        debug!("GET {} ({} params)", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn query_pages(&self, params: &[(&str, &str)]) -> Result<Vec<PageRecord>, ApiError> {
        let response: QueryResponse = self.get(params).await?;
        Ok(response.query.map(|body| body.pages).unwrap_or_default())
    }

    async fn get_entities(
        &self,
        params: &[(&str, &str)],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        let response: EntitiesResponse = self.get(params).await?;
        response
            .entities
            .ok_or_else(|| ApiError::InvalidResponse("response carried no entities".to_string()))
    }

    fn check_batch(len: usize) -> Result<(), ApiError> {
        if len > MAX_BATCH_SIZE {
            return Err(ApiError::BatchTooLarge { size: len });
        }
        Ok(())
    }
}

impl WikiApi for MwClient {
    /// Sample a page of random files with media info, usage locations and
    /// protection state included.
    async fn sample_files(
        &self,
        usage_site: &str,
        limit: usize,
    ) -> Result<Vec<PageRecord>, ApiError> {
        let limit = limit.to_string();
        self.query_pages(&[
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("generator", "random"),
            ("redirects", ""),
            ("grnnamespace", "6"),
            ("grnlimit", &limit),
            ("prop", "imageinfo|globalusage|info"),
            ("inprop", "protection"),
            ("iiprop", "timestamp|user|url|mime"),
            ("iiurlwidth", "320"),
            ("iilocalonly", ""),
            ("gunamespace", "0"),
            ("guprop", "pageid"),
            ("gusite", usage_site),
        ])
        .await
    }

    /// Sample a page of random articles with page properties, central
    /// description and protection state included.
    async fn sample_articles(&self, limit: usize) -> Result<Vec<PageRecord>, ApiError> {
        let limit = limit.to_string();
        self.query_pages(&[
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("generator", "random"),
            ("redirects", "1"),
            ("grnnamespace", "0"),
            ("grnlimit", &limit),
            ("prop", "pageprops|description|info"),
            ("inprop", "protection"),
        ])
        .await
    }

    /// Fetch entity labels for a batch of ≤50 entity ids.
    async fn entity_labels(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        Self::check_batch(ids.len())?;
        let ids = ids.join("|");
        self.get_entities(&[
            ("action", "wbgetentities"),
            ("format", "json"),
            ("formatversion", "2"),
            ("props", "labels"),
            ("ids", &ids),
        ])
        .await
    }

    /// Fetch entity claims for a batch of ≤50 entity ids.
    async fn entity_claims(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        Self::check_batch(ids.len())?;
        let ids = ids.join("|");
        self.get_entities(&[
            ("action", "wbgetentities"),
            ("format", "json"),
            ("formatversion", "2"),
            ("props", "claims"),
            ("ids", &ids),
        ])
        .await
    }

    /// Fetch entity sitelinks for a batch of ≤50 entity ids.
    async fn entity_sitelinks(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        Self::check_batch(ids.len())?;
        let ids = ids.join("|");
        self.get_entities(&[
            ("action", "wbgetentities"),
            ("format", "json"),
            ("formatversion", "2"),
            ("props", "sitelinks"),
            ("ids", &ids),
        ])
        .await
    }

    /// Resolve a batch of ≤50 page titles on `site` to entities with
    /// claims and sitelinks.
    async fn entities_for_titles(
        &self,
        site: &str,
        titles: &[String],
    ) -> Result<HashMap<String, EntityRecord>, ApiError> {
        Self::check_batch(titles.len())?;
        let titles = titles.join("|");
        self.get_entities(&[
            ("action", "wbgetentities"),
            ("format", "json"),
            ("formatversion", "2"),
            ("props", "claims|sitelinks"),
            ("sites", site),
            ("titles", &titles),
        ])
        .await
    }

    /// Fetch protection state for a batch of ≤50 page titles.
    async fn page_protection(&self, titles: &[String]) -> Result<Vec<PageRecord>, ApiError> {
        Self::check_batch(titles.len())?;
        let titles = titles.join("|");
        self.query_pages(&[
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("prop", "info"),
            ("inprop", "protection"),
            ("titles", &titles),
        ])
        .await
    }
}

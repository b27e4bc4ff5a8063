//! Region lookup client
//!
//! Queries the external region service that maps knowledge-base items to
//! geographic region memberships. Items without any region are absent
//! from the response.

use crate::batch::MAX_BATCH_SIZE;
use crate::types::RegionRecord;
use crate::{ApiError, RegionApi};
use std::time::Duration;
use tracing::debug;

/// Default region service endpoint
pub const DEFAULT_REGION_ENDPOINT: &str = "https://wiki-region.wmcloud.org/api/v1/region";

/// Client for the region lookup service.
pub struct RegionClient {
    endpoint: String,
    client: reqwest::Client,
}

impl RegionClient {
    /// Create a client for the region service at `endpoint`.
    pub fn new(endpoint: impl Into<String>, user_agent: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.into())
            .timeout(Duration::from_secs(crate::mediawiki::DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Create a client for the default endpoint.
    pub fn default_endpoint(user_agent: impl Into<String>) -> Self {
        Self::new(DEFAULT_REGION_ENDPOINT, user_agent)
    }
}

impl RegionApi for RegionClient {
    /// Look up region memberships for a batch of ≤50 item ids.
    async fn regions_for(&self, ids: &[String]) -> Result<Vec<RegionRecord>, ApiError> {
        if ids.len() > MAX_BATCH_SIZE {
            return Err(ApiError::BatchTooLarge { size: ids.len() });
        }
        let qid = ids.join("|");
        debug!("GET {} for {} ids", self.endpoint, ids.len());

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("qid", qid.as_str())])
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
            .json::<Vec<RegionRecord>>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

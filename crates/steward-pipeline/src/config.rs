//! Configuration for the evaluation pipelines

use serde::{Deserialize, Serialize};
use std::time::Duration;
use steward_api::Throttle;

/// Candidates sampled per round, fixed by the wiki API's page size
pub const SAMPLE_LIMIT: usize = 50;

/// Configuration for an evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Target wiki language (e.g. `en`, `ar`)
    pub lang: String,

    /// Number of sampling rounds; each round draws `SAMPLE_LIMIT` candidates
    pub rounds: usize,

    /// Media commons endpoint (scheme + host)
    pub commons_endpoint: String,

    /// Knowledge-base endpoint (scheme + host)
    pub wikidata_endpoint: String,

    /// Region lookup service endpoint (full URL)
    pub region_endpoint: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Pause between successive batch requests (seconds)
    pub batch_delay_secs: u64,
}

impl EvalConfig {
    /// Endpoint of the target-language wiki
    pub fn wikipedia_endpoint(&self) -> String {
        format!("https://{}.wikipedia.org", self.lang)
    }

    /// Site id of the target wiki as used in sitelinks (e.g. `enwiki`)
    pub fn usage_site(&self) -> String {
        format!("{}wiki", self.lang)
    }

    /// Inter-batch delay as a Duration
    pub fn batch_delay(&self) -> Duration {
        Duration::from_secs(self.batch_delay_secs)
    }

    /// Throttle configured with the inter-batch delay
    pub fn throttle(&self) -> Throttle {
        Throttle::new(self.batch_delay())
    }

    /// Validate the configuration.
    ///
    /// Called before any network activity; a violation here is fatal.
    pub fn validate(&self) -> Result<(), String> {
        if self.rounds == 0 {
            return Err("rounds must be greater than 0".to_string());
        }
        if self.lang.is_empty() || !self.lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(format!("invalid language code: {:?}", self.lang));
        }
        if self.commons_endpoint.is_empty()
            || self.wikidata_endpoint.is_empty()
            || self.region_endpoint.is_empty()
        {
            return Err("endpoints must not be empty".to_string());
        }
        if self.user_agent.is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            rounds: 1,
            commons_endpoint: "https://commons.wikimedia.org".to_string(),
            wikidata_endpoint: "https://www.wikidata.org".to_string(),
            region_endpoint: steward_api::region::DEFAULT_REGION_ENDPOINT.to_string(),
            user_agent: "steward-eval/0.1 (https://github.com/your-org/steward)".to_string(),
            batch_delay_secs: steward_api::DEFAULT_BATCH_DELAY_SECS,
        }
    }
}

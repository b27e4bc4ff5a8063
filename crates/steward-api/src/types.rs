//! Wire types for the wiki action API and the region lookup service
//!
//! These mirror the JSON shapes returned with `formatversion=2`. Fields the
//! API may omit are `Option` so that omission survives deserialization;
//! the filter chain needs "metadata missing" as a first-class state.

use serde::Deserialize;
use std::collections::HashMap;
use steward_domain::{ArticleCandidate, MediaCandidate, PageProps};

/// Top-level envelope of an `action=query` response
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    /// Query payload; absent on empty generator results
    pub query: Option<QueryPages>,
}

/// The `query` body of an `action=query` response
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPages {
    /// Page records returned by the generator or title lookup
    #[serde(default)]
    pub pages: Vec<PageRecord>,
}

/// One page record from an `action=query` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRecord {
    /// Page id; absent for unresolvable titles
    pub pageid: Option<u64>,

    /// Page title
    #[serde(default)]
    pub title: String,

    /// Media info records (`prop=imageinfo`); absent when not requested
    /// or when the file has no media info
    pub imageinfo: Option<Vec<ImageInfo>>,

    /// Usage locations on other wikis (`prop=globalusage`)
    pub globalusage: Option<Vec<GlobalUsage>>,

    /// Protection constraints (`inprop=protection`); absent when the API
    /// dropped the block, empty when the page is unprotected
    pub protection: Option<Vec<ProtectionEntry>>,

    /// Page properties (`prop=pageprops`); absent when the page has none
    pub pageprops: Option<PagePropsRecord>,

    /// Central description (`prop=description`)
    pub description: Option<String>,
}

/// One media-info record
#[derive(Debug, Clone, Deserialize)]
pub struct ImageInfo {
    /// MIME type of the file
    pub mime: Option<String>,

    /// Upload timestamp
    pub timestamp: Option<String>,

    /// Uploading user
    pub user: Option<String>,

    /// Direct file URL
    pub url: Option<String>,
}

/// One usage location of a media file
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalUsage {
    /// Title of the page using the file
    pub title: String,

    /// Wiki hosting that page
    pub wiki: Option<String>,
}

/// One page-protection constraint
#[derive(Debug, Clone, Deserialize)]
pub struct ProtectionEntry {
    /// Protected action (e.g. `edit`, `move`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Required user level (e.g. `sysop`)
    pub level: String,

    /// Expiry timestamp or `infinity`
    pub expiry: Option<String>,
}

impl ProtectionEntry {
    /// Compact `action=level` form used in candidate records and logs
    pub fn summary(&self) -> String {
        format!("{}={}", self.kind, self.level)
    }
}

/// Page properties relevant to description recommendations
#[derive(Debug, Clone, Deserialize)]
pub struct PagePropsRecord {
    /// Present (as an empty string) when the page is a disambiguation page
    pub disambiguation: Option<String>,

    /// Linked knowledge-base item id
    pub wikibase_item: Option<String>,
}

impl PageRecord {
    /// Protection constraints as `action=level` summaries, preserving the
    /// present/absent distinction
    pub fn protection_summaries(&self) -> Option<Vec<String>> {
        self.protection
            .as_ref()
            .map(|entries| entries.iter().map(ProtectionEntry::summary).collect())
    }

    /// Convert into a media candidate for the caption pipeline
    pub fn into_media_candidate(self) -> MediaCandidate {
        let protection = self.protection_summaries();
        let mime = self
            .imageinfo
            .as_ref()
            .and_then(|infos| infos.first())
            .and_then(|info| info.mime.clone());
        let used_in = self
            .globalusage
            .unwrap_or_default()
            .into_iter()
            .map(|usage| usage.title)
            .collect();

        MediaCandidate {
            page_id: self.pageid.unwrap_or(0),
            title: self.title,
            mime,
            protection,
            used_in,
            caption: None,
        }
    }

    /// Convert into an article candidate for the description pipeline
    pub fn into_article_candidate(self) -> ArticleCandidate {
        let protection = self.protection_summaries();
        let page_props = self.pageprops.map(|props| PageProps {
            disambiguation: props.disambiguation.is_some(),
            item_id: props.wikibase_item,
        });

        ArticleCandidate {
            page_id: self.pageid.unwrap_or(0),
            title: self.title,
            page_props,
            description: self.description,
            protection,
            item_protection: None,
            is_human: false,
            gender: None,
            regions: Vec::new(),
        }
    }
}

/// Top-level envelope of a `wbgetentities` response
#[derive(Debug, Clone, Deserialize)]
pub struct EntitiesResponse {
    /// Entity records keyed by entity id
    pub entities: Option<HashMap<String, EntityRecord>>,
}

/// One entity record from `wbgetentities`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRecord {
    /// Entity id (e.g. `Q42`, `M12345`)
    pub id: Option<String>,

    /// Present when the API explicitly reports the entity does not exist.
    /// Only presence matters; the carried value varies by format version.
    pub missing: Option<serde_json::Value>,

    /// Labels keyed by language code
    pub labels: Option<HashMap<String, LabelRecord>>,

    /// Claims keyed by property id
    pub claims: Option<HashMap<String, Vec<ClaimRecord>>>,

    /// Sitelinks keyed by site id (e.g. `enwiki`)
    pub sitelinks: Option<HashMap<String, SitelinkRecord>>,
}

impl EntityRecord {
    /// Whether the API explicitly marked this entity as not existing
    pub fn is_missing(&self) -> bool {
        self.missing.is_some()
    }

    /// Whether a non-empty label exists in the given language
    pub fn has_label_in(&self, lang: &str) -> bool {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(lang))
            .map(|label| !label.value.is_empty())
            .unwrap_or(false)
    }

    /// Claims for a property, empty when the property is absent
    pub fn claims_for(&self, property: &str) -> &[ClaimRecord] {
        self.claims
            .as_ref()
            .and_then(|claims| claims.get(property))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Title of the sitelink for a site, if any
    pub fn sitelink_title(&self, site: &str) -> Option<&str> {
        self.sitelinks
            .as_ref()
            .and_then(|links| links.get(site))
            .map(|link| link.title.as_str())
    }
}

/// One label record
#[derive(Debug, Clone, Deserialize)]
pub struct LabelRecord {
    /// Language code
    pub language: String,

    /// Label text
    pub value: String,
}

/// One claim record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimRecord {
    /// Main snak of the claim
    pub mainsnak: Option<SnakRecord>,
}

impl ClaimRecord {
    /// Entity id the claim points at, for item-valued claims
    pub fn target_id(&self) -> Option<&str> {
        self.mainsnak
            .as_ref()?
            .datavalue
            .as_ref()?
            .value
            .get("id")?
            .as_str()
    }
}

/// Main snak of a claim
#[derive(Debug, Clone, Deserialize)]
pub struct SnakRecord {
    /// Data value; absent for `novalue`/`somevalue` snaks
    pub datavalue: Option<DataValueRecord>,
}

/// Data value of a snak
#[derive(Debug, Clone, Deserialize)]
pub struct DataValueRecord {
    /// Raw value; item references carry an `id` key
    pub value: serde_json::Value,
}

/// One sitelink record
#[derive(Debug, Clone, Deserialize)]
pub struct SitelinkRecord {
    /// Site id (e.g. `enwiki`)
    pub site: String,

    /// Linked page title on that site
    pub title: String,
}

/// One record from the region lookup service.
///
/// Items with no region membership are simply absent from the response,
/// not present with an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionRecord {
    /// Knowledge-base item id
    pub qid: String,

    /// Region memberships; an item may belong to several at once
    #[serde(default)]
    pub regions: Vec<String>,
}

//! Candidate records - sampled content items moving through the pipelines
//!
//! A candidate is created per sampling round from an API response and
//! discarded at the end of the round; only aggregated identifiers (article
//! titles, item ids) outlive it. Fields that the wiki may omit are `Option`
//! so that "metadata missing" stays distinguishable from "metadata empty";
//! the filter chain treats those very differently.

use crate::status::CaptionStatus;

/// A sampled media file considered for a caption recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCandidate {
    /// Stable page id on the media wiki
    pub page_id: u64,

    /// File page title
    pub title: String,

    /// MIME type from the primary media-info record.
    /// `None` means the media-info block was missing entirely.
    pub mime: Option<String>,

    /// Page protection constraints (`type=level` summaries).
    /// `None` means protection metadata was missing; `Some(vec![])` means
    /// the page is verifiably unprotected.
    pub protection: Option<Vec<String>>,

    /// Titles of articles using this file on the target wiki
    pub used_in: Vec<String>,

    /// Existing caption state, set by the annotator stage
    pub caption: Option<CaptionStatus>,
}

impl MediaCandidate {
    /// Whether the page is verifiably unprotected.
    ///
    /// Fail-closed: missing protection metadata counts as protected.
    pub fn is_unprotected(&self) -> bool {
        matches!(&self.protection, Some(constraints) if constraints.is_empty())
    }

    /// Whether the file is in use on at least one article
    pub fn is_in_use(&self) -> bool {
        !self.used_in.is_empty()
    }
}

/// Page properties joined onto an article candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageProps {
    /// Whether the page is flagged as a disambiguation page
    pub disambiguation: bool,

    /// Linked knowledge-base item id (e.g. `Q42`), if any
    pub item_id: Option<String>,
}

/// A sampled article considered for a description recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCandidate {
    /// Stable page id on the target wiki
    pub page_id: u64,

    /// Article title
    pub title: String,

    /// Page properties; `None` means the pageprops block was missing
    pub page_props: Option<PageProps>,

    /// Existing description, if any
    pub description: Option<String>,

    /// Page protection constraints; see [`MediaCandidate::protection`]
    pub protection: Option<Vec<String>>,

    /// Protection constraints of the linked knowledge-base item, joined in
    /// by the item-protection stage. `None` until joined, or when the item
    /// could not be resolved.
    pub item_protection: Option<Vec<String>>,

    /// Whether the linked item is an instance of the human entity
    pub is_human: bool,

    /// Gender code of the linked item (first sex/gender claim), if human
    /// and recorded. Never inferred.
    pub gender: Option<String>,

    /// Region memberships of the linked item (non-exclusive)
    pub regions: Vec<String>,
}

impl ArticleCandidate {
    /// Create a bare candidate with no derived fields set
    pub fn new(page_id: u64, title: impl Into<String>) -> Self {
        Self {
            page_id,
            title: title.into(),
            page_props: None,
            description: None,
            protection: None,
            item_protection: None,
            is_human: false,
            gender: None,
            regions: Vec::new(),
        }
    }

    /// Linked knowledge-base item id, if the article has one
    pub fn item_id(&self) -> Option<&str> {
        self.page_props.as_ref()?.item_id.as_deref()
    }

    /// Whether the article page itself is verifiably unprotected
    pub fn is_unprotected(&self) -> bool {
        matches!(&self.protection, Some(constraints) if constraints.is_empty())
    }
}

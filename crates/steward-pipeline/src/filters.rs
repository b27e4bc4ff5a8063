//! Candidate filter chain
//!
//! Each filter is a pure function from a candidate set to survivors plus an
//! exclusion log; stages are applied in a fixed order, so later stages only
//! see survivors of earlier ones. Every rejected candidate is attributed to
//! exactly one reason (the first matching condition wins), and candidates
//! with missing metadata land in an explicit bucket of their own, so for
//! every stage `survivors + excluded == input`.
//!
//! Missing metadata is a data-quality event, never a fatal error: the
//! candidate is logged with a representative sample and dropped.

use steward_domain::{ArticleCandidate, FilterOutcome, MediaCandidate};
use tracing::warn;

/// Reasons the caption pipeline removes a media candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaExclusion {
    /// Media-info block missing entirely
    MissingMediaInfo,

    /// Declared MIME type is not an image type
    NotAnImage,

    /// Protection metadata missing (fail-closed: treated as protected)
    MissingProtection,

    /// Page carries at least one protection constraint
    Protected,

    /// A caption already exists in the target language
    CaptionExists,

    /// Candidate reached the caption filter without an annotation
    Unannotated,
}

impl MediaExclusion {
    /// Counter key for this reason
    pub fn key(&self) -> &'static str {
        match self {
            MediaExclusion::MissingMediaInfo => "missing_imageinfo",
            MediaExclusion::NotAnImage => "not_image",
            MediaExclusion::MissingProtection => "missing_protection",
            MediaExclusion::Protected => "protected",
            MediaExclusion::CaptionExists => "exists",
            MediaExclusion::Unannotated => "unannotated",
        }
    }
}

/// Reasons the description pipeline removes an article candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleExclusion {
    /// Page-properties metadata missing entirely
    MissingPageProps,

    /// Disambiguation page
    Disambiguation,

    /// No linked knowledge-base item
    NoLinkedItem,

    /// A description already exists
    HasDescription,

    /// Page carries at least one protection constraint, or protection
    /// metadata is missing (fail-closed)
    Protected,

    /// Linked item could not be resolved in the protection join
    ItemUnresolved,

    /// Linked item carries at least one protection constraint
    ItemProtected,
}

impl ArticleExclusion {
    /// Counter key for this reason
    pub fn key(&self) -> &'static str {
        match self {
            ArticleExclusion::MissingPageProps => "missing_pageprops",
            ArticleExclusion::Disambiguation => "disambiguation",
            ArticleExclusion::NoLinkedItem => "wikibase_missing",
            ArticleExclusion::HasDescription => "has_description",
            ArticleExclusion::Protected => "protected",
            ArticleExclusion::ItemUnresolved => "item_unresolved",
            ArticleExclusion::ItemProtected => "item_protected",
        }
    }
}

/// Retain only candidates whose primary media-info record declares an
/// image MIME type. Candidates with no media info at all are logged and
/// dropped, never silently retained.
pub fn filter_images(candidates: Vec<MediaCandidate>) -> FilterOutcome<MediaCandidate> {
    let mut outcome = FilterOutcome::new();
    for candidate in candidates {
        match candidate.mime.as_deref() {
            None => {
                warn!("missing imageinfo: {} (pageid {})", candidate.title, candidate.page_id);
                outcome.excluded.increment(MediaExclusion::MissingMediaInfo.key());
            }
            Some(mime) if mime.starts_with("image") => outcome.survivors.push(candidate),
            Some(_) => outcome.excluded.increment(MediaExclusion::NotAnImage.key()),
        }
    }
    outcome
}

/// Retain only verifiably unprotected pages.
///
/// Fail-closed: candidates whose protection metadata is missing are logged
/// and dropped, since inability to verify "unprotected" counts as protected.
pub fn filter_protections(candidates: Vec<MediaCandidate>) -> FilterOutcome<MediaCandidate> {
    let mut outcome = FilterOutcome::new();
    for candidate in candidates {
        match &candidate.protection {
            None => {
                warn!("missing protection info: {} (pageid {})", candidate.title, candidate.page_id);
                outcome.excluded.increment(MediaExclusion::MissingProtection.key());
            }
            Some(constraints) if constraints.is_empty() => outcome.survivors.push(candidate),
            Some(_) => outcome.excluded.increment(MediaExclusion::Protected.key()),
        }
    }
    outcome
}

/// Drop candidates whose annotated caption status is "already exists".
///
/// The other statuses (missing, no label, not returned) are retained as
/// recommendable. Candidates that somehow reached this stage without an
/// annotation are logged and dropped so totals still reconcile.
pub fn filter_existing_captions(candidates: Vec<MediaCandidate>) -> FilterOutcome<MediaCandidate> {
    let mut outcome = FilterOutcome::new();
    for candidate in candidates {
        match candidate.caption {
            None => {
                warn!("unannotated candidate: {} (pageid {})", candidate.title, candidate.page_id);
                outcome.excluded.increment(MediaExclusion::Unannotated.key());
            }
            Some(status) if status.is_recommendable() => outcome.survivors.push(candidate),
            Some(_) => {
                outcome.excluded.increment(MediaExclusion::CaptionExists.key());
            }
        }
    }
    outcome
}

/// First matching eligibility violation for an article candidate, if any.
///
/// The priority order is fixed: missing pageprops, disambiguation, no
/// linked item, existing description, protection. A candidate failing
/// several conditions is attributed only to the first.
fn article_exclusion(candidate: &ArticleCandidate) -> Option<ArticleExclusion> {
    let props = match &candidate.page_props {
        None => return Some(ArticleExclusion::MissingPageProps),
        Some(props) => props,
    };
    if props.disambiguation {
        return Some(ArticleExclusion::Disambiguation);
    }
    if props.item_id.is_none() {
        return Some(ArticleExclusion::NoLinkedItem);
    }
    if candidate.description.is_some() {
        return Some(ArticleExclusion::HasDescription);
    }
    if !candidate.is_unprotected() {
        return Some(ArticleExclusion::Protected);
    }
    None
}

/// Filter articles to the set eligible for description recommendations.
pub fn filter_eligible_articles(
    candidates: Vec<ArticleCandidate>,
) -> FilterOutcome<ArticleCandidate> {
    let mut outcome = FilterOutcome::new();
    for candidate in candidates {
        match article_exclusion(&candidate) {
            None => outcome.survivors.push(candidate),
            Some(reason) => {
                if reason == ArticleExclusion::MissingPageProps {
                    warn!("missing pageprops: {} (pageid {})", candidate.title, candidate.page_id);
                }
                outcome.excluded.increment(reason.key());
            }
        }
    }
    outcome
}

/// Drop candidates whose linked knowledge-base item is protected.
///
/// Runs after the item-protection join; candidates whose item never showed
/// up in the join response are logged and dropped into their own bucket.
pub fn filter_protected_items(
    candidates: Vec<ArticleCandidate>,
) -> FilterOutcome<ArticleCandidate> {
    let mut outcome = FilterOutcome::new();
    for candidate in candidates {
        match &candidate.item_protection {
            None => {
                warn!(
                    "no protection record found for item of {} (pageid {})",
                    candidate.title, candidate.page_id
                );
                outcome.excluded.increment(ArticleExclusion::ItemUnresolved.key());
            }
            Some(constraints) if constraints.is_empty() => outcome.survivors.push(candidate),
            Some(_) => outcome.excluded.increment(ArticleExclusion::ItemProtected.key()),
        }
    }
    outcome
}

//! Structured-data annotator
//!
//! Joins existing caption metadata onto surviving media candidates. The
//! classification is four-way, not boolean: an entity explicitly reported
//! missing and an identifier silently omitted from the response have
//! different bias implications, and the omission signals an API-layer
//! problem that is tracked separately.

use std::collections::HashMap;
use steward_api::EntityRecord;
use steward_domain::{CaptionStatus, CategoryCounter, MediaCandidate};
use tracing::warn;

/// Media entity id for a file page (`M<pageid>`)
pub fn media_entity_id(page_id: u64) -> String {
    format!("M{}", page_id)
}

/// Classify one entity lookup result into a caption status.
///
/// `None` means the API response omitted the identifier entirely.
pub fn classify_caption(entity: Option<&EntityRecord>, lang: &str) -> CaptionStatus {
    match entity {
        None => CaptionStatus::NotReturned,
        Some(entity) if entity.is_missing() => CaptionStatus::Missing,
        Some(entity) if entity.has_label_in(lang) => CaptionStatus::Exists,
        Some(_) => CaptionStatus::NoLabel,
    }
}

/// Annotate candidates with their existing caption state and tally the
/// status distribution into `counts`.
///
/// Every candidate ends up with exactly one status; the tally keys are the
/// status names (`missing`, `exists`, `none`, `N/A`).
pub fn annotate_captions(
    candidates: &mut [MediaCandidate],
    entities: &HashMap<String, EntityRecord>,
    lang: &str,
    counts: &mut CategoryCounter,
) {
    for candidate in candidates {
        let mid = media_entity_id(candidate.page_id);
        let status = classify_caption(entities.get(&mid), lang);
        if status == CaptionStatus::NotReturned {
            warn!("entity {} absent from caption response", mid);
        }
        candidate.caption = Some(status);
        counts.increment(status.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(page_id: u64) -> MediaCandidate {
        MediaCandidate {
            page_id,
            title: format!("File:{}.jpg", page_id),
            mime: Some("image/jpeg".to_string()),
            protection: Some(vec![]),
            used_in: vec![],
            caption: None,
        }
    }

    fn entity(json: &str) -> EntityRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_media_entity_id() {
        assert_eq!(media_entity_id(12345), "M12345");
    }

    #[test]
    fn test_four_way_classification() {
        let mut entities = HashMap::new();
        entities.insert("M1".to_string(), entity(r#"{"id": "M1", "missing": ""}"#));
        entities.insert(
            "M2".to_string(),
            entity(r#"{"id": "M2", "labels": {"en": {"language": "en", "value": "A cat"}}}"#),
        );
        entities.insert(
            "M3".to_string(),
            entity(r#"{"id": "M3", "labels": {"fr": {"language": "fr", "value": "Un chat"}}}"#),
        );
        // M4 is absent from the response

        let mut candidates = vec![candidate(1), candidate(2), candidate(3), candidate(4)];
        let mut counts = CategoryCounter::new();
        annotate_captions(&mut candidates, &entities, "en", &mut counts);

        assert_eq!(candidates[0].caption, Some(CaptionStatus::Missing));
        assert_eq!(candidates[1].caption, Some(CaptionStatus::Exists));
        assert_eq!(candidates[2].caption, Some(CaptionStatus::NoLabel));
        assert_eq!(candidates[3].caption, Some(CaptionStatus::NotReturned));

        assert_eq!(counts.get("missing"), 1);
        assert_eq!(counts.get("exists"), 1);
        assert_eq!(counts.get("none"), 1);
        assert_eq!(counts.get("N/A"), 1);
        // Classification is total: every candidate is counted exactly once
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_exists_is_language_specific() {
        // A label in another language is "none" for the target language,
        // not "exists"
        let record = entity(r#"{"id": "M9", "labels": {"de": {"language": "de", "value": "Eine Katze"}}}"#);
        assert_eq!(classify_caption(Some(&record), "en"), CaptionStatus::NoLabel);
        assert_eq!(classify_caption(Some(&record), "de"), CaptionStatus::Exists);
    }
}

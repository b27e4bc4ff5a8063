//! End-to-end pipeline tests over the in-memory API mocks
//!
//! These drive the full round loop: sampling, filtering, annotating and
//! aggregating, with fixtures shaped like real API responses.

use steward_api::types::{GlobalUsage, ImageInfo, ProtectionEntry};
use steward_api::{EntityRecord, MockRegionApi, MockWikiApi, PageRecord};
use steward_pipeline::{CaptionEval, DescriptionEval, EvalConfig};

fn test_config(rounds: usize) -> EvalConfig {
    EvalConfig {
        rounds,
        batch_delay_secs: 0,
        ..Default::default()
    }
}

fn entity(json: &str) -> EntityRecord {
    serde_json::from_str(json).unwrap()
}

fn file_page(
    page_id: u64,
    mime: Option<&str>,
    protection: Option<Vec<(&str, &str)>>,
    used_in: &[&str],
) -> PageRecord {
    PageRecord {
        pageid: Some(page_id),
        title: format!("File:Example {}.jpg", page_id),
        imageinfo: mime.map(|mime| {
            vec![ImageInfo {
                mime: Some(mime.to_string()),
                timestamp: None,
                user: None,
                url: None,
            }]
        }),
        globalusage: Some(
            used_in
                .iter()
                .map(|title| GlobalUsage {
                    title: title.to_string(),
                    wiki: Some("en.wikipedia.org".to_string()),
                })
                .collect(),
        ),
        protection: protection.map(|entries| {
            entries
                .into_iter()
                .map(|(kind, level)| ProtectionEntry {
                    kind: kind.to_string(),
                    level: level.to_string(),
                    expiry: Some("infinity".to_string()),
                })
                .collect()
        }),
        pageprops: None,
        description: None,
    }
}

/// Candidate set of 50 images: 10 lack media info, 5 are protected, and
/// of the remaining 35, 7 already carry a target-language caption. The
/// final recommendation count must be 28 and the exclusion log must show
/// exactly how the other 22 disappeared.
#[tokio::test]
async fn caption_pipeline_funnel_and_exclusions() {
    let commons = MockWikiApi::new();
    let wikidata = MockWikiApi::new();
    let regions = MockRegionApi::new();

    let mut sample = Vec::new();
    // 10 candidates without media info
    for page_id in 1..=10 {
        sample.push(file_page(page_id, None, Some(vec![]), &[]));
    }
    // 5 protected images; one of them is in use, so its article still
    // counts toward the candidate article population
    for page_id in 11..=15 {
        let used_in: &[&str] = if page_id == 12 { &["Hedy Lamarr"] } else { &[] };
        sample.push(file_page(
            page_id,
            Some("image/jpeg"),
            Some(vec![("edit", "sysop")]),
            used_in,
        ));
    }
    // 35 editable images; page 31 is in use
    for page_id in 16..=50 {
        let used_in: &[&str] = if page_id == 31 { &["Ada Lovelace"] } else { &[] };
        sample.push(file_page(page_id, Some("image/jpeg"), Some(vec![]), used_in));
    }
    commons.push_sample(sample);

    // Captions: 7 exist in English, 8 explicitly missing, 10 without an
    // English label, 10 omitted from the response entirely
    for page_id in 16..=22 {
        commons.insert_entity(
            format!("M{}", page_id),
            entity(&format!(
                r#"{{"id": "M{}", "labels": {{"en": {{"language": "en", "value": "A caption"}}}}}}"#,
                page_id
            )),
        );
    }
    for page_id in 23..=30 {
        commons.insert_entity(
            format!("M{}", page_id),
            entity(&format!(r#"{{"id": "M{}", "missing": ""}}"#, page_id)),
        );
    }
    for page_id in 31..=40 {
        commons.insert_entity(
            format!("M{}", page_id),
            entity(&format!(r#"{{"id": "M{}", "labels": {{}}}}"#, page_id)),
        );
    }

    // Articles behind the images, for the demographic cross-reference
    wikidata.insert_entity(
        "Q40",
        entity(
            r#"{"id": "Q40",
                "claims": {
                    "P31": [{"mainsnak": {"datavalue": {"value": {"id": "Q5"}}}}],
                    "P21": [{"mainsnak": {"datavalue": {"value": {"id": "Q6581072"}}}}]
                },
                "sitelinks": {"enwiki": {"site": "enwiki", "title": "Ada Lovelace"}}}"#,
        ),
    );
    wikidata.insert_entity(
        "Q41",
        entity(
            r#"{"id": "Q41",
                "claims": {
                    "P31": [{"mainsnak": {"datavalue": {"value": {"id": "Q5"}}}}],
                    "P21": [{"mainsnak": {"datavalue": {"value": {"id": "Q6581072"}}}}]
                },
                "sitelinks": {"enwiki": {"site": "enwiki", "title": "Hedy Lamarr"}}}"#,
        ),
    );
    regions.insert_regions("Q40", vec!["Northern Europe".to_string()]);

    let eval = CaptionEval::new(commons, wikidata, regions, test_config(1)).unwrap();
    let summary = eval.run().await.unwrap();

    // Funnel
    assert_eq!(summary.candidates, 50);
    assert_eq!(summary.images, 35);
    assert_eq!(summary.recommendations, 28);
    assert_eq!(summary.in_use, 1);
    assert_eq!(summary.in_use_recommendations, 1);

    // Exclusion log
    assert_eq!(summary.exclusions.get("missing_imageinfo"), 10);
    assert_eq!(summary.exclusions.get("protected"), 5);
    assert_eq!(summary.exclusions.get("exists"), 7);
    assert_eq!(summary.exclusions.total(), 22);

    // Caption status distribution is total over the 35 annotated images
    assert_eq!(summary.caption_status.get("exists"), 7);
    assert_eq!(summary.caption_status.get("missing"), 8);
    assert_eq!(summary.caption_status.get("none"), 10);
    assert_eq!(summary.caption_status.get("N/A"), 10);
    assert_eq!(summary.caption_status.total(), 35);

    // Article populations: the protected image's article counts as a
    // candidate but not as recommended
    assert_eq!(summary.candidate_article_count, 2);
    assert_eq!(summary.recommended_article_count, 1);

    // Demographics: both articles resolve to women; only Ada's is
    // recommended, and only hers carries a region
    let demographics = &summary.demographics;
    assert_eq!(demographics.candidate_gender.get("humans"), 2);
    assert_eq!(demographics.candidate_gender.get("Q6581072"), 2);
    assert_eq!(demographics.recommended_gender.get("humans"), 1);
    assert_eq!(demographics.recommended_gender.get("Q6581072"), 1);
    assert_eq!(demographics.candidate_regions.get("regions"), 1);
    assert_eq!(demographics.recommended_regions.get("Northern Europe"), 1);

    // Subset invariant over every discovered category
    for (category, count) in demographics.recommended_gender.iter() {
        assert!(count <= demographics.candidate_gender.get(category));
    }
    for (category, count) in demographics.recommended_regions.iter() {
        assert!(count <= demographics.candidate_regions.get(category));
    }
}

/// A sampling round that returns nothing must contribute zero everywhere
/// and the run must complete without error.
#[tokio::test]
async fn caption_pipeline_zero_candidate_round() {
    let eval = CaptionEval::new(
        MockWikiApi::new(),
        MockWikiApi::new(),
        MockRegionApi::new(),
        test_config(2),
    )
    .unwrap();
    let summary = eval.run().await.unwrap();

    assert_eq!(summary.candidates, 0);
    assert_eq!(summary.images, 0);
    assert_eq!(summary.recommendations, 0);
    assert!(summary.exclusions.is_empty());
    assert!(summary.caption_status.is_empty());
    assert!(summary.demographics.candidate_gender.is_empty());
}

fn article_page(page_id: u64, title: &str) -> PageRecord {
    serde_json::from_str(&format!(
        r#"{{"pageid": {}, "title": "{}", "protection": []}}"#,
        page_id, title
    ))
    .unwrap()
}

fn linked_article_page(page_id: u64, title: &str, qid: &str) -> PageRecord {
    serde_json::from_str(&format!(
        r#"{{
            "pageid": {},
            "title": "{}",
            "pageprops": {{"wikibase_item": "{}"}},
            "protection": []
        }}"#,
        page_id, title, qid
    ))
    .unwrap()
}

fn item_protection_page(qid: &str, constraints: &str) -> PageRecord {
    serde_json::from_str(&format!(
        r#"{{"pageid": 9000, "title": "{}", "protection": {}}}"#,
        qid, constraints
    ))
    .unwrap()
}

#[tokio::test]
async fn description_pipeline_reasons_and_subset_invariant() {
    let wiki = MockWikiApi::new();
    let wikidata = MockWikiApi::new();
    let regions = MockRegionApi::new();

    let mut sample = Vec::new();
    // One candidate per eligibility reason
    sample.push(article_page(1, "No pageprops at all"));
    sample.push({
        let mut page = linked_article_page(2, "Some disambiguation", "Q90");
        page.pageprops.as_mut().unwrap().disambiguation = Some(String::new());
        page
    });
    sample.push(serde_json::from_str(
        r#"{"pageid": 3, "title": "No linked item", "pageprops": {}, "protection": []}"#,
    )
    .unwrap());
    sample.push({
        let mut page = linked_article_page(4, "Already described", "Q91");
        page.description = Some("A described thing".to_string());
        page
    });
    sample.push(serde_json::from_str(
        r#"{
            "pageid": 5,
            "title": "Protected article",
            "pageprops": {"wikibase_item": "Q1"},
            "protection": [{"type": "edit", "level": "sysop"}]
        }"#,
    )
    .unwrap());
    // Five eligible articles
    for (page_id, qid) in [(6, "Q1x"), (7, "Q2"), (8, "Q3"), (9, "Q4"), (10, "Q5x")] {
        sample.push(linked_article_page(page_id, &format!("Eligible {}", page_id), qid));
    }
    wiki.push_sample(sample);

    // Item claims for the gender pass (runs over the whole candidate set)
    wikidata.insert_entity(
        "Q1",
        entity(
            r#"{"id": "Q1", "claims": {
                "P31": [{"mainsnak": {"datavalue": {"value": {"id": "Q5"}}}}],
                "P21": [{"mainsnak": {"datavalue": {"value": {"id": "Q6581097"}}}}]
            }}"#,
        ),
    );
    wikidata.insert_entity(
        "Q3",
        entity(
            r#"{"id": "Q3", "claims": {
                "P31": [{"mainsnak": {"datavalue": {"value": {"id": "Q5"}}}}],
                "P21": [{"mainsnak": {"datavalue": {"value": {"id": "Q6581072"}}}}]
            }}"#,
        ),
    );
    wikidata.insert_entity(
        "Q4",
        entity(r#"{"id": "Q4", "claims": {"P31": [{"mainsnak": {"datavalue": {"value": {"id": "Q5"}}}}]}}"#),
    );
    wikidata.insert_entity(
        "Q5x",
        entity(r#"{"id": "Q5x", "claims": {"P31": [{"mainsnak": {"datavalue": {"value": {"id": "Q11424"}}}}]}}"#),
    );

    regions.insert_regions(
        "Q3",
        vec!["Northern Europe".to_string(), "Western Europe".to_string()],
    );
    regions.insert_regions("Q1", vec!["Asia".to_string()]);

    // Item protection join: Q1x protected, Q2 absent (unresolved),
    // the rest unprotected
    wikidata.insert_protection_page(item_protection_page(
        "Q1x",
        r#"[{"type": "edit", "level": "sysop"}]"#,
    ));
    for qid in ["Q3", "Q4", "Q5x"] {
        wikidata.insert_protection_page(item_protection_page(qid, "[]"));
    }

    let eval = DescriptionEval::new(wiki, wikidata, regions, test_config(1)).unwrap();
    let summary = eval.run().await.unwrap();

    // Funnel
    assert_eq!(summary.candidates, 10);
    assert_eq!(summary.eligible, 5);
    assert_eq!(summary.recommendations, 3);

    // One candidate per eligibility reason, then the item stages
    assert_eq!(summary.exclusions.get("missing_pageprops"), 1);
    assert_eq!(summary.exclusions.get("disambiguation"), 1);
    assert_eq!(summary.exclusions.get("wikibase_missing"), 1);
    assert_eq!(summary.exclusions.get("has_description"), 1);
    assert_eq!(summary.exclusions.get("protected"), 1);
    assert_eq!(summary.exclusions.get("item_protected"), 1);
    assert_eq!(summary.exclusions.get("item_unresolved"), 1);
    assert_eq!(summary.exclusions.total(), 7);

    // Candidate demographics cover the whole sample, including articles
    // that were later filtered out
    let demographics = &summary.demographics;
    assert_eq!(demographics.candidate_gender.get("humans"), 3);
    assert_eq!(demographics.candidate_gender.get("Q6581097"), 1);
    assert_eq!(demographics.candidate_gender.get("Q6581072"), 1);
    assert_eq!(demographics.candidate_regions.get("regions"), 2);
    assert_eq!(demographics.candidate_regions.get("Asia"), 1);

    // Recommended demographics only cover the three survivors (Q3, Q4,
    // Q5x): two humans, one with a recorded gender, one region-tagged item
    // with two memberships
    assert_eq!(demographics.recommended_gender.get("humans"), 2);
    assert_eq!(demographics.recommended_gender.get("Q6581072"), 1);
    assert_eq!(demographics.recommended_gender.get("Q6581097"), 0);
    assert_eq!(demographics.recommended_regions.get("regions"), 1);
    assert_eq!(demographics.recommended_regions.get("Northern Europe"), 1);
    assert_eq!(demographics.recommended_regions.get("Western Europe"), 1);
    assert_eq!(demographics.recommended_regions.get("Asia"), 0);

    // Subset invariant
    for (category, count) in demographics.recommended_gender.iter() {
        assert!(count <= demographics.candidate_gender.get(category));
    }
    for (category, count) in demographics.recommended_regions.iter() {
        assert!(count <= demographics.candidate_regions.get(category));
    }
}

/// Counters keep accumulating across rounds, and rounds are independent.
#[tokio::test]
async fn caption_pipeline_accumulates_across_rounds() {
    let commons = MockWikiApi::new();
    commons.push_sample(vec![file_page(1, Some("image/jpeg"), Some(vec![]), &[])]);
    commons.push_sample(vec![file_page(2, None, Some(vec![]), &[])]);

    let eval = CaptionEval::new(
        commons,
        MockWikiApi::new(),
        MockRegionApi::new(),
        test_config(2),
    )
    .unwrap();
    let summary = eval.run().await.unwrap();

    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.images, 1);
    assert_eq!(summary.exclusions.get("missing_imageinfo"), 1);
    // Neither M1 entity was registered, so the annotator saw an omission
    assert_eq!(summary.caption_status.get("N/A"), 1);
    assert_eq!(summary.recommendations, 1);
}

//! Article topic dump
//!
//! Writes one JSON record per article per line, each carrying the
//! article's metadata, its WikiProject templates, and the topic list
//! derived through the inverted taxonomy. The importance-analysis report
//! consumes these lines later.

use crate::error::TaxonomyError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use steward_domain::traits::LabelNormalizer;
use steward_domain::CategoryCounter;

/// One article with its assessment metadata and derived topics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Page id of the article
    pub article_pid: u64,

    /// WikiProject templates on the article's talk page
    pub wp_templates: Vec<String>,

    /// Latest revision id of the article
    pub article_revid: u64,

    /// Article title
    pub title: String,

    /// Page id of the talk page
    pub talk_pid: u64,

    /// Latest revision id of the talk page
    pub talk_revid: u64,

    /// Importance ratings, one per assessing WikiProject
    pub importance: Vec<String>,

    /// Linked knowledge-base item id, when resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qid: Option<String>,

    /// Page ids of this article on other wikis, keyed by wiki db
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitelinks: Option<HashMap<String, u64>>,

    /// Derived topics, sorted; filled in by the dump writer
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Statistics gathered while assigning topics
#[derive(Debug, Clone, Default)]
pub struct TopicStats {
    /// Per-template topic match counts (zero entries mark templates that
    /// matched nothing)
    pub template_matches: CategoryCounter,

    /// Distribution of topics-per-article (key: topic count)
    pub topics_per_article: CategoryCounter,
}

/// Map WikiProject templates to topics through the inverted taxonomy.
///
/// Template names are split on `/` so sub-project pages (task forces,
/// assessment sub-pages) inherit the parent project's topics. Every seen
/// template part gets a match-count entry, including the ones that never
/// match; those are the interesting gaps.
pub fn assign_topics<N: LabelNormalizer>(
    templates: &[String],
    inverted: &HashMap<String, BTreeSet<String>>,
    normalizer: &N,
    matches: &mut CategoryCounter,
) -> Vec<String> {
    let mut topics: BTreeSet<String> = BTreeSet::new();
    for template in templates {
        for part in template.split('/') {
            matches.add(part.to_string(), 0);
            let normalized = normalizer.normalize(part);
            if let Some(assigned) = inverted.get(&normalized) {
                for topic in assigned {
                    topics.insert(topic.clone());
                    matches.increment(part.to_string());
                }
            }
        }
    }
    topics.into_iter().collect()
}

/// Build a normalized local-template → canonical-template translation map
/// from cross-language sitelink records.
///
/// Used for non-English wikis: the taxonomy is keyed by canonical
/// (English) project names, so local template names are translated before
/// lookup.
pub fn cross_language_map<N: LabelNormalizer>(
    records: &[crate::sitelinks::ProjectSitelinks],
    wiki: &str,
    normalizer: &N,
) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for record in records {
        if let (Some(local), Some(canonical)) =
            (record.sitelinks.get(wiki), record.sitelinks.get("enwiki"))
        {
            map.insert(normalizer.normalize(local), canonical.clone());
        }
    }
    map
}

/// Translate local templates to canonical ones, dropping templates with
/// no cross-language link.
pub fn translate_templates<N: LabelNormalizer>(
    templates: &[String],
    translation: &HashMap<String, String>,
    normalizer: &N,
) -> Vec<String> {
    templates
        .iter()
        .filter_map(|template| translation.get(&normalizer.normalize(template)).cloned())
        .collect()
}

/// Assign topics to each record and write it as one JSON line.
///
/// Records are written in input order; the returned statistics cover the
/// whole dump.
pub fn write_dump<W, N, I>(
    records: I,
    inverted: &HashMap<String, BTreeSet<String>>,
    normalizer: &N,
    out: &mut W,
) -> Result<TopicStats, TaxonomyError>
where
    W: Write,
    N: LabelNormalizer,
    I: IntoIterator<Item = ArticleRecord>,
{
    let mut stats = TopicStats::default();
    for mut record in records {
        record.topics = assign_topics(
            &record.wp_templates,
            inverted,
            normalizer,
            &mut stats.template_matches,
        );
        stats
            .topics_per_article
            .increment(record.topics.len().to_string());
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;
    }
    Ok(stats)
}

//! Cross-language WikiProject sitelink fetch
//!
//! WikiProjects exist under different names on each wiki. Their
//! knowledge-base items link the variants together; fetching the
//! sitelinks for a list of WikiProject items yields the translation
//! table used before topic lookup on non-English wikis.

use crate::error::TaxonomyError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use steward_api::{chunked, Throttle, WikiApi, MAX_BATCH_SIZE};
use tracing::{info, warn};

/// Sitelinks of one WikiProject item, as stored in the sitelinks dump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSitelinks {
    /// Knowledge-base item id
    pub qid: String,

    /// Page title per wiki db (e.g. `enwiki` → canonical project name)
    pub sitelinks: HashMap<String, String>,
}

/// Fetch sitelinks for a list of WikiProject item ids, in batches of ≤50
/// with the throttle pausing between batches.
pub async fn fetch_project_sitelinks<W: WikiApi>(
    wikidata: &W,
    qids: &[String],
    throttle: &Throttle,
) -> Result<Vec<ProjectSitelinks>, TaxonomyError> {
    let mut records = Vec::new();
    for (index, chunk) in chunked(qids, MAX_BATCH_SIZE).enumerate() {
        if index > 0 {
            throttle.pause().await;
        }
        for (id, entity) in wikidata.entity_sitelinks(chunk).await? {
            if entity.is_missing() {
                warn!("WikiProject item {} reported missing", id);
                continue;
            }
            let sitelinks = entity
                .sitelinks
                .unwrap_or_default()
                .into_iter()
                .map(|(site, link)| (site, link.title))
                .collect();
            records.push(ProjectSitelinks {
                qid: entity.id.unwrap_or(id),
                sitelinks,
            });
        }
    }
    info!("fetched sitelinks for {} WikiProject items", records.len());
    Ok(records)
}

/// Write sitelink records as JSON lines.
pub fn write_sitelinks<W: Write>(
    records: &[ProjectSitelinks],
    out: &mut W,
) -> Result<(), TaxonomyError> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Read sitelink records from a JSON-lines stream, skipping blank lines.
pub fn read_sitelinks<R: BufRead>(input: R) -> Result<Vec<ProjectSitelinks>, TaxonomyError> {
    let mut records = Vec::new();
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

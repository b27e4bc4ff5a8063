//! Command execution.

use crate::cli::{EvalArgs, TaxonomyAction};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use steward_api::{MwClient, RegionClient};
use steward_pipeline::{CaptionEval, DescriptionEval};
use steward_taxonomy::{
    cross_language_map, fetch_project_sitelinks, invert_normalized, normalizer_for,
    read_sitelinks, translate_templates, write_dump, write_sitelinks, ArticleRecord,
    EnglishNormalizer, TaxonomyNode,
};
use tracing::info;

/// Run the caption evaluation pipeline against the live APIs.
pub async fn execute_captions(
    args: &EvalArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let eval_config = config.eval_config(&args.lang, args.rounds, args.delay_secs);
    info!(
        "starting caption evaluation: lang={}, rounds={}",
        eval_config.lang, eval_config.rounds
    );
    let commons = MwClient::new(eval_config.commons_endpoint.as_str(), eval_config.user_agent.as_str());
    let wikidata = MwClient::new(eval_config.wikidata_endpoint.as_str(), eval_config.user_agent.as_str());
    let regions = RegionClient::new(eval_config.region_endpoint.as_str(), eval_config.user_agent.as_str());

    let eval = CaptionEval::new(commons, wikidata, regions, eval_config)?;
    let summary = eval.run().await?;

    println!("{}", formatter.format_caption_summary(&summary));
    Ok(())
}

/// Run the description evaluation pipeline against the live APIs.
pub async fn execute_descriptions(
    args: &EvalArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let eval_config = config.eval_config(&args.lang, args.rounds, args.delay_secs);
    info!(
        "starting description evaluation: lang={}, rounds={}",
        eval_config.lang, eval_config.rounds
    );
    let wiki = MwClient::new(eval_config.wikipedia_endpoint(), eval_config.user_agent.as_str());
    let wikidata = MwClient::new(eval_config.wikidata_endpoint.as_str(), eval_config.user_agent.as_str());
    let regions = RegionClient::new(eval_config.region_endpoint.as_str(), eval_config.user_agent.as_str());

    let eval = DescriptionEval::new(wiki, wikidata, regions, eval_config)?;
    let summary = eval.run().await?;

    println!("{}", formatter.format_description_summary(&summary));
    Ok(())
}

/// Run a taxonomy subcommand.
pub async fn execute_taxonomy(
    action: &TaxonomyAction,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match action {
        TaxonomyAction::Invert { taxonomy, wiki } => {
            // Resolve the normalizer first: an unknown wiki must fail
            // before any file is read
            let normalizer = normalizer_for(wiki)?;
            let tree = TaxonomyNode::from_yaml_str(&fs::read_to_string(taxonomy)?)?;
            let inverted = invert_normalized(&tree, &normalizer);
            println!("{}", formatter.format_topic_mapping(&inverted));
            Ok(())
        }
        TaxonomyAction::Dump {
            taxonomy,
            articles,
            output,
            wiki,
            sitelinks,
        } => {
            let local_normalizer = normalizer_for(wiki)?;
            let tree = TaxonomyNode::from_yaml_str(&fs::read_to_string(taxonomy)?)?;
            let inverted = invert_normalized(&tree, &EnglishNormalizer);

            let mut records = read_article_records(articles)?;
            if wiki != "enwiki" {
                let sitelinks_path = sitelinks.as_ref().ok_or_else(|| {
                    CliError::InvalidInput(
                        "--sitelinks is required for non-English wikis".to_string(),
                    )
                })?;
                let sitelink_records =
                    read_sitelinks(BufReader::new(fs::File::open(sitelinks_path)?))?;
                let translation = cross_language_map(&sitelink_records, wiki, &local_normalizer);
                for record in &mut records {
                    record.wp_templates =
                        translate_templates(&record.wp_templates, &translation, &local_normalizer);
                }
            }

            let record_count = records.len();
            let mut out = BufWriter::new(fs::File::create(output)?);
            let stats = write_dump(records, &inverted, &EnglishNormalizer, &mut out)?;
            out.flush()?;

            println!(
                "{}",
                formatter.success(&format!(
                    "wrote {} article records to {}",
                    record_count,
                    output.display()
                ))
            );
            println!("{}", formatter.format_topic_stats(&stats, wiki));
            Ok(())
        }
        TaxonomyAction::Sitelinks { qids, output } => {
            let ids = read_qid_lines(qids)?;
            println!(
                "{}",
                formatter.info(&format!("fetching sitelinks for {} items", ids.len()))
            );

            let eval_config = config.eval_config("en", 1, None);
            let wikidata = MwClient::new(
                eval_config.wikidata_endpoint.as_str(),
                eval_config.user_agent.as_str(),
            );
            let records =
                fetch_project_sitelinks(&wikidata, &ids, &eval_config.throttle()).await?;

            let mut out = BufWriter::new(fs::File::create(output)?);
            write_sitelinks(&records, &mut out)?;
            out.flush()?;

            println!(
                "{}",
                formatter.success(&format!(
                    "wrote {} sitelink records to {}",
                    records.len(),
                    output.display()
                ))
            );
            Ok(())
        }
    }
}

fn read_article_records(path: &Path) -> Result<Vec<ArticleRecord>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

fn read_qid_lines(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            ids.push(trimmed.to_string());
        }
    }
    Ok(ids)
}

//! Output formatting for the CLI.

use colored::*;
use std::collections::{BTreeSet, HashMap};
use steward_domain::{format_share, CategoryCounter};
use steward_pipeline::demographics::{gender_label, KEY_HUMANS, KEY_REGIONS};
use steward_pipeline::{CaptionSummary, DescriptionSummary};
use steward_taxonomy::TopicStats;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Render the caption evaluation report.
    pub fn format_caption_summary(&self, summary: &CaptionSummary) -> String {
        let mut lines = vec![
            self.heading("Final statistics:"),
            format!(
                "Started with {} candidates over {} round(s)",
                summary.candidates, summary.rounds
            ),
            format!(
                "Filtered to {} images ({} of candidates) -- {} in use on {}wiki ({} of images)",
                summary.images,
                format_share(summary.images, summary.candidates),
                summary.in_use,
                summary.lang,
                format_share(summary.in_use, summary.images),
            ),
            "Existing structured data for these images:".to_string(),
            self.share_table(
                &["Status", "Count", "% of images"],
                &summary.caption_status,
                summary.images,
                None,
                |status| status.to_string(),
            ),
            format!(
                "Filtered to {} recommendations ({} of images) -- {} in use on {}wiki ({} of recommendations)",
                summary.recommendations,
                format_share(summary.recommendations, summary.images),
                summary.in_use_recommendations,
                summary.lang,
                format_share(summary.in_use_recommendations, summary.recommendations),
            ),
            String::new(),
            self.heading("Gender data:"),
        ];

        let demographics = &summary.demographics;
        lines.push(format!(
            "{} candidate articles, {} resolved to humans:",
            summary.candidate_article_count,
            demographics.candidate_gender.get(KEY_HUMANS)
        ));
        lines.push(self.gender_table(&demographics.candidate_gender));
        lines.push(format!(
            "{} recommended articles, {} resolved to humans:",
            summary.recommended_article_count,
            demographics.recommended_gender.get(KEY_HUMANS)
        ));
        lines.push(self.gender_table(&demographics.recommended_gender));

        lines.push(String::new());
        lines.push(self.heading("Region data:"));
        lines.push(format!(
            "{} candidate articles, {} with regions:",
            summary.candidate_article_count,
            demographics.candidate_regions.get(KEY_REGIONS)
        ));
        lines.push(self.region_table(&demographics.candidate_regions));
        lines.push(format!(
            "{} recommended articles, {} with regions:",
            summary.recommended_article_count,
            demographics.recommended_regions.get(KEY_REGIONS)
        ));
        lines.push(self.region_table(&demographics.recommended_regions));

        lines.join("\n")
    }

    /// Render the description evaluation report.
    pub fn format_description_summary(&self, summary: &DescriptionSummary) -> String {
        let mut lines = vec![
            self.heading("Final statistics:"),
            format!(
                "Started with {} candidates over {} round(s)",
                summary.candidates, summary.rounds
            ),
            format!(
                "Filtered to {} eligible items ({} of candidates)",
                summary.eligible,
                format_share(summary.eligible, summary.candidates),
            ),
            "Why candidates were filtered:".to_string(),
            self.share_table(
                &["Reason", "Count", "% of candidates"],
                &summary.exclusions,
                summary.candidates,
                None,
                |reason| reason.to_string(),
            ),
            format!(
                "Filtered to {} recommendations ({} of eligible items)",
                summary.recommendations,
                format_share(summary.recommendations, summary.eligible),
            ),
            String::new(),
            self.heading("Gender data:"),
        ];

        let demographics = &summary.demographics;
        lines.push(format!(
            "{} candidates, {} were humans with known items:",
            summary.candidates,
            demographics.candidate_gender.get(KEY_HUMANS)
        ));
        lines.push(self.gender_table(&demographics.candidate_gender));
        lines.push(format!(
            "{} recommendations, {} were humans:",
            summary.recommendations,
            demographics.recommended_gender.get(KEY_HUMANS)
        ));
        lines.push(self.gender_table(&demographics.recommended_gender));

        lines.push(String::new());
        lines.push(self.heading("Region data:"));
        lines.push(format!(
            "{} candidates, {} with regions:",
            summary.candidates,
            demographics.candidate_regions.get(KEY_REGIONS)
        ));
        lines.push(self.region_table(&demographics.candidate_regions));
        lines.push(format!(
            "{} recommendations, {} with regions:",
            summary.recommendations,
            demographics.recommended_regions.get(KEY_REGIONS)
        ));
        lines.push(self.region_table(&demographics.recommended_regions));

        lines.join("\n")
    }

    /// Render an inverted label → topics mapping.
    pub fn format_topic_mapping(&self, mapping: &HashMap<String, BTreeSet<String>>) -> String {
        let mut labels: Vec<&String> = mapping.keys().collect();
        labels.sort();

        let mut lines = vec![format!("{} WikiProject labels:", mapping.len())];
        for label in labels {
            let topics: Vec<&str> = mapping[label].iter().map(String::as_str).collect();
            lines.push(format!("  {} -> {}", label, topics.join(", ")));
        }
        lines.join("\n")
    }

    /// Render dump statistics: topics-per-article distribution plus the
    /// templates worth a second look (unmatched on the canonical wiki,
    /// matched elsewhere).
    pub fn format_topic_stats(&self, stats: &TopicStats, wiki: &str) -> String {
        let mut distribution: Vec<(u64, u64)> = stats
            .topics_per_article
            .iter()
            .filter_map(|(key, count)| key.parse::<u64>().ok().map(|topics| (topics, count)))
            .collect();
        distribution.sort();

        let mut lines = vec![self.heading("Topic distribution (topics per article):")];
        for (topics, count) in distribution {
            lines.push(format!("  {}: {}", topics, count));
        }

        let mut notable: Vec<&str> = stats
            .template_matches
            .iter()
            .filter(|(name, _)| {
                let lowered = name.to_lowercase();
                !lowered.contains("task") && !lowered.contains("force")
            })
            .filter(|(_, count)| if wiki == "enwiki" { *count == 0 } else { *count > 0 })
            .map(|(name, _)| name)
            .collect();
        notable.sort_unstable();

        if wiki == "enwiki" {
            lines.push(format!("WikiProjects without topics: {}", notable.join(", ")));
        } else {
            lines.push(format!("WikiProjects with topics: {}", notable.join(", ")));
        }
        lines.join("\n")
    }

    fn gender_table(&self, counter: &CategoryCounter) -> String {
        self.share_table(
            &["Gender", "Count", "% of humans"],
            counter,
            counter.get(KEY_HUMANS),
            Some(KEY_HUMANS),
            |code| gender_label(code).to_string(),
        )
    }

    fn region_table(&self, counter: &CategoryCounter) -> String {
        self.share_table(
            &["Region", "Count", "% of region-tagged"],
            counter,
            counter.get(KEY_REGIONS),
            Some(KEY_REGIONS),
            |region| region.to_string(),
        )
    }

    /// Build a label/count/share table sorted by descending count.
    ///
    /// `skip` drops the denominator's own key from the rows; a zero
    /// denominator renders every share as "N/A" rather than failing.
    fn share_table(
        &self,
        header: &[&str; 3],
        counter: &CategoryCounter,
        denominator: u64,
        skip: Option<&str>,
        label: impl Fn(&str) -> String,
    ) -> String {
        let rows: Vec<(&str, u64)> = counter
            .sorted_by_count_desc()
            .into_iter()
            .filter(|(key, _)| Some(*key) != skip)
            .collect();
        if rows.is_empty() {
            return self.colorize("  (no data)", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(*header);
        for (key, count) in rows {
            builder.push_record([
                label(key),
                count.to_string(),
                format_share(count, denominator),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn heading(&self, text: &str) -> String {
        self.colorize(text, "blue")
    }

    /// Apply color if enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "yellow" => text.yellow().to_string(),
            "blue" => text.blue().to_string(),
            _ => text.to_string(),
        }
    }
}

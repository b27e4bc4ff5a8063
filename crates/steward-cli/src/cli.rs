//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Steward CLI - evaluate suggested-edit recommendation candidates.
#[derive(Debug, Parser)]
#[command(name = "steward")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate image caption recommendation candidates
    Captions(EvalArgs),

    /// Evaluate description recommendation candidates
    Descriptions(EvalArgs),

    /// WikiProject taxonomy tools
    Taxonomy(TaxonomyArgs),
}

/// Arguments shared by the evaluation commands.
#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// Target wiki language (e.g. en, ar)
    #[arg(short, long, default_value = "en")]
    pub lang: String,

    /// Number of sampling rounds (50 candidates each)
    #[arg(short, long, default_value = "1")]
    pub rounds: usize,

    /// Override the pause between batch requests (seconds)
    #[arg(long)]
    pub delay_secs: Option<u64>,
}

/// Arguments for taxonomy tools.
#[derive(Debug, Parser)]
pub struct TaxonomyArgs {
    #[command(subcommand)]
    pub action: TaxonomyAction,
}

/// Taxonomy subcommands.
#[derive(Debug, Subcommand)]
pub enum TaxonomyAction {
    /// Invert a taxonomy file into a label → topics mapping
    Invert {
        /// YAML file with the nested topic taxonomy
        #[arg(short, long)]
        taxonomy: PathBuf,

        /// Wiki database the labels come from (e.g. enwiki)
        #[arg(short, long, default_value = "enwiki")]
        wiki: String,
    },

    /// Assign topics to articles and dump them as JSON lines
    Dump {
        /// YAML file with the nested topic taxonomy
        #[arg(short, long)]
        taxonomy: PathBuf,

        /// JSON-lines file with article assessment records
        #[arg(short, long)]
        articles: PathBuf,

        /// Output JSON-lines file
        #[arg(short, long)]
        output: PathBuf,

        /// Wiki database the article templates come from
        #[arg(short, long, default_value = "enwiki")]
        wiki: String,

        /// JSON-lines file with cross-language WikiProject sitelinks
        /// (required for non-English wikis)
        #[arg(short, long)]
        sitelinks: Option<PathBuf>,
    },

    /// Fetch cross-language sitelinks for WikiProject items
    Sitelinks {
        /// File with one WikiProject item id per line
        #[arg(short, long)]
        qids: PathBuf,

        /// Output JSON-lines file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captions_command() {
        let cli = Cli::parse_from(["steward", "captions", "--lang", "ar", "--rounds", "5"]);
        match cli.command {
            Command::Captions(args) => {
                assert_eq!(args.lang, "ar");
                assert_eq!(args.rounds, 5);
                assert_eq!(args.delay_secs, None);
            }
            _ => panic!("Expected Captions command"),
        }
    }

    #[test]
    fn test_descriptions_defaults() {
        let cli = Cli::parse_from(["steward", "descriptions"]);
        match cli.command {
            Command::Descriptions(args) => {
                assert_eq!(args.lang, "en");
                assert_eq!(args.rounds, 1);
            }
            _ => panic!("Expected Descriptions command"),
        }
    }

    #[test]
    fn test_taxonomy_invert_command() {
        let cli = Cli::parse_from([
            "steward",
            "taxonomy",
            "invert",
            "--taxonomy",
            "taxonomy.yaml",
            "--wiki",
            "frwiki",
        ]);
        match cli.command {
            Command::Taxonomy(args) => match args.action {
                TaxonomyAction::Invert { taxonomy, wiki } => {
                    assert_eq!(taxonomy, PathBuf::from("taxonomy.yaml"));
                    assert_eq!(wiki, "frwiki");
                }
                _ => panic!("Expected Invert action"),
            },
            _ => panic!("Expected Taxonomy command"),
        }
    }
}

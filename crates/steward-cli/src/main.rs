//! Steward CLI - evaluate suggested-edit recommendation candidates.

use clap::Parser;
use steward_cli::commands;
use steward_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> steward_cli::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load an explicit config strictly; fall back to defaults (and write
    // them out) only for the implicit path
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|_| {
            let cfg = Config::default();
            cfg.save().ok();
            cfg
        }),
    };

    let formatter = Formatter::new(!cli.no_color);

    match &cli.command {
        Command::Captions(args) => commands::execute_captions(args, &config, &formatter).await?,
        Command::Descriptions(args) => {
            commands::execute_descriptions(args, &config, &formatter).await?
        }
        Command::Taxonomy(args) => {
            commands::execute_taxonomy(&args.action, &config, &formatter).await?
        }
    }

    Ok(())
}

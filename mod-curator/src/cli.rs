//! CLI surface for mod-curator: argument parsing and command routing.
//!
//! All pipeline logic lives in `mod-curator-core`; this module loads config,
//! builds the HTTP catalog client, and prints the run summary.
//!
//! - `sync`: regenerate the curated list from the tracked list and the catalog
//! - `show`: look up one mod in an existing curated list
use crate::catalog::CatalogClient;
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mod_curator_core::index::CuratedIndex;
use mod_curator_core::model::ModId;
use mod_curator_core::synchronise::synchronise;
use std::path::PathBuf;

/// CLI for mod-curator: keep a curated mod list in sync with the catalog.
#[derive(Parser)]
#[clap(
    name = "mod-curator",
    version,
    about = "Regenerate a curated mod list from a tracked list and the remote mod catalog"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate the curated list using the given config file
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Run the whole pipeline but do not write the curated list
        #[clap(long)]
        dry_run: bool,
    },
    /// Print one curated record as JSON
    Show {
        /// Path to a curated list file
        #[clap(long)]
        list: PathBuf,
        /// Mod id to look up
        #[clap(long)]
        id: ModId,
    },
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { config, dry_run } => {
            let mut config = load_config(config)?;
            config.sync.dry_run |= dry_run;
            tracing::info!(command = "sync", dry_run = config.sync.dry_run, "Starting synchronisation process");

            let catalog =
                CatalogClient::new(&config.catalog).context("Failed to construct catalog client")?;

            println!("Synchronise starting...");
            match synchronise(&config.sync, &catalog).await {
                Ok(report) => {
                    tracing::info!(command = "sync", ?report, "Synchronisation complete");
                    println!("Synchronise complete.");
                    print!("{}", report.render_summary());
                    Ok(())
                }
                Err(failure) => {
                    tracing::error!(command = "sync", error = %failure, "Synchronisation failed");
                    println!("Synchronise aborted. Partial report:");
                    print!("{}", failure.partial.render_summary());
                    Err(anyhow::Error::new(failure))
                }
            }
        }
        Commands::Show { list, id } => {
            let index = CuratedIndex::load(&list)
                .with_context(|| format!("Failed to load curated list {list:?}"))?;
            match index.get(id) {
                Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
                None => println!("Mod {id} is not in the curated list"),
            }
            Ok(())
        }
    }
}

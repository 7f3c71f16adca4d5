//! newsrack
//!
//! Terminal reader for a News Rack periodical directory.
//!
//! # Usage
//!
//! ```bash
//! newsrack tree [--directory PATH] [--expanded] [--json]
//! newsrack labels [--directory PATH] [--now RFC3339] [--absolute] [--json]
//! newsrack search QUERY [--directory PATH] [--now RFC3339] [--json]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/newsrack/config.toml)
//! 3. Environment variables (NEWSRACK_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use rack_cli::{init_tracing, load_settings, run_labels, run_search, run_tree, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let input = match &cli.command {
        Commands::Tree { input, .. }
        | Commands::Labels { input, .. }
        | Commands::Search { input, .. } => input,
    };
    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref(), input)?;
    init_tracing(&settings)?;

    match &cli.command {
        Commands::Tree { input, expanded } => {
            run_tree(&settings, input, *expanded)?;
        }
        Commands::Labels { input, absolute } => {
            run_labels(&settings, input, *absolute)?;
        }
        Commands::Search { query, input } => {
            run_search(&settings, input, query).await?;
        }
    }

    Ok(())
}

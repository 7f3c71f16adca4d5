//! CLI argument parsing for the newsrack reader.
//!
//! CLI flags override every other config source.

use clap::{Args, Parser, Subcommand};

/// News Rack directory reader
///
/// Browse, date and search a periodical directory from the terminal.
#[derive(Parser, Debug)]
#[command(name = "newsrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/newsrack/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Directory JSON file (default from config)
    #[arg(short, long)]
    pub directory: Option<String>,

    /// Reference time for relative dates, RFC 3339 (default: now)
    #[arg(long)]
    pub now: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Reader commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the category/document/article tree
    Tree {
        #[command(flatten)]
        input: InputArgs,

        /// Expand every category and document
        #[arg(long)]
        expanded: bool,
    },

    /// Print publication labels for every document
    Labels {
        #[command(flatten)]
        input: InputArgs,

        /// Show absolute dates, as when hovered
        #[arg(long)]
        absolute: bool,
    },

    /// Search the directory and print what remains visible
    Search {
        /// Query text
        query: String,

        #[command(flatten)]
        input: InputArgs,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_tree() {
        let cli = Cli::parse_from(["newsrack", "tree", "--expanded"]);
        match cli.command {
            Commands::Tree { expanded, input } => {
                assert!(expanded);
                assert!(input.directory.is_none());
                assert!(!input.json);
            }
            _ => panic!("Expected Tree command"),
        }
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["newsrack", "--config", "/path/to/config.toml", "tree"]);
        assert_eq!(cli.config, Some("/path/to/config.toml".to_string()));
    }

    #[test]
    fn test_cli_with_log_level() {
        let cli = Cli::parse_from(["newsrack", "labels", "--log-level", "debug"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_labels_with_now() {
        let cli = Cli::parse_from([
            "newsrack",
            "labels",
            "--now",
            "2024-01-08T00:00:00Z",
            "--absolute",
            "--json",
        ]);
        match cli.command {
            Commands::Labels { input, absolute } => {
                assert!(absolute);
                assert!(input.json);
                assert_eq!(input.now.as_deref(), Some("2024-01-08T00:00:00Z"));
            }
            _ => panic!("Expected Labels command"),
        }
    }

    #[test]
    fn test_cli_search() {
        let cli = Cli::parse_from(["newsrack", "search", "rust", "-d", "/tmp/directory.json"]);
        match cli.command {
            Commands::Search { query, input } => {
                assert_eq!(query, "rust");
                assert_eq!(input.directory.as_deref(), Some("/tmp/directory.json"));
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_requires_query() {
        assert!(Cli::try_parse_from(["newsrack", "search"]).is_err());
    }
}

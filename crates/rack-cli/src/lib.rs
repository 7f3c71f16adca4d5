//! newsrack library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (tree, labels, search)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, InputArgs};
pub use commands::{
    collect_labels, expand_all, init_tracing, load_model, load_settings, open_session, parse_now,
    render_tree, run_labels, run_search, run_tree, search, LabelReport, SearchReport,
};

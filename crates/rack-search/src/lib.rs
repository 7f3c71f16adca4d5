//! # rack-search
//!
//! Full-text search over the News Rack directory using Tantivy.
//!
//! One record is indexed per periodical issue (title, article titles, tags,
//! category name). Queries return BM25-ranked matches together with the
//! fields each match was found in, which drives how much of the hierarchy
//! gets expanded to reveal it.
//!
//! ## Features
//! - In-RAM Tantivy index built once per session
//! - English stemming on every searchable field
//! - Per-field match detection for each hit
//! - Background construction on the blocking pool

pub mod builder;
pub mod document;
pub mod error;
pub mod index;
pub mod schema;
pub mod searcher;

pub use builder::SearchIndexBuilder;
pub use document::IndexRecord;
pub use error::SearchError;
pub use index::{DirectoryIndex, SearchIndexConfig};
pub use schema::{build_directory_schema, MatchField, SearchSchema};
pub use searcher::MatchResult;

//! # rack-types
//!
//! Shared domain types for the News Rack directory.
//!
//! This crate defines the core data structures used throughout the system:
//! - Nodes: Category, Document (one periodical issue) and Article entries
//! - HierarchyModel: read-only traversal over the materialized tree
//! - Directory: the JSON input the tree is built from
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use rack_types::{Directory, HierarchyModel};
//!
//! let directory = Directory::from_json(r#"{"categories": []}"#).unwrap();
//! let model = HierarchyModel::from_directory(&directory).unwrap();
//! assert!(model.is_empty());
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod hierarchy;
pub mod node;

pub use config::{SearchSettings, Settings, TimeSettings};
pub use directory::{slugify, CategoryEntry, Directory, DocumentEntry};
pub use error::RackError;
pub use hierarchy::{HierarchyBuilder, HierarchyModel, ARTICLE_ID_SEPARATOR};
pub use node::{DocumentContent, Node, NodeId, NodeKind};

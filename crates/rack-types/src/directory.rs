//! Directory input format.
//!
//! The listing arrives pre-built as nested categories, documents and
//! article strings. Timestamps are epoch milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RackError;

/// The whole directory as supplied by the site generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    /// When the listing was last regenerated
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub refreshed_at: Option<DateTime<Utc>>,

    /// Categories in display order
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
}

/// A category and its periodicals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Stable id; derived from the name when omitted
    #[serde(default)]
    pub id: Option<String>,

    /// Display name
    pub name: String,

    /// Documents in display order
    #[serde(default)]
    pub documents: Vec<DocumentEntry>,
}

impl CategoryEntry {
    /// The category id, `cat-{slug}` when not given explicitly.
    pub fn resolved_id(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("cat-{}", slugify(&self.name)))
    }
}

/// One issue of a periodical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: String,
    pub title: String,

    /// Publication time; absent for periodicals that are not available
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub cover_url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Article titles in document order
    #[serde(default)]
    pub articles: Vec<String>,
}

impl Directory {
    /// Parse a directory from JSON text.
    pub fn from_json(input: &str) -> Result<Self, RackError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Total number of documents across all categories.
    pub fn document_count(&self) -> usize {
        self.categories.iter().map(|c| c.documents.len()).sum()
    }
}

/// Lowercase, ASCII-alphanumeric slug with single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

//! Hierarchy node types.
//!
//! The directory is a three-level hierarchy:
//! Category -> Document -> Article

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a node in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Level in the directory hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Category,
    Document,
    Article,
}

impl NodeKind {
    /// Get the parent kind, if any
    pub fn parent(&self) -> Option<NodeKind> {
        match self {
            NodeKind::Category => None,
            NodeKind::Document => Some(NodeKind::Category),
            NodeKind::Article => Some(NodeKind::Document),
        }
    }

    /// Get the child kind, if any
    pub fn child(&self) -> Option<NodeKind> {
        match self {
            NodeKind::Category => Some(NodeKind::Document),
            NodeKind::Document => Some(NodeKind::Article),
            NodeKind::Article => None,
        }
    }

    /// Whether nodes of this kind carry an expansion flag.
    pub fn is_expandable(&self) -> bool {
        !matches!(self, NodeKind::Article)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Category => write!(f, "category"),
            NodeKind::Document => write!(f, "document"),
            NodeKind::Article => write!(f, "article"),
        }
    }
}

/// A node in the directory hierarchy.
///
/// Categories have no parent, Documents belong to a Category and
/// Articles belong to a Document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Level in the hierarchy
    pub kind: NodeKind,

    /// Display title (category name, issue title, or article text)
    pub title: String,

    /// Tags, in source order without duplicates
    #[serde(default)]
    pub tags: Vec<String>,

    /// Parent node, None for categories
    #[serde(default)]
    pub parent_id: Option<NodeId>,

    /// Publication time (documents only; None means "not available")
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Node {
    pub fn category(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Category,
            title: name.into(),
            tags: Vec::new(),
            parent_id: None,
            published_at: None,
        }
    }

    pub fn document(
        id: impl Into<NodeId>,
        title: impl Into<String>,
        category_id: NodeId,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Document,
            title: title.into(),
            tags: Vec::new(),
            parent_id: Some(category_id),
            published_at,
        }
    }

    pub fn article(id: impl Into<NodeId>, text: impl Into<String>, document_id: NodeId) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Article,
            title: text.into(),
            tags: Vec::new(),
            parent_id: Some(document_id),
            published_at: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.clear();
        for tag in tags {
            let tag = tag.into();
            let tag = tag.trim();
            if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
                self.tags.push(tag.to_string());
            }
        }
        self
    }

    /// Tags rendered the way the listing shows them: `#a #b`.
    pub fn tags_label(&self) -> Option<String> {
        if self.tags.is_empty() {
            return None;
        }
        Some(
            self.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// Lazily injected content shown when a document is first opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContent {
    /// Cover image URL
    #[serde(default)]
    pub cover_url: Option<String>,

    /// Description markup
    #[serde(default)]
    pub description: Option<String>,
}

impl DocumentContent {
    pub fn is_empty(&self) -> bool {
        self.cover_url.is_none() && self.description.is_none()
    }
}

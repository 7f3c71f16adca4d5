//! Record extraction from the hierarchy and mapping to Tantivy documents.

use tantivy::doc;
use tantivy::TantivyDocument;

use rack_types::{HierarchyModel, Node, NodeId};

use crate::schema::SearchSchema;

/// Searchable text derived from one document of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Document node id
    pub id: NodeId,
    /// Issue title
    pub title: String,
    /// Child article titles joined with single spaces, in document order
    pub articles_text: String,
    /// Tags joined with single spaces
    pub tags: String,
    /// Parent category display name
    pub category: String,
}

impl IndexRecord {
    /// Build the record for one document node.
    pub fn from_document(model: &HierarchyModel, document: &Node) -> Self {
        let articles_text = model
            .children(&document.id)
            .map(|a| a.title.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let category = model
            .category_of(&document.id)
            .map(|c| c.title.clone())
            .unwrap_or_default();

        Self {
            id: document.id.clone(),
            title: document.title.clone(),
            articles_text,
            tags: document.tags.join(" "),
            category,
        }
    }

    /// One record per document, in document order.
    pub fn from_model(model: &HierarchyModel) -> Vec<IndexRecord> {
        model
            .documents()
            .map(|d| Self::from_document(model, d))
            .collect()
    }

    /// Convert to a Tantivy document.
    pub fn to_doc(&self, schema: &SearchSchema) -> TantivyDocument {
        doc!(
            schema.doc_id => self.id.as_str(),
            schema.title => self.title.as_str(),
            schema.articles_text => self.articles_text.as_str(),
            schema.tags => self.tags.as_str(),
            schema.category => self.category.as_str()
        )
    }
}

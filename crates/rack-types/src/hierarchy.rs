//! Read-only view over the Category -> Document -> Article tree.
//!
//! Nodes are stored in document order (pre-order traversal), so iterating
//! any level yields nodes in the order the listing displays them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::directory::Directory;
use crate::error::RackError;
use crate::node::{DocumentContent, Node, NodeId, NodeKind};

/// Separator between a document id and an article's index in article ids.
pub const ARTICLE_ID_SEPARATOR: char = '#';

/// Immutable hierarchy built once at startup.
#[derive(Debug, Clone, Default)]
pub struct HierarchyModel {
    nodes: Vec<Node>,
    positions: HashMap<NodeId, usize>,
    children: Vec<Vec<usize>>,
    contents: HashMap<NodeId, DocumentContent>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl HierarchyModel {
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::default()
    }

    /// Materialize the model from directory input.
    ///
    /// Article ids are derived as `{document_id}#{index}`; `#` is reserved
    /// and rejected in category and document ids.
    pub fn from_directory(directory: &Directory) -> Result<Self, RackError> {
        let mut builder = Self::builder().refreshed_at(directory.refreshed_at);

        for category in &directory.categories {
            let category_id = NodeId::from(category.resolved_id());
            builder = builder.category(Node::category(category_id.clone(), &category.name))?;

            for entry in &category.documents {
                let document_id = NodeId::from(entry.id.as_str());
                let document = Node::document(
                    document_id.clone(),
                    &entry.title,
                    category_id.clone(),
                    entry.published_at,
                )
                .with_tags(entry.tags.iter().cloned());
                let content = DocumentContent {
                    cover_url: entry.cover_url.clone(),
                    description: entry.description.clone(),
                };
                builder = builder.document(document, content)?;

                for (i, article) in entry.articles.iter().enumerate() {
                    let article_id =
                        NodeId::from(format!("{}{}{}", document_id, ARTICLE_ID_SEPARATOR, i));
                    builder = builder.article(Node::article(
                        article_id,
                        article,
                        document_id.clone(),
                    ))?;
                }
            }
        }

        Ok(builder.build())
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.positions.get(id).map(|&i| &self.nodes[i])
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Node> + '_ {
        self.of_kind(NodeKind::Category)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Node> + '_ {
        self.of_kind(NodeKind::Document)
    }

    pub fn articles(&self) -> impl Iterator<Item = &Node> + '_ {
        self.of_kind(NodeKind::Article)
    }

    fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Direct children of a node, in document order. Empty for unknown ids.
    pub fn children(&self, id: &NodeId) -> impl Iterator<Item = &Node> + '_ {
        let indices: &[usize] = self
            .positions
            .get(id)
            .map(|&i| self.children[i].as_slice())
            .unwrap_or(&[]);
        indices.iter().map(move |&i| &self.nodes[i])
    }

    pub fn parent(&self, id: &NodeId) -> Option<&Node> {
        self.node(id)?
            .parent_id
            .as_ref()
            .and_then(|parent| self.node(parent))
    }

    /// The category a document belongs to.
    pub fn category_of(&self, document_id: &NodeId) -> Option<&Node> {
        let document = self.node(document_id)?;
        if document.kind != NodeKind::Document {
            return None;
        }
        self.parent(document_id)
    }

    /// Cover/description for a document, if it has any.
    pub fn content(&self, document_id: &NodeId) -> Option<&DocumentContent> {
        self.contents.get(document_id)
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.documents().count()
    }
}

/// Builds a [`HierarchyModel`], checking parent kinds and id uniqueness.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    model: HierarchyModel,
}

impl HierarchyBuilder {
    pub fn refreshed_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.model.refreshed_at = at;
        self
    }

    pub fn category(self, node: Node) -> Result<Self, RackError> {
        self.push(node, NodeKind::Category)
    }

    pub fn document(mut self, node: Node, content: DocumentContent) -> Result<Self, RackError> {
        let id = node.id.clone();
        self = self.push(node, NodeKind::Document)?;
        if !content.is_empty() {
            self.model.contents.insert(id, content);
        }
        Ok(self)
    }

    pub fn article(self, node: Node) -> Result<Self, RackError> {
        self.push(node, NodeKind::Article)
    }

    fn push(mut self, node: Node, expected: NodeKind) -> Result<Self, RackError> {
        if node.kind != expected {
            return Err(RackError::InvalidInput(format!(
                "{} added as {}",
                node.kind, expected
            )));
        }
        if expected != NodeKind::Article && node.id.as_str().contains(ARTICLE_ID_SEPARATOR) {
            return Err(RackError::InvalidInput(format!(
                "{} id {} contains reserved '{}'",
                node.kind, node.id, ARTICLE_ID_SEPARATOR
            )));
        }
        if self.model.positions.contains_key(&node.id) {
            return Err(RackError::DuplicateNode(node.id.to_string()));
        }

        let parent_index = match (&node.parent_id, expected.parent()) {
            (None, None) => None,
            (Some(parent_id), Some(parent_kind)) => {
                let &index = self
                    .model
                    .positions
                    .get(parent_id)
                    .ok_or_else(|| RackError::NotFound(parent_id.to_string()))?;
                if self.model.nodes[index].kind != parent_kind {
                    return Err(RackError::InvalidInput(format!(
                        "{} {} must belong to a {}",
                        node.kind, node.id, parent_kind
                    )));
                }
                Some(index)
            }
            (Some(_), None) => {
                return Err(RackError::InvalidInput(format!(
                    "{} {} cannot have a parent",
                    node.kind, node.id
                )))
            }
            (None, Some(parent_kind)) => {
                return Err(RackError::InvalidInput(format!(
                    "{} {} must belong to a {}",
                    node.kind, node.id, parent_kind
                )))
            }
        };

        let index = self.model.nodes.len();
        self.model.positions.insert(node.id.clone(), index);
        self.model.nodes.push(node);
        self.model.children.push(Vec::new());
        if let Some(parent) = parent_index {
            self.model.children[parent].push(index);
        }
        Ok(self)
    }

    pub fn build(self) -> HierarchyModel {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_model() -> HierarchyModel {
        let json = r#"{
            "categories": [
                { "id": "cat-tech", "name": "Tech", "documents": [
                    { "id": "d1", "title": "Weekly Digest", "published_at": 1704067200000,
                      "tags": ["ai", "ml"], "description": "<p>Digest</p>",
                      "articles": ["Rust adoption grows", "GPU prices fall"] },
                    { "id": "d2", "title": "Gadget Review", "articles": [] }
                ]},
                { "id": "cat-world", "name": "World", "documents": [
                    { "id": "d3", "title": "Daily Brief", "articles": ["Elections"] }
                ]}
            ]
        }"#;
        HierarchyModel::from_directory(&Directory::from_json(json).unwrap()).unwrap()
    }

    #[test]
    fn test_levels_in_document_order() {
        let model = sample_model();
        let categories: Vec<_> = model.categories().map(|n| n.id.as_str()).collect();
        assert_eq!(categories, vec!["cat-tech", "cat-world"]);

        let documents: Vec<_> = model.documents().map(|n| n.id.as_str()).collect();
        assert_eq!(documents, vec!["d1", "d2", "d3"]);
        assert_eq!(model.articles().count(), 3);
        assert_eq!(model.len(), 8);
    }

    #[test]
    fn test_children_and_parents() {
        let model = sample_model();
        let d1 = NodeId::from("d1");

        let articles: Vec<_> = model.children(&d1).map(|n| n.title.as_str()).collect();
        assert_eq!(articles, vec!["Rust adoption grows", "GPU prices fall"]);

        let article = NodeId::from("d1#1");
        assert_eq!(model.parent(&article).unwrap().id, d1);
        assert_eq!(model.category_of(&d1).unwrap().title, "Tech");
        assert!(model.category_of(&article).is_none());
        assert_eq!(model.children(&NodeId::from("missing")).count(), 0);
    }

    #[test]
    fn test_document_fields() {
        let model = sample_model();
        let d1 = model.node(&NodeId::from("d1")).unwrap();
        assert_eq!(d1.tags, vec!["ai".to_string(), "ml".to_string()]);
        assert_eq!(
            d1.published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(model.content(&NodeId::from("d1")).is_some());
        assert!(model.content(&NodeId::from("d2")).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = HierarchyModel::builder()
            .category(Node::category("cat-a", "A"))
            .and_then(|b| b.category(Node::category("cat-a", "Again")));
        assert!(matches!(result, Err(RackError::DuplicateNode(id)) if id == "cat-a"));
    }

    #[test]
    fn test_article_under_category_rejected() {
        let result = HierarchyModel::builder()
            .category(Node::category("cat-a", "A"))
            .and_then(|b| b.article(Node::article("x", "text", NodeId::from("cat-a"))));
        assert!(matches!(result, Err(RackError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let result = HierarchyModel::builder().document(
            Node::document("d1", "Doc", NodeId::from("cat-missing"), None),
            DocumentContent::default(),
        );
        assert!(matches!(result, Err(RackError::NotFound(_))));
    }

    #[test]
    fn test_slash_in_document_id_does_not_collide_with_articles() {
        let json = r#"{"categories": [{ "id": "cat-a", "name": "A", "documents": [
            { "id": "a", "title": "First", "articles": ["One", "Two"] },
            { "id": "a/0", "title": "Second", "articles": ["Three"] }
        ]}]}"#;
        let model = HierarchyModel::from_directory(&Directory::from_json(json).unwrap()).unwrap();

        assert_eq!(model.document_count(), 2);
        assert_eq!(model.node(&NodeId::from("a/0")).unwrap().kind, NodeKind::Document);
        assert_eq!(model.node(&NodeId::from("a#0")).unwrap().title, "One");
        assert_eq!(model.node(&NodeId::from("a/0#0")).unwrap().title, "Three");
    }

    #[test]
    fn test_reserved_separator_in_document_id_rejected() {
        let json = r#"{"categories": [{ "id": "cat-a", "name": "A", "documents": [
            { "id": "a", "title": "First", "articles": ["One"] },
            { "id": "a#0", "title": "Second" }
        ]}]}"#;
        let result = HierarchyModel::from_directory(&Directory::from_json(json).unwrap());
        assert!(matches!(result, Err(RackError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_directory() {
        let model = HierarchyModel::from_directory(&Directory::default()).unwrap();
        assert!(model.is_empty());
        assert_eq!(model.document_count(), 0);
    }
}

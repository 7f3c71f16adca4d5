//! One-shot index construction.
//!
//! The directory is static for a session, so the index is built exactly
//! once and never incrementally updated.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use rack_types::HierarchyModel;

use crate::document::IndexRecord;
use crate::error::SearchError;
use crate::index::{create_index, create_writer, DirectoryIndex, SearchIndexConfig};

/// Builds a [`DirectoryIndex`] from index records.
#[derive(Debug, Clone, Default)]
pub struct SearchIndexBuilder {
    config: SearchIndexConfig,
}

impl SearchIndexBuilder {
    pub fn new(config: SearchIndexConfig) -> Self {
        Self { config }
    }

    /// Index every record and commit once.
    ///
    /// An empty slice is legal and yields an index that matches nothing.
    pub fn build(&self, records: &[IndexRecord]) -> Result<DirectoryIndex, SearchError> {
        let started = Instant::now();
        let (index, schema) = create_index()?;
        let mut writer = create_writer(&index, &self.config)?;

        for record in records {
            writer.add_document(record.to_doc(&schema))?;
            debug!(doc_id = %record.id, "Indexed document");
        }

        let opstamp = writer.commit()?;
        let directory_index = DirectoryIndex::open(index, schema)?;

        info!(
            documents = records.len(),
            opstamp,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built directory index"
        );

        Ok(directory_index)
    }

    /// Extract records from the hierarchy and build.
    pub fn build_from_model(&self, model: &HierarchyModel) -> Result<DirectoryIndex, SearchError> {
        self.build(&IndexRecord::from_model(model))
    }

    /// Build on the blocking pool so the caller can keep handling commands.
    ///
    /// Queries must not be issued until this resolves.
    pub async fn build_in_background(
        self,
        model: Arc<HierarchyModel>,
    ) -> Result<DirectoryIndex, SearchError> {
        tokio::task::spawn_blocking(move || self.build_from_model(&model))
            .await
            .map_err(|e| SearchError::Build(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rack_types::{Directory, NodeId};

    fn sample_model() -> HierarchyModel {
        let json = r#"{
            "categories": [
                { "id": "cat-tech", "name": "Tech", "documents": [
                    { "id": "d1", "title": "Weekly Digest", "articles": ["Rust adoption grows"] },
                    { "id": "d2", "title": "Gadget Review" }
                ]}
            ]
        }"#;
        HierarchyModel::from_directory(&Directory::from_json(json).unwrap()).unwrap()
    }

    #[test]
    fn test_build_from_model() {
        let index = SearchIndexBuilder::default()
            .build_from_model(&sample_model())
            .unwrap();
        assert_eq!(index.num_docs(), 2);
    }

    #[test]
    fn test_build_empty_corpus() {
        let index = SearchIndexBuilder::default().build(&[]).unwrap();
        assert!(index.is_empty());
        assert!(index.query("anything").is_empty());
    }

    #[tokio::test]
    async fn test_build_in_background() {
        let model = Arc::new(sample_model());
        let index = SearchIndexBuilder::default()
            .build_in_background(model)
            .await
            .unwrap();

        let results = index.query("rust");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, NodeId::from("d1"));
    }
}

//! Tantivy index management.
//!
//! The directory index lives in RAM: it is built once per session from the
//! static hierarchy and never updated afterwards.

use tantivy::query::QueryParser;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::debug;

use rack_types::SearchSettings;

use crate::error::SearchError;
use crate::schema::{build_directory_schema, SearchSchema};

/// Default memory budget for IndexWriter (50MB)
const DEFAULT_WRITER_MEMORY_MB: usize = 50;

/// Search index configuration
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// Memory budget for writer in MB
    pub writer_memory_mb: usize,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }
}

impl SearchIndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }
}

impl From<&SearchSettings> for SearchIndexConfig {
    fn from(settings: &SearchSettings) -> Self {
        Self::new().with_memory_mb(settings.writer_memory_mb)
    }
}

/// Create an empty in-RAM index with the directory schema.
pub(crate) fn create_index() -> Result<(Index, SearchSchema), SearchError> {
    let schema = build_directory_schema();
    let index = Index::create_in_ram(schema.schema().clone());
    let schema = SearchSchema::from_schema(index.schema())?;
    Ok((index, schema))
}

/// Create a single-threaded writer so documents land in one segment in
/// insertion order.
pub(crate) fn create_writer(
    index: &Index,
    config: &SearchIndexConfig,
) -> Result<IndexWriter, SearchError> {
    let memory_budget = config.writer_memory_mb * 1024 * 1024;
    let writer = index.writer_with_num_threads(1, memory_budget)?;
    debug!(memory_mb = config.writer_memory_mb, "Created index writer");
    Ok(writer)
}

/// Built, read-only directory index with one query parser over all
/// searchable fields.
pub struct DirectoryIndex {
    pub(crate) index: Index,
    pub(crate) reader: IndexReader,
    pub(crate) schema: SearchSchema,
    pub(crate) query_parser: QueryParser,
}

impl DirectoryIndex {
    /// Open a reader over a committed index.
    pub(crate) fn open(index: Index, schema: SearchSchema) -> Result<Self, SearchError> {
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        let query_parser = QueryParser::for_index(&index, schema.text_fields());

        debug!("Opened directory index reader");

        Ok(Self {
            index,
            reader,
            schema,
            query_parser,
        })
    }

    /// Get the search schema
    pub fn schema(&self) -> &SearchSchema {
        &self.schema
    }

    /// Get the underlying Tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Get the number of indexed documents.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    pub fn is_empty(&self) -> bool {
        self.num_docs() == 0
    }
}

impl std::fmt::Debug for DirectoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryIndex")
            .field("num_docs", &self.num_docs())
            .finish()
    }
}

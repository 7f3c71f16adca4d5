//! Query execution with per-field match detection.
//!
//! Results keep Tantivy's BM25 order. The fields a hit matched in are found
//! by grouping the parsed query's terms by field and checking which field's
//! term set contains the hit, so `title:weekly` only ever reports `title`.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tantivy::collector::{DocSetCollector, TopDocs};
use tantivy::query::{BooleanQuery, Query};
use tantivy::schema::Value;
use tantivy::{DocAddress, TantivyDocument, Term};
use tracing::{debug, info, warn};

use rack_types::NodeId;

use crate::error::SearchError;
use crate::index::DirectoryIndex;
use crate::schema::MatchField;

/// A matching document with the fields the query hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Document node id
    pub id: NodeId,
    /// BM25 relevance score
    pub score: f32,
    /// Fields in which a query term was found
    pub matched_fields: BTreeSet<MatchField>,
}

impl MatchResult {
    pub fn new(id: impl Into<NodeId>, matched_fields: impl IntoIterator<Item = MatchField>) -> Self {
        Self {
            id: id.into(),
            score: 0.0,
            matched_fields: matched_fields.into_iter().collect(),
        }
    }

    /// Whether the hit was inside the article list.
    pub fn matched_articles(&self) -> bool {
        self.matched_fields.contains(&MatchField::ArticlesText)
    }
}

impl DirectoryIndex {
    /// Search the directory, swallowing failures.
    ///
    /// Syntax errors are tolerated by the lenient parser; anything else is
    /// logged and reported as no matches.
    pub fn query(&self, text: &str) -> Vec<MatchResult> {
        match self.try_query(text) {
            Ok(results) => results,
            Err(e) => {
                warn!(query = text, error = %e, "Search failed, returning no results");
                Vec::new()
            }
        }
    }

    /// Search the directory, returning results in relevance order.
    pub fn try_query(&self, text: &str) -> Result<Vec<MatchResult>, SearchError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let limit = (searcher.num_docs() as usize).max(1);

        let (query, errors) = self.query_parser.parse_query_lenient(text);
        if !errors.is_empty() {
            debug!(query = text, errors = errors.len(), "Ignored query syntax errors");
        }

        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;
        if top_docs.is_empty() {
            info!(query = text, results = 0, "Directory search complete");
            return Ok(Vec::new());
        }

        let field_hits = self.field_hits(&searcher, query.as_ref())?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let doc_id = doc
                .get_first(self.schema.doc_id)
                .and_then(|v| v.as_str())
                .ok_or(SearchError::MissingField("doc_id"))?;

            let matched_fields = MatchField::ALL
                .iter()
                .filter(|f| {
                    field_hits
                        .get(*f)
                        .is_some_and(|hits| hits.contains(&doc_address))
                })
                .copied()
                .collect();

            results.push(MatchResult {
                id: NodeId::from(doc_id),
                score,
                matched_fields,
            });
        }

        info!(
            query = text,
            results = results.len(),
            "Directory search complete"
        );

        Ok(results)
    }

    /// Doc sets containing at least one of the query's terms, per field.
    ///
    /// Fields the query never mentions are absent from the map.
    fn field_hits(
        &self,
        searcher: &tantivy::Searcher,
        query: &dyn Query,
    ) -> Result<HashMap<MatchField, HashSet<DocAddress>>, SearchError> {
        let mut terms: HashMap<MatchField, Vec<Term>> = HashMap::new();
        query.query_terms(&mut |term, _| {
            if let Some(field) = self.schema.match_field(term.field()) {
                terms.entry(field).or_default().push(term.clone());
            }
        });

        let mut hits = HashMap::with_capacity(terms.len());
        for (field, field_terms) in terms {
            let field_query = BooleanQuery::new_multiterms_query(field_terms);
            hits.insert(field, searcher.search(&field_query, &DocSetCollector)?);
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SearchIndexBuilder;
    use crate::document::IndexRecord;

    fn record(id: &str, title: &str, articles: &str, tags: &str, category: &str) -> IndexRecord {
        IndexRecord {
            id: NodeId::from(id),
            title: title.to_string(),
            articles_text: articles.to_string(),
            tags: tags.to_string(),
            category: category.to_string(),
        }
    }

    fn setup_index() -> DirectoryIndex {
        let records = vec![
            record("d1", "Weekly Digest", "Rust adoption grows", "ai ml", "Tech"),
            record("d2", "Rust Monthly", "Borrow checker deep dive", "", "Tech"),
            record("d3", "Daily Brief", "Elections results", "politics", "World"),
        ];
        SearchIndexBuilder::default().build(&records).unwrap()
    }

    #[test]
    fn test_match_in_articles() {
        let index = setup_index();

        let results = index.query("adoption");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, NodeId::from("d1"));
        assert!(results[0].matched_articles());
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_matched_fields_per_result() {
        let index = setup_index();

        let results = index.query("rust");
        assert_eq!(results.len(), 2);

        let by_id: HashMap<_, _> = results.iter().map(|r| (r.id.as_str(), r)).collect();
        assert_eq!(
            by_id["d1"].matched_fields,
            BTreeSet::from([MatchField::ArticlesText])
        );
        assert_eq!(by_id["d2"].matched_fields, BTreeSet::from([MatchField::Title]));
    }

    #[test]
    fn test_match_in_tags_and_category() {
        let index = setup_index();

        let tags = index.query("politics");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].matched_fields, BTreeSet::from([MatchField::Tags]));

        let category = index.query("world");
        assert_eq!(category.len(), 1);
        assert_eq!(category[0].id, NodeId::from("d3"));
        assert_eq!(
            category[0].matched_fields,
            BTreeSet::from([MatchField::Category])
        );
    }

    #[test]
    fn test_field_prefixed_query_reports_only_that_field() {
        let index = setup_index();

        let results = index.query("title:weekly");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, NodeId::from("d1"));
        assert_eq!(results[0].matched_fields, BTreeSet::from([MatchField::Title]));
        assert!(!results[0].matched_articles());
    }

    #[test]
    fn test_mixed_prefixed_and_default_terms() {
        let index = setup_index();

        // "rust" is searched in every field, "tech" only in category
        let results = index.query("rust category:tech");
        let by_id: HashMap<_, _> = results.iter().map(|r| (r.id.as_str(), r)).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(
            by_id["d1"].matched_fields,
            BTreeSet::from([MatchField::ArticlesText, MatchField::Category])
        );
        assert_eq!(
            by_id["d2"].matched_fields,
            BTreeSet::from([MatchField::Title, MatchField::Category])
        );
    }

    #[test]
    fn test_stemming() {
        let index = setup_index();

        let results = index.query("election");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, NodeId::from("d3"));
    }

    #[test]
    fn test_results_ranked_by_relevance() {
        let index = setup_index();

        let results = index.query("rust");
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_no_results_for_nonexistent_term() {
        let index = setup_index();
        assert!(index.query("xyz-no-match").is_empty());
        assert!(index.query("nonexistentterm12345").is_empty());
    }

    #[test]
    fn test_empty_and_whitespace_query() {
        let index = setup_index();
        assert!(index.query("").is_empty());
        assert!(index.query("   ").is_empty());
    }

    #[test]
    fn test_syntax_errors_are_swallowed() {
        let index = setup_index();
        // Unbalanced quote and dangling field prefix
        let results = index.query("\"rust");
        assert!(results.iter().all(|r| !r.id.as_str().is_empty()));
        assert!(index.query("title:").is_empty());
        assert!(index.try_query("title:").is_ok());
    }

    #[test]
    fn test_query_is_deterministic() {
        let index = setup_index();
        assert_eq!(index.query("rust"), index.query("rust"));
    }

    #[test]
    fn test_match_result_serialization() {
        let result = MatchResult::new("d1", [MatchField::ArticlesText, MatchField::Title]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], "d1");
        assert_eq!(json["matched_fields"][0], "title");
        assert_eq!(json["matched_fields"][1], "articlesText");
    }
}

//! Projection of ranked search results onto the hierarchy.
//!
//! Rules:
//! - a document is visible iff it is in the result set
//! - every category stays visible; it is expanded iff it has a visible
//!   document
//! - a matched document's article list is opened only when the match was
//!   inside it; title, tag or category matches keep the current state
//! - articles follow their document's visibility
//!
//! When no document ends up visible everything is hidden and expansion
//! flags are left as they were.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rack_search::MatchResult;
use rack_types::{HierarchyModel, NodeId};

use crate::visibility::{VisibilityMap, VisibilityState};

/// Summary of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionOutcome {
    /// Nothing matched; every category and document is hidden
    NoResults,
    /// Number of documents left visible
    Matches(usize),
}

/// Target visibility state for every node after a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub states: VisibilityMap,
    pub outcome: ProjectionOutcome,
}

/// Maps search results to visibility state. Stateless and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultProjector;

impl ResultProjector {
    /// Compute the state of every node for `results`.
    ///
    /// `current` supplies the expansion flags that a projection keeps.
    pub fn project(
        results: &[MatchResult],
        model: &HierarchyModel,
        current: &VisibilityMap,
    ) -> Projection {
        let matched: HashMap<&NodeId, &MatchResult> =
            results.iter().map(|r| (&r.id, r)).collect();

        let mut states = VisibilityMap::default();
        let mut visible_documents = 0usize;
        let mut visible_categories = Vec::new();

        for category in model.categories() {
            let mut category_has_match = false;

            for document in model.children(&category.id) {
                let previous = current.get_or_baseline(&document.id);
                let state = match matched.get(&document.id) {
                    Some(result) => VisibilityState::new(
                        true,
                        result.matched_articles() || previous.expanded,
                    ),
                    None => VisibilityState::hidden(previous.expanded),
                };

                if state.visible {
                    category_has_match = true;
                    visible_documents += 1;
                }

                for article in model.children(&document.id) {
                    states.insert(article.id.clone(), VisibilityState::new(state.visible, false));
                }
                states.insert(document.id.clone(), state);
            }

            if category_has_match {
                visible_categories.push(category.id.clone());
            }
        }

        let outcome = if visible_documents == 0 {
            ProjectionOutcome::NoResults
        } else {
            ProjectionOutcome::Matches(visible_documents)
        };

        for category in model.categories() {
            let state = match outcome {
                ProjectionOutcome::NoResults => {
                    VisibilityState::hidden(current.get_or_baseline(&category.id).expanded)
                }
                ProjectionOutcome::Matches(_) => {
                    VisibilityState::new(true, visible_categories.contains(&category.id))
                }
            };
            states.insert(category.id.clone(), state);
        }

        let unknown = results.iter().filter(|r| model.node(&r.id).is_none()).count();
        debug!(
            results = results.len(),
            visible_documents,
            visible_categories = visible_categories.len(),
            unknown,
            "Projected search results"
        );

        Projection { states, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rack_search::MatchField;
    use rack_types::Directory;

    fn sample_model() -> HierarchyModel {
        let json = r#"{
            "categories": [
                { "id": "cat-tech", "name": "Tech", "documents": [
                    { "id": "d1", "title": "Weekly Digest", "tags": ["ai", "ml"],
                      "articles": ["Rust adoption grows"] },
                    { "id": "d2", "title": "Gadget Review", "articles": ["Phones"] }
                ]},
                { "id": "cat-world", "name": "World", "documents": [
                    { "id": "d3", "title": "Daily Brief", "articles": ["Elections"] }
                ]}
            ]
        }"#;
        HierarchyModel::from_directory(&Directory::from_json(json).unwrap()).unwrap()
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_articles_match_expands_document_and_category() {
        let model = sample_model();
        let current = VisibilityMap::baseline(&model);
        let results = vec![MatchResult::new("d1", [MatchField::ArticlesText])];

        let projection = ResultProjector::project(&results, &model, &current);

        assert_eq!(projection.outcome, ProjectionOutcome::Matches(1));
        assert_eq!(projection.states.get(&id("d1")), Some(VisibilityState::new(true, true)));
        assert_eq!(
            projection.states.get(&id("cat-tech")),
            Some(VisibilityState::new(true, true))
        );
        assert!(projection.states.is_visible(&id("d1#0")));
    }

    #[test]
    fn test_unmatched_documents_hidden_and_categories_collapsed() {
        let model = sample_model();
        let current = VisibilityMap::baseline(&model);
        let results = vec![MatchResult::new("d1", [MatchField::ArticlesText])];

        let projection = ResultProjector::project(&results, &model, &current);

        assert!(!projection.states.is_visible(&id("d2")));
        assert!(!projection.states.is_visible(&id("d2#0")));
        assert_eq!(
            projection.states.get(&id("cat-world")),
            Some(VisibilityState::new(true, false))
        );
        assert!(!projection.states.is_visible(&id("d3")));
        assert!(!projection.states.is_visible(&id("d3#0")));
    }

    #[test]
    fn test_tags_match_keeps_collapsed_document() {
        let model = sample_model();
        let current = VisibilityMap::baseline(&model);
        let results = vec![MatchResult::new("d1", [MatchField::Tags])];

        let projection = ResultProjector::project(&results, &model, &current);

        assert_eq!(projection.states.get(&id("d1")), Some(VisibilityState::new(true, false)));
        assert!(projection.states.is_expanded(&id("cat-tech")));
    }

    #[test]
    fn test_title_match_keeps_open_document_open() {
        let model = sample_model();
        let mut current = VisibilityMap::baseline(&model);
        current.insert(id("d2"), VisibilityState::new(true, true));
        let results = vec![MatchResult::new("d2", [MatchField::Title])];

        let projection = ResultProjector::project(&results, &model, &current);

        assert!(projection.states.is_expanded(&id("d2")));
    }

    #[test]
    fn test_every_result_visible_every_other_hidden() {
        let model = sample_model();
        let current = VisibilityMap::baseline(&model);
        let results = vec![
            MatchResult::new("d3", [MatchField::Category]),
            MatchResult::new("d1", [MatchField::Title]),
        ];

        let projection = ResultProjector::project(&results, &model, &current);

        assert_eq!(projection.outcome, ProjectionOutcome::Matches(2));
        for document in model.documents() {
            let in_results = results.iter().any(|r| r.id == document.id);
            assert_eq!(projection.states.is_visible(&document.id), in_results);
        }
        assert!(projection.states.is_expanded(&id("cat-world")));
    }

    #[test]
    fn test_matches_keep_every_category_header_visible() {
        let model = sample_model();
        let mut current = VisibilityMap::baseline(&model);
        current.insert(id("cat-world"), VisibilityState::new(true, true));
        let results = vec![MatchResult::new("d2", [MatchField::Title])];

        let projection = ResultProjector::project(&results, &model, &current);

        for category in model.categories() {
            assert!(projection.states.is_visible(&category.id), "{} hidden", category.id);
        }
        assert!(projection.states.is_expanded(&id("cat-tech")));
        assert!(!projection.states.is_expanded(&id("cat-world")));
    }

    #[test]
    fn test_empty_results_hide_everything() {
        let model = sample_model();
        let mut current = VisibilityMap::baseline(&model);
        current.insert(id("cat-tech"), VisibilityState::new(true, true));

        let projection = ResultProjector::project(&[], &model, &current);

        assert_eq!(projection.outcome, ProjectionOutcome::NoResults);
        for node in model.nodes() {
            assert!(!projection.states.is_visible(&node.id), "{} visible", node.id);
        }
        // Expansion flags are left alone
        assert!(projection.states.is_expanded(&id("cat-tech")));
    }

    #[test]
    fn test_unknown_result_ids_ignored() {
        let model = sample_model();
        let current = VisibilityMap::baseline(&model);
        let results = vec![MatchResult::new("ghost", [MatchField::Title])];

        let projection = ResultProjector::project(&results, &model, &current);

        assert_eq!(projection.outcome, ProjectionOutcome::NoResults);
        assert!(projection.states.get(&id("ghost")).is_none());
        assert_eq!(projection.states.len(), model.len());
    }

    #[test]
    fn test_projection_is_deterministic() {
        let model = sample_model();
        let current = VisibilityMap::baseline(&model);
        let results = vec![
            MatchResult::new("d1", [MatchField::Tags]),
            MatchResult::new("d2", [MatchField::ArticlesText]),
        ];

        let a = ResultProjector::project(&results, &model, &current);
        let b = ResultProjector::project(&results, &model, &current);
        assert_eq!(a, b);
    }
}

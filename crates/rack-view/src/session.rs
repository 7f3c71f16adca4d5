//! Reader session: the command handlers behind the listing page.
//!
//! A session owns the hierarchy, the visibility controller, the selected
//! time formatter and the search slot. Search stays disabled until the
//! background build hands over a [`DirectoryIndex`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rack_search::DirectoryIndex;
use rack_types::{HierarchyModel, NodeId, NodeKind, SearchSettings};

use crate::controller::{ClickTarget, DocumentToggle, JumpOutcome, VisibilityController};
use crate::error::ViewError;
use crate::labels::{self, DateLabel, DateMode};
use crate::projector::{ProjectionOutcome, ResultProjector};
use crate::time::TimeFormatter;
use crate::visibility::VisibilityMap;

/// Placeholder shown while the index is being built.
pub const INDEXING_PLACEHOLDER: &str = "Indexing search...";
/// Placeholder once search is available.
pub const SEARCH_PLACEHOLDER: &str = "Search";
pub const NO_RESULTS_MESSAGE: &str = "No results.";

/// The search index, once built.
#[derive(Debug)]
pub enum SearchSlot {
    Pending,
    Ready(DirectoryIndex),
}

impl SearchSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, SearchSlot::Ready(_))
    }
}

/// State of the search input and button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchControls {
    pub enabled: bool,
    pub placeholder: String,
}

impl SearchControls {
    fn pending() -> Self {
        Self {
            enabled: false,
            placeholder: INDEXING_PLACEHOLDER.to_string(),
        }
    }

    fn ready() -> Self {
        Self {
            enabled: true,
            placeholder: SEARCH_PLACEHOLDER.to_string(),
        }
    }
}

/// Outcome of submitting a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Index still building; nothing changed
    NotReady,
    /// Below the minimum length; nothing changed
    TooShort,
    NoResults,
    Matches(usize),
}

/// Pointer entering or leaving a date label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverEvent {
    Enter,
    Leave,
}

pub struct ReaderSession {
    model: Arc<HierarchyModel>,
    controller: VisibilityController,
    formatter: TimeFormatter,
    settings: SearchSettings,
    search: SearchSlot,
    controls: SearchControls,
    status: Option<String>,
    date_modes: HashMap<NodeId, DateMode>,
}

impl ReaderSession {
    pub fn new(model: Arc<HierarchyModel>, formatter: TimeFormatter, settings: SearchSettings) -> Self {
        info!(
            nodes = model.len(),
            documents = model.document_count(),
            formatter = formatter.strategy_name(),
            "Reader session started"
        );
        Self {
            controller: VisibilityController::new(Arc::clone(&model)),
            model,
            formatter,
            settings,
            search: SearchSlot::Pending,
            controls: SearchControls::pending(),
            status: None,
            date_modes: HashMap::new(),
        }
    }

    pub fn model(&self) -> &Arc<HierarchyModel> {
        &self.model
    }

    pub fn states(&self) -> &VisibilityMap {
        self.controller.states()
    }

    pub fn controls(&self) -> &SearchControls {
        &self.controls
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn search(&self) -> &SearchSlot {
        &self.search
    }

    pub fn formatter(&self) -> &TimeFormatter {
        &self.formatter
    }

    /// The background build finished.
    pub fn on_index_ready(&mut self, index: DirectoryIndex) {
        info!(documents = index.num_docs(), "Search enabled");
        self.search = SearchSlot::Ready(index);
        self.controls = SearchControls::ready();
    }

    pub fn on_submit_query(&mut self, text: &str) -> QueryStatus {
        self.status = None;

        let SearchSlot::Ready(index) = &self.search else {
            debug!(query = text, "Query submitted before index was ready");
            return QueryStatus::NotReady;
        };

        let query = text.trim();
        if query.chars().count() < self.settings.min_query_chars {
            self.status = Some(format!(
                "Search text must be at least {} characters long.",
                self.settings.min_query_chars
            ));
            return QueryStatus::TooShort;
        }

        let results = index.query(query);
        let projection = ResultProjector::project(&results, &self.model, self.controller.states());
        match self.controller.apply_projection(projection) {
            ProjectionOutcome::NoResults => {
                self.status = Some(NO_RESULTS_MESSAGE.to_string());
                if self.settings.reset_on_no_results {
                    self.controller.reset();
                }
                QueryStatus::NoResults
            }
            ProjectionOutcome::Matches(n) => QueryStatus::Matches(n),
        }
    }

    /// Clearing the search box restores the full listing.
    pub fn on_search_text_changed(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.status = None;
            self.controller.reset();
        }
    }

    pub fn on_category_header_click(
        &mut self,
        id: &NodeId,
        target: ClickTarget,
    ) -> Result<Option<bool>, ViewError> {
        self.controller.handle_category_click(id, target)
    }

    pub fn on_document_header_click(&mut self, id: &NodeId) -> Result<DocumentToggle, ViewError> {
        self.controller.toggle_document(id)
    }

    pub fn on_jump_to_category(&mut self, id: &NodeId) -> Result<JumpOutcome, ViewError> {
        self.controller.jump_to_category(id)
    }

    /// Hovering a date shows it in absolute form; leaving shows it relative
    /// to `now` again.
    pub fn on_date_hover(
        &mut self,
        id: &NodeId,
        event: HoverEvent,
        now: DateTime<Utc>,
    ) -> Result<DateLabel, ViewError> {
        let document = self
            .model
            .node(id)
            .ok_or_else(|| ViewError::UnknownNode(id.clone()))?;
        if document.kind != NodeKind::Document {
            return Err(ViewError::WrongKind {
                id: id.clone(),
                expected: NodeKind::Document,
                actual: document.kind,
            });
        }

        let mode = match event {
            HoverEvent::Enter => DateMode::Absolute,
            HoverEvent::Leave => DateMode::Relative,
        };
        self.date_modes.insert(id.clone(), mode);
        Ok(labels::publication_label(&self.formatter, document, mode, now))
    }

    /// Labels for every document in listing order.
    pub fn date_labels(&self, now: DateTime<Utc>) -> Vec<(NodeId, DateLabel)> {
        self.model
            .documents()
            .map(|document| {
                let mode = self.date_modes.get(&document.id).copied().unwrap_or_default();
                (
                    document.id.clone(),
                    labels::publication_label(&self.formatter, document, mode, now),
                )
            })
            .collect()
    }

    pub fn refreshed_label(&self, now: DateTime<Utc>) -> DateLabel {
        labels::refreshed_label(&self.formatter, self.model.refreshed_at(), now)
    }
}

impl std::fmt::Debug for ReaderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSession")
            .field("controller", &self.controller)
            .field("formatter", &self.formatter)
            .field("search_ready", &self.search.is_ready())
            .field("status", &self.status)
            .finish()
    }
}

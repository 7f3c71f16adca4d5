//! Visibility controller.
//!
//! Owns the [`VisibilityMap`] and is the only place it is mutated. Header
//! toggles, the jump shortcut, search projections and resets all go through
//! here.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rack_types::{DocumentContent, HierarchyModel, Node, NodeId, NodeKind};

use crate::error::ViewError;
use crate::projector::{Projection, ProjectionOutcome};
use crate::visibility::{VisibilityMap, VisibilityState};

/// Where inside a category header a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    Header,
    /// A link inside the header; never toggles
    Link,
}

/// Result of toggling a document header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentToggle {
    pub expanded: bool,
    /// Cover and description, returned on the first toggle only
    pub content: Option<DocumentContent>,
}

/// Result of the close shortcut at the bottom of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpOutcome {
    pub expanded: bool,
    /// The category header should be scrolled back into view
    pub scroll_into_view: bool,
}

pub struct VisibilityController {
    model: Arc<HierarchyModel>,
    states: VisibilityMap,
    injected: HashSet<NodeId>,
}

impl VisibilityController {
    /// Start from the baseline: everything visible, everything collapsed.
    pub fn new(model: Arc<HierarchyModel>) -> Self {
        let states = VisibilityMap::baseline(&model);
        Self {
            model,
            states,
            injected: HashSet::new(),
        }
    }

    pub fn model(&self) -> &Arc<HierarchyModel> {
        &self.model
    }

    pub fn states(&self) -> &VisibilityMap {
        &self.states
    }

    pub fn state(&self, id: &NodeId) -> Result<VisibilityState, ViewError> {
        self.states
            .get(id)
            .ok_or_else(|| ViewError::UnknownNode(id.clone()))
    }

    /// Flip a category's expansion. Returns the new flag.
    pub fn toggle_category(&mut self, id: &NodeId) -> Result<bool, ViewError> {
        self.expect_kind(id, NodeKind::Category)?;
        let expanded = self.flip(id)?;
        debug!(category = %id, expanded, "Toggled category");
        Ok(expanded)
    }

    /// Click on a category header. Clicks on links inside the header are
    /// ignored and return None.
    pub fn handle_category_click(
        &mut self,
        id: &NodeId,
        target: ClickTarget,
    ) -> Result<Option<bool>, ViewError> {
        match target {
            ClickTarget::Header => self.toggle_category(id).map(Some),
            ClickTarget::Link => {
                self.expect_kind(id, NodeKind::Category)?;
                debug!(category = %id, "Ignored link click in category header");
                Ok(None)
            }
        }
    }

    /// Flip a document's expansion, handing out its content the first time.
    pub fn toggle_document(&mut self, id: &NodeId) -> Result<DocumentToggle, ViewError> {
        self.expect_kind(id, NodeKind::Document)?;
        let expanded = self.flip(id)?;

        let content = if self.injected.insert(id.clone()) {
            let content = self.model.content(id).cloned().unwrap_or_default();
            debug!(document = %id, empty = content.is_empty(), "Injected document content");
            Some(content)
        } else {
            None
        };

        debug!(document = %id, expanded, "Toggled document");
        Ok(DocumentToggle { expanded, content })
    }

    pub fn jump_to_category(&mut self, id: &NodeId) -> Result<JumpOutcome, ViewError> {
        let expanded = self.toggle_category(id)?;
        Ok(JumpOutcome {
            expanded,
            scroll_into_view: !expanded,
        })
    }

    /// Replace the whole map with a projection.
    pub fn apply_projection(&mut self, projection: Projection) -> ProjectionOutcome {
        let outcome = projection.outcome;
        self.states = projection.states;
        info!(outcome = ?outcome, "Applied search projection");
        outcome
    }

    /// Back to the baseline. Content already injected stays injected.
    pub fn reset(&mut self) {
        self.states = VisibilityMap::baseline(&self.model);
        debug!(nodes = self.states.len(), "Reset visibility");
    }

    /// Whether a document's content has been handed out.
    pub fn is_injected(&self, id: &NodeId) -> bool {
        self.injected.contains(id)
    }

    fn expect_kind(&self, id: &NodeId, expected: NodeKind) -> Result<&Node, ViewError> {
        let node = self
            .model
            .node(id)
            .ok_or_else(|| ViewError::UnknownNode(id.clone()))?;
        if node.kind != expected {
            return Err(ViewError::WrongKind {
                id: id.clone(),
                expected,
                actual: node.kind,
            });
        }
        Ok(node)
    }

    fn flip(&mut self, id: &NodeId) -> Result<bool, ViewError> {
        let state = self
            .states
            .get_mut(id)
            .ok_or_else(|| ViewError::UnknownNode(id.clone()))?;
        state.expanded = !state.expanded;
        Ok(state.expanded)
    }
}

impl std::fmt::Debug for VisibilityController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityController")
            .field("nodes", &self.model.len())
            .field("injected", &self.injected.len())
            .finish()
    }
}

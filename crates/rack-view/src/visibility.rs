//! Per-node visibility and expansion flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rack_types::{HierarchyModel, NodeId};

/// Display state of one node.
///
/// `expanded` is only meaningful for categories and documents and stays
/// false for articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    pub visible: bool,
    pub expanded: bool,
}

impl VisibilityState {
    /// Visible and collapsed.
    pub const BASELINE: VisibilityState = VisibilityState {
        visible: true,
        expanded: false,
    };

    pub fn new(visible: bool, expanded: bool) -> Self {
        Self { visible, expanded }
    }

    pub fn hidden(expanded: bool) -> Self {
        Self {
            visible: false,
            expanded,
        }
    }
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Visibility state for every node of a hierarchy, ordered by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityMap(BTreeMap<NodeId, VisibilityState>);

impl VisibilityMap {
    /// Every node visible, every category and document collapsed.
    pub fn baseline(model: &HierarchyModel) -> Self {
        Self(
            model
                .nodes()
                .map(|n| (n.id.clone(), VisibilityState::BASELINE))
                .collect(),
        )
    }

    pub fn get(&self, id: &NodeId) -> Option<VisibilityState> {
        self.0.get(id).copied()
    }

    /// State of a node, treating unknown ids as baseline.
    pub fn get_or_baseline(&self, id: &NodeId) -> VisibilityState {
        self.get(id).unwrap_or_default()
    }

    pub(crate) fn insert(&mut self, id: NodeId, state: VisibilityState) {
        self.0.insert(id, state);
    }

    pub(crate) fn get_mut(&mut self, id: &NodeId) -> Option<&mut VisibilityState> {
        self.0.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &VisibilityState)> + '_ {
        self.0.iter()
    }

    pub fn is_visible(&self, id: &NodeId) -> bool {
        self.get(id).is_some_and(|s| s.visible)
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.get(id).is_some_and(|s| s.expanded)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//! Expand/collapse state shared by every view.
//!
//! The state is a plain set of expanded ids. It is independent of the
//! active filter and of the view that renders it, and it only changes
//! through the transitions on [`ExpansionController`].

use super::error::OrganigramError;
use super::model::NodeId;
use super::tree::OrgTree;
use serde::Serialize;
use std::collections::BTreeSet;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ExpansionState {
    #[schema(value_type = Vec<String>)]
    expanded: BTreeSet<NodeId>,
}

impl ExpansionState {
    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.expanded.iter()
    }
}

/// Net effect of one transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExpansionChange {
    Toggled {
        id: NodeId,
        expanded: bool,
    },
    /// `opened` lists the ancestors that were collapsed before the call.
    PathExpanded {
        target: NodeId,
        opened: Vec<NodeId>,
    },
    CollapsedAll {
        collapsed: usize,
    },
    ExpandedAll {
        opened: usize,
    },
}

impl ExpansionChange {
    /// Member the change is about, if it concerns a single member.
    pub fn subject(&self) -> Option<&NodeId> {
        match self {
            ExpansionChange::Toggled { id, .. } => Some(id),
            ExpansionChange::PathExpanded { target, .. } => Some(target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpansionController {
    state: ExpansionState,
}

impl ExpansionController {
    /// Everything collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the container chain of a deep-link target opened.
    pub fn with_path(tree: &OrgTree, target: &NodeId) -> Result<Self, OrganigramError> {
        let mut controller = Self::new();
        controller.expand_path(tree, target)?;
        Ok(controller)
    }

    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.state.is_expanded(id)
    }

    pub fn toggle(&mut self, tree: &OrgTree, id: &NodeId) -> Result<ExpansionChange, OrganigramError> {
        ensure_known(tree, id)?;

        let expanded = if self.state.expanded.remove(id) {
            false
        } else {
            self.state.expanded.insert(id.clone());
            true
        };
        log::debug!("Toggled organigram member '{}' (expanded: {})", id, expanded);

        Ok(ExpansionChange::Toggled {
            id: id.clone(),
            expanded,
        })
    }

    /// Opens every ancestor of `id`, leaving `id` itself and all other
    /// branches as they were.
    pub fn expand_path(
        &mut self,
        tree: &OrgTree,
        id: &NodeId,
    ) -> Result<ExpansionChange, OrganigramError> {
        ensure_known(tree, id)?;

        let mut opened: Vec<NodeId> = tree
            .ancestors(id)
            .filter(|ancestor| self.state.expanded.insert(ancestor.id.clone()))
            .map(|ancestor| ancestor.id.clone())
            .collect();
        // Root first reads better in announcements and logs.
        opened.reverse();
        log::debug!(
            "Expanded path to organigram member '{}' ({} newly opened)",
            id,
            opened.len()
        );

        Ok(ExpansionChange::PathExpanded {
            target: id.clone(),
            opened,
        })
    }

    pub fn collapse_all(&mut self) -> ExpansionChange {
        let collapsed = self.state.expanded.len();
        self.state.expanded.clear();
        ExpansionChange::CollapsedAll { collapsed }
    }

    /// Expands every member that has children.
    pub fn expand_all(&mut self, tree: &OrgTree) -> ExpansionChange {
        let mut opened = 0;
        for node in tree.nodes() {
            if tree.has_children(&node.id) && self.state.expanded.insert(node.id.clone()) {
                opened += 1;
            }
        }
        ExpansionChange::ExpandedAll { opened }
    }
}

fn ensure_known(tree: &OrgTree, id: &NodeId) -> Result<(), OrganigramError> {
    if tree.contains(id) {
        Ok(())
    } else {
        Err(OrganigramError::UnknownNode(id.clone()))
    }
}

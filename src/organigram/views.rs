//! Read-only projections consumed by the three renderers.
//!
//! The card hierarchy and the diagram render the same member set: visible
//! members reachable from a root through expanded members only. The finder
//! renders search results restricted to visible members and ignores
//! expansion.

use super::expansion::ExpansionState;
use super::filter::FilteredView;
use super::model::{Department, NodeId, OrgNode};
use super::search::{MatchTier, SearchIndex};
use super::tree::OrgTree;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// Rendered tree members in pre-order (parents before children, siblings in
/// input order).
pub fn rendered_ids(tree: &OrgTree, view: &FilteredView, expansion: &ExpansionState) -> Vec<NodeId> {
    let mut rendered = Vec::new();
    let mut stack: Vec<&NodeId> = tree.roots().filter(|id| view.is_visible(id)).collect();
    stack.reverse();

    while let Some(id) = stack.pop() {
        rendered.push(id.clone());
        if expansion.is_expanded(id) {
            let children: Vec<&NodeId> = tree.children(id).filter(|c| view.is_visible(c)).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    rendered
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardNode {
    pub id: NodeId,
    pub name: String,
    pub title: String,
    pub position_short: Option<String>,
    pub department: Department,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub expanded: bool,
    /// Visible children, whether or not they are rendered.
    pub child_count: usize,
    #[schema(no_recursion)]
    pub children: Vec<CardNode>,
}

/// Collapsible card hierarchy.
pub fn card_hierarchy(
    tree: &OrgTree,
    view: &FilteredView,
    expansion: &ExpansionState,
) -> Vec<CardNode> {
    tree.roots()
        .filter(|id| view.is_visible(id))
        .filter_map(|id| card(tree, view, expansion, id))
        .collect()
}

fn card(
    tree: &OrgTree,
    view: &FilteredView,
    expansion: &ExpansionState,
    id: &NodeId,
) -> Option<CardNode> {
    let node = tree.get(id)?;
    let visible: Vec<&NodeId> = tree.children(id).filter(|c| view.is_visible(c)).collect();
    let expanded = expansion.is_expanded(id);
    let children = if expanded {
        visible
            .iter()
            .filter_map(|child| card(tree, view, expansion, child))
            .collect()
    } else {
        Vec::new()
    };

    Some(CardNode {
        id: node.id.clone(),
        name: node.name.clone(),
        title: node.title.clone(),
        position_short: node.position_short.clone(),
        department: node.department,
        email: node.email.clone(),
        phone: node.phone.clone(),
        image_url: node.image_url.clone(),
        expanded,
        child_count: visible.len(),
        children,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    pub id: NodeId,
    pub label: String,
    pub title: String,
    pub department: Department,
    /// Depth below the root, i.e. the diagram row.
    pub level: usize,
    /// Horizontal position in leaf slots; parents sit centered over their
    /// rendered children.
    pub x: f32,
    pub expanded: bool,
    pub has_children: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DiagramEdge {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub width: usize,
    pub depth: usize,
}

/// Node-link diagram with a layered layout.
pub fn diagram(tree: &OrgTree, view: &FilteredView, expansion: &ExpansionState) -> Diagram {
    let mut layout = DiagramLayout {
        tree,
        view,
        expansion,
        next_slot: 0,
        depth: 0,
        nodes: Vec::new(),
        edges: Vec::new(),
    };
    for root in tree.roots().filter(|id| view.is_visible(id)) {
        layout.place(root, 0);
    }

    // Placement is post-order; renderers expect pre-order like the cards.
    let order = rendered_ids(tree, view, expansion);
    let rank: HashMap<&NodeId, usize> = order.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let mut nodes = layout.nodes;
    nodes.sort_by_key(|n| rank.get(&n.id).copied());

    Diagram {
        width: layout.next_slot,
        depth: layout.depth,
        nodes,
        edges: layout.edges,
    }
}

struct DiagramLayout<'a> {
    tree: &'a OrgTree,
    view: &'a FilteredView,
    expansion: &'a ExpansionState,
    next_slot: usize,
    depth: usize,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
}

impl DiagramLayout<'_> {
    fn place(&mut self, id: &NodeId, level: usize) -> f32 {
        let tree = self.tree;
        let visible: Vec<&NodeId> = tree.children(id).filter(|c| self.view.is_visible(c)).collect();
        let expanded = self.expansion.is_expanded(id);
        self.depth = self.depth.max(level + 1);

        let x = if expanded && !visible.is_empty() {
            let mut child_xs = Vec::with_capacity(visible.len());
            for child in &visible {
                self.edges.push(DiagramEdge {
                    from: id.clone(),
                    to: (*child).clone(),
                });
                child_xs.push(self.place(child, level + 1));
            }
            match (child_xs.first(), child_xs.last()) {
                (Some(first), Some(last)) => (first + last) / 2.0,
                _ => 0.0,
            }
        } else {
            let slot = self.next_slot as f32;
            self.next_slot += 1;
            slot
        };

        if let Some(node) = tree.get(id) {
            self.nodes.push(DiagramNode {
                id: node.id.clone(),
                label: node.label().to_string(),
                title: node.title.clone(),
                department: node.department,
                level,
                x,
                expanded,
                has_children: !visible.is_empty(),
            });
        }
        x
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Crumb {
    pub id: NodeId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinderEntry {
    pub id: NodeId,
    pub name: String,
    pub title: String,
    pub department: Department,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub responsibilities: String,
    pub tier: MatchTier,
    /// Ancestors from the root down to the direct parent.
    pub path: Vec<Crumb>,
}

/// Responsibility finder results. Expansion state does not apply here.
pub fn finder(
    tree: &OrgTree,
    index: &SearchIndex,
    view: &FilteredView,
    query: &str,
) -> Vec<FinderEntry> {
    index
        .search_ranked(query)
        .into_iter()
        .filter(|hit| view.is_visible(hit.node_id))
        .filter_map(|hit| {
            let node = tree.get(hit.node_id)?;
            Some(finder_entry(tree, node, hit.tier))
        })
        .collect()
}

fn finder_entry(tree: &OrgTree, node: &OrgNode, tier: MatchTier) -> FinderEntry {
    let mut path: Vec<Crumb> = tree
        .ancestors(&node.id)
        .map(|ancestor| Crumb {
            id: ancestor.id.clone(),
            label: ancestor.label().to_string(),
        })
        .collect();
    path.reverse();

    FinderEntry {
        id: node.id.clone(),
        name: node.name.clone(),
        title: node.title.clone(),
        department: node.department,
        email: node.email.clone(),
        phone: node.phone.clone(),
        responsibilities: node.responsibilities.clone(),
        tier,
        path,
    }
}

//! Tree builder: turns the flat, parent-pointer member list into a validated
//! parent -> children structure.
//!
//! Validation happens once, here. Everything downstream (filtering, search,
//! expansion, views) trusts that the tree is acyclic and that every id is
//! unique.

use super::error::{TreeError, TreeWarning};
use super::model::{NodeId, OrgNode};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct OrgTree {
    nodes: Vec<OrgNode>,
    index: HashMap<NodeId, usize>,
    /// Parent after orphan promotion; `None` for roots.
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    warnings: Vec<TreeWarning>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

impl OrgTree {
    /// Builds the tree from members in CMS order.
    ///
    /// Members whose `parent_id` does not resolve are promoted to roots and
    /// reported through [`OrgTree::warnings`]. This changes the hierarchy
    /// shape instead of failing the whole organigram; a chart missing one
    /// branch link is still useful.
    pub fn build(members: Vec<OrgNode>) -> Result<Self, TreeError> {
        let mut index = HashMap::with_capacity(members.len());
        for (position, node) in members.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(TreeError::DuplicateId(node.id.clone()));
            }
        }

        let mut warnings = Vec::new();
        let parents: Vec<Option<usize>> = members
            .iter()
            .map(|node| {
                let parent_id = node.parent_id.as_ref()?;
                match index.get(parent_id) {
                    Some(&parent) => Some(parent),
                    None => {
                        log::warn!(
                            "Organigram member '{}' references unknown parent '{}', promoting to root",
                            node.id,
                            parent_id
                        );
                        warnings.push(TreeWarning::OrphanPromoted {
                            node_id: node.id.clone(),
                            missing_parent: parent_id.clone(),
                        });
                        None
                    }
                }
            })
            .collect();

        detect_cycles(&members, &parents)?;

        let mut children = vec![Vec::new(); members.len()];
        let mut roots = Vec::new();
        for (position, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => children[*parent].push(position),
                None => roots.push(position),
            }
        }

        log::debug!(
            "Built organigram tree: {} members, {} roots, {} warnings",
            members.len(),
            roots.len(),
            warnings.len()
        );

        Ok(Self {
            nodes: members,
            index,
            parents,
            children,
            roots,
            warnings,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&OrgNode> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    /// Members in input order.
    pub fn nodes(&self) -> &[OrgNode] {
        &self.nodes
    }

    /// Position of a member in the input list.
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn roots(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.roots.iter().map(move |&position| &self.nodes[position].id)
    }

    /// Children in input order. Empty for unknown ids.
    pub fn children(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> + '_ {
        self.index
            .get(id)
            .map(|&position| self.children[position].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&child| &self.nodes[child].id)
    }

    pub fn has_children(&self, id: &NodeId) -> bool {
        self.index
            .get(id)
            .is_some_and(|&position| !self.children[position].is_empty())
    }

    /// Effective parent, i.e. `None` for roots and promoted orphans.
    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        let position = *self.index.get(id)?;
        self.parents[position].map(|parent| &self.nodes[parent].id)
    }

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors<'a>(&'a self, id: &NodeId) -> Ancestors<'a> {
        Ancestors {
            tree: self,
            next: self.index.get(id).and_then(|&position| self.parents[position]),
        }
    }

    pub fn warnings(&self) -> &[TreeWarning] {
        &self.warnings
    }
}

pub struct Ancestors<'a> {
    tree: &'a OrgTree,
    next: Option<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a OrgNode;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.next?;
        self.next = self.tree.parents[position];
        Some(&self.tree.nodes[position])
    }
}

/// Three-color walk along parent pointers. Each member has at most one
/// parent, so following the chain until a finished or on-path member is
/// found visits every member once overall.
fn detect_cycles(members: &[OrgNode], parents: &[Option<usize>]) -> Result<(), TreeError> {
    let mut marks = vec![Mark::Unvisited; members.len()];
    let mut path = Vec::new();

    for start in 0..members.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        let mut current = Some(start);
        while let Some(position) = current {
            match marks[position] {
                Mark::Done => break,
                Mark::OnPath => {
                    let cycle_start = path
                        .iter()
                        .position(|&p| p == position)
                        .unwrap_or_default();
                    let ids = path[cycle_start..]
                        .iter()
                        .map(|&p: &usize| members[p].id.clone())
                        .collect();
                    return Err(TreeError::CycleDetected(ids));
                }
                Mark::Unvisited => {
                    marks[position] = Mark::OnPath;
                    path.push(position);
                    current = parents[position];
                }
            }
        }

        for position in path.drain(..) {
            marks[position] = Mark::Done;
        }
    }

    Ok(())
}

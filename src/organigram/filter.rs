//! Department filter.

use super::model::{Department, FilterScope, NodeId};
use super::tree::OrgTree;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use utoipa::ToSchema;

/// Visibility of members under one scope, plus scope-independent counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    pub scope: FilterScope,
    #[schema(value_type = Vec<String>)]
    pub visible_ids: BTreeSet<NodeId>,
    /// Members per department over the whole tree.
    #[schema(value_type = Object)]
    pub counts_by_department: BTreeMap<Department, usize>,
}

impl FilteredView {
    pub fn is_visible(&self, id: &NodeId) -> bool {
        self.visible_ids.contains(id)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_ids.len()
    }

    pub fn count(&self, department: Department) -> usize {
        self.counts_by_department
            .get(&department)
            .copied()
            .unwrap_or_default()
    }
}

/// Applies `scope` to the tree.
///
/// A member whose own department is filtered out is still visible when one
/// of its descendants is visible, so the rendered hierarchy never breaks
/// into disconnected fragments.
pub fn filter(tree: &OrgTree, scope: FilterScope) -> FilteredView {
    let mut counts_by_department: BTreeMap<Department, usize> =
        Department::ALL.iter().map(|d| (*d, 0)).collect();
    let mut visible_ids = BTreeSet::new();

    for node in tree.nodes() {
        *counts_by_department.entry(node.department).or_default() += 1;

        if !scope.department.matches(node.department) {
            continue;
        }
        if !visible_ids.insert(node.id.clone()) {
            // Already pulled in as an ancestor, and so were its own ancestors.
            continue;
        }
        for ancestor in tree.ancestors(&node.id) {
            if !visible_ids.insert(ancestor.id.clone()) {
                break;
            }
        }
    }

    FilteredView {
        scope,
        visible_ids,
        counts_by_department,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organigram::model::{DepartmentScope, OrgNode};

    #[test]
    fn test_filtered_out_grandparent_stays_visible() {
        let tree = OrgTree::build(vec![
            OrgNode::new("hb", "Hoofdbestuur", Department::Hoofdbestuur),
            OrgNode::new("tc", "Technische commissie", Department::Hoofdbestuur).with_parent("hb"),
            OrgNode::new("jc", "Jeugdcoördinator", Department::Jeugdbestuur).with_parent("tc"),
        ])
        .unwrap();

        let view = filter(&tree, FilterScope::new(DepartmentScope::Jeugdbestuur));

        let visible: Vec<&str> = view.visible_ids.iter().map(NodeId::as_str).collect();
        assert_eq!(visible, vec!["hb", "jc", "tc"]);
    }

    #[test]
    fn test_counts_include_empty_departments() {
        let tree = OrgTree::build(vec![OrgNode::new(
            "vz",
            "Voorzitter",
            Department::Hoofdbestuur,
        )])
        .unwrap();

        let view = filter(&tree, FilterScope::all());
        assert_eq!(view.count(Department::Hoofdbestuur), 1);
        assert_eq!(view.count(Department::Jeugdbestuur), 0);
        assert_eq!(view.count(Department::General), 0);
    }
}

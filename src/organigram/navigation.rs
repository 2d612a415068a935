//! Keyboard navigation over the rendered tree (tree-view key pattern).
//!
//! Navigation never mutates state. It resolves a key press into a
//! [`NavAction`], which the session applies through the expansion
//! controller.

use super::expansion::ExpansionState;
use super::filter::FilteredView;
use super::model::NodeId;
use super::tree::OrgTree;
use super::views::rendered_ids;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Focus(NodeId),
    Expand(NodeId),
    Collapse(NodeId),
    Toggle(NodeId),
    None,
}

/// Resolves `key` relative to the focused member. Without a (rendered)
/// focus every key except `End` lands on the first rendered member.
pub fn navigate(
    tree: &OrgTree,
    view: &FilteredView,
    expansion: &ExpansionState,
    focused: Option<&NodeId>,
    key: NavKey,
) -> NavAction {
    let rendered = rendered_ids(tree, view, expansion);
    let (Some(first), Some(last)) = (rendered.first(), rendered.last()) else {
        return NavAction::None;
    };

    let Some(position) = focused.and_then(|id| rendered.iter().position(|r| r == id)) else {
        return match key {
            NavKey::End => NavAction::Focus(last.clone()),
            _ => NavAction::Focus(first.clone()),
        };
    };
    let current = &rendered[position];
    let has_visible_children = tree.children(current).any(|c| view.is_visible(c));

    match key {
        NavKey::Up => position
            .checked_sub(1)
            .map(|p| NavAction::Focus(rendered[p].clone()))
            .unwrap_or(NavAction::None),
        NavKey::Down => rendered
            .get(position + 1)
            .map(|id| NavAction::Focus(id.clone()))
            .unwrap_or(NavAction::None),
        NavKey::Home => NavAction::Focus(first.clone()),
        NavKey::End => NavAction::Focus(last.clone()),
        NavKey::Right if has_visible_children && !expansion.is_expanded(current) => {
            NavAction::Expand(current.clone())
        }
        NavKey::Right if has_visible_children => rendered
            .get(position + 1)
            .map(|id| NavAction::Focus(id.clone()))
            .unwrap_or(NavAction::None),
        NavKey::Right => NavAction::None,
        NavKey::Left if has_visible_children && expansion.is_expanded(current) => {
            NavAction::Collapse(current.clone())
        }
        NavKey::Left => tree
            .parent(current)
            .map(|parent| NavAction::Focus(parent.clone()))
            .unwrap_or(NavAction::None),
        NavKey::Enter if has_visible_children => NavAction::Toggle(current.clone()),
        NavKey::Enter => NavAction::None,
    }
}

/// Extracts a member id from a URL fragment such as `#lid-penningmeester`.
pub fn parse_deep_link(fragment: &str) -> Option<NodeId> {
    let id = fragment.trim().trim_start_matches('#');
    let id = id.strip_prefix("lid-").unwrap_or(id);
    if id.is_empty() {
        None
    } else {
        Some(NodeId::from(id))
    }
}

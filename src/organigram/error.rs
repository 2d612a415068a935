//! Error and warning types of the organigram engine.

use super::model::NodeId;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Structural problems that make the member list unusable as a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("duplicate member id '{0}'")]
    DuplicateId(NodeId),
    #[error("parent cycle between members {}", join_ids(.0))]
    CycleDetected(Vec<NodeId>),
}

/// Recoverable data-quality issues found while building the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TreeWarning {
    #[error("member '{node_id}' references unknown parent '{missing_parent}', promoted to root")]
    #[serde(rename_all = "camelCase")]
    OrphanPromoted {
        node_id: NodeId,
        missing_parent: NodeId,
    },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read member list: {0}")]
    Io(#[source] std::io::Error),
    #[error("failed to parse member list: {0}")]
    Parse(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum OrganigramError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("unknown member '{0}'")]
    UnknownNode(NodeId),
    #[error("session not found")]
    SessionNotFound,
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

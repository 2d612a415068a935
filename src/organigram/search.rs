//! Case-insensitive substring index behind the responsibility finder.
//!
//! Matching is plain substring matching on lowercased text. There is no
//! fuzzy matching or stemming.

use super::model::NodeId;
use super::tree::OrgTree;
use serde::Serialize;
use utoipa::ToSchema;

/// Relevance tier of a hit, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MatchTier {
    NamePrefix,
    Title,
    Responsibility,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIndexEntry {
    pub node_id: NodeId,
    /// Lowercased name, title and responsibilities joined by newlines.
    pub searchable_text: String,
    name: String,
    title: String,
    responsibilities: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub node_id: &'a NodeId,
    pub tier: MatchTier,
}

/// Read-only after construction; rebuilt together with the tree.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchIndexEntry>,
}

impl SearchIndex {
    pub fn build(tree: &OrgTree) -> Self {
        let entries = tree
            .nodes()
            .iter()
            .map(|node| {
                let name = node.name.to_lowercase();
                let title = node.title.to_lowercase();
                let responsibilities = node.responsibilities.to_lowercase();
                SearchIndexEntry {
                    node_id: node.id.clone(),
                    searchable_text: format!("{name}\n{title}\n{responsibilities}"),
                    name,
                    title,
                    responsibilities,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SearchIndexEntry] {
        &self.entries
    }

    /// Matching ids ordered by tier, then by input order.
    pub fn search(&self, query: &str) -> Vec<NodeId> {
        self.search_ranked(query)
            .into_iter()
            .map(|hit| hit.node_id.clone())
            .collect()
    }

    /// An empty or whitespace-only query yields no hits.
    pub fn search_ranked(&self, query: &str) -> Vec<SearchHit<'_>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .filter_map(|entry| {
                entry.tier(&needle).map(|tier| SearchHit {
                    node_id: &entry.node_id,
                    tier,
                })
            })
            .collect();
        // Stable sort keeps input order inside each tier.
        hits.sort_by_key(|hit| hit.tier);
        hits
    }
}

impl SearchIndexEntry {
    /// Each field is matched on its own; a needle never spans two fields.
    fn tier(&self, needle: &str) -> Option<MatchTier> {
        if self.name.starts_with(needle) {
            Some(MatchTier::NamePrefix)
        } else if self.title.contains(needle) {
            Some(MatchTier::Title)
        } else if self.responsibilities.contains(needle) {
            Some(MatchTier::Responsibility)
        } else if self.name.contains(needle) {
            Some(MatchTier::Other)
        } else {
            None
        }
    }
}

/// Convenience wrapper over [`SearchIndex::search`].
pub fn search(index: &SearchIndex, query: &str) -> Vec<NodeId> {
    index.search(query)
}

//! Live-region announcements for assistive technology.
//!
//! Messages are derived from the outcome of a state transition (what changed
//! and how many members are visible afterwards) and pushed into a sink that
//! holds exactly one pending message.

use super::expansion::ExpansionChange;
use super::model::{FilterScope, OrgNode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    /// Navigation feedback.
    Polite,
    /// Reserved for error conditions.
    Assertive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
}

impl Announcement {
    pub fn polite(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            politeness: Politeness::Polite,
        }
    }

    pub fn assertive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            politeness: Politeness::Assertive,
        }
    }

    pub fn load_failed() -> Self {
        Self::assertive("Het organigram kon niet worden geladen")
    }
}

/// Push-only channel toward whatever owns the real live region.
pub trait AnnouncementSink {
    fn announce(&mut self, message: &str, politeness: Politeness);
}

/// Holds the single pending message; a new one replaces it right away.
#[derive(Debug, Clone, Default)]
pub struct LiveRegion {
    current: Option<Announcement>,
}

impl LiveRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Announcement> {
        self.current.as_ref()
    }

    /// Hands the pending message to the renderer and clears it.
    pub fn take(&mut self) -> Option<Announcement> {
        self.current.take()
    }
}

impl AnnouncementSink for LiveRegion {
    fn announce(&mut self, message: &str, politeness: Politeness) {
        self.current = Some(Announcement {
            message: message.to_string(),
            politeness,
        });
    }
}

fn members(count: usize) -> String {
    if count == 1 {
        "1 lid zichtbaar".to_string()
    } else {
        format!("{count} leden zichtbaar")
    }
}

/// `target` is the member the change was about, if any.
pub fn describe_expansion(
    change: &ExpansionChange,
    target: Option<&OrgNode>,
    visible: usize,
) -> Announcement {
    let label = target.map(OrgNode::label).unwrap_or("Onderdeel");
    let message = match change {
        ExpansionChange::Toggled { expanded: true, .. } => {
            format!("{label} uitgeklapt, {}", members(visible))
        }
        ExpansionChange::Toggled {
            expanded: false, ..
        } => format!("{label} ingeklapt, {}", members(visible)),
        ExpansionChange::PathExpanded { opened, .. } if opened.is_empty() => {
            format!("{label} staat al open, {}", members(visible))
        }
        ExpansionChange::PathExpanded { .. } => {
            format!("Pad naar {label} geopend, {}", members(visible))
        }
        ExpansionChange::CollapsedAll { .. } => format!("Alles ingeklapt, {}", members(visible)),
        ExpansionChange::ExpandedAll { .. } => format!("Alles uitgeklapt, {}", members(visible)),
    };
    Announcement::polite(message)
}

pub fn describe_scope(scope: FilterScope, visible: usize) -> Announcement {
    Announcement::polite(format!(
        "Filter {}: {}",
        scope.department.label(),
        members(visible)
    ))
}

pub fn describe_search(query: &str, results: usize) -> Announcement {
    let query = query.trim();
    let message = match results {
        _ if query.is_empty() => "Zoekopdracht gewist".to_string(),
        0 => format!("Geen resultaten voor \"{query}\""),
        1 => format!("1 resultaat voor \"{query}\""),
        n => format!("{n} resultaten voor \"{query}\""),
    };
    Announcement::polite(message)
}

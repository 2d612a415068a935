//! One user's view of the organigram: tree, filter, expansion, search query
//! and focus, kept consistent across the card, diagram and finder views.
//!
//! Every mutation goes through a method here, and every method that changes
//! state pushes exactly one announcement.

use super::announcer::{
    describe_expansion, describe_scope, describe_search, Announcement, AnnouncementSink,
    LiveRegion,
};
use super::error::{OrganigramError, TreeError};
use super::expansion::{ExpansionChange, ExpansionController, ExpansionState};
use super::filter::{filter, FilteredView};
use super::model::{FilterScope, NodeId, OrgNode};
use super::navigation::{navigate, NavAction, NavKey};
use super::search::SearchIndex;
use super::tree::OrgTree;
use super::views::{self, CardNode, Diagram, FinderEntry};
use std::sync::Arc;

/// Tree and search index built together from one member list.
#[derive(Debug)]
pub struct Organigram {
    pub tree: OrgTree,
    pub index: SearchIndex,
}

impl Organigram {
    pub fn build(members: Vec<OrgNode>) -> Result<Self, TreeError> {
        let tree = OrgTree::build(members)?;
        let index = SearchIndex::build(&tree);
        Ok(Self { tree, index })
    }
}

#[derive(Debug)]
pub struct OrganigramSession<S = LiveRegion> {
    organigram: Arc<Organigram>,
    filtered: FilteredView,
    expansion: ExpansionController,
    query: String,
    focused: Option<NodeId>,
    sink: S,
}

impl OrganigramSession<LiveRegion> {
    pub fn new(organigram: Arc<Organigram>) -> Self {
        Self::with_sink(organigram, LiveRegion::new())
    }

    /// Mounts on a deep-link target: its container chain starts opened and
    /// the target is focused.
    pub fn with_deep_link(
        organigram: Arc<Organigram>,
        target: &NodeId,
    ) -> Result<Self, OrganigramError> {
        Self::with_sink_at(organigram, LiveRegion::new(), target)
    }

    pub fn announcement(&self) -> Option<&Announcement> {
        self.sink.current()
    }

    pub fn take_announcement(&mut self) -> Option<Announcement> {
        self.sink.take()
    }
}

impl<S: AnnouncementSink> OrganigramSession<S> {
    pub fn with_sink(organigram: Arc<Organigram>, sink: S) -> Self {
        let filtered = filter(&organigram.tree, FilterScope::all());
        Self {
            organigram,
            filtered,
            expansion: ExpansionController::new(),
            query: String::new(),
            focused: None,
            sink,
        }
    }

    /// Like [`OrganigramSession::with_deep_link`] with a caller-provided sink.
    pub fn with_sink_at(
        organigram: Arc<Organigram>,
        sink: S,
        target: &NodeId,
    ) -> Result<Self, OrganigramError> {
        let expansion = ExpansionController::with_path(&organigram.tree, target)?;
        let mut opened: Vec<NodeId> = organigram
            .tree
            .ancestors(target)
            .map(|ancestor| ancestor.id.clone())
            .collect();
        opened.reverse();

        let mut session = Self::with_sink(organigram, sink);
        session.expansion = expansion;
        session.focused = Some(target.clone());
        session.announce_expansion(&ExpansionChange::PathExpanded {
            target: target.clone(),
            opened,
        });
        Ok(session)
    }

    pub fn tree(&self) -> &OrgTree {
        &self.organigram.tree
    }

    pub fn organigram(&self) -> &Arc<Organigram> {
        &self.organigram
    }

    pub fn scope(&self) -> FilterScope {
        self.filtered.scope
    }

    pub fn filtered_view(&self) -> &FilteredView {
        &self.filtered
    }

    pub fn expansion(&self) -> &ExpansionState {
        self.expansion.state()
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expansion.is_expanded(id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn focused(&self) -> Option<&NodeId> {
        self.focused.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Members currently rendered by the card and diagram views.
    pub fn rendered_ids(&self) -> Vec<NodeId> {
        views::rendered_ids(&self.organigram.tree, &self.filtered, self.expansion.state())
    }

    pub fn cards(&self) -> Vec<CardNode> {
        views::card_hierarchy(&self.organigram.tree, &self.filtered, self.expansion.state())
    }

    pub fn diagram(&self) -> Diagram {
        views::diagram(&self.organigram.tree, &self.filtered, self.expansion.state())
    }

    pub fn finder(&self) -> Vec<FinderEntry> {
        views::finder(
            &self.organigram.tree,
            &self.organigram.index,
            &self.filtered,
            &self.query,
        )
    }

    pub fn toggle(&mut self, id: &NodeId) -> Result<ExpansionChange, OrganigramError> {
        let change = self.expansion.toggle(&self.organigram.tree, id)?;
        self.announce_expansion(&change);
        Ok(change)
    }

    pub fn expand_path(&mut self, id: &NodeId) -> Result<ExpansionChange, OrganigramError> {
        let change = self.expansion.expand_path(&self.organigram.tree, id)?;
        self.announce_expansion(&change);
        Ok(change)
    }

    pub fn collapse_all(&mut self) -> ExpansionChange {
        let change = self.expansion.collapse_all();
        self.announce_expansion(&change);
        change
    }

    pub fn expand_all(&mut self) -> ExpansionChange {
        let change = self.expansion.expand_all(&self.organigram.tree);
        self.announce_expansion(&change);
        change
    }

    /// Switches the department scope. Expansion state is kept as is.
    pub fn set_scope(&mut self, scope: FilterScope) -> &FilteredView {
        self.filtered = filter(&self.organigram.tree, scope);
        self.drop_hidden_focus();

        let visible = self.rendered_ids().len();
        let announcement = describe_scope(scope, visible);
        log::debug!("Organigram scope changed: {}", announcement.message);
        self.push(announcement);
        &self.filtered
    }

    /// Updates the finder query and returns the matching entries.
    pub fn set_query(&mut self, query: impl Into<String>) -> Vec<FinderEntry> {
        self.query = query.into();
        let results = self.finder();
        self.push(describe_search(&self.query, results.len()));
        results
    }

    /// Selecting a finder result opens its path and focuses it.
    pub fn select(&mut self, id: &NodeId) -> Result<(), OrganigramError> {
        self.expand_path(id)?;
        if self.filtered.is_visible(id) {
            self.focused = Some(id.clone());
        }
        Ok(())
    }

    /// Applies a key press. Focus-only moves do not announce; screen
    /// readers already voice the newly focused item.
    pub fn navigate(&mut self, key: NavKey) -> Result<Option<&NodeId>, OrganigramError> {
        let action = navigate(
            &self.organigram.tree,
            &self.filtered,
            self.expansion.state(),
            self.focused.as_ref(),
            key,
        );

        match action {
            NavAction::Focus(id) => self.focused = Some(id),
            NavAction::Expand(id) | NavAction::Collapse(id) | NavAction::Toggle(id) => {
                self.toggle(&id)?;
                self.focused = Some(id);
            }
            NavAction::None => {}
        }
        Ok(self.focused.as_ref())
    }

    fn announce_expansion(&mut self, change: &ExpansionChange) {
        // Collapsing an ancestor can hide the focused member.
        self.drop_hidden_focus();
        let target = change.subject().and_then(|id| self.organigram.tree.get(id));
        let visible = self.rendered_ids().len();
        let announcement = describe_expansion(change, target, visible);
        self.push(announcement);
    }

    fn drop_hidden_focus(&mut self) {
        if let Some(id) = &self.focused {
            if !self.rendered_ids().contains(id) {
                self.focused = None;
            }
        }
    }

    fn push(&mut self, announcement: Announcement) {
        self.sink
            .announce(&announcement.message, announcement.politeness);
    }
}

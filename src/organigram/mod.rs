//! Organigram engine: club members turned into a navigable tree with
//! department filtering, a responsibility finder, shared expand/collapse
//! state and live-region announcements.

pub mod announcer;
pub mod error;
pub mod expansion;
pub mod filter;
pub mod model;
pub mod navigation;
pub mod routes;
pub mod search;
pub mod session;
pub mod source;
pub mod tree;
pub mod views;


pub use announcer::{Announcement, AnnouncementSink, LiveRegion, Politeness};
pub use error::{OrganigramError, SourceError, TreeError, TreeWarning};
pub use expansion::{ExpansionChange, ExpansionController, ExpansionState};
pub use filter::{filter, FilteredView};
pub use model::{Department, DepartmentScope, FilterScope, NodeId, OrgNode};
pub use navigation::{navigate, parse_deep_link, NavAction, NavKey};
pub use search::{search, MatchTier, SearchIndex};
pub use session::{Organigram, OrganigramSession};
pub use source::{JsonFileSource, MemberSource, StaticSource};
pub use tree::OrgTree;
pub use views::{CardNode, Diagram, FinderEntry};

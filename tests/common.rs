#![allow(dead_code)]

use club_organigram::organigram::{Department, NodeId, OrgNode, Organigram};
use std::sync::Arc;

/// Bare member with only the structural fields filled in.
pub fn member(id: &str, parent: Option<&str>, department: Department) -> OrgNode {
    let node = OrgNode::new(id, id, department);
    match parent {
        Some(parent) => node.with_parent(parent),
        None => node,
    }
}

/// A small club in content order:
///
/// ```text
/// club (general)
/// ├── vz (hoofdbestuur)
/// │   ├── pm (hoofdbestuur)
/// │   └── sec (general)
/// ├── jv (jeugdbestuur)
/// │   ├── jc (jeugdbestuur)
/// │   └── sch (jeugdbestuur, vacant)
/// └── vrij (general)
/// ```
pub fn sample_members() -> Vec<OrgNode> {
    vec![
        OrgNode::new("club", "Vereniging", Department::General).with_name("VV De Meeuwen"),
        OrgNode::new("vz", "Voorzitter", Department::Hoofdbestuur)
            .with_name("Jan de Vries")
            .with_parent("club")
            .with_responsibilities("Algemene leiding, contact met gemeente"),
        OrgNode::new("pm", "Penningmeester", Department::Hoofdbestuur)
            .with_name("Piet Bakker")
            .with_parent("vz")
            .with_responsibilities("Contributie, sponsorgelden"),
        OrgNode::new("sec", "Secretaris", Department::General)
            .with_name("Karin Jansen")
            .with_parent("vz")
            .with_responsibilities("Ledenadministratie, post"),
        OrgNode::new("jv", "Jeugdvoorzitter", Department::Jeugdbestuur)
            .with_name("Ans Pennings")
            .with_parent("club")
            .with_responsibilities("Jeugdbeleid"),
        OrgNode::new("jc", "Jeugdcoördinator", Department::Jeugdbestuur)
            .with_name("Mo El Amrani")
            .with_parent("jv")
            .with_responsibilities("Indeling van teams, trainers"),
        OrgNode::new("sch", "Scheidsrechterscoördinator", Department::Jeugdbestuur)
            .with_parent("jv")
            .with_responsibilities("Scheidsrechters voor jeugdwedstrijden"),
        OrgNode::new("vrij", "Vrijwilligerscoördinator", Department::General)
            .with_name("Lotte Smit")
            .with_parent("club")
            .with_responsibilities("Vrijwilligers, kantinediensten"),
    ]
}

pub fn sample_organigram() -> Arc<Organigram> {
    Arc::new(Organigram::build(sample_members()).expect("sample members form a valid tree"))
}

pub fn ids(values: &[&str]) -> Vec<NodeId> {
    values.iter().map(|v| NodeId::from(*v)).collect()
}

pub fn as_strs(ids: &[NodeId]) -> Vec<&str> {
    ids.iter().map(NodeId::as_str).collect()
}

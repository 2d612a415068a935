mod common;

use club_organigram::organigram::{
    filter, Department, DepartmentScope, FilterScope, NodeId, OrgTree,
};
use common::{member, sample_members};
use std::collections::BTreeSet;

const SCOPES: [DepartmentScope; 3] = [
    DepartmentScope::All,
    DepartmentScope::Hoofdbestuur,
    DepartmentScope::Jeugdbestuur,
];

#[test]
fn test_youth_scope_keeps_club_and_drops_board() {
    let tree = OrgTree::build(vec![
        member("club", None, Department::General),
        member("hb1", Some("club"), Department::Hoofdbestuur),
        member("jb1", Some("club"), Department::Jeugdbestuur),
    ])
    .unwrap();

    for scope in SCOPES {
        let view = filter(&tree, FilterScope::new(scope));
        assert_eq!(view.count(Department::Hoofdbestuur), 1);
        assert_eq!(view.count(Department::Jeugdbestuur), 1);
        assert_eq!(view.count(Department::General), 1);
    }

    let view = filter(&tree, FilterScope::new(DepartmentScope::Jeugdbestuur));
    let expected: BTreeSet<NodeId> = ["club", "jb1"].into_iter().map(NodeId::from).collect();
    assert_eq!(view.visible_ids, expected);
}

#[test]
fn test_ancestors_of_visible_members_are_visible() {
    let tree = OrgTree::build(sample_members()).unwrap();

    for scope in SCOPES {
        let view = filter(&tree, FilterScope::new(scope));
        for id in &view.visible_ids {
            for ancestor in tree.ancestors(id) {
                assert!(
                    view.is_visible(&ancestor.id),
                    "{} hidden while descendant {} is visible under {:?}",
                    ancestor.id,
                    id,
                    scope
                );
            }
        }
    }
}

#[test]
fn test_general_member_pulls_in_board_parent() {
    let tree = OrgTree::build(sample_members()).unwrap();

    let view = filter(&tree, FilterScope::new(DepartmentScope::Jeugdbestuur));

    // `sec` is club-wide but reports to the board chair.
    assert!(view.is_visible(&"sec".into()));
    assert!(view.is_visible(&"vz".into()));
    assert!(!view.is_visible(&"pm".into()));
    assert_eq!(view.visible_count(), 7);
}

#[test]
fn test_board_scope_visibility() {
    let tree = OrgTree::build(sample_members()).unwrap();

    let view = filter(&tree, FilterScope::new(DepartmentScope::Hoofdbestuur));

    let visible: Vec<&str> = view.visible_ids.iter().map(NodeId::as_str).collect();
    assert_eq!(visible, vec!["club", "pm", "sec", "vrij", "vz"]);
}

#[test]
fn test_counts_do_not_depend_on_scope() {
    let tree = OrgTree::build(sample_members()).unwrap();

    let all = filter(&tree, FilterScope::all());
    let board = filter(&tree, FilterScope::new(DepartmentScope::Hoofdbestuur));
    let youth = filter(&tree, FilterScope::new(DepartmentScope::Jeugdbestuur));

    assert_eq!(all.counts_by_department, board.counts_by_department);
    assert_eq!(all.counts_by_department, youth.counts_by_department);
    assert_eq!(all.count(Department::Hoofdbestuur), 2);
    assert_eq!(all.count(Department::Jeugdbestuur), 3);
    assert_eq!(all.count(Department::General), 3);
    assert_eq!(all.visible_count(), tree.len());
}

#[test]
fn test_filtered_view_serializes_camel_case() {
    let tree = OrgTree::build(vec![member("club", None, Department::General)]).unwrap();
    let view = filter(&tree, FilterScope::all());

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["scope"]["department"], "all");
    assert_eq!(json["visibleIds"], serde_json::json!(["club"]));
    assert_eq!(json["countsByDepartment"]["general"], 1);
    assert_eq!(json["countsByDepartment"]["hoofdbestuur"], 0);
}

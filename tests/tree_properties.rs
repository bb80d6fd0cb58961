//! Property-based checks over random edit sequences

use proptest::prelude::*;
use query_builder::{
    serialize, Group, Node, NodeId, NodeKind, PartDocument, QueryDocument, QueryTree,
};
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Edit {
    AddClause(usize),
    AddGroup(usize),
    RemoveAt(usize, usize),
    RemoveGroup(usize),
    SetField(usize, Option<String>),
}

fn arbitrary_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => any::<usize>().prop_map(Edit::AddClause),
        2 => any::<usize>().prop_map(Edit::AddGroup),
        1 => (any::<usize>(), 0usize..6).prop_map(|(g, i)| Edit::RemoveAt(g, i)),
        1 => any::<usize>().prop_map(Edit::RemoveGroup),
        2 => (any::<usize>(), proptest::option::of("[A-Z][a-z]{2,8}"))
            .prop_map(|(c, f)| Edit::SetField(c, f)),
    ]
}

fn ids_of(tree: &QueryTree, kind: NodeKind) -> Vec<NodeId> {
    tree.all_ids().into_iter().filter(|id| id.kind() == kind).collect()
}

fn pick(ids: &[NodeId], seed: usize) -> Option<NodeId> {
    (!ids.is_empty()).then(|| ids[seed % ids.len()])
}

/// 执行编辑序列，前置条件不满足的编辑直接忽略
fn build_tree(edits: &[Edit]) -> QueryTree {
    let mut tree = QueryTree::new();
    for edit in edits {
        let groups = ids_of(&tree, NodeKind::Group);
        let clauses = ids_of(&tree, NodeKind::Clause);
        match edit {
            Edit::AddClause(g) => {
                if let Some(group) = pick(&groups, *g) {
                    let _ = tree.add_clause(group);
                }
            }
            Edit::AddGroup(g) => {
                if let Some(group) = pick(&groups, *g) {
                    let _ = tree.add_group(group);
                }
            }
            Edit::RemoveAt(g, index) => {
                if let Some(group) = pick(&groups, *g) {
                    let _ = tree.remove_clause_at(group, *index);
                }
            }
            Edit::RemoveGroup(g) => {
                if let Some(group) = pick(&groups, *g) {
                    let _ = tree.remove_group(group);
                }
            }
            Edit::SetField(c, field) => {
                if let Some(clause) = pick(&clauses, *c) {
                    let _ = tree.set_clause_field(clause, field.clone());
                }
            }
        }
    }
    tree
}

fn assert_matches_group(doc: &QueryDocument, group: &Group) {
    assert_eq!(doc.logic, group.logic());
    assert_eq!(doc.parts.len(), group.len());
    for (part, child) in doc.parts.iter().zip(group.children()) {
        match (part, child) {
            (PartDocument::Clause { field, operator, value }, Node::Clause(clause)) => {
                assert_eq!(field.as_deref(), clause.field());
                assert_eq!(operator.as_deref(), clause.operator());
                assert_eq!(value, clause.value());
            }
            (PartDocument::Group { logic, group: nested }, Node::Group(child)) => {
                assert_eq!(*logic, child.logic());
                assert_matches_group(nested, child);
            }
            (part, child) => panic!("part {:?} does not match child {:?}", part, child),
        }
    }
}

proptest! {
    #[test]
    fn prop_ids_are_unique(edits in prop::collection::vec(arbitrary_edit(), 0..60)) {
        let tree = build_tree(&edits);
        let ids = tree.all_ids();
        let distinct: HashSet<_> = ids.iter().collect();
        prop_assert_eq!(distinct.len(), ids.len());
    }

    #[test]
    fn prop_parts_follow_children(edits in prop::collection::vec(arbitrary_edit(), 0..60)) {
        let tree = build_tree(&edits);
        assert_matches_group(&serialize(tree.root()), tree.root());
    }

    #[test]
    fn prop_serialize_is_pure(edits in prop::collection::vec(arbitrary_edit(), 0..60)) {
        let tree = build_tree(&edits);
        let snapshot = tree.root().clone();
        let first = serialize(tree.root());
        let second = serialize(tree.root());
        prop_assert_eq!(first, second);
        prop_assert_eq!(tree.root(), &snapshot);
    }

    #[test]
    fn prop_add_then_remove_restores_group(
        edits in prop::collection::vec(arbitrary_edit(), 0..40),
        seed in any::<usize>(),
    ) {
        let mut tree = build_tree(&edits);
        let groups = ids_of(&tree, NodeKind::Group);
        let group = groups[seed % groups.len()];
        let before = tree.find_group(group).unwrap().clone();

        tree.add_clause(group).unwrap();
        let appended = tree.find_group(group).unwrap().len() - 1;
        tree.remove_clause_at(group, appended).unwrap();

        prop_assert_eq!(tree.find_group(group).unwrap(), &before);
    }

    #[test]
    fn prop_root_always_survives(edits in prop::collection::vec(arbitrary_edit(), 0..60)) {
        let mut tree = build_tree(&edits);
        let root = tree.root_id();
        prop_assert!(tree.remove_group(root).is_err());
        prop_assert_eq!(tree.root_id(), root);
    }

    #[test]
    fn prop_import_reproduces_document(edits in prop::collection::vec(arbitrary_edit(), 0..60)) {
        let tree = build_tree(&edits);
        let doc = serialize(tree.root());
        let imported = QueryTree::from_document(&doc).unwrap();
        prop_assert_eq!(serialize(imported.root()), doc);
        prop_assert_eq!(imported.node_count(), tree.node_count());
    }
}

// query/tree.rs - 查询树及其变更操作
//! 节点工厂 + 树变更器
//!
//! 所有变更都按节点 ID 定位目标，直接在树上原地修改。
//! 违反前置条件（找不到节点、下标越界、删除根分组）立即返回错误。

use log::{debug, warn};

use super::types::*;

/// 查询树错误类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("Group not found: {0}")]
    GroupNotFound(NodeId),

    #[error("Clause not found: {0}")]
    ClauseNotFound(NodeId),

    #[error("Index {index} out of range for group {group} with {len} children")]
    IndexOutOfRange {
        group: NodeId,
        index: usize,
        len: usize,
    },

    #[error("The root group cannot be removed")]
    RootNotRemovable,

    #[error("Group part logic {part} does not match nested group logic {group}")]
    InconsistentLogic { part: Logic, group: Logic },
}

pub type TreeResult<T> = Result<T, TreeError>;

/// 树内 ID 分配器（单调计数，永不复用）
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn next_id(&mut self, kind: NodeKind) -> NodeId {
        self.last += 1;
        NodeId::new(kind, self.last)
    }

    pub fn new_group(&mut self) -> Group {
        Group::new(self.next_id(NodeKind::Group))
    }

    pub fn new_clause(&mut self) -> Clause {
        Clause::new(self.next_id(NodeKind::Clause))
    }
}

impl Group {
    /// 深度优先查找分组（包括自身）
    pub fn find_group(&self, id: NodeId) -> Option<&Group> {
        if self.id() == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Group(group) => group.find_group(id),
            Node::Clause(_) => None,
        })
    }

    pub fn find_group_mut(&mut self, id: NodeId) -> Option<&mut Group> {
        if self.id() == id {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Group(group) = child {
                if let Some(found) = group.find_group_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn find_clause(&self, id: NodeId) -> Option<&Clause> {
        self.children.iter().find_map(|child| match child {
            Node::Clause(clause) if clause.id() == id => Some(clause),
            Node::Clause(_) => None,
            Node::Group(group) => group.find_clause(id),
        })
    }

    pub fn find_clause_mut(&mut self, id: NodeId) -> Option<&mut Clause> {
        for child in &mut self.children {
            match child {
                Node::Clause(clause) if clause.id() == id => return Some(clause),
                Node::Clause(_) => {}
                Node::Group(group) => {
                    if let Some(found) = group.find_clause_mut(id) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    /// 在子树中删除 ID 匹配的分组，返回被删除的分组
    ///
    /// 先检查直接子节点，再逐个深入子分组；ID 唯一，所以最多删除一个。
    /// 自身不会被删除（自身没有可删除它的父节点）。
    pub fn remove_group(&mut self, target: NodeId) -> Option<Group> {
        let position = self
            .children
            .iter()
            .position(|child| child.as_group().is_some_and(|g| g.id() == target));
        if let Some(index) = position {
            if let Node::Group(removed) = self.children.remove(index) {
                return Some(removed);
            }
        }

        self.children.iter_mut().find_map(|child| match child {
            Node::Group(group) => group.remove_group(target),
            Node::Clause(_) => None,
        })
    }

    /// 先序收集子树所有 ID
    pub fn collect_ids(&self, out: &mut Vec<NodeId>) {
        out.push(self.id());
        for child in &self.children {
            match child {
                Node::Clause(clause) => out.push(clause.id()),
                Node::Group(group) => group.collect_ids(out),
            }
        }
    }

    /// 分组嵌套深度，单层分组为 1
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(Node::as_group)
            .map(Group::depth)
            .max()
            .unwrap_or(0)
    }
}

/// 查询树：恰好一个根分组，根永远存在且不可删除
#[derive(Debug, Clone)]
pub struct QueryTree {
    root: Group,
    ids: IdAllocator,
}

impl QueryTree {
    /// 创建空树（根分组 AND，无子节点）
    pub fn new() -> Self {
        let mut ids = IdAllocator::default();
        let root = ids.new_group();
        Self { root, ids }
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    pub(crate) fn replace_root(&mut self, root: Group) {
        self.root = root;
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn root_id(&self) -> NodeId {
        self.root.id()
    }

    /// 清空：返回一棵新树，继续使用同一个 ID 分配器
    pub fn reset(self) -> QueryTree {
        let mut ids = self.ids;
        let root = ids.new_group();
        debug!("query tree reset, new root {}", root.id());
        Self { root, ids }
    }

    // ============== 工厂 ==============

    pub fn new_group(&mut self) -> Group {
        self.ids.new_group()
    }

    pub fn new_clause(&mut self) -> Clause {
        self.ids.new_clause()
    }

    // ============== 查找 ==============

    pub fn find_group(&self, id: NodeId) -> Option<&Group> {
        self.root.find_group(id)
    }

    pub fn find_group_mut(&mut self, id: NodeId) -> Option<&mut Group> {
        self.root.find_group_mut(id)
    }

    pub fn find_clause(&self, id: NodeId) -> Option<&Clause> {
        self.root.find_clause(id)
    }

    pub fn find_clause_mut(&mut self, id: NodeId) -> Option<&mut Clause> {
        self.root.find_clause_mut(id)
    }

    fn group_mut(&mut self, id: NodeId) -> TreeResult<&mut Group> {
        self.root.find_group_mut(id).ok_or(TreeError::GroupNotFound(id))
    }

    fn clause_mut(&mut self, id: NodeId) -> TreeResult<&mut Clause> {
        self.root
            .find_clause_mut(id)
            .ok_or(TreeError::ClauseNotFound(id))
    }

    // ============== 变更 ==============

    /// 在分组末尾追加一个新条件，返回新条件 ID
    pub fn add_clause(&mut self, group: NodeId) -> TreeResult<NodeId> {
        let clause = self.ids.new_clause();
        let id = clause.id();
        self.group_mut(group)?.children.push(Node::Clause(clause));
        debug!("added {} to {}", id, group);
        Ok(id)
    }

    /// 删除分组中指定下标的子节点
    pub fn remove_clause_at(&mut self, group: NodeId, index: usize) -> TreeResult<Node> {
        let target = self.group_mut(group)?;
        let len = target.children.len();
        if index >= len {
            warn!("rejected removal at index {} of {} ({} children)", index, group, len);
            return Err(TreeError::IndexOutOfRange { group, index, len });
        }
        let removed = target.children.remove(index);
        debug!("removed {} from {} at index {}", removed.id(), group, index);
        Ok(removed)
    }

    /// 在父分组末尾追加一个新的空分组，返回新分组 ID
    pub fn add_group(&mut self, parent: NodeId) -> TreeResult<NodeId> {
        let group = self.ids.new_group();
        let id = group.id();
        self.group_mut(parent)?.children.push(Node::Group(group));
        debug!("added {} to {}", id, parent);
        Ok(id)
    }

    /// 删除任意位置的分组（根分组除外）
    pub fn remove_group(&mut self, target: NodeId) -> TreeResult<Group> {
        if target == self.root.id() {
            warn!("rejected removal of root group {}", target);
            return Err(TreeError::RootNotRemovable);
        }
        let removed = self
            .root
            .remove_group(target)
            .ok_or(TreeError::GroupNotFound(target))?;
        debug!("removed {} ({} children)", target, removed.len());
        Ok(removed)
    }

    /// 设置条件字段，同时清空操作符和值
    pub fn set_clause_field(&mut self, clause: NodeId, field: Option<String>) -> TreeResult<()> {
        let target = self.clause_mut(clause)?;
        debug!("{} field -> {:?}", clause, field);
        target.set_field(field);
        Ok(())
    }

    pub fn set_clause_operator(
        &mut self,
        clause: NodeId,
        operator: Option<String>,
    ) -> TreeResult<()> {
        let target = self.clause_mut(clause)?;
        debug!("{} operator -> {:?}", clause, operator);
        target.set_operator(operator);
        Ok(())
    }

    pub fn set_clause_value(&mut self, clause: NodeId, value: ClauseValue) -> TreeResult<()> {
        let target = self.clause_mut(clause)?;
        debug!("{} value -> {:?}", clause, value);
        target.set_value(value);
        Ok(())
    }

    pub fn set_logic(&mut self, group: NodeId, logic: Logic) -> TreeResult<()> {
        let target = self.group_mut(group)?;
        debug!("{} logic -> {}", group, logic);
        target.set_logic(logic);
        Ok(())
    }

    // ============== 统计 ==============

    /// 先序遍历的全部节点 ID
    pub fn all_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.root.collect_ids(&mut ids);
        ids
    }

    pub fn node_count(&self) -> usize {
        self.all_ids().len()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl Default for QueryTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_tree_has_empty_and_root() {
        let tree = QueryTree::new();
        assert_eq!(tree.root().logic(), Logic::And);
        assert!(tree.root().is_empty());
        assert_eq!(tree.root_id().kind(), NodeKind::Group);
    }

    #[test]
    fn test_factory_produces_fresh_ids() {
        let mut tree = QueryTree::new();
        let group = tree.new_group();
        let clause = tree.new_clause();
        assert_eq!(group.logic(), Logic::And);
        assert!(group.is_empty());
        assert_eq!(clause.field(), None);
        assert_eq!(clause.operator(), None);
        assert_eq!(clause.value(), &ClauseValue::Text(String::new()));
        assert_ne!(group.id(), tree.root_id());
        assert_ne!(group.id().seq(), clause.id().seq());
    }

    #[test]
    fn test_add_and_remove_clause() {
        let mut tree = QueryTree::new();
        let root = tree.root_id();
        let first = tree.add_clause(root).unwrap();
        tree.add_clause(root).unwrap();
        assert_eq!(tree.root().len(), 2);

        let removed = tree.remove_clause_at(root, 1).unwrap();
        assert!(removed.is_clause());
        assert_eq!(tree.root().len(), 1);
        assert_eq!(tree.root().children()[0].id(), first);
    }

    #[test]
    fn test_remove_clause_out_of_range_fails_fast() {
        let mut tree = QueryTree::new();
        let root = tree.root_id();
        tree.add_clause(root).unwrap();
        let err = tree.remove_clause_at(root, 1).unwrap_err();
        assert_eq!(
            err,
            TreeError::IndexOutOfRange {
                group: root,
                index: 1,
                len: 1
            }
        );
        assert_eq!(tree.root().len(), 1);
    }

    #[test]
    fn test_remove_nested_group() {
        let mut tree = QueryTree::new();
        let root = tree.root_id();
        let outer = tree.add_group(root).unwrap();
        let inner = tree.add_group(outer).unwrap();
        tree.add_clause(inner).unwrap();

        let removed = tree.remove_group(inner).unwrap();
        assert_eq!(removed.id(), inner);
        assert_eq!(removed.len(), 1);
        assert!(tree.find_group(outer).unwrap().is_empty());
        assert_eq!(tree.remove_group(inner), Err(TreeError::GroupNotFound(inner)));
    }

    #[test]
    fn test_remove_group_prefers_direct_children() {
        let mut tree = QueryTree::new();
        let root = tree.root_id();
        let first = tree.add_group(root).unwrap();
        tree.add_group(first).unwrap();
        let second = tree.add_group(root).unwrap();

        tree.remove_group(second).unwrap();
        assert_eq!(tree.root().len(), 1);
        assert_eq!(tree.find_group(first).unwrap().len(), 1);
    }

    #[test]
    fn test_root_is_never_removed() {
        let mut tree = QueryTree::new();
        let root = tree.root_id();
        tree.add_clause(root).unwrap();
        assert_eq!(tree.remove_group(root), Err(TreeError::RootNotRemovable));
        assert_eq!(tree.root_id(), root);
        assert_eq!(tree.root().len(), 1);
    }

    #[test]
    fn test_clause_id_is_not_a_group() {
        let mut tree = QueryTree::new();
        let root = tree.root_id();
        let clause = tree.add_clause(root).unwrap();
        assert_eq!(tree.add_clause(clause), Err(TreeError::GroupNotFound(clause)));
        assert_eq!(tree.remove_group(clause), Err(TreeError::GroupNotFound(clause)));
    }

    #[test]
    fn test_set_clause_field_resets() {
        let mut tree = QueryTree::new();
        let root = tree.root_id();
        let id = tree.add_clause(root).unwrap();
        tree.set_clause_field(id, Some("State".into())).unwrap();
        tree.set_clause_operator(id, Some("equals".into())).unwrap();
        tree.set_clause_value(id, "x".into()).unwrap();

        tree.set_clause_field(id, Some("Priority".into())).unwrap();
        let clause = tree.find_clause(id).unwrap();
        assert_eq!(clause.field(), Some("Priority"));
        assert_eq!(clause.operator(), None);
        assert!(clause.value().is_empty());
    }

    #[test]
    fn test_ids_unique_and_never_reused_after_reset() {
        let mut tree = QueryTree::new();
        let root = tree.root_id();
        let group = tree.add_group(root).unwrap();
        tree.add_clause(group).unwrap();
        tree.add_clause(root).unwrap();
        let before: HashSet<_> = tree.all_ids().into_iter().collect();
        assert_eq!(before.len(), tree.node_count());

        let tree = tree.reset();
        assert!(tree.root().is_empty());
        assert!(!before.contains(&tree.root_id()));
    }

    #[test]
    fn test_depth() {
        let mut tree = QueryTree::new();
        assert_eq!(tree.depth(), 1);
        let root = tree.root_id();
        let g = tree.add_group(root).unwrap();
        tree.add_group(g).unwrap();
        assert_eq!(tree.depth(), 3);
    }
}

// query/types.rs - 查询树类型定义
//! 定义 Group / Clause 递归结构以及节点 ID

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 节点类别（ID 中的稳定标签）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Clause,
    Group,
}

impl NodeKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Clause => "clause",
            Self::Group => "group",
        }
    }
}

/// 节点 ID
///
/// 由类别标签 + 树内单调递增序号组成，文本形式为 `clause-3` / `group-1`。
/// 类别只用于展示和解析，节点的实际类型
/// 永远以 [`Node`] 的枚举分支为准。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    kind: NodeKind,
    seq: u64,
}

impl NodeId {
    pub(crate) fn new(kind: NodeKind, seq: u64) -> Self {
        Self { kind, seq }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.seq)
    }
}

/// ID 解析错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid node id: {0}")]
pub struct ParseNodeIdError(pub String);

impl FromStr for NodeId {
    type Err = ParseNodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, seq) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ParseNodeIdError(s.to_string()))?;
        let kind = match prefix {
            "clause" => NodeKind::Clause,
            "group" => NodeKind::Group,
            _ => return Err(ParseNodeIdError(s.to_string())),
        };
        let seq = seq.parse().map_err(|_| ParseNodeIdError(s.to_string()))?;
        Ok(Self { kind, seq })
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 组合逻辑
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Logic {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl Logic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// 切换 AND / OR
    pub fn toggled(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Logic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            other => Err(format!("unknown logic '{}'", other)),
        }
    }
}

/// 条件值，形状取决于字段类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClauseValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    /// 标签列表
    List(Vec<String>),
}

impl ClauseValue {
    /// 是否为空值（未填写）
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Boolean(_) | Self::Number(_) => false,
        }
    }
}

impl Default for ClauseValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for ClauseValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ClauseValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ClauseValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ClauseValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for ClauseValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// 单个过滤条件：字段 / 操作符 / 值
///
/// 操作符和值只有在字段选定后才有意义，所以字段只能经由
/// [`Clause::set_field`] 修改，它会同时清空操作符和值。
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    id: NodeId,
    field: Option<String>,
    operator: Option<String>,
    value: ClauseValue,
}

impl Clause {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            field: None,
            operator: None,
            value: ClauseValue::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn value(&self) -> &ClauseValue {
        &self.value
    }

    /// 未选择字段的条件视为"未完成"
    pub fn is_complete(&self) -> bool {
        self.field.is_some()
    }

    /// 设置字段，并无条件重置操作符和值
    pub fn set_field(&mut self, field: Option<String>) {
        self.field = field;
        self.operator = None;
        self.value = ClauseValue::default();
    }

    pub fn set_operator(&mut self, operator: Option<String>) {
        self.operator = operator;
    }

    pub fn set_value(&mut self, value: ClauseValue) {
        self.value = value;
    }
}

/// 逻辑分组：按 AND / OR 组合子节点
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: NodeId,
    pub(crate) logic: Logic,
    pub(crate) children: Vec<Node>,
}

impl Group {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            logic: Logic::And,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    pub fn set_logic(&mut self, logic: Logic) {
        self.logic = logic;
    }

    /// 子节点（顺序即显示 / 求值顺序）
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// 分组的子节点
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Clause(Clause),
    Group(Group),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Clause(clause) => clause.id(),
            Self::Group(group) => group.id(),
        }
    }

    pub fn as_clause(&self) -> Option<&Clause> {
        match self {
            Self::Clause(clause) => Some(clause),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Clause(_) => None,
        }
    }

    pub fn is_clause(&self) -> bool {
        matches!(self, Self::Clause(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_text_form() {
        let id = NodeId::new(NodeKind::Group, 7);
        assert_eq!(id.to_string(), "group-7");
        assert_eq!("group-7".parse::<NodeId>().unwrap(), id);
        assert_eq!(
            "clause-12".parse::<NodeId>().unwrap(),
            NodeId::new(NodeKind::Clause, 12)
        );
        assert!("node-1".parse::<NodeId>().is_err());
        assert!("group-x".parse::<NodeId>().is_err());
        assert!("group".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_same_seq_different_kind_are_distinct() {
        let clause = NodeId::new(NodeKind::Clause, 1);
        let group = NodeId::new(NodeKind::Group, 1);
        assert_ne!(clause, group);
    }

    #[test]
    fn test_set_field_clears_operator_and_value() {
        let mut clause = Clause::new(NodeId::new(NodeKind::Clause, 1));
        clause.set_field(Some("State".to_string()));
        clause.set_operator(Some("equals".to_string()));
        clause.set_value("x".into());

        clause.set_field(Some("Priority".to_string()));
        assert_eq!(clause.field(), Some("Priority"));
        assert_eq!(clause.operator(), None);
        assert_eq!(clause.value(), &ClauseValue::Text(String::new()));
    }

    #[test]
    fn test_clause_value_untagged_json() {
        assert_eq!(serde_json::to_string(&ClauseValue::default()).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&ClauseValue::Number(2.0)).unwrap(), "2.0");
        let tags: ClauseValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(tags, ClauseValue::List(vec!["a".into(), "b".into()]));
        let flag: ClauseValue = serde_json::from_str("true").unwrap();
        assert_eq!(flag, ClauseValue::Boolean(true));
    }

    #[test]
    fn test_logic_parse_and_toggle() {
        assert_eq!("or".parse::<Logic>().unwrap(), Logic::Or);
        assert_eq!(Logic::And.toggled(), Logic::Or);
        assert!("xor".parse::<Logic>().is_err());
        assert_eq!(serde_json::to_string(&Logic::Or).unwrap(), "\"OR\"");
    }
}

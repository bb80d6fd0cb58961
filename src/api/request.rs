// api/request.rs - 编辑请求类型
//! 展示层把用户操作转换为编辑请求，再交给查询树执行

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::query::{ClauseValue, Logic, NodeId, ParseNodeIdError};

/// 节点引用：`root` 或具体节点 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeRef {
    #[default]
    Root,
    Id(NodeId),
}

impl NodeRef {
    /// 解析为具体 ID
    pub fn resolve(&self, root: NodeId) -> NodeId {
        match self {
            Self::Root => root,
            Self::Id(id) => *id,
        }
    }
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for NodeRef {
    type Err = ParseNodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("root") {
            Ok(Self::Root)
        } else {
            s.parse().map(Self::Id)
        }
    }
}

impl Serialize for NodeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 编辑请求（JSON 格式，按 `op` 区分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditRequest {
    /// 追加条件
    AddClause {
        #[serde(default)]
        group: NodeRef,
    },

    /// 删除指定下标的子节点
    RemoveClauseAt { group: NodeRef, index: usize },

    /// 追加空分组
    AddGroup {
        #[serde(default)]
        parent: NodeRef,
    },

    /// 删除分组（根分组除外）
    RemoveGroup { group: NodeRef },

    /// 设置字段（会清空操作符和值）
    SetField {
        clause: NodeRef,
        #[serde(default)]
        field: Option<String>,
    },

    SetOperator {
        clause: NodeRef,
        #[serde(default)]
        operator: Option<String>,
    },

    SetValue {
        clause: NodeRef,
        #[serde(default)]
        value: ClauseValue,
    },

    SetLogic { group: NodeRef, logic: Logic },

    /// 清空整棵树
    Clear,

    /// 导出查询文档
    Export,
}

impl EditRequest {
    /// 请求名称（用于日志）
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddClause { .. } => "add_clause",
            Self::RemoveClauseAt { .. } => "remove_clause_at",
            Self::AddGroup { .. } => "add_group",
            Self::RemoveGroup { .. } => "remove_group",
            Self::SetField { .. } => "set_field",
            Self::SetOperator { .. } => "set_operator",
            Self::SetValue { .. } => "set_value",
            Self::SetLogic { .. } => "set_logic",
            Self::Clear => "clear",
            Self::Export => "export",
        }
    }
}

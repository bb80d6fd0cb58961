// query/document.rs - 查询文档（序列化输出）
//! 把活动的查询树转换为与对象身份无关的声明式文档
//!
//! 文档结构:
//! - `{ "logic": "AND", "parts": [...] }`
//! - 条件: `{ "kind": "clause", "field": ..., "operator": ..., "value": ... }`
//! - 分组: `{ "kind": "group", "logic": ..., "group": { ...递归... } }`

use serde::{Deserialize, Serialize};

use super::tree::{IdAllocator, QueryTree, TreeError, TreeResult};
use super::types::*;

/// 序列化后的分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDocument {
    pub logic: Logic,
    #[serde(default)]
    pub parts: Vec<PartDocument>,
}

/// 序列化后的子节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PartDocument {
    Clause {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator: Option<String>,
        #[serde(default)]
        value: ClauseValue,
    },
    Group {
        logic: Logic,
        group: QueryDocument,
    },
}

/// 序列化分组（纯函数，不修改输入）
pub fn serialize(group: &Group) -> QueryDocument {
    QueryDocument {
        logic: group.logic(),
        parts: group.children().iter().map(serialize_part).collect(),
    }
}

fn serialize_part(node: &Node) -> PartDocument {
    match node {
        Node::Clause(clause) => PartDocument::Clause {
            field: clause.field().map(str::to_string),
            operator: clause.operator().map(str::to_string),
            value: clause.value().clone(),
        },
        Node::Group(group) => PartDocument::Group {
            logic: group.logic(),
            group: serialize(group),
        },
    }
}

impl From<&Group> for QueryDocument {
    fn from(group: &Group) -> Self {
        serialize(group)
    }
}

impl From<&QueryTree> for QueryDocument {
    fn from(tree: &QueryTree) -> Self {
        serialize(tree.root())
    }
}

impl QueryDocument {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// 条件总数（含嵌套分组）
    pub fn clause_count(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match part {
                PartDocument::Clause { .. } => 1,
                PartDocument::Group { group, .. } => group.clause_count(),
            })
            .sum()
    }

    /// 检查分组部件的两处 `logic` 是否一致
    pub fn validate(&self) -> TreeResult<()> {
        for part in &self.parts {
            if let PartDocument::Group { logic, group } = part {
                if *logic != group.logic {
                    return Err(TreeError::InconsistentLogic {
                        part: *logic,
                        group: group.logic,
                    });
                }
                group.validate()?;
            }
        }
        Ok(())
    }
}

impl QueryTree {
    /// 从文档重建一棵新树
    pub fn from_document(doc: &QueryDocument) -> TreeResult<QueryTree> {
        let mut tree = QueryTree::new();
        tree.import(doc)?;
        Ok(tree)
    }

    /// 用文档内容替换当前树
    ///
    /// 新节点继续从本树的 ID 分配器取号，导入前持有的 ID 不会指向新节点。
    /// 文档不一致时返回错误，当前树保持不变。
    pub fn import(&mut self, doc: &QueryDocument) -> TreeResult<()> {
        doc.validate()?;
        let root = build_group(doc, self.ids_mut());
        self.replace_root(root);
        Ok(())
    }
}

fn build_group(doc: &QueryDocument, ids: &mut IdAllocator) -> Group {
    let mut group = ids.new_group();
    group.set_logic(doc.logic);
    for part in &doc.parts {
        let child = match part {
            PartDocument::Clause { field, operator, value } => {
                let mut clause = ids.new_clause();
                clause.set_field(field.clone());
                clause.set_operator(operator.clone());
                clause.set_value(value.clone());
                Node::Clause(clause)
            }
            PartDocument::Group { group: nested, .. } => Node::Group(build_group(nested, ids)),
        };
        group.children.push(child);
    }
    group
}

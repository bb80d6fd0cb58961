// api/response.rs - 编辑响应类型
//! 每个编辑请求对应一个响应，失败时携带错误信息而不是中断会话

use serde::{Deserialize, Serialize};

use crate::query::{NodeId, QueryDocument};

/// 编辑响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditResponse {
    /// 是否执行成功
    pub ok: bool,

    /// 新建节点的 ID（add_clause / add_group）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,

    /// 当前查询文档（export，或开启回显时）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<QueryDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            node: None,
            document: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            node: None,
            document: None,
            error: Some(error.into()),
        }
    }

    pub fn with_node(mut self, node: Option<NodeId>) -> Self {
        self.node = node;
        self
    }

    pub fn with_document(mut self, document: QueryDocument) -> Self {
        self.document = Some(document);
        self
    }
}

// engine/core.rs - 查询构建器核心
//! 统一的会话接口：字段目录 + 查询树 + 配置

use std::sync::Arc;

use log::{debug, warn};

use crate::api::{parse_command, CommandError, EditRequest, EditResponse, NodeRef};
use crate::config::AppConfig;
use crate::query::{NodeId, QueryDocument, QueryTree, TreeError};
use crate::schema::{CatalogError, FieldCatalog, FieldType};

use super::builder::QueryBuilderBuilder;

/// 查询构建器错误类型
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BuilderResult<T> = Result<T, BuilderError>;

/// 查询构建器会话
///
/// 展示层只持有这一个对象：所有用户编辑都经由 [`QueryBuilder::apply`]
/// 转发到查询树，导出时调用 [`QueryBuilder::document`]。
pub struct QueryBuilder {
    pub(crate) catalog: FieldCatalog,
    pub(crate) tree: QueryTree,
    pub(crate) config: Arc<AppConfig>,
}

impl QueryBuilder {
    pub fn builder() -> QueryBuilderBuilder {
        QueryBuilderBuilder::new()
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn tree(&self) -> &QueryTree {
        &self.tree
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root_id()
    }

    fn resolve(&self, node: NodeRef) -> NodeId {
        node.resolve(self.tree.root_id())
    }

    /// 执行编辑请求，返回新建节点的 ID（如果有）
    pub fn try_apply(&mut self, request: EditRequest) -> BuilderResult<Option<NodeId>> {
        debug!("apply {}", request.name());
        let created = match request {
            EditRequest::AddClause { group } => Some(self.tree.add_clause(self.resolve(group))?),
            EditRequest::RemoveClauseAt { group, index } => {
                self.tree.remove_clause_at(self.resolve(group), index)?;
                None
            }
            EditRequest::AddGroup { parent } => Some(self.tree.add_group(self.resolve(parent))?),
            EditRequest::RemoveGroup { group } => {
                self.tree.remove_group(self.resolve(group))?;
                None
            }
            EditRequest::SetField { clause, field } => {
                if let Some(key) = field.as_deref() {
                    if self.catalog.field_by_key(key).is_none() {
                        debug!("field '{}' is not in the catalog", key);
                    }
                }
                self.tree.set_clause_field(self.resolve(clause), field)?;
                None
            }
            EditRequest::SetOperator { clause, operator } => {
                self.tree.set_clause_operator(self.resolve(clause), operator)?;
                None
            }
            EditRequest::SetValue { clause, value } => {
                let id = self.resolve(clause);
                let kind = self.value_kind_for(id)?;
                self.tree.set_clause_value(id, kind.coerce(value))?;
                None
            }
            EditRequest::SetLogic { group, logic } => {
                self.tree.set_logic(self.resolve(group), logic)?;
                None
            }
            EditRequest::Clear => {
                self.clear();
                None
            }
            EditRequest::Export => None,
        };
        Ok(created)
    }

    /// 执行编辑请求；错误转换为失败响应，会话继续可用
    pub fn apply(&mut self, request: EditRequest) -> EditResponse {
        let export = matches!(request, EditRequest::Export);
        match self.try_apply(request) {
            Ok(node) => {
                let response = EditResponse::success().with_node(node);
                if export || self.config.output.echo_document {
                    response.with_document(self.document())
                } else {
                    response
                }
            }
            Err(e) => {
                warn!("edit rejected: {}", e);
                EditResponse::failure(e.to_string())
            }
        }
    }

    /// 解析并执行一行控制台输入
    pub fn execute(&mut self, line: &str) -> EditResponse {
        match parse_command(line) {
            Ok(request) => self.apply(request),
            Err(e) => {
                warn!("bad command '{}': {}", line.trim(), e);
                EditResponse::failure(BuilderError::from(e).to_string())
            }
        }
    }

    /// 当前查询文档
    pub fn document(&self) -> QueryDocument {
        QueryDocument::from(&self.tree)
    }

    /// 导出 JSON（按配置决定是否格式化）
    pub fn export_json(&self) -> BuilderResult<String> {
        Ok(self.document().to_json(self.config.output.pretty)?)
    }

    /// 条件可用的操作符
    pub fn operators_for(&self, clause: NodeId) -> BuilderResult<&[String]> {
        let clause = self
            .tree
            .find_clause(clause)
            .ok_or(TreeError::ClauseNotFound(clause))?;
        Ok(self.catalog.operators_for(clause))
    }

    /// 条件值的输入类型
    pub fn value_kind_for(&self, clause: NodeId) -> BuilderResult<FieldType> {
        let clause = self
            .tree
            .find_clause(clause)
            .ok_or(TreeError::ClauseNotFound(clause))?;
        Ok(self.catalog.value_kind_for(clause))
    }

    /// 清空查询树（替换为新树）
    pub fn clear(&mut self) {
        self.tree = std::mem::take(&mut self.tree).reset();
    }

    /// 用导入的文档替换当前查询树
    ///
    /// 新节点沿用当前树的 ID 计数，导入前的 ID 全部失效。
    pub fn load_document(&mut self, document: &QueryDocument) -> BuilderResult<()> {
        self.tree.import(document)?;
        debug!("loaded document with {} clauses", document.clause_count());
        Ok(())
    }
}

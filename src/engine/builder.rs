// engine/builder.rs - 查询构建器的构建器
//! 使用 Builder 模式构建 QueryBuilder

use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::config::{AppConfig, CONFIG};
use crate::query::{QueryDocument, QueryTree};
use crate::schema::{self, FieldCatalog};

use super::core::{BuilderResult, QueryBuilder};

/// 查询构建器的构建器
#[derive(Default)]
pub struct QueryBuilderBuilder {
    config: Option<Arc<AppConfig>>,
    catalog: Option<FieldCatalog>,
    catalog_path: Option<PathBuf>,
    document: Option<QueryDocument>,
}

impl QueryBuilderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置配置（缺省使用全局配置）
    pub fn with_config(mut self, config: Arc<AppConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// 直接提供字段目录
    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 从文件加载字段目录
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// 以已有文档作为初始查询
    pub fn with_document(mut self, document: QueryDocument) -> Self {
        self.document = Some(document);
        self
    }

    /// 构建查询构建器
    ///
    /// 目录优先级：显式目录 > 显式路径 > 配置中的路径 > 内置目录
    pub fn build(self) -> BuilderResult<QueryBuilder> {
        let config = self.config.unwrap_or_else(|| Arc::new(CONFIG.clone()));

        let catalog_path = self
            .catalog_path
            .or_else(|| config.catalog.path.as_ref().map(PathBuf::from));
        let catalog = match (self.catalog, catalog_path) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => {
                let catalog = FieldCatalog::load_from_file(&path)?;
                info!("[Catalog] loaded {} fields from {}", catalog.len(), path.display());
                catalog
            }
            (None, None) => schema::default_catalog(),
        };

        let tree = match self.document {
            Some(document) => QueryTree::from_document(&document)?,
            None => QueryTree::new(),
        };

        Ok(QueryBuilder { catalog, tree, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BuilderError;
    use crate::query::{Logic, PartDocument};
    use std::io::Write;

    #[test]
    fn test_default_build_uses_builtin_catalog() {
        let qb = QueryBuilderBuilder::new()
            .with_config(Arc::new(AppConfig::default()))
            .build()
            .unwrap();
        assert_eq!(qb.catalog().len(), schema::default_catalog().len());
        assert!(qb.tree().root().is_empty());
    }

    #[test]
    fn test_catalog_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[[fields]]\nkey = \"Effort\"\ntype = \"number\"\noperators = [\">\"]"
        )
        .unwrap();

        let qb = QueryBuilderBuilder::new()
            .with_config(Arc::new(AppConfig::default()))
            .with_catalog_path(file.path())
            .build()
            .unwrap();
        assert_eq!(qb.catalog().len(), 1);
        assert!(qb.catalog().field_by_key("Effort").is_some());
    }

    #[test]
    fn test_catalog_path_from_config() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"fields":[{{"key":"Area","operators":["under"]}}]}}"#).unwrap();

        let mut config = AppConfig::default();
        config.catalog.path = Some(file.path().display().to_string());
        let qb = QueryBuilderBuilder::new().with_config(Arc::new(config)).build().unwrap();
        assert!(qb.catalog().field_by_key("Area").is_some());
    }

    #[test]
    fn test_missing_catalog_file_fails() {
        let result = QueryBuilderBuilder::new()
            .with_config(Arc::new(AppConfig::default()))
            .with_catalog_path("/definitely/not/here.toml")
            .build();
        assert!(matches!(result, Err(BuilderError::Catalog(_))));
    }

    #[test]
    fn test_initial_document() {
        let doc = QueryDocument { logic: Logic::Or, parts: Vec::new() };
        let qb = QueryBuilderBuilder::new()
            .with_config(Arc::new(AppConfig::default()))
            .with_document(doc.clone())
            .build()
            .unwrap();
        assert_eq!(qb.document(), doc);
    }

    #[test]
    fn test_inconsistent_initial_document_fails() {
        let nested = QueryDocument { logic: Logic::And, parts: Vec::new() };
        let doc = QueryDocument {
            logic: Logic::And,
            parts: vec![PartDocument::Group { logic: Logic::Or, group: nested }],
        };
        let result = QueryBuilderBuilder::new()
            .with_config(Arc::new(AppConfig::default()))
            .with_document(doc)
            .build();
        assert!(matches!(result, Err(BuilderError::Tree(_))));
    }
}

// schema/catalog.rs - 字段目录
//! 只读的字段查找表：字段 key -> 值类型 + 合法操作符

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::query::{Clause, ClauseValue};

/// 字段目录错误类型
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate field key: {0}")]
    DuplicateKey(String),

    #[error("Unsupported catalog file: {0}")]
    UnsupportedFormat(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// 字段值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    TagList,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::TagList => "tag-list",
        }
    }

    /// 把输入值转换为该类型对应的形状
    ///
    /// 无法转换的值原样保留，空值保持为默认的空文本。
    pub fn coerce(&self, value: ClauseValue) -> ClauseValue {
        if value.is_empty() {
            return value;
        }
        match (self, value) {
            (Self::Text | Self::Date, ClauseValue::Number(n)) => ClauseValue::Text(n.to_string()),
            (Self::Text | Self::Date, ClauseValue::Boolean(b)) => ClauseValue::Text(b.to_string()),
            (Self::Text | Self::Date, ClauseValue::List(items)) => {
                ClauseValue::Text(items.join(", "))
            }
            (Self::Number, ClauseValue::Text(s)) => match s.trim().parse::<f64>() {
                Ok(n) => ClauseValue::Number(n),
                Err(_) => ClauseValue::Text(s),
            },
            (Self::Boolean, ClauseValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => ClauseValue::Boolean(true),
                "false" => ClauseValue::Boolean(false),
                _ => ClauseValue::Text(s),
            },
            (Self::TagList, ClauseValue::Text(s)) => ClauseValue::List(
                s.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            (Self::TagList, ClauseValue::Number(n)) => ClauseValue::List(vec![n.to_string()]),
            (Self::TagList, ClauseValue::Boolean(b)) => ClauseValue::List(vec![b.to_string()]),
            (_, value) => value,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可查询字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    /// 显示名称，缺省时使用 key
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// 有序的合法操作符列表
    #[serde(default)]
    pub operators: Vec<String>,
}

impl Field {
    pub fn new(key: impl Into<String>, field_type: FieldType, operators: &[&str]) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            field_type,
            operators: operators.iter().map(|op| op.to_string()).collect(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// 目录文件格式（TOML / JSON 共用）
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    fields: Vec<Field>,
}

/// 字段目录，加载后不可变
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<Field>,
    by_key: HashMap<String, usize>,
}

impl FieldCatalog {
    /// 构建目录，key 必须唯一
    pub fn new(fields: Vec<Field>) -> CatalogResult<Self> {
        let mut by_key = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if by_key.insert(field.key.clone(), index).is_some() {
                return Err(CatalogError::DuplicateKey(field.key.clone()));
            }
        }
        let fields = fields
            .into_iter()
            .map(|mut field| {
                if field.label.is_empty() {
                    field.label = field.key.clone();
                }
                field
            })
            .collect();
        Ok(Self { fields, by_key })
    }

    pub fn from_toml_str(content: &str) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.fields)
    }

    pub fn from_json_str(content: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::new(file.fields)
    }

    /// 按扩展名（.toml / .json）加载目录文件
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn field_by_key(&self, key: &str) -> Option<&Field> {
        self.by_key.get(key).map(|&index| &self.fields[index])
    }

    /// 条件当前字段的操作符；未选字段或字段未知时为空
    pub fn operators_for(&self, clause: &Clause) -> &[String] {
        clause
            .field()
            .and_then(|key| self.field_by_key(key))
            .map(|field| field.operators.as_slice())
            .unwrap_or(&[])
    }

    /// 条件当前字段的值类型；未选字段或字段未知时为 text
    pub fn value_kind_for(&self, clause: &Clause) -> FieldType {
        clause
            .field()
            .and_then(|key| self.field_by_key(key))
            .map(|field| field.field_type)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

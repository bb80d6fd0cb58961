// schema/mod.rs - 字段目录模块
//! 定义可查询字段、值类型以及内置的默认目录

mod catalog;
pub mod fields;

pub use catalog::*;
pub use fields::*;

/// 内置默认目录（工作项查询常用字段）
pub fn default_catalog() -> FieldCatalog {
    let fields = vec![
        Field::new(FIELD_TITLE, FieldType::Text, &["contains", "does not contain", "=", "!="]),
        Field::new(FIELD_WORK_ITEM_TYPE, FieldType::Text, &["=", "!=", "in"])
            .with_label("Work Item Type"),
        Field::new(FIELD_STATE, FieldType::Text, &["=", "!=", "in", "not in"]),
        Field::new(FIELD_PRIORITY, FieldType::Number, &["=", "!=", "<", ">"]),
        Field::new(FIELD_ASSIGNED_TO, FieldType::Text, &["=", "!=", "contains", "in group"])
            .with_label("Assigned To"),
        Field::new(FIELD_CREATED_DATE, FieldType::Date, &["=", "<", ">", "<=", ">="])
            .with_label("Created Date"),
        Field::new(FIELD_TAGS, FieldType::TagList, &["contains", "does not contain"]),
        Field::new(FIELD_BLOCKED, FieldType::Boolean, &["="]),
    ];
    // 内置字段 key 互不相同
    FieldCatalog::new(fields).unwrap_or_default()
}

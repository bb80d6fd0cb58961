// schema/fields.rs - 内置字段名常量定义
//! 统一管理默认字段目录中的字段 key，避免魔法字符串

/// 标题
pub const FIELD_TITLE: &str = "Title";
/// 工作项类型
pub const FIELD_WORK_ITEM_TYPE: &str = "WorkItemType";
/// 状态
pub const FIELD_STATE: &str = "State";
/// 优先级
pub const FIELD_PRIORITY: &str = "Priority";
/// 指派人
pub const FIELD_ASSIGNED_TO: &str = "AssignedTo";
/// 创建日期
pub const FIELD_CREATED_DATE: &str = "CreatedDate";
/// 标签
pub const FIELD_TAGS: &str = "Tags";
/// 是否阻塞
pub const FIELD_BLOCKED: &str = "Blocked";

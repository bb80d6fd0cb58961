// engine/mod.rs - 查询构建器会话模块
//! 把字段目录、查询树和配置组合成展示层使用的单一入口

pub mod builder;
pub mod core;

pub use self::builder::*;
pub use self::core::*;

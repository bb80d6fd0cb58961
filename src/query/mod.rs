// query/mod.rs - 查询模块
//! 查询树模型、变更与序列化

pub mod document;
pub mod tree;
pub mod types;

pub use document::*;
pub use tree::*;
pub use types::*;

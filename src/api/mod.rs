// api/mod.rs - API 模块
//! 提供结构化的编辑请求 / 响应类型以及控制台命令解析

pub mod command;
pub mod request;
pub mod response;

pub use command::*;
pub use request::*;
pub use response::*;

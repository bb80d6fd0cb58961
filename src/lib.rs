// src/lib.rs
pub mod api;
pub mod config;
pub mod engine;
pub mod logger;
pub mod query;
pub mod schema;

pub use config::*;
pub use engine::{BuilderError, BuilderResult, QueryBuilder, QueryBuilderBuilder};
pub use query::*;
pub use schema::*;

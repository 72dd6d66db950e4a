//! Core types and traits for minorm.
//!
//! This crate provides the engine-independent half of the ORM:
//!
//! - `Column<T>` typed cells and the type-erased `ColumnOps` interface
//! - `Model` trait with create table / save / find / update / remove
//! - `Engine` and `Statement` traits describing the SQL engine boundary
//! - `Error` taxonomy shared by every engine implementation

pub mod column;
pub mod engine;
pub mod error;
pub mod model;
mod ops;
pub mod sql;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use column::{Column, ColumnOps, ColumnValue, sql_type_of};
pub use engine::{Engine, Statement, Step};
pub use error::{
    ConfigError, ConfigErrorKind, ConnectionError, ConnectionErrorKind, Error, QueryError,
    QueryErrorKind, Result, TypeError,
};
pub use model::{ColumnSet, ColumnSetMut, DEFAULT_TABLE_NAME, Model};
pub use types::SqlType;

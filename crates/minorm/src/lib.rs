//! minorm - a minimal column-driven ORM over a prepared-statement engine.
//!
//! An entity is a struct of typed [`Column`] cells. Registering those
//! columns in order (the first one is the primary key) is enough to
//! create the table and to save, find, update and remove rows:
//!
//! - [`Column<T>`] holds a name, extra constraints and a current value
//! - [`ColumnOps`] is the type-erased view every operation iterates over
//! - [`Model`] provides the operations once `columns()` is implemented,
//!   usually through the [`model!`] macro
//! - [`Engine`] and [`Statement`] are the only surface a database needs
//!
//! # Quick Start
//!
//! ```
//! use minorm::prelude::*;
//!
//! #[derive(Debug)]
//! struct User {
//!     id: Column<i64>,
//!     name: Column<String>,
//!     age: Column<i32>,
//! }
//!
//! impl Default for User {
//!     fn default() -> Self {
//!         Self {
//!             id: Column::new("id").with_constraints("PRIMARY KEY"),
//!             name: Column::new("name").with_constraints("NOT NULL"),
//!             age: Column::new("age"),
//!         }
//!     }
//! }
//!
//! model!(User { table: "users", columns: [id, name, age] });
//!
//! let conn = SqliteConnection::open_memory().unwrap();
//! let mut user = User::default();
//! user.create_table(&conn).unwrap();
//!
//! user.id.set(1);
//! user.name.set("Alice".to_string());
//! user.age.set(30);
//! user.save(&conn).unwrap();
//!
//! let mut found = User::default();
//! assert!(found.find(&conn, 1).unwrap());
//! assert_eq!(found.name.get(), "Alice");
//! assert_eq!(*found.age.get(), 30);
//! ```
//!
//! # Features
//!
//! - `sqlite` (default): the bundled SQLite engine from `minorm-sqlite`

pub use minorm_core::{
    Column, ColumnOps, ColumnSet, ColumnSetMut, ColumnValue, ConfigErrorKind, DEFAULT_TABLE_NAME,
    Engine, Error, Model, QueryErrorKind, Result, SqlType, Statement, Step, model, sql_type_of,
};

/// Error types, including the per-category error structs.
pub mod error {
    pub use minorm_core::error::*;
}

/// SQL text generators behind the model operations.
pub mod sql {
    pub use minorm_core::sql::*;
}

#[cfg(feature = "sqlite")]
pub use minorm_sqlite::{
    OpenFlags, SqliteConfig, SqliteConnection, SqliteStatement, sqlite_version,
};

/// Prelude module for convenient imports.
///
/// ```
/// use minorm::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Column, ColumnSet, ColumnSetMut, Engine, Error, Model, Result, model};

    #[cfg(feature = "sqlite")]
    pub use crate::{SqliteConfig, SqliteConnection};
}

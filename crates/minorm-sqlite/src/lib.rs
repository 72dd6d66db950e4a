//! SQLite engine for minorm.
//!
// FFI bindings require unsafe code - this is expected for database drivers
#![allow(unsafe_code)]
//!
//! This crate drives the bundled SQLite library through `libsqlite3-sys`
//! and implements the `Engine` and `Statement` traits from minorm-core, so
//! any `Model` can be created, saved, found, updated and removed against a
//! real database.
//!
//! # Example
//!
//! ```
//! use minorm_core::{Column, Model};
//! use minorm_sqlite::SqliteConnection;
//!
//! struct Note {
//!     id: Column<i64>,
//!     body: Column<String>,
//! }
//!
//! minorm_core::model!(Note { table: "notes", columns: [id, body] });
//!
//! let conn = SqliteConnection::open_memory().unwrap();
//! let mut note = Note {
//!     id: Column::with_value("id", 1).with_constraints("PRIMARY KEY"),
//!     body: Column::with_value("body", "hello".to_string()),
//! };
//! note.create_table(&conn).unwrap();
//! note.save(&conn).unwrap();
//!
//! note.body.set(String::new());
//! assert!(note.find(&conn, 1).unwrap());
//! assert_eq!(note.body.get(), "hello");
//! ```
//!
//! # Type Mapping
//!
//! | Rust Type | SQLite Type |
//! |-----------|-------------|
//! | `i32`, `i64` | INTEGER |
//! | `f64` | REAL |
//! | `String` | TEXT |
//! | `Vec<u8>` | BLOB |
//! | other `ColumnValue` types | BLOB |
//!
//! # Thread Safety
//!
//! `SqliteConnection` is `Send` but not `Sync`: a handle may move to another
//! thread, but only one thread uses it at a time. Statements borrow their
//! connection and are neither.

pub mod connection;
pub mod ffi;
pub mod statement;
pub mod types;

pub use connection::{OpenFlags, SqliteConfig, SqliteConnection};
pub use statement::SqliteStatement;
pub use types::StorageClass;

/// Re-export the SQLite library version.
pub fn sqlite_version() -> &'static str {
    ffi::version()
}

/// Re-export the SQLite library version number.
pub fn sqlite_version_number() -> i32 {
    ffi::version_number()
}

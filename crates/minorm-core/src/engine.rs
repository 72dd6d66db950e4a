//! The SQL engine boundary.
//!
//! minorm never talks to a database library directly. Every operation goes
//! through two small traits:
//!
//! - [`Engine`] executes plain SQL and prepares parameterized statements.
//! - [`Statement`] binds parameters, steps through results and reads the
//!   current row.
//!
//! A statement is finalized when it is dropped, so every exit path of an
//! operation (success, no match, `?` on an engine error) releases it.
//!
//! Parameter indices are 1-based and result column indices are 0-based,
//! matching the C-level conventions of row-oriented engines.

use crate::Result;

/// Outcome of advancing a prepared statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A result row is available for reading.
    Row,
    /// The statement ran to completion.
    Done,
}

/// A database handle able to run and prepare SQL.
///
/// Implementations are not required to be thread-safe; callers serialize
/// access to one handle.
pub trait Engine {
    /// Prepared statement type, borrowing the engine for its lifetime.
    type Statement<'e>: Statement
    where
        Self: 'e;

    /// Execute a non-parameterized statement (DDL and the like).
    fn execute(&self, sql: &str) -> Result<()>;

    /// Prepare a parameterized statement.
    fn prepare(&self, sql: &str) -> Result<Self::Statement<'_>>;
}

/// A prepared statement with positional parameters and a row cursor.
pub trait Statement {
    /// The SQL text this statement was prepared from.
    fn sql(&self) -> &str;

    /// Bind a 64-bit integer at the 1-based parameter `index`.
    fn bind_int(&mut self, index: usize, value: i64) -> Result<()>;

    /// Bind a double at the 1-based parameter `index`.
    fn bind_double(&mut self, index: usize, value: f64) -> Result<()>;

    /// Bind text at the 1-based parameter `index`.
    ///
    /// The engine copies the bytes; the statement never aliases `value`.
    fn bind_text(&mut self, index: usize, value: &str) -> Result<()>;

    /// Bind bytes at the 1-based parameter `index`, copied like text.
    fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<()>;

    /// Bind SQL NULL at the 1-based parameter `index`.
    fn bind_null(&mut self, index: usize) -> Result<()>;

    /// Advance to the next row or to completion.
    fn step(&mut self) -> Result<Step>;

    /// Number of columns in the result set.
    fn column_count(&self) -> usize;

    /// Read an integer from the 0-based result column `index`.
    fn column_int(&self, index: usize) -> i64;

    /// Read a double from the 0-based result column `index`.
    fn column_double(&self, index: usize) -> f64;

    /// Read text from the 0-based result column `index`; `None` for NULL.
    fn column_text(&self, index: usize) -> Option<String>;

    /// Read bytes from the 0-based result column `index`; empty for NULL.
    fn column_blob(&self, index: usize) -> Vec<u8>;
}

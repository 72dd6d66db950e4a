//! Prepared statements.
//!
//! A `SqliteStatement` borrows its connection, so it can never outlive the
//! database handle, and finalizes the underlying `sqlite3_stmt` on drop.

#![allow(clippy::borrow_as_ptr)] // FFI requires raw pointers

use crate::connection::{SqliteConnection, bind_error, null_byte_error, prepare_error, step_error};
use crate::ffi;
use crate::types::{self, StorageClass};
use minorm_core::{Error, QueryErrorKind, Result, Statement, Step};
use std::ffi::{CString, c_int};
use std::ptr;

/// A prepared statement on a [`SqliteConnection`].
pub struct SqliteStatement<'conn> {
    conn: &'conn SqliteConnection,
    raw: *mut ffi::sqlite3_stmt,
    sql: String,
}

impl std::fmt::Debug for SqliteStatement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStatement")
            .field("sql", &self.sql)
            .finish_non_exhaustive()
    }
}

impl<'conn> SqliteStatement<'conn> {
    pub(crate) fn prepare(conn: &'conn SqliteConnection, sql: &str) -> Result<Self> {
        let db = conn.handle();
        let c_sql = CString::new(sql).map_err(|_| null_byte_error(sql))?;
        let len = c_int::try_from(c_sql.as_bytes().len()).map_err(|_| {
            Error::query(
                QueryErrorKind::DataTruncation,
                Some(sql),
                "SQL text is too long",
            )
        })?;

        let mut raw: *mut ffi::sqlite3_stmt = ptr::null_mut();

        // SAFETY: All pointers are valid
        let rc = unsafe { ffi::sqlite3_prepare_v2(db, c_sql.as_ptr(), len, &mut raw, ptr::null_mut()) };

        if rc != ffi::SQLITE_OK {
            return Err(prepare_error(db, sql));
        }
        if raw.is_null() {
            // Whitespace or comments only
            return Err(Error::query(
                QueryErrorKind::Syntax,
                Some(sql),
                "SQL contains no statement",
            ));
        }

        tracing::trace!(sql = %sql, "Prepared statement");
        Ok(Self {
            conn,
            raw,
            sql: sql.to_string(),
        })
    }

    /// Number of `?` parameters in the statement.
    pub fn parameter_count(&self) -> usize {
        // SAFETY: raw is a valid statement
        let n = unsafe { ffi::sqlite3_bind_parameter_count(self.raw) };
        usize::try_from(n).unwrap_or(0)
    }

    /// Name of result column `index`.
    pub fn column_name(&self, index: usize) -> Option<String> {
        let i = self.result_index(index)?;
        // SAFETY: raw is valid and i is in range
        unsafe { types::column_name(self.raw, i) }
    }

    /// Storage class of result column `index` in the current row.
    pub fn column_type(&self, index: usize) -> StorageClass {
        match self.result_index(index) {
            // SAFETY: raw is valid and i is in range
            Some(i) => unsafe { types::column_type(self.raw, i) },
            None => StorageClass::Null,
        }
    }

    fn param_index(&self, index: usize) -> Result<c_int> {
        c_int::try_from(index).map_err(|_| {
            Error::query(
                QueryErrorKind::Range,
                Some(self.sql.as_str()),
                format!("Parameter index {index} is out of range"),
            )
        })
    }

    /// Converts a 0-based result index, rejecting indices past the last column.
    fn result_index(&self, index: usize) -> Option<c_int> {
        if index >= self.column_count() {
            return None;
        }
        c_int::try_from(index).ok()
    }

    fn check_bind(&self, rc: c_int, index: usize) -> Result<()> {
        if rc != ffi::SQLITE_OK {
            return Err(bind_error(self.conn.handle(), &self.sql, index, rc));
        }
        Ok(())
    }
}

impl Statement for SqliteStatement<'_> {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bind_int(&mut self, index: usize, value: i64) -> Result<()> {
        let i = self.param_index(index)?;
        // SAFETY: raw is a valid statement
        let rc = unsafe { ffi::sqlite3_bind_int64(self.raw, i, value) };
        self.check_bind(rc, index)
    }

    fn bind_double(&mut self, index: usize, value: f64) -> Result<()> {
        let i = self.param_index(index)?;
        // SAFETY: raw is a valid statement
        let rc = unsafe { ffi::sqlite3_bind_double(self.raw, i, value) };
        self.check_bind(rc, index)
    }

    fn bind_text(&mut self, index: usize, value: &str) -> Result<()> {
        let i = self.param_index(index)?;
        // SAFETY: raw is a valid statement
        let rc = unsafe { types::bind_text(self.raw, i, value) };
        self.check_bind(rc, index)
    }

    fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<()> {
        let i = self.param_index(index)?;
        // SAFETY: raw is a valid statement
        let rc = unsafe { types::bind_blob(self.raw, i, value) };
        self.check_bind(rc, index)
    }

    fn bind_null(&mut self, index: usize) -> Result<()> {
        let i = self.param_index(index)?;
        // SAFETY: raw is a valid statement
        let rc = unsafe { ffi::sqlite3_bind_null(self.raw, i) };
        self.check_bind(rc, index)
    }

    fn step(&mut self) -> Result<Step> {
        // SAFETY: raw is a valid statement
        let rc = unsafe { ffi::sqlite3_step(self.raw) };
        match rc {
            ffi::SQLITE_ROW => Ok(Step::Row),
            ffi::SQLITE_DONE => Ok(Step::Done),
            _ => Err(step_error(self.conn.handle(), &self.sql)),
        }
    }

    fn column_count(&self) -> usize {
        // SAFETY: raw is a valid statement
        let n = unsafe { ffi::sqlite3_column_count(self.raw) };
        usize::try_from(n).unwrap_or(0)
    }

    fn column_int(&self, index: usize) -> i64 {
        match self.result_index(index) {
            // SAFETY: raw is valid and i is in range
            Some(i) => unsafe { ffi::sqlite3_column_int64(self.raw, i) },
            None => 0,
        }
    }

    fn column_double(&self, index: usize) -> f64 {
        match self.result_index(index) {
            // SAFETY: raw is valid and i is in range
            Some(i) => unsafe { ffi::sqlite3_column_double(self.raw, i) },
            None => 0.0,
        }
    }

    fn column_text(&self, index: usize) -> Option<String> {
        let i = self.result_index(index)?;
        // SAFETY: raw is valid and i is in range
        unsafe { types::read_text(self.raw, i) }
    }

    fn column_blob(&self, index: usize) -> Vec<u8> {
        match self.result_index(index) {
            // SAFETY: raw is valid and i is in range
            Some(i) => unsafe { types::read_blob(self.raw, i) },
            None => Vec::new(),
        }
    }
}

impl Drop for SqliteStatement<'_> {
    fn drop(&mut self) {
        // SAFETY: raw came from prepare_v2 and is finalized exactly once
        unsafe {
            ffi::sqlite3_finalize(self.raw);
        }
        tracing::trace!(sql = %self.sql, "Finalized statement");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn_with_table() -> SqliteConnection {
        let conn = SqliteConnection::open_memory().unwrap();
        conn.execute_raw(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, score REAL, data BLOB)",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_bind_and_read_back() {
        let conn = conn_with_table();
        {
            let mut stmt = conn
                .prepare_statement("INSERT INTO t (id, name, score, data) VALUES (?, ?, ?, ?)")
                .unwrap();
            assert_eq!(stmt.parameter_count(), 4);
            stmt.bind_int(1, 1).unwrap();
            stmt.bind_text(2, "Alice").unwrap();
            stmt.bind_double(3, 9.5).unwrap();
            stmt.bind_blob(4, &[0, 1, 2, 255]).unwrap();
            assert_eq!(stmt.step().unwrap(), Step::Done);
        }
        assert_eq!(conn.changes(), 1);

        let mut stmt = conn
            .prepare_statement("SELECT * FROM t WHERE id = ?")
            .unwrap();
        stmt.bind_int(1, 1).unwrap();
        assert_eq!(stmt.step().unwrap(), Step::Row);
        assert_eq!(stmt.column_count(), 4);
        assert_eq!(stmt.column_name(1).as_deref(), Some("name"));
        assert_eq!(stmt.column_type(0), StorageClass::Integer);
        assert_eq!(stmt.column_int(0), 1);
        assert_eq!(stmt.column_text(1).as_deref(), Some("Alice"));
        assert!((stmt.column_double(2) - 9.5).abs() < f64::EPSILON);
        assert_eq!(stmt.column_blob(3), vec![0, 1, 2, 255]);
        assert_eq!(stmt.step().unwrap(), Step::Done);
    }

    #[test]
    fn test_null_values() {
        let conn = conn_with_table();
        {
            let mut stmt = conn
                .prepare_statement("INSERT INTO t (id, name) VALUES (?, ?)")
                .unwrap();
            stmt.bind_int(1, 2).unwrap();
            stmt.bind_null(2).unwrap();
            stmt.step().unwrap();
        }

        let mut stmt = conn.prepare_statement("SELECT * FROM t").unwrap();
        assert_eq!(stmt.step().unwrap(), Step::Row);
        assert_eq!(stmt.column_type(1), StorageClass::Null);
        assert_eq!(stmt.column_text(1), None);
        assert!(stmt.column_blob(3).is_empty());
    }

    #[test]
    fn test_out_of_range_column_reads_default() {
        let conn = conn_with_table();
        conn.execute_raw("INSERT INTO t (id, name) VALUES (1, 'x')")
            .unwrap();
        let mut stmt = conn.prepare_statement("SELECT id FROM t").unwrap();
        assert_eq!(stmt.step().unwrap(), Step::Row);
        assert_eq!(stmt.column_int(5), 0);
        assert_eq!(stmt.column_text(5), None);
        assert_eq!(stmt.column_name(5), None);
    }

    #[test]
    fn test_bind_out_of_range() {
        let conn = conn_with_table();
        let mut stmt = conn
            .prepare_statement("SELECT * FROM t WHERE id = ?")
            .unwrap();
        let err = stmt.bind_int(2, 1).unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::Range));
        assert!(err.to_string().contains("Failed to bind parameter 2"));

        let err = stmt.bind_int(0, 1).unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::Range));
    }

    #[test]
    fn test_prepare_error() {
        let conn = conn_with_table();
        let err = conn.prepare_statement("SELECT * FROM missing").unwrap_err();
        assert_eq!(err.sql(), Some("SELECT * FROM missing"));
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn test_prepare_empty_sql() {
        let conn = conn_with_table();
        let err = conn.prepare_statement("   ").unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::Syntax));
    }

    #[test]
    fn test_step_constraint_error() {
        let conn = conn_with_table();
        conn.execute_raw("INSERT INTO t (id) VALUES (1)").unwrap();
        let mut stmt = conn
            .prepare_statement("INSERT INTO t (id) VALUES (?)")
            .unwrap();
        stmt.bind_int(1, 1).unwrap();
        let err = stmt.step().unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::Constraint));
        assert_eq!(err.sql(), Some("INSERT INTO t (id) VALUES (?)"));
    }

    #[test]
    fn test_statement_is_object_safe() {
        let conn = conn_with_table();
        let mut stmt = conn.prepare_statement("SELECT 42").unwrap();
        let dyn_stmt: &mut dyn Statement = &mut stmt;
        assert_eq!(dyn_stmt.step().unwrap(), Step::Row);
        assert_eq!(dyn_stmt.column_int(0), 42);
        assert_eq!(dyn_stmt.sql(), "SELECT 42");
    }
}

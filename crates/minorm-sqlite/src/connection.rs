//! SQLite connection implementation.
//!
//! This module provides safe wrappers around SQLite's C API and implements
//! the `Engine` trait from minorm-core.

// Allow casts in FFI code where we need to match C types exactly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::result_large_err)] // Error type is defined in minorm-core
#![allow(clippy::borrow_as_ptr)] // FFI requires raw pointers
#![allow(clippy::if_not_else)] // Clearer for error handling

use crate::ffi;
use crate::statement::SqliteStatement;
use minorm_core::{
    ConnectionError, ConnectionErrorKind, Engine, Error, QueryError, QueryErrorKind, Result,
};
use serde::{Deserialize, Serialize};
use std::ffi::{CStr, CString, c_int};
use std::ptr;

/// Configuration for opening SQLite connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Path to the database file, or ":memory:" for in-memory database.
    pub path: String,
    /// Open flags (read-only, read-write, create, etc.)
    pub flags: OpenFlags,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

/// Flags controlling how the database is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenFlags {
    /// Open for reading only.
    pub read_only: bool,
    /// Open for reading and writing.
    pub read_write: bool,
    /// Create the database if it doesn't exist.
    pub create: bool,
    /// Enable URI filename interpretation.
    pub uri: bool,
    /// Open in multi-thread mode (connections not shared between threads).
    pub no_mutex: bool,
    /// Open in serialized mode.
    pub full_mutex: bool,
}

impl OpenFlags {
    /// Create flags for read-only access.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access (database must exist).
    pub fn read_write() -> Self {
        Self {
            read_write: true,
            ..Default::default()
        }
    }

    /// Create flags for read-write access with creation if needed.
    pub fn create_read_write() -> Self {
        Self {
            read_write: true,
            create: true,
            ..Default::default()
        }
    }

    pub(crate) fn to_sqlite_flags(self) -> c_int {
        let mut flags = 0;

        if self.read_only {
            flags |= ffi::SQLITE_OPEN_READONLY;
        }
        if self.read_write {
            flags |= ffi::SQLITE_OPEN_READWRITE;
        }
        if self.create {
            flags |= ffi::SQLITE_OPEN_CREATE;
        }
        if self.uri {
            flags |= ffi::SQLITE_OPEN_URI;
        }
        if self.no_mutex {
            flags |= ffi::SQLITE_OPEN_NOMUTEX;
        }
        if self.full_mutex {
            flags |= ffi::SQLITE_OPEN_FULLMUTEX;
        }

        // Default to read-write if no mode specified
        if flags & (ffi::SQLITE_OPEN_READONLY | ffi::SQLITE_OPEN_READWRITE) == 0 {
            flags |= ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE;
        }

        flags
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            flags: OpenFlags::create_read_write(),
            busy_timeout_ms: 5000,
        }
    }
}

impl SqliteConfig {
    /// Create a new config for a file-based database.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a new config for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Set open flags.
    pub fn flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set busy timeout.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = ms;
        self
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    ///
    /// ```
    /// use minorm_sqlite::SqliteConfig;
    ///
    /// let config = SqliteConfig::from_json(r#"{ "path": "app.db" }"#).unwrap();
    /// assert_eq!(config.path, "app.db");
    /// assert_eq!(config.busy_timeout_ms, 5000);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Settings,
                message: format!("Invalid SQLite configuration: {e}"),
                source: Some(Box::new(e)),
            })
        })
    }
}

/// A connection to a SQLite database.
///
/// The handle is owned exclusively and closed on drop. It may move between
/// threads but is not shared; callers serialize access.
pub struct SqliteConnection {
    db: *mut ffi::sqlite3,
    path: String,
}

// SAFETY: the handle is only reachable through `&self`/`&mut self` of a
// value that is not `Sync`, so at most one thread uses it at a time.
unsafe impl Send for SqliteConnection {}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteConnection {
    /// Open a new SQLite connection with the given configuration.
    #[tracing::instrument(level = "debug", skip(config), fields(path = %config.path))]
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        let c_path = CString::new(config.path.as_str()).map_err(|_| {
            Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Settings,
                message: "Invalid path: contains null byte".to_string(),
                source: None,
            })
        })?;

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let flags = config.flags.to_sqlite_flags();

        // SAFETY: We pass valid pointers and check the return value
        let rc = unsafe { ffi::sqlite3_open_v2(c_path.as_ptr(), &mut db, flags, ptr::null()) };

        if rc != ffi::SQLITE_OK {
            let msg = if !db.is_null() {
                // SAFETY: db is a handle returned by open_v2, closed exactly once here
                unsafe {
                    let msg = ffi::last_error_message(db);
                    ffi::sqlite3_close_v2(db);
                    msg
                }
            } else {
                ffi::error_string(rc).to_string()
            };

            tracing::warn!(error = %msg, "Failed to open SQLite database");
            return Err(Error::Connection(ConnectionError {
                kind: ConnectionErrorKind::Connect,
                message: format!("Failed to open database: {}", msg),
                source: None,
            }));
        }

        if config.busy_timeout_ms > 0 {
            let ms = c_int::try_from(config.busy_timeout_ms).unwrap_or(c_int::MAX);
            // SAFETY: db is valid
            unsafe {
                ffi::sqlite3_busy_timeout(db, ms);
            }
        }

        tracing::debug!(flags, "Opened SQLite database");
        Ok(Self {
            db,
            path: config.path.clone(),
        })
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::open(&SqliteConfig::memory())
    }

    /// Open a file-based database.
    pub fn open_file(path: impl Into<String>) -> Result<Self> {
        Self::open(&SqliteConfig::file(path))
    }

    /// Get the database path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn handle(&self) -> *mut ffi::sqlite3 {
        self.db
    }

    /// Execute SQL directly without preparing (for DDL, etc.)
    ///
    /// Multiple `;`-separated statements are run in order.
    pub fn execute_raw(&self, sql: &str) -> Result<()> {
        let c_sql = CString::new(sql).map_err(|_| null_byte_error(sql))?;

        tracing::trace!(sql = %sql, "Executing raw SQL");

        let mut errmsg: *mut std::ffi::c_char = ptr::null_mut();

        // SAFETY: All pointers are valid
        let rc = unsafe {
            ffi::sqlite3_exec(self.db, c_sql.as_ptr(), None, ptr::null_mut(), &mut errmsg)
        };

        if rc != ffi::SQLITE_OK {
            let msg = if !errmsg.is_null() {
                // SAFETY: errmsg was allocated by sqlite3_exec and is freed once
                unsafe {
                    let msg = CStr::from_ptr(errmsg).to_string_lossy().into_owned();
                    ffi::sqlite3_free(errmsg.cast());
                    msg
                }
            } else {
                ffi::error_string(rc).to_string()
            };

            return Err(Error::Query(QueryError {
                kind: error_code_to_kind(rc),
                sql: Some(sql.to_string()),
                message: msg,
                source: None,
            }));
        }

        Ok(())
    }

    /// Prepare a statement bound to this connection.
    pub fn prepare_statement(&self, sql: &str) -> Result<SqliteStatement<'_>> {
        SqliteStatement::prepare(self, sql)
    }

    /// Get the last insert rowid.
    pub fn last_insert_rowid(&self) -> i64 {
        // SAFETY: db is valid
        unsafe { ffi::sqlite3_last_insert_rowid(self.db) }
    }

    /// Get the number of rows changed by the last statement.
    pub fn changes(&self) -> i32 {
        // SAFETY: db is valid
        unsafe { ffi::sqlite3_changes(self.db) }
    }
}

impl Engine for SqliteConnection {
    type Statement<'e> = SqliteStatement<'e>;

    fn execute(&self, sql: &str) -> Result<()> {
        self.execute_raw(sql)
    }

    fn prepare(&self, sql: &str) -> Result<SqliteStatement<'_>> {
        self.prepare_statement(sql)
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if !self.db.is_null() {
            // SAFETY: db is valid and every statement borrowing it is gone
            let rc = unsafe { ffi::sqlite3_close_v2(self.db) };
            if rc != ffi::SQLITE_OK {
                tracing::warn!(rc, path = %self.path, "Failed to close SQLite database");
            }
            self.db = ptr::null_mut();
        }
    }
}

// Helper functions

pub(crate) fn null_byte_error(sql: &str) -> Error {
    Error::Query(QueryError {
        kind: QueryErrorKind::Syntax,
        sql: Some(sql.to_string()),
        message: "SQL contains null byte".to_string(),
        source: None,
    })
}

pub(crate) fn prepare_error(db: *mut ffi::sqlite3, sql: &str) -> Error {
    // SAFETY: db is valid
    let (msg, code) = unsafe { (ffi::last_error_message(db), ffi::sqlite3_errcode(db)) };

    Error::Query(QueryError {
        kind: error_code_to_kind(code),
        sql: Some(sql.to_string()),
        message: msg,
        source: None,
    })
}

pub(crate) fn bind_error(db: *mut ffi::sqlite3, sql: &str, param_index: usize, rc: c_int) -> Error {
    // SAFETY: db is valid
    let msg = unsafe { ffi::last_error_message(db) };

    Error::Query(QueryError {
        kind: error_code_to_kind(rc),
        sql: Some(sql.to_string()),
        message: format!("Failed to bind parameter {}: {}", param_index, msg),
        source: None,
    })
}

pub(crate) fn step_error(db: *mut ffi::sqlite3, sql: &str) -> Error {
    // SAFETY: db is valid
    let (msg, code) = unsafe { (ffi::last_error_message(db), ffi::sqlite3_errcode(db)) };

    Error::Query(QueryError {
        kind: error_code_to_kind(code),
        sql: Some(sql.to_string()),
        message: msg,
        source: None,
    })
}

pub(crate) fn error_code_to_kind(code: c_int) -> QueryErrorKind {
    // Extended result codes keep the primary code in the low byte
    match code & 0xff {
        ffi::SQLITE_CONSTRAINT => QueryErrorKind::Constraint,
        ffi::SQLITE_BUSY | ffi::SQLITE_LOCKED => QueryErrorKind::Busy,
        ffi::SQLITE_PERM | ffi::SQLITE_AUTH | ffi::SQLITE_READONLY => QueryErrorKind::Permission,
        ffi::SQLITE_NOTFOUND => QueryErrorKind::NotFound,
        ffi::SQLITE_TOOBIG => QueryErrorKind::DataTruncation,
        ffi::SQLITE_INTERRUPT => QueryErrorKind::Cancelled,
        ffi::SQLITE_MISMATCH => QueryErrorKind::Mismatch,
        ffi::SQLITE_RANGE => QueryErrorKind::Range,
        _ => QueryErrorKind::Database,
    }
}

//! Value encoding and decoding between Rust scalars and SQLite.
//!
//! SQLite has a simple type system with 5 storage classes:
//! - INTEGER: Signed integer (1, 2, 3, 4, 6, or 8 bytes)
//! - REAL: 8-byte IEEE floating point
//! - TEXT: UTF-8 or UTF-16 string
//! - BLOB: Binary data
//! - NULL: The NULL value
//!
//! Integers and doubles go straight through the C API. Text and blobs are
//! bound with `SQLITE_TRANSIENT` so SQLite copies the bytes and the
//! statement never points into Rust-owned buffers.

use crate::ffi;
use std::ffi::{CStr, c_int};

/// Storage class of a value in the current result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Integer,
    Float,
    Text,
    Blob,
    Null,
}

/// Storage class of result column `index`.
///
/// # Safety
/// - `stmt` must be a valid prepared statement that has just returned SQLITE_ROW
/// - `index` must be a valid 0-based column index
pub unsafe fn column_type(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> StorageClass {
    // SAFETY: upheld by caller
    match unsafe { ffi::sqlite3_column_type(stmt, index) } {
        ffi::SQLITE_INTEGER => StorageClass::Integer,
        ffi::SQLITE_FLOAT => StorageClass::Float,
        ffi::SQLITE_TEXT => StorageClass::Text,
        ffi::SQLITE_BLOB => StorageClass::Blob,
        _ => StorageClass::Null,
    }
}

/// Bind UTF-8 text, copied by SQLite.
///
/// # Safety
/// - `stmt` must be a valid, non-null prepared statement handle
/// - `index` must be a valid 1-based parameter index
pub unsafe fn bind_text(stmt: *mut ffi::sqlite3_stmt, index: c_int, value: &str) -> c_int {
    let bytes = value.as_bytes();
    let Ok(len) = c_int::try_from(bytes.len()) else {
        return ffi::SQLITE_TOOBIG;
    };
    // SAFETY: the pointer/length pair describes `bytes`; SQLITE_TRANSIENT
    // makes SQLite copy them before returning
    unsafe { ffi::sqlite3_bind_text(stmt, index, bytes.as_ptr().cast(), len, ffi::transient()) }
}

/// Bind a byte slice, copied by SQLite.
///
/// # Safety
/// - `stmt` must be a valid, non-null prepared statement handle
/// - `index` must be a valid 1-based parameter index
pub unsafe fn bind_blob(stmt: *mut ffi::sqlite3_stmt, index: c_int, value: &[u8]) -> c_int {
    let Ok(len) = c_int::try_from(value.len()) else {
        return ffi::SQLITE_TOOBIG;
    };
    // SAFETY: as for bind_text
    unsafe { ffi::sqlite3_bind_blob(stmt, index, value.as_ptr().cast(), len, ffi::transient()) }
}

/// Read result column `index` as text; `None` for SQL NULL.
///
/// Non-text values are converted by SQLite (integers and reals render as
/// their decimal form). Invalid UTF-8 is replaced lossily.
///
/// # Safety
/// - `stmt` must be a valid prepared statement that has just returned SQLITE_ROW
/// - `index` must be a valid 0-based column index
pub unsafe fn read_text(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Option<String> {
    // SAFETY: upheld by caller
    unsafe {
        if column_type(stmt, index) == StorageClass::Null {
            return None;
        }
        let ptr = ffi::sqlite3_column_text(stmt, index);
        // Length must be read after the text conversion above
        let len = ffi::sqlite3_column_bytes(stmt, index);
        if ptr.is_null() {
            return None;
        }
        let slice = std::slice::from_raw_parts(ptr, usize::try_from(len).unwrap_or(0));
        Some(String::from_utf8_lossy(slice).into_owned())
    }
}

/// Read result column `index` as bytes; empty for SQL NULL.
///
/// # Safety
/// - `stmt` must be a valid prepared statement that has just returned SQLITE_ROW
/// - `index` must be a valid 0-based column index
pub unsafe fn read_blob(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Vec<u8> {
    // SAFETY: upheld by caller
    unsafe {
        let ptr = ffi::sqlite3_column_blob(stmt, index);
        let len = ffi::sqlite3_column_bytes(stmt, index);
        if ptr.is_null() || len <= 0 {
            Vec::new()
        } else {
            std::slice::from_raw_parts(ptr.cast::<u8>(), usize::try_from(len).unwrap_or(0))
                .to_vec()
        }
    }
}

/// Get the column name from a result.
///
/// # Safety
/// - `stmt` must be a valid prepared statement
/// - `index` must be a valid 0-based column index
pub unsafe fn column_name(stmt: *mut ffi::sqlite3_stmt, index: c_int) -> Option<String> {
    // SAFETY: upheld by caller
    unsafe {
        let ptr = ffi::sqlite3_column_name(stmt, index);
        if ptr.is_null() {
            None
        } else {
            Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
        }
    }
}

//! SQL type definitions and mapping.

use std::fmt;

/// Column storage types a model can declare.
///
/// The set mirrors the storage classes of row-oriented engines such as
/// SQLite. Anything that is not an integer, a float or text is stored as
/// an opaque BLOB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Integer,
    Real,
    Text,
    Blob,
}

impl SqlType {
    /// Get the SQL type name for this type.
    pub const fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_names() {
        assert_eq!(SqlType::Integer.sql_name(), "INTEGER");
        assert_eq!(SqlType::Real.sql_name(), "REAL");
        assert_eq!(SqlType::Text.sql_name(), "TEXT");
        assert_eq!(SqlType::Blob.sql_name(), "BLOB");
    }

    #[test]
    fn test_display_matches_sql_name() {
        for ty in [SqlType::Integer, SqlType::Real, SqlType::Text, SqlType::Blob] {
            assert_eq!(ty.to_string(), ty.sql_name());
        }
    }
}

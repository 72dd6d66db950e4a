//! Error types for minorm operations.

use std::fmt;

/// The primary error type for all minorm operations.
#[derive(Debug)]
pub enum Error {
    /// Opening or configuring an engine handle failed
    Connection(ConnectionError),
    /// Statement preparation, binding or execution failed
    Query(QueryError),
    /// A model's column layout cannot drive the requested operation
    Config(ConfigError),
    /// A stored value could not be converted into the column's Rust type
    Type(TypeError),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Failed to open the database
    Connect,
    /// Connection settings could not be parsed or applied
    Settings,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Syntax error in SQL or SQL that cannot be handed to the engine
    Syntax,
    /// Constraint violation (unique, not null, primary key)
    Constraint,
    /// Table or column not found
    NotFound,
    /// Permission denied
    Permission,
    /// Data too large for the engine
    DataTruncation,
    /// Database busy or locked
    Busy,
    /// Value type rejected by the engine
    Mismatch,
    /// Parameter index out of range
    Range,
    /// Statement interrupted
    Cancelled,
    /// Other database error
    Database,
}

/// The column layout of a model is unusable for the operation.
#[derive(Debug)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    /// Table the offending model maps to
    pub table: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// The model registered no columns
    NoColumns,
    /// Two columns share a name
    DuplicateColumn,
    /// `update` needs at least one non-key column
    NoUpdatableColumns,
    /// The key column cannot be bound as an integer
    KeyNotInteger,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

/// Result type alias for minorm operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a configuration error for the given table.
    pub fn config(
        kind: ConfigErrorKind,
        table: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Config(ConfigError {
            kind,
            table: table.into(),
            message: message.into(),
        })
    }

    /// Build a query error without an underlying source.
    pub fn query(kind: QueryErrorKind, sql: Option<&str>, message: impl Into<String>) -> Self {
        Error::Query(QueryError {
            kind,
            sql: sql.map(str::to_string),
            message: message.into(),
            source: None,
        })
    }

    /// Is this a rejected column layout rather than an engine failure?
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Get the configuration error kind, if this is one.
    pub fn config_kind(&self) -> Option<ConfigErrorKind> {
        match self {
            Error::Config(c) => Some(c.kind),
            _ => None,
        }
    }

    /// Get the query error kind, if this is one.
    pub fn query_kind(&self) -> Option<QueryErrorKind> {
        match self {
            Error::Query(q) => Some(q.kind),
            _ => None,
        }
    }

    /// Get the SQL that caused this error, if available
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sql.as_deref(),
            _ => None,
        }
    }
}

impl QueryError {
    /// Is this a constraint violation (duplicate key, NOT NULL)?
    pub fn is_constraint_violation(&self) -> bool {
        self.kind == QueryErrorKind::Constraint
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e.message),
            Error::Query(e) => write!(f, "Query error: {}", e.message),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Type(e) => {
                if let Some(col) = &e.column {
                    write!(
                        f,
                        "Type error in column '{}': expected {}, found {}",
                        col, e.expected, e.actual
                    )
                } else {
                    write!(f, "Type error: expected {}, found {}", e.expected, e.actual)
                }
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Query(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table '{}': {}", self.table, self.message)
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

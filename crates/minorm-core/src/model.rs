//! The `Model` trait and ordered column registration.
//!
//! A model is one table row held in memory. Its columns are plain struct
//! fields; the model lists them, in declaration order, into a [`ColumnSet`]
//! (for reading) or a [`ColumnSetMut`] (for loading rows). The first
//! registered column is the primary key: find, update and remove use its
//! name and value as the row predicate.
//!
//! # Example
//!
//! ```
//! use minorm_core::{Column, Model, model};
//!
//! struct User {
//!     id: Column<i64>,
//!     name: Column<String>,
//!     age: Column<i32>,
//! }
//!
//! model!(User {
//!     table: "users",
//!     columns: [id, name, age],
//! });
//!
//! let user = User {
//!     id: Column::new("id").with_constraints("PRIMARY KEY"),
//!     name: Column::new("name").with_constraints("NOT NULL"),
//!     age: Column::new("age"),
//! };
//! assert_eq!(user.table_name(), "users");
//! assert_eq!(user.columns().names(), vec!["id", "name", "age"]);
//! ```

use crate::column::ColumnOps;
use crate::engine::Engine;
use crate::error::{ConfigErrorKind, Error};
use crate::ops;
use crate::types::SqlType;
use crate::Result;
use std::collections::HashSet;

/// Table name used by models that do not name their table.
pub const DEFAULT_TABLE_NAME: &str = "DefaultTable";

/// Ordered, read-only view of a model's columns.
#[derive(Default)]
pub struct ColumnSet<'m> {
    columns: Vec<&'m dyn ColumnOps>,
}

impl<'m> ColumnSet<'m> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append a column (builder style).
    pub fn column(mut self, column: &'m dyn ColumnOps) -> Self {
        self.register_column(column);
        self
    }

    /// Append a column. Registration order is statement order.
    pub fn register_column(&mut self, column: &'m dyn ColumnOps) {
        self.columns.push(column);
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'m dyn ColumnOps> {
        self.columns.get(index).copied()
    }

    /// The key column (index 0).
    pub fn primary_key(&self) -> Option<&'m dyn ColumnOps> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'m dyn ColumnOps> + '_ {
        self.columns.iter().copied()
    }

    pub fn names(&self) -> Vec<&'m str> {
        self.iter().map(|c| c.name()).collect()
    }

    /// Reject column layouts no statement can be generated for: no
    /// columns at all, or two columns sharing a name. Returns the key column.
    pub fn validate(&self, table: &str) -> Result<&'m dyn ColumnOps> {
        let Some(key) = self.primary_key() else {
            return Err(Error::config(
                ConfigErrorKind::NoColumns,
                table,
                "model has no registered columns",
            ));
        };

        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.name()) {
                return Err(Error::config(
                    ConfigErrorKind::DuplicateColumn,
                    table,
                    format!("column '{}' is registered more than once", column.name()),
                ));
            }
        }
        Ok(key)
    }

    /// Validate, then require an INTEGER key column.
    pub fn validate_integer_key(&self, table: &str) -> Result<&'m dyn ColumnOps> {
        let key = self.validate(table)?;
        if key.sql_type() != SqlType::Integer {
            return Err(Error::config(
                ConfigErrorKind::KeyNotInteger,
                table,
                format!(
                    "key column '{}' is {}, lookups by key require INTEGER",
                    key.name(),
                    key.sql_type()
                ),
            ));
        }
        Ok(key)
    }
}

/// Ordered, mutable view of a model's columns, used to load result rows.
#[derive(Default)]
pub struct ColumnSetMut<'m> {
    columns: Vec<&'m mut dyn ColumnOps>,
}

impl<'m> ColumnSetMut<'m> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append a column (builder style).
    pub fn column(mut self, column: &'m mut dyn ColumnOps) -> Self {
        self.register_column(column);
        self
    }

    pub fn register_column(&mut self, column: &'m mut dyn ColumnOps) {
        self.columns.push(column);
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn ColumnOps + 'm)> + '_ {
        self.columns.iter_mut().map(|c| &mut **c)
    }

    /// Read-only view over the same columns.
    pub fn as_set(&self) -> ColumnSet<'_> {
        ColumnSet {
            columns: self.columns.iter().map(|c| &**c as &dyn ColumnOps).collect(),
        }
    }
}

/// An entity mapped to one table row.
///
/// Implementors list their columns; the CRUD operations are provided. Use
/// the [`model!`](crate::model!) macro to generate both listings from one
/// ordered field list.
pub trait Model {
    /// Table name, interpolated verbatim into every statement.
    fn table_name(&self) -> &str {
        DEFAULT_TABLE_NAME
    }

    /// Columns in declaration order; index 0 is the primary key.
    fn columns(&self) -> ColumnSet<'_>;

    /// Same columns, same order, mutably.
    fn columns_mut(&mut self) -> ColumnSetMut<'_>;

    /// `CREATE TABLE IF NOT EXISTS` for this model's columns.
    fn create_table<E: Engine>(&self, engine: &E) -> Result<()> {
        ops::create_table(self, engine)
    }

    /// Insert the current values as a new row.
    fn save<E: Engine>(&self, engine: &E) -> Result<()> {
        ops::save(self, engine)
    }

    /// Load the row whose key equals `key`. Returns `false` when no row
    /// matches, leaving every column untouched.
    fn find<E: Engine>(&mut self, engine: &E, key: i64) -> Result<bool> {
        ops::find(self, engine, key)
    }

    /// Write every non-key column to the row matching the key column.
    ///
    /// Matching zero rows is not an error.
    fn update<E: Engine>(&self, engine: &E) -> Result<()> {
        ops::update(self, engine)
    }

    /// Delete the row matching the key column. Matching zero rows is not
    /// an error.
    fn remove<E: Engine>(&self, engine: &E) -> Result<()> {
        ops::remove(self, engine)
    }

    /// Load every row of the table, one fresh instance per row.
    fn all<E: Engine>(engine: &E) -> Result<Vec<Self>>
    where
        Self: Default + Sized,
    {
        ops::all(engine)
    }
}

/// Implement [`Model`] from one ordered list of column fields.
///
/// ```
/// use minorm_core::{Column, Model, model};
///
/// struct Tag {
///     id: Column<i64>,
///     label: Column<String>,
/// }
///
/// // No table given: the default table name is used.
/// model!(Tag { columns: [id, label] });
///
/// let tag = Tag {
///     id: Column::new("id"),
///     label: Column::new("label"),
/// };
/// assert_eq!(tag.table_name(), minorm_core::DEFAULT_TABLE_NAME);
/// ```
#[macro_export]
macro_rules! model {
    ($entity:ty { table: $table:expr, columns: [$($field:ident),+ $(,)?] $(,)? }) => {
        impl $crate::Model for $entity {
            fn table_name(&self) -> &str {
                $table
            }

            fn columns(&self) -> $crate::ColumnSet<'_> {
                $crate::ColumnSet::new()$(.column(&self.$field))+
            }

            fn columns_mut(&mut self) -> $crate::ColumnSetMut<'_> {
                $crate::ColumnSetMut::new()$(.column(&mut self.$field))+
            }
        }
    };
    ($entity:ty { columns: [$($field:ident),+ $(,)?] $(,)? }) => {
        impl $crate::Model for $entity {
            fn columns(&self) -> $crate::ColumnSet<'_> {
                $crate::ColumnSet::new()$(.column(&self.$field))+
            }

            fn columns_mut(&mut self) -> $crate::ColumnSetMut<'_> {
                $crate::ColumnSetMut::new()$(.column(&mut self.$field))+
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    struct Pair {
        id: Column<i64>,
        label: Column<String>,
    }

    model!(Pair {
        table: "pairs",
        columns: [id, label],
    });

    #[test]
    fn test_registration_order() {
        let pair = Pair {
            id: Column::new("id"),
            label: Column::new("label"),
        };
        let columns = pair.columns();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.names(), vec!["id", "label"]);
        assert_eq!(columns.primary_key().map(|c| c.name()), Some("id"));
    }

    #[test]
    fn test_register_column_appends() {
        let a = Column::<i64>::new("a");
        let b = Column::<String>::new("b");
        let mut set = ColumnSet::new();
        assert!(set.is_empty());
        set.register_column(&a);
        set.register_column(&b);
        assert_eq!(set.names(), vec!["a", "b"]);
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_validate_rejects_empty() {
        let set = ColumnSet::new();
        let Err(err) = set.validate("t") else {
            panic!("empty column set must be rejected");
        };
        assert_eq!(err.config_kind(), Some(ConfigErrorKind::NoColumns));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let a = Column::<i64>::new("id");
        let b = Column::<String>::new("id");
        let set = ColumnSet::new().column(&a).column(&b);
        let Err(err) = set.validate("t") else {
            panic!("duplicate names must be rejected");
        };
        assert_eq!(err.config_kind(), Some(ConfigErrorKind::DuplicateColumn));
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn test_validate_integer_key() {
        let code = Column::<String>::new("code");
        let set = ColumnSet::new().column(&code);
        let Err(err) = set.validate_integer_key("t") else {
            panic!("text key must be rejected");
        };
        assert_eq!(err.config_kind(), Some(ConfigErrorKind::KeyNotInteger));

        let id = Column::<i32>::new("id");
        let set = ColumnSet::new().column(&id);
        assert_eq!(set.validate_integer_key("t").unwrap().name(), "id");
    }

    #[test]
    fn test_validate_returns_key() {
        let id = Column::<i64>::new("id");
        let label = Column::<String>::new("label");
        let set = ColumnSet::new().column(&id).column(&label);
        assert_eq!(set.validate("t").unwrap().name(), "id");
    }

    #[test]
    fn test_columns_mut_matches_columns() {
        let mut pair = Pair {
            id: Column::new("id"),
            label: Column::new("label"),
        };
        let expected: Vec<String> = pair.columns().names().iter().map(|n| n.to_string()).collect();

        let mut columns = pair.columns_mut();
        assert_eq!(columns.len(), 2);
        assert!(!columns.is_empty());
        assert_eq!(columns.as_set().names(), expected);
        let names: Vec<String> = columns.iter_mut().map(|c| c.name().to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_default_table_name() {
        struct Bare {
            id: Column<i64>,
        }
        model!(Bare { columns: [id] });

        let bare = Bare {
            id: Column::new("id"),
        };
        assert_eq!(bare.table_name(), DEFAULT_TABLE_NAME);
        assert_eq!(DEFAULT_TABLE_NAME, "DefaultTable");
    }
}

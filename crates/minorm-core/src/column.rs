//! Typed columns and their type-erased interface.
//!
//! A [`Column<T>`] is a named cell holding one scalar of type `T`. The model
//! layer never sees `T`: it talks to columns through [`ColumnOps`], which
//! covers naming, DDL, parameter binding and row loading.

use crate::engine::Statement;
use crate::error::{Error, TypeError};
use crate::types::SqlType;
use crate::Result;

/// Rust types that can be stored in a [`Column`].
///
/// The SQL type is an associated constant, so it is a pure function of the
/// Rust type. Types that do not override it are stored as BLOB.
pub trait ColumnValue: Sized {
    /// The SQL type for this Rust type.
    const SQL_TYPE: SqlType = SqlType::Blob;

    /// Rust type name used in type errors.
    const RUST_TYPE: &'static str;

    /// Bind this value at the 1-based parameter `index`.
    fn bind(&self, stmt: &mut dyn Statement, index: usize) -> Result<()>;

    /// Read a value from the 0-based result column `index`.
    fn load(stmt: &dyn Statement, index: usize) -> Result<Self>;
}

/// SQL type of a Rust column type.
pub const fn sql_type_of<T: ColumnValue>() -> SqlType {
    T::SQL_TYPE
}

impl ColumnValue for i64 {
    const SQL_TYPE: SqlType = SqlType::Integer;
    const RUST_TYPE: &'static str = "i64";

    fn bind(&self, stmt: &mut dyn Statement, index: usize) -> Result<()> {
        stmt.bind_int(index, *self)
    }

    fn load(stmt: &dyn Statement, index: usize) -> Result<Self> {
        Ok(stmt.column_int(index))
    }
}

impl ColumnValue for i32 {
    const SQL_TYPE: SqlType = SqlType::Integer;
    const RUST_TYPE: &'static str = "i32";

    fn bind(&self, stmt: &mut dyn Statement, index: usize) -> Result<()> {
        stmt.bind_int(index, i64::from(*self))
    }

    fn load(stmt: &dyn Statement, index: usize) -> Result<Self> {
        let v = stmt.column_int(index);
        i32::try_from(v).map_err(|_| {
            Error::Type(TypeError {
                expected: Self::RUST_TYPE,
                actual: format!("integer {v}"),
                column: None,
            })
        })
    }
}

impl ColumnValue for f64 {
    const SQL_TYPE: SqlType = SqlType::Real;
    const RUST_TYPE: &'static str = "f64";

    fn bind(&self, stmt: &mut dyn Statement, index: usize) -> Result<()> {
        stmt.bind_double(index, *self)
    }

    fn load(stmt: &dyn Statement, index: usize) -> Result<Self> {
        Ok(stmt.column_double(index))
    }
}

impl ColumnValue for String {
    const SQL_TYPE: SqlType = SqlType::Text;
    const RUST_TYPE: &'static str = "String";

    fn bind(&self, stmt: &mut dyn Statement, index: usize) -> Result<()> {
        stmt.bind_text(index, self)
    }

    // NULL is not modelled: it loads as the empty string.
    fn load(stmt: &dyn Statement, index: usize) -> Result<Self> {
        Ok(stmt.column_text(index).unwrap_or_default())
    }
}

impl ColumnValue for Vec<u8> {
    const RUST_TYPE: &'static str = "Vec<u8>";

    fn bind(&self, stmt: &mut dyn Statement, index: usize) -> Result<()> {
        stmt.bind_blob(index, self)
    }

    fn load(stmt: &dyn Statement, index: usize) -> Result<Self> {
        Ok(stmt.column_blob(index))
    }
}

/// Type-erased view of a column, as used by the model layer.
pub trait ColumnOps {
    /// The column name.
    fn name(&self) -> &str;

    /// The column's SQL type.
    fn sql_type(&self) -> SqlType;

    /// Constraint clause appended to the definition, possibly empty.
    fn constraints(&self) -> &str;

    /// Full column definition for `CREATE TABLE`, e.g. `age INTEGER NOT NULL`.
    fn definition(&self) -> String {
        let constraints = self.constraints();
        if constraints.is_empty() {
            format!("{} {}", self.name(), self.sql_type())
        } else {
            format!("{} {} {}", self.name(), self.sql_type(), constraints)
        }
    }

    /// Bind the current value at the 1-based parameter `index`.
    fn bind_value(&self, stmt: &mut dyn Statement, index: usize) -> Result<()>;

    /// Check that result column `index` converts to this column's type,
    /// without touching the current value.
    fn check_value(&self, stmt: &dyn Statement, index: usize) -> Result<()>;

    /// Overwrite the current value from the 0-based result column `index`.
    fn load_value(&mut self, stmt: &dyn Statement, index: usize) -> Result<()>;
}

/// A named, typed column holding one value.
///
/// ```
/// use minorm_core::{Column, ColumnOps};
///
/// let mut age = Column::<i32>::new("age").with_constraints("NOT NULL");
/// age.set(30);
/// assert_eq!(*age.get(), 30);
/// assert_eq!(age.definition(), "age INTEGER NOT NULL");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    name: String,
    constraints: String,
    value: T,
}

impl<T: ColumnValue + Default> Column<T> {
    /// Create a column holding `T::default()`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, T::default())
    }
}

impl<T: ColumnValue> Column<T> {
    /// Create a column holding `value`.
    pub fn with_value(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            constraints: String::new(),
            value,
        }
    }

    /// Set the constraint clause (`PRIMARY KEY`, `NOT NULL`, ...).
    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = constraints.into();
        self
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the current value.
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Mutable access to the current value.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Consume the column, returning its value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: ColumnValue> ColumnOps for Column<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn sql_type(&self) -> SqlType {
        T::SQL_TYPE
    }

    fn constraints(&self) -> &str {
        &self.constraints
    }

    fn bind_value(&self, stmt: &mut dyn Statement, index: usize) -> Result<()> {
        self.value.bind(stmt, index)
    }

    fn check_value(&self, stmt: &dyn Statement, index: usize) -> Result<()> {
        self.read(stmt, index).map(|_| ())
    }

    fn load_value(&mut self, stmt: &dyn Statement, index: usize) -> Result<()> {
        self.value = self.read(stmt, index)?;
        Ok(())
    }
}

impl<T: ColumnValue> Column<T> {
    /// Decode result column `index`, naming this column in type errors.
    fn read(&self, stmt: &dyn Statement, index: usize) -> Result<T> {
        T::load(stmt, index).map_err(|err| match err {
            Error::Type(mut e) => {
                e.column = Some(self.name.clone());
                Error::Type(e)
            }
            other => other,
        })
    }
}

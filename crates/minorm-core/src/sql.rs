//! SQL text generation for the single-table operations.
//!
//! Table and column names are developer-supplied identifiers and are
//! interpolated verbatim. Only values travel as `?` parameters.

use crate::model::ColumnSet;

/// `CREATE TABLE IF NOT EXISTS <table> (<def0>, <def1>, ...);`
pub fn create_table(table: &str, columns: &ColumnSet<'_>) -> String {
    let defs: Vec<String> = columns.iter().map(|c| c.definition()).collect();
    format!("CREATE TABLE IF NOT EXISTS {} ({});", table, defs.join(", "))
}

/// `INSERT INTO <table> (<name0>, ...) VALUES (?, ...);`
pub fn insert(table: &str, columns: &ColumnSet<'_>) -> String {
    let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
    let placeholders = vec!["?"; names.len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table,
        names.join(", "),
        placeholders.join(", ")
    )
}

/// `SELECT * FROM <table> WHERE <key> = ?;`
pub fn select_by_key(table: &str, key: &str) -> String {
    format!("SELECT * FROM {} WHERE {} = ?;", table, key)
}

/// `SELECT * FROM <table>;`
pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {};", table)
}

/// `UPDATE <table> SET <name1> = ?, ... WHERE <name0> = ?;`
///
/// Every column after the first goes into the SET clause in registration
/// order; the first column is the key predicate.
pub fn update(table: &str, columns: &ColumnSet<'_>) -> String {
    let mut iter = columns.iter();
    let key = iter.next().map_or("", |c| c.name());
    let assignments: Vec<String> = iter.map(|c| format!("{} = ?", c.name())).collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ?;",
        table,
        assignments.join(", "),
        key
    )
}

/// `DELETE FROM <table> WHERE <key> = ?;`
pub fn delete(table: &str, key: &str) -> String {
    format!("DELETE FROM {} WHERE {} = ?;", table, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    struct Users {
        id: Column<i64>,
        name: Column<String>,
        age: Column<i32>,
    }

    impl Users {
        fn new() -> Self {
            Self {
                id: Column::new("id").with_constraints("PRIMARY KEY"),
                name: Column::new("name").with_constraints("NOT NULL"),
                age: Column::new("age"),
            }
        }

        fn columns(&self) -> ColumnSet<'_> {
            ColumnSet::new()
                .column(&self.id)
                .column(&self.name)
                .column(&self.age)
        }
    }

    #[test]
    fn test_create_table_sql() {
        let users = Users::new();
        assert_eq!(
            create_table("users", &users.columns()),
            "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER);"
        );
    }

    #[test]
    fn test_insert_sql() {
        let users = Users::new();
        assert_eq!(
            insert("users", &users.columns()),
            "INSERT INTO users (id, name, age) VALUES (?, ?, ?);"
        );
    }

    #[test]
    fn test_insert_single_column() {
        let id = Column::<i64>::new("id");
        let columns = ColumnSet::new().column(&id);
        assert_eq!(insert("t", &columns), "INSERT INTO t (id) VALUES (?);");
    }

    #[test]
    fn test_select_sql() {
        assert_eq!(
            select_by_key("users", "id"),
            "SELECT * FROM users WHERE id = ?;"
        );
        assert_eq!(select_all("users"), "SELECT * FROM users;");
    }

    #[test]
    fn test_update_sql_skips_key_in_set_clause() {
        let users = Users::new();
        assert_eq!(
            update("users", &users.columns()),
            "UPDATE users SET name = ?, age = ? WHERE id = ?;"
        );
    }

    #[test]
    fn test_delete_sql() {
        assert_eq!(delete("users", "id"), "DELETE FROM users WHERE id = ?;");
    }

    #[test]
    fn test_table_name_is_verbatim() {
        assert_eq!(
            select_all("main.\"Users Table\""),
            "SELECT * FROM main.\"Users Table\";"
        );
    }
}

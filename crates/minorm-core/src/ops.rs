//! Statement lifecycle for the model operations.
//!
//! Each operation validates the column layout, builds its SQL, and runs one
//! prepare -> bind -> step cycle. The prepared statement is owned by the
//! operation's stack frame, so it is finalized on every return path.

use crate::engine::{Engine, Statement, Step};
use crate::error::{ConfigErrorKind, Error, QueryErrorKind};
use crate::model::{ColumnSetMut, Model};
use crate::sql;
use crate::Result;

#[tracing::instrument(level = "debug", skip(model, engine), fields(table = %model.table_name()))]
pub fn create_table<M: Model + ?Sized, E: Engine>(model: &M, engine: &E) -> Result<()> {
    let table = model.table_name();
    let columns = model.columns();
    columns.validate(table)?;

    let sql = sql::create_table(table, &columns);
    tracing::trace!(sql = %sql, "Executing CREATE TABLE");

    engine.execute(&sql).inspect_err(|e| {
        tracing::warn!(error = %e, "Create table failed");
    })
}

#[tracing::instrument(level = "debug", skip(model, engine), fields(table = %model.table_name()))]
pub fn save<M: Model + ?Sized, E: Engine>(model: &M, engine: &E) -> Result<()> {
    let table = model.table_name();
    let columns = model.columns();
    columns.validate(table)?;

    let sql = sql::insert(table, &columns);
    tracing::trace!(sql = %sql, "Executing INSERT");

    let mut stmt = engine.prepare(&sql)?;
    // Parameters are 1-based, in registration order.
    for (i, column) in columns.iter().enumerate() {
        column.bind_value(&mut stmt, i + 1)?;
    }

    run_to_completion(&mut stmt).inspect_err(|e| {
        tracing::warn!(error = %e, "Save failed");
    })
}

#[tracing::instrument(level = "debug", skip(model, engine), fields(table = %model.table_name()))]
pub fn find<M: Model + ?Sized, E: Engine>(model: &mut M, engine: &E, key: i64) -> Result<bool> {
    let table = model.table_name().to_string();
    let mut columns = model.columns_mut();

    let sql = {
        let view = columns.as_set();
        let key_column = view.validate_integer_key(&table)?;
        sql::select_by_key(&table, key_column.name())
    };
    tracing::trace!(sql = %sql, key, "Executing SELECT by key");

    let mut stmt = engine.prepare(&sql)?;
    stmt.bind_int(1, key)?;

    match stmt.step()? {
        Step::Row => {
            if stmt.column_count() < columns.len() {
                tracing::warn!(
                    result_columns = stmt.column_count(),
                    model_columns = columns.len(),
                    "Result row is narrower than the model"
                );
            }
            load_row(&mut columns, &stmt)?;
            tracing::debug!("Row found");
            Ok(true)
        }
        Step::Done => {
            tracing::debug!("No row matches key");
            Ok(false)
        }
    }
}

#[tracing::instrument(level = "debug", skip(model, engine), fields(table = %model.table_name()))]
pub fn update<M: Model + ?Sized, E: Engine>(model: &M, engine: &E) -> Result<()> {
    let table = model.table_name();
    let columns = model.columns();
    let key = columns.validate(table)?;
    if columns.len() < 2 {
        return Err(Error::config(
            ConfigErrorKind::NoUpdatableColumns,
            table,
            "update needs at least one column besides the key",
        ));
    }

    let sql = sql::update(table, &columns);
    tracing::trace!(sql = %sql, "Executing UPDATE");

    let mut stmt = engine.prepare(&sql)?;
    // Non-key columns fill 1..n-1, the key binds last at n.
    let mut index = 1;
    for column in columns.iter().skip(1) {
        column.bind_value(&mut stmt, index)?;
        index += 1;
    }
    key.bind_value(&mut stmt, index)?;

    run_to_completion(&mut stmt).inspect_err(|e| {
        tracing::warn!(error = %e, "Update failed");
    })
}

#[tracing::instrument(level = "debug", skip(model, engine), fields(table = %model.table_name()))]
pub fn remove<M: Model + ?Sized, E: Engine>(model: &M, engine: &E) -> Result<()> {
    let table = model.table_name();
    let columns = model.columns();
    let key = columns.validate(table)?;

    let sql = sql::delete(table, key.name());
    tracing::trace!(sql = %sql, "Executing DELETE");

    let mut stmt = engine.prepare(&sql)?;
    key.bind_value(&mut stmt, 1)?;

    run_to_completion(&mut stmt).inspect_err(|e| {
        tracing::warn!(error = %e, "Remove failed");
    })
}

#[tracing::instrument(level = "debug", skip(engine))]
pub fn all<M: Model + Default, E: Engine>(engine: &E) -> Result<Vec<M>> {
    let template = M::default();
    let table = template.table_name().to_string();
    template.columns().validate(&table)?;

    let sql = sql::select_all(&table);
    tracing::trace!(sql = %sql, "Executing SELECT all");

    let mut stmt = engine.prepare(&sql)?;
    let mut rows = Vec::new();
    while stmt.step()? == Step::Row {
        let mut row = M::default();
        load_row(&mut row.columns_mut(), &stmt)?;
        rows.push(row);
    }

    tracing::debug!(row_count = rows.len(), "Loaded table");
    Ok(rows)
}

/// Load the current result row into `columns`, all or nothing.
///
/// Every column is decoded once up front so a conversion failure leaves
/// the model untouched. Result columns are 0-based, in registration order.
fn load_row(columns: &mut ColumnSetMut<'_>, stmt: &dyn Statement) -> Result<()> {
    for (i, column) in columns.as_set().iter().enumerate() {
        column.check_value(stmt, i)?;
    }
    for (i, column) in columns.iter_mut().enumerate() {
        column.load_value(stmt, i)?;
    }
    Ok(())
}

/// Step a write statement once and require completion.
fn run_to_completion<S: Statement>(stmt: &mut S) -> Result<()> {
    match stmt.step()? {
        Step::Done => Ok(()),
        Step::Row => Err(Error::query(
            QueryErrorKind::Database,
            Some(stmt.sql()),
            "statement returned a row where completion was expected",
        )),
    }
}

//! Scripted in-memory engine for unit tests.
//!
//! Records every executed and prepared SQL string, every bound parameter
//! and every finalized statement. `SELECT` statements replay rows queued
//! with [`RecordingEngine::push_row`].

use crate::engine::{Engine, Statement, Step};
use crate::error::{Error, QueryErrorKind};
use crate::Result;
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Double(f64),
    Text(String),
    Blob(Vec<u8>),
}

#[derive(Default)]
struct State {
    executed: Vec<String>,
    prepared: Vec<String>,
    binds: Vec<(usize, Cell)>,
    rows: VecDeque<Vec<Cell>>,
    finalized: usize,
    fail_execute: Option<String>,
    fail_prepare: Option<String>,
    fail_step: Option<String>,
    step_row_for_writes: bool,
}

#[derive(Default)]
pub struct RecordingEngine {
    state: RefCell<State>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&self, row: Vec<Cell>) {
        self.state.borrow_mut().rows.push_back(row);
    }

    pub fn fail_execute(&self, message: &str) {
        self.state.borrow_mut().fail_execute = Some(message.to_string());
    }

    pub fn fail_prepare(&self, message: &str) {
        self.state.borrow_mut().fail_prepare = Some(message.to_string());
    }

    pub fn fail_step(&self, message: &str) {
        self.state.borrow_mut().fail_step = Some(message.to_string());
    }

    /// Make non-SELECT statements report a row instead of completion.
    pub fn step_row_for_writes(&self) {
        self.state.borrow_mut().step_row_for_writes = true;
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.borrow().executed.clone()
    }

    pub fn prepared(&self) -> Vec<String> {
        self.state.borrow().prepared.clone()
    }

    pub fn binds(&self) -> Vec<(usize, Cell)> {
        self.state.borrow().binds.clone()
    }

    pub fn finalized(&self) -> usize {
        self.state.borrow().finalized
    }
}

impl Engine for RecordingEngine {
    type Statement<'e> = RecordingStatement<'e>;

    fn execute(&self, sql: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.executed.push(sql.to_string());
        match state.fail_execute.take() {
            Some(message) => Err(Error::query(QueryErrorKind::Database, Some(sql), message)),
            None => Ok(()),
        }
    }

    fn prepare(&self, sql: &str) -> Result<RecordingStatement<'_>> {
        let mut state = self.state.borrow_mut();
        state.prepared.push(sql.to_string());
        if let Some(message) = state.fail_prepare.take() {
            return Err(Error::query(QueryErrorKind::Syntax, Some(sql), message));
        }
        Ok(RecordingStatement {
            engine: self,
            sql: sql.to_string(),
            current: None,
        })
    }
}

pub struct RecordingStatement<'e> {
    engine: &'e RecordingEngine,
    sql: String,
    current: Option<Vec<Cell>>,
}

impl RecordingStatement<'_> {
    fn record(&mut self, index: usize, cell: Cell) -> Result<()> {
        self.engine.state.borrow_mut().binds.push((index, cell));
        Ok(())
    }

    fn cell(&self, index: usize) -> Cell {
        self.current
            .as_ref()
            .and_then(|row| row.get(index).cloned())
            .unwrap_or(Cell::Null)
    }
}

impl Statement for RecordingStatement<'_> {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bind_int(&mut self, index: usize, value: i64) -> Result<()> {
        self.record(index, Cell::Int(value))
    }

    fn bind_double(&mut self, index: usize, value: f64) -> Result<()> {
        self.record(index, Cell::Double(value))
    }

    fn bind_text(&mut self, index: usize, value: &str) -> Result<()> {
        self.record(index, Cell::Text(value.to_string()))
    }

    fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.record(index, Cell::Blob(value.to_vec()))
    }

    fn bind_null(&mut self, index: usize) -> Result<()> {
        self.record(index, Cell::Null)
    }

    fn step(&mut self) -> Result<Step> {
        let mut state = self.engine.state.borrow_mut();
        if let Some(message) = state.fail_step.take() {
            return Err(Error::query(
                QueryErrorKind::Constraint,
                Some(self.sql.as_str()),
                message,
            ));
        }
        if !self.sql.starts_with("SELECT") {
            return Ok(if state.step_row_for_writes {
                Step::Row
            } else {
                Step::Done
            });
        }
        self.current = state.rows.pop_front();
        Ok(if self.current.is_some() {
            Step::Row
        } else {
            Step::Done
        })
    }

    fn column_count(&self) -> usize {
        self.current.as_ref().map_or(0, Vec::len)
    }

    fn column_int(&self, index: usize) -> i64 {
        match self.cell(index) {
            Cell::Int(v) => v,
            _ => 0,
        }
    }

    fn column_double(&self, index: usize) -> f64 {
        match self.cell(index) {
            Cell::Double(v) => v,
            #[allow(clippy::cast_precision_loss)]
            Cell::Int(v) => v as f64,
            _ => 0.0,
        }
    }

    fn column_text(&self, index: usize) -> Option<String> {
        match self.cell(index) {
            Cell::Text(v) => Some(v),
            Cell::Int(v) => Some(v.to_string()),
            _ => None,
        }
    }

    fn column_blob(&self, index: usize) -> Vec<u8> {
        match self.cell(index) {
            Cell::Blob(v) => v,
            Cell::Text(v) => v.into_bytes(),
            _ => Vec::new(),
        }
    }
}

impl Drop for RecordingStatement<'_> {
    fn drop(&mut self) {
        self.engine.state.borrow_mut().finalized += 1;
    }
}

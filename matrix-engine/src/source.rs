//! FILENAME: matrix-engine/src/source.rs
//! In-memory data source and column evaluator.
//!
//! Hosts without a report-wide expression language can feed a matrix from a
//! `Table`: `TableSource` walks its rows, `TableEvaluator` resolves header
//! and cell expressions of the form `[Column]` (or a bare column name) and
//! dispatches Custom expressions to registered closures.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use engine::CellValue;

use crate::collab::{CustomContext, DataSource, ExpressionEvaluator};
use crate::error::EvalError;

/// Named columns with rows of optional values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; missing trailing values read as absent.
    pub fn push_row(&mut self, row: Vec<Option<CellValue>>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(column)?.as_ref()
    }
}

/// Forward cursor over a table's rows.
#[derive(Debug, Clone)]
pub struct TableSource<'a> {
    table: &'a Table,
    position: usize,
}

impl<'a> TableSource<'a> {
    pub fn new(table: &'a Table) -> Self {
        TableSource { table, position: 0 }
    }
}

impl DataSource for TableSource<'_> {
    fn init(&mut self) {
        self.position = 0;
    }

    fn has_more_rows(&self) -> bool {
        self.position < self.table.row_count()
    }

    fn next(&mut self) {
        self.position += 1;
    }

    fn current_row_no(&self) -> usize {
        self.position
    }
}

/// Closure computing a Custom cell from the reduced values at its position.
pub type CustomFunction = Box<dyn Fn(&CustomContext<'_>) -> Option<CellValue>>;

/// Resolves `[Column]` expressions against a table.
pub struct TableEvaluator<'a> {
    table: &'a Table,
    custom: FxHashMap<String, CustomFunction>,
}

impl<'a> TableEvaluator<'a> {
    pub fn new(table: &'a Table) -> Self {
        TableEvaluator {
            table,
            custom: FxHashMap::default(),
        }
    }

    /// Registers the closure evaluated for Custom descriptors whose
    /// expression is `name`.
    pub fn register_custom(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(&CustomContext<'_>) -> Option<CellValue> + 'static,
    ) {
        self.custom.insert(name.into(), Box::new(function));
    }
}

fn column_name(expression: &str) -> &str {
    let trimmed = expression.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed)
}

impl ExpressionEvaluator for TableEvaluator<'_> {
    fn evaluate(
        &mut self,
        expression: &str,
        row_no: usize,
    ) -> Result<Option<CellValue>, EvalError> {
        let name = column_name(expression);
        let column = self
            .table
            .column_index(name)
            .ok_or_else(|| EvalError::UnknownColumn(name.to_string()))?;
        if row_no >= self.table.row_count() {
            return Err(EvalError::RowOutOfRange(row_no));
        }
        Ok(self.table.value(row_no, column).cloned())
    }

    fn evaluate_custom(
        &mut self,
        expression: &str,
        context: &CustomContext<'_>,
    ) -> Result<Option<CellValue>, EvalError> {
        match self.custom.get(expression) {
            Some(function) => Ok(function(context)),
            None => Err(EvalError::Unsupported(expression.to_string())),
        }
    }
}

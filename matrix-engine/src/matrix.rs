//! FILENAME: matrix-engine/src/matrix.rs
//! Matrix - Owns both header trees, the cell store and the print cycle.
//!
//! A run-time cycle:
//! 1. `start_print` validates the definition and resets every structure.
//! 2. `add_data_row` (once per source row) evaluates the header and cell
//!    expressions and files the raw values.
//! 3. `finish_print` adds totals, aggregates and maps the layout.
//!
//! `build_template` runs a design-time cycle from a single synthetic row in
//! which every header and cell shows its expression.

use log::{debug, info, trace};

use engine::CellValue;

use crate::aggregate::AggregationEngine;
use crate::cell_store::CellStore;
use crate::collab::{DataSource, ExpressionEvaluator};
use crate::definition::{CellDescriptor, HeaderDescriptor, MatrixDefinition};
use crate::error::{MatrixError, Result};
use crate::header::{HeaderTree, ValuePath};
use crate::layout::{LayoutMapper, MatrixLayout};

/// Where the matrix is in its print cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ingesting,
    Finished,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Ingesting => "ingesting",
            Phase::Finished => "finished",
        }
    }
}

/// Descriptors used for a cycle: an empty axis gets the placeholder level.
fn effective_levels(levels: &[HeaderDescriptor]) -> Vec<HeaderDescriptor> {
    if levels.is_empty() {
        vec![HeaderDescriptor::placeholder()]
    } else {
        levels.to_vec()
    }
}

fn effective_cells(cells: &[CellDescriptor]) -> Vec<CellDescriptor> {
    if cells.is_empty() {
        vec![CellDescriptor::placeholder()]
    } else {
        cells.to_vec()
    }
}

/// Evaluates one value per level; placeholder levels yield None.
fn evaluate_path(
    levels: &[HeaderDescriptor],
    evaluator: &mut dyn ExpressionEvaluator,
    row_no: usize,
) -> Result<ValuePath> {
    let mut path = ValuePath::new();
    for level in levels {
        if level.is_placeholder() {
            path.push(None);
        } else {
            path.push(evaluator.evaluate(&level.expression, row_no)?);
        }
    }
    Ok(path)
}

/// Header path showing each level's expression.
fn template_path(levels: &[HeaderDescriptor]) -> ValuePath {
    levels
        .iter()
        .map(|level| {
            if level.is_placeholder() {
                None
            } else {
                Some(CellValue::text(level.expression.clone()))
            }
        })
        .collect()
}

/// The cross-tab object.
#[derive(Debug, Clone)]
pub struct Matrix {
    definition: MatrixDefinition,
    columns: HeaderTree,
    rows: HeaderTree,
    cells: Vec<CellDescriptor>,
    store: CellStore,
    phase: Phase,
    is_template: bool,
    rows_ingested: usize,
}

impl Matrix {
    pub fn new(definition: MatrixDefinition) -> Self {
        let columns = HeaderTree::new(effective_levels(&definition.columns));
        let rows = HeaderTree::new(effective_levels(&definition.rows));
        let cells = effective_cells(&definition.cells);
        let store = CellStore::new(cells.len());
        Matrix {
            definition,
            columns,
            rows,
            cells,
            store,
            phase: Phase::Idle,
            is_template: false,
            rows_ingested: 0,
        }
    }

    pub fn definition(&self) -> &MatrixDefinition {
        &self.definition
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn columns(&self) -> &HeaderTree {
        &self.columns
    }

    pub fn rows(&self) -> &HeaderTree {
        &self.rows
    }

    /// Cell descriptors of the current cycle (placeholder included).
    pub fn cells(&self) -> &[CellDescriptor] {
        &self.cells
    }

    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn is_template(&self) -> bool {
        self.is_template
    }

    /// Number of rows that passed the filter in the current cycle.
    pub fn rows_ingested(&self) -> usize {
        self.rows_ingested
    }

    /// Resets trees, store and leaf counters; the matrix returns to Idle.
    pub fn clear(&mut self) {
        self.columns.clear();
        self.rows.clear();
        self.store.clear(self.cells.len());
        self.rows_ingested = 0;
        self.phase = Phase::Idle;
    }

    fn expect_phase(&self, expected: Phase, operation: &'static str) -> Result<()> {
        if self.phase != expected {
            return Err(MatrixError::InvalidPhase {
                operation,
                phase: self.phase.name(),
            });
        }
        Ok(())
    }

    /// Installs the effective descriptors and enters Ingesting.
    fn prepare(&mut self, is_template: bool) {
        self.cells = effective_cells(&self.definition.cells);
        self.columns.set_descriptors(effective_levels(&self.definition.columns));
        self.rows.set_descriptors(effective_levels(&self.definition.rows));
        self.store.clear(self.cells.len());
        self.rows_ingested = 0;
        self.is_template = is_template;
        self.phase = Phase::Ingesting;
    }

    // ========================================================================
    // RUN-TIME CYCLE
    // ========================================================================

    /// Begins a run-time cycle.
    pub fn start_print(&mut self) -> Result<()> {
        if self.phase == Phase::Ingesting {
            return Err(MatrixError::InvalidPhase {
                operation: "start printing",
                phase: self.phase.name(),
            });
        }
        self.definition.validate()?;
        self.prepare(false);
        info!(
            "Matrix '{}': print started ({} column levels, {} row levels, {} cells)",
            self.definition.display_name(),
            self.definition.columns.len(),
            self.definition.rows.len(),
            self.cells.len()
        );
        Ok(())
    }

    /// Evaluates and files one data row. Returns false when the row filter
    /// rejected the row.
    pub fn add_data_row(
        &mut self,
        evaluator: &mut dyn ExpressionEvaluator,
        row_no: usize,
    ) -> Result<bool> {
        self.expect_phase(Phase::Ingesting, "add a data row")?;

        if let Some(filter) = self.definition.filter.as_deref() {
            let passes = evaluator
                .evaluate(filter, row_no)?
                .map(|v| v.is_truthy())
                .unwrap_or(false);
            if !passes {
                trace!("Row {} rejected by filter", row_no);
                return Ok(false);
            }
        }

        let column_path = evaluate_path(self.columns.descriptors(), evaluator, row_no)?;
        let row_path = evaluate_path(self.rows.descriptors(), evaluator, row_no)?;
        let mut values = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            if cell.function.is_custom() || cell.is_placeholder() {
                values.push(None);
            } else {
                values.push(evaluator.evaluate(&cell.expression, row_no)?);
            }
        }

        self.ingest(&column_path, &row_path, values, row_no);
        Ok(true)
    }

    /// Files one row of values supplied directly instead of evaluated.
    /// The slices follow the definition: one value per column level, per
    /// row level and per cell descriptor. An empty axis takes an empty slice.
    pub fn add_value(
        &mut self,
        columns: &[Option<CellValue>],
        rows: &[Option<CellValue>],
        cells: &[Option<CellValue>],
        data_row_no: usize,
    ) -> Result<()> {
        self.expect_phase(Phase::Ingesting, "add a value")?;
        let column_path = resolve_path("column", &self.definition.columns, columns)?;
        let row_path = resolve_path("row", &self.definition.rows, rows)?;
        if cells.len() != self.definition.cells.len() {
            return Err(MatrixError::PathLength {
                axis: "cell",
                expected: self.definition.cells.len(),
                actual: cells.len(),
            });
        }

        let values = cells
            .iter()
            .zip(&self.cells)
            .map(|(value, cell)| if cell.function.is_custom() { None } else { value.clone() })
            .collect();
        self.ingest(&column_path, &row_path, values, data_row_no);
        Ok(())
    }

    fn ingest(
        &mut self,
        column_path: &[Option<CellValue>],
        row_path: &[Option<CellValue>],
        values: Vec<Option<CellValue>>,
        row_no: usize,
    ) {
        let column_leaf = self
            .columns
            .find(column_path, true, row_no)
            .and_then(|id| self.columns.item(id).leaf_index);
        let row_leaf = self
            .rows
            .find(row_path, true, row_no)
            .and_then(|id| self.rows.item(id).leaf_index);
        let (Some(col), Some(row)) = (column_leaf, row_leaf) else {
            return;
        };

        for (d, value) in values.into_iter().enumerate() {
            self.store.add_value(d, col, row, value);
        }
        self.rows_ingested += 1;
    }

    /// Adds totals, aggregates and lays out the grid.
    pub fn finish_print(
        &mut self,
        evaluator: &mut dyn ExpressionEvaluator,
    ) -> Result<MatrixLayout> {
        self.expect_phase(Phase::Ingesting, "finish printing")?;
        self.complete(Some(evaluator))
    }

    /// Drives a data source through a complete run-time cycle.
    pub fn run(
        &mut self,
        source: &mut dyn DataSource,
        evaluator: &mut dyn ExpressionEvaluator,
    ) -> Result<MatrixLayout> {
        self.start_print()?;
        source.init();
        while source.has_more_rows() {
            self.add_data_row(evaluator, source.current_row_no())?;
            source.next();
        }
        self.finish_print(evaluator)
    }

    // ========================================================================
    // DESIGN-TIME CYCLE
    // ========================================================================

    /// Builds the design-time grid: one synthetic row, every header showing
    /// its expression, totals always present, data cells showing their
    /// expressions. An unconfigured matrix yields placeholder cells.
    pub fn build_template(&mut self) -> Result<MatrixLayout> {
        if self.phase == Phase::Ingesting {
            return Err(MatrixError::InvalidPhase {
                operation: "build the template",
                phase: self.phase.name(),
            });
        }
        self.prepare(true);

        let column_path = template_path(self.columns.descriptors());
        let row_path = template_path(self.rows.descriptors());
        let values = vec![None; self.cells.len()];
        self.ingest(&column_path, &row_path, values, 0);

        debug!("Matrix '{}': building template", self.definition.display_name());
        self.complete(None)
    }

    fn complete(
        &mut self,
        evaluator: Option<&mut dyn ExpressionEvaluator>,
    ) -> Result<MatrixLayout> {
        self.columns.add_total_items(self.is_template);
        self.rows.add_total_items(self.is_template);

        if let Some(evaluator) = evaluator {
            let engine = AggregationEngine::new(&self.columns, &self.rows, &self.cells);
            if let Err(e) = engine.run(&mut self.store, evaluator) {
                self.phase = Phase::Idle;
                return Err(e);
            }
        }

        let layout = LayoutMapper::new(&self.definition, &self.cells, self.is_template)
            .build(&self.columns, &mut self.rows, &self.store);
        self.phase = Phase::Finished;

        info!(
            "Matrix '{}': {} rows -> {}x{} grid ({} column, {} row terminals)",
            self.definition.display_name(),
            self.rows_ingested,
            layout.width,
            layout.height,
            self.columns.terminal_items().len(),
            self.rows.terminal_items().len()
        );
        Ok(layout)
    }
}

/// Checks a manually supplied axis path against the configured levels.
fn resolve_path(
    axis: &'static str,
    levels: &[HeaderDescriptor],
    given: &[Option<CellValue>],
) -> Result<ValuePath> {
    if given.len() != levels.len() {
        return Err(MatrixError::PathLength {
            axis,
            expected: levels.len(),
            actual: given.len(),
        });
    }
    if levels.is_empty() {
        let mut placeholder = ValuePath::new();
        placeholder.push(None);
        return Ok(placeholder);
    }
    Ok(given.iter().cloned().collect())
}

//! FILENAME: matrix-engine/src/collab.rs
//! Collaborators - The seams between the matrix and its host.
//!
//! The matrix never reads data or renders by itself. A host supplies:
//! - an `ExpressionEvaluator` resolving header, cell and filter expressions,
//! - a `DataSource` cursor over the rows to aggregate,
//! - a `GridSurface` receiving the final layout.

use engine::{Cell, CellValue, Grid};

use crate::cell_store::CellStore;
use crate::error::EvalError;
use crate::layout::LayoutCell;

/// Resolves expressions against the current data row.
pub trait ExpressionEvaluator {
    /// Evaluates `expression` for data row `row_no`. Ok(None) is an absent
    /// value, not a failure.
    fn evaluate(&mut self, expression: &str, row_no: usize) -> Result<Option<CellValue>, EvalError>;

    /// Evaluates the expression of a Custom cell descriptor once the other
    /// descriptors at the same position are reduced.
    fn evaluate_custom(
        &mut self,
        expression: &str,
        context: &CustomContext<'_>,
    ) -> Result<Option<CellValue>, EvalError> {
        let _ = context;
        Err(EvalError::Unsupported(expression.to_string()))
    }
}

/// Forward-only cursor over the rows of a data source.
pub trait DataSource {
    fn init(&mut self);
    fn has_more_rows(&self) -> bool;
    fn next(&mut self);
    fn current_row_no(&self) -> usize;
}

/// Receives the rectangular output of a finished cycle.
pub trait GridSurface {
    fn set_size(&mut self, width: usize, height: usize);
    fn write_cell(&mut self, x: usize, y: usize, cell: &LayoutCell);
}

// ============================================================================
// CUSTOM FUNCTION CONTEXT
// ============================================================================

/// Read access to the reduced values at one body position, handed to the
/// evaluator of a Custom descriptor.
#[derive(Debug, Clone, Copy)]
pub struct CustomContext<'a> {
    store: &'a CellStore,
    col: usize,
    row: usize,
    descriptor: usize,
}

impl<'a> CustomContext<'a> {
    pub(crate) fn new(store: &'a CellStore, col: usize, row: usize, descriptor: usize) -> Self {
        CustomContext {
            store,
            col,
            row,
            descriptor,
        }
    }

    /// Numeric value of descriptor `index` at this position.
    /// Absent and non-numeric values read as 0.
    pub fn value(&self, index: usize) -> f64 {
        self.raw_value(index)
            .and_then(CellValue::as_f64)
            .unwrap_or(0.0)
    }

    /// Reduced value of descriptor `index` at this position.
    pub fn raw_value(&self, index: usize) -> Option<&'a CellValue> {
        self.store.get_value(index, self.col, self.row)
    }

    /// Index of the descriptor being evaluated.
    pub fn descriptor(&self) -> usize {
        self.descriptor
    }

    pub fn column_leaf(&self) -> usize {
        self.col
    }

    pub fn row_leaf(&self) -> usize {
        self.row
    }
}

// ============================================================================
// GRID SURFACE FOR THE SHARED GRID
// ============================================================================

/// Grid coordinates are u32; larger layouts saturate.
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl GridSurface for Grid {
    fn set_size(&mut self, width: usize, height: usize) {
        Grid::set_size(self, to_u32(height), to_u32(width));
    }

    fn write_cell(&mut self, x: usize, y: usize, cell: &LayoutCell) {
        let mut rendered = Cell::new_value(cell.value.clone(), cell.origin)
            .with_span(to_u32(cell.col_span), to_u32(cell.row_span));
        rendered.text = cell.text.clone();
        self.set_cell(to_u32(y), to_u32(x), rendered);
    }
}

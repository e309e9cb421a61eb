//! FILENAME: engine/src/grid.rs
//! PURPOSE: Manages the collection of rendered cells (the output grid).
//! CONTEXT: This file defines the `Grid` struct which receives the layout of
//! a cross-tab. It uses a sparse storage strategy (HashMap) because merged
//! regions only store their anchor cell.

use std::collections::HashMap;
use crate::cell::Cell;

/// The Grid struct holds the rendered report cells.
/// It uses a sparse representation (HashMap) mapping coordinates to Cells.
/// Row and Col are 0-based indices.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    /// Sparse storage: keys are (row, col), values are anchor Cells.
    pub cells: HashMap<(u32, u32), Cell>,

    /// Declared number of rows.
    pub row_count: u32,

    /// Declared number of columns.
    pub col_count: u32,
}

impl Grid {
    /// Creates a new, empty Grid.
    pub fn new() -> Self {
        Grid {
            cells: HashMap::new(),
            row_count: 0,
            col_count: 0,
        }
    }

    /// Resizes the grid, dropping anchor cells that fall outside.
    pub fn set_size(&mut self, row_count: u32, col_count: u32) {
        self.row_count = row_count;
        self.col_count = col_count;
        self.cells.retain(|&(row, col), _| row < row_count && col < col_count);
    }

    /// Sets a cell at the specified coordinates.
    /// Grows the declared size if the cell lies outside it.
    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        self.row_count = self.row_count.max(row.saturating_add(cell.row_span));
        self.col_count = self.col_count.max(col.saturating_add(cell.col_span));
        self.cells.insert((row, col), cell);
    }

    /// Retrieves a reference to the anchor cell at the specified coordinates.
    /// Returns None if nothing is anchored there.
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Returns the text at (row, col), or an empty string.
    pub fn text_at(&self, row: u32, col: u32) -> &str {
        self.get_cell(row, col).map(|c| c.text.as_str()).unwrap_or("")
    }
}

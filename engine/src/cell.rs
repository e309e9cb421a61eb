//! FILENAME: engine/src/cell.rs
//! PURPOSE: Defines a single rendered cell of a report grid.
//! CONTEXT: A rendered cell carries its display text, the underlying value,
//! its merge spans and a back-reference to the descriptor that produced it so
//! the renderer can inherit styles from the design-time template.

use serde::{Deserialize, Serialize};
use crate::value::CellValue;

/// Which part of a cross-tab produced a rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellOrigin {
    /// The title row above the body.
    Title,
    /// Top-left area above the row headers.
    Corner,
    /// Caption of a cell descriptor (multiple descriptors only).
    Caption { descriptor: usize },
    /// Column header at a descriptor level (0 = outermost).
    ColumnHeader { level: usize },
    /// Row header at a descriptor level (0 = outermost).
    RowHeader { level: usize },
    /// Data cell produced by a cell descriptor.
    Data { descriptor: usize },
}

/// The atomic unit of a rendered grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    pub value: Option<CellValue>,
    pub row_span: u32,
    pub col_span: u32,
    pub origin: CellOrigin,
}

impl Cell {
    pub fn new(origin: CellOrigin) -> Self {
        Cell {
            text: String::new(),
            value: None,
            row_span: 1,
            col_span: 1,
            origin,
        }
    }

    /// Creates a cell showing a value; absent values render as empty text.
    pub fn new_value(value: Option<CellValue>, origin: CellOrigin) -> Self {
        Cell {
            text: value.as_ref().map(|v| v.display_value()).unwrap_or_default(),
            value,
            ..Cell::new(origin)
        }
    }

    pub fn with_span(mut self, col_span: u32, row_span: u32) -> Self {
        self.col_span = col_span.max(1);
        self.row_span = row_span.max(1);
        self
    }
}

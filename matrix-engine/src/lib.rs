//! FILENAME: matrix-engine/src/lib.rs
//! Cross-tab (matrix) subsystem.
//!
//! This crate builds a cross-tabulation from a stream of flat data rows:
//! it groups rows along configurable column and row dimensions, aggregates
//! the cell values, adds totals and percentages, and lays the result out as
//! a rectangular grid. It depends on `engine` only for shared types
//! (CellValue, Grid).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the matrix IS)
//! - `header`: Per-axis value trees (how rows are grouped)
//! - `cell_store` / `aggregate`: Raw values and their reduction
//! - `layout`: Renderable output (WHAT we display)
//! - `matrix`: The print cycle tying it together
//! - `collab` / `source`: Host-facing traits and an in-memory source

pub mod aggregate;
pub mod cell_store;
pub mod collab;
pub mod definition;
pub mod error;
pub mod header;
pub mod layout;
pub mod matrix;
pub mod source;

pub use aggregate::{aggregate, AggregationEngine};
pub use cell_store::{CellStore, Slot};
pub use collab::{CustomContext, DataSource, ExpressionEvaluator, GridSurface};
pub use definition::*;
pub use error::{EvalError, MatrixError, Result};
pub use header::{HeaderItem, HeaderTree, ItemId, ItemKind, ValuePath};
pub use layout::{LayoutCell, LayoutMapper, MatrixLayout};
pub use matrix::{Matrix, Phase};
pub use source::{CustomFunction, Table, TableEvaluator, TableSource};

//! FILENAME: engine/src/lib.rs
//! PURPOSE: Shared types for the reporting crates.
//! CONTEXT: Re-exports the value type and the rendered grid used by
//! `matrix-engine` and by hosts that render its output.

pub mod cell;
pub mod grid;
pub mod value;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellOrigin};
pub use grid::Grid;
pub use value::{CellValue, OrderedFloat, ValueKey};

//! FILENAME: matrix-engine/src/definition.rs
//! Matrix Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a cross-tab.
//! These structures are designed to be:
//! - Serializable (the surrounding report layer persists them)
//! - Configured once, before a print cycle starts
//! - Immutable snapshots of user intent during a cycle

use serde::{Deserialize, Serialize};
use crate::error::{MatrixError, Result};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Reduction applied to the raw values collected in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AggregateFunction {
    /// No reduction: the first collected value is shown.
    None,
    #[default]
    Sum,
    Min,
    Max,
    Avg,
    Count,
    CountDistinct,
    /// The cell expression is evaluated after the other descriptors at the
    /// same position and may read their results.
    Custom,
}

impl AggregateFunction {
    pub fn is_custom(self) -> bool {
        matches!(self, AggregateFunction::Custom)
    }
}

/// How a cell value is expressed relative to a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PercentMode {
    #[default]
    None,
    /// Fraction of the column-axis total in the same row.
    ColumnTotal,
    /// Fraction of the row-axis total in the same column.
    RowTotal,
    /// Fraction of the grand total.
    GrandTotal,
}

/// Sort order for the items of one header level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
    /// Keep the order of first appearance.
    None,
}

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// One grouping level on the column or row axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderDescriptor {
    /// Source of the value to group by. Empty for the placeholder level.
    pub expression: String,

    /// Order of the items created on this level.
    #[serde(default)]
    pub sort_order: SortOrder,

    /// Materialize a total item among this level's items.
    #[serde(default = "default_true")]
    pub totals: bool,

    /// Put the total before the items instead of after them.
    #[serde(default)]
    pub totals_first: bool,

    /// Start a new page before each item of this level.
    #[serde(default)]
    pub page_break: bool,

    /// Omit the total when the parent has exactly one item
    /// (ignored when building the design-time template).
    #[serde(default)]
    pub suppress_totals: bool,

    /// Header text of the total item. Defaults to "Total", or "Grand Total"
    /// on the outermost level.
    #[serde(default)]
    pub total_text: Option<String>,
}

fn default_true() -> bool {
    true
}

impl HeaderDescriptor {
    pub fn new(expression: impl Into<String>) -> Self {
        HeaderDescriptor {
            expression: expression.into(),
            sort_order: SortOrder::Ascending,
            totals: true,
            totals_first: false,
            page_break: false,
            suppress_totals: false,
            total_text: None,
        }
    }

    /// The placeholder level injected into an empty axis. It has no
    /// expression and never produces a total.
    pub fn placeholder() -> Self {
        HeaderDescriptor {
            totals: false,
            sort_order: SortOrder::None,
            ..HeaderDescriptor::new("")
        }
    }

    pub fn with_sort(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_totals(mut self, totals: bool) -> Self {
        self.totals = totals;
        self
    }

    pub fn totals_first(mut self, first: bool) -> Self {
        self.totals_first = first;
        self
    }

    pub fn suppress_totals(mut self, suppress: bool) -> Self {
        self.suppress_totals = suppress;
        self
    }

    pub fn with_page_break(mut self, page_break: bool) -> Self {
        self.page_break = page_break;
        self
    }

    /// Text shown in the header of this level's total item.
    pub fn total_caption(&self, level: usize) -> String {
        match &self.total_text {
            Some(text) => text.clone(),
            None if level == 0 => "Grand Total".to_string(),
            None => "Total".to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.expression.is_empty()
    }
}

/// One value computed per (row, column) intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDescriptor {
    /// Source of the raw values (or the custom expression).
    pub expression: String,

    /// The aggregation function to apply.
    #[serde(default)]
    pub function: AggregateFunction,

    /// Show the value as a fraction of a total.
    #[serde(default)]
    pub percent: PercentMode,

    /// Caption shown above (or beside) this descriptor's cells when more
    /// than one descriptor is configured. Defaults to the expression.
    #[serde(default)]
    pub caption: Option<String>,
}

impl CellDescriptor {
    pub fn new(expression: impl Into<String>, function: AggregateFunction) -> Self {
        CellDescriptor {
            expression: expression.into(),
            function,
            percent: PercentMode::None,
            caption: None,
        }
    }

    pub fn placeholder() -> Self {
        CellDescriptor::new("", AggregateFunction::None)
    }

    pub fn with_percent(mut self, percent: PercentMode) -> Self {
        self.percent = percent;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn caption_text(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.expression)
    }

    pub fn is_placeholder(&self) -> bool {
        self.expression.is_empty()
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The complete, serializable definition of a cross-tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixDefinition {
    /// User-friendly name, used in log messages.
    #[serde(default)]
    pub name: Option<String>,

    /// Column axis levels (ordered from outer to inner).
    #[serde(default)]
    pub columns: Vec<HeaderDescriptor>,

    /// Row axis levels (ordered from outer to inner).
    #[serde(default)]
    pub rows: Vec<HeaderDescriptor>,

    /// Values computed per intersection.
    #[serde(default)]
    pub cells: Vec<CellDescriptor>,

    /// Arrange multiple cell descriptors horizontally instead of stacking
    /// them vertically.
    #[serde(default = "default_true")]
    pub cells_side_by_side: bool,

    /// Show a title row above the column headers.
    #[serde(default)]
    pub show_title: bool,

    /// Text of the title row.
    #[serde(default)]
    pub title: Option<String>,

    /// Replace merged row headers with one unmerged header per row.
    #[serde(default)]
    pub split_rows: bool,

    /// Row filter expression; rows where it does not evaluate to true are
    /// skipped during ingestion.
    #[serde(default)]
    pub filter: Option<String>,
}

impl MatrixDefinition {
    pub fn new() -> Self {
        MatrixDefinition {
            cells_side_by_side: true,
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("matrix")
    }

    /// Structural check performed when a print cycle starts.
    pub fn validate(&self) -> Result<()> {
        if (self.columns.is_empty() && self.rows.is_empty()) || self.cells.is_empty() {
            return Err(MatrixError::NotConfigured {
                name: self.display_name().to_string(),
            });
        }
        Ok(())
    }
}

//! FILENAME: matrix-engine/src/layout.rs
//! Layout Mapper - Turns the trees and the reduced store into a grid.
//!
//! Grid regions (x grows right, y grows down):
//!
//! ```text
//! +-----------------+--------------------------------+
//! | title (optional, full width)                     |
//! +-----------------+--------------------------------+
//! | corner          | column headers (one row/level) |
//! |                 | cell captions (side by side)   |
//! +-----------------+--------------------------------+
//! | row headers     | data cells                     |
//! | [+ captions]    |                                |
//! +-----------------+--------------------------------+
//! ```
//!
//! With more than one cell descriptor each terminal column (side by side) or
//! terminal row (stacked) is multiplied by the descriptor count.

use rustc_hash::FxHashMap;

use engine::{CellOrigin, CellValue};

use crate::cell_store::CellStore;
use crate::collab::GridSurface;
use crate::definition::{CellDescriptor, MatrixDefinition};
use crate::header::{HeaderTree, ItemId, ItemKind, ROOT};

/// One anchor cell of the output grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCell {
    pub x: usize,
    pub y: usize,
    pub col_span: usize,
    pub row_span: usize,
    pub text: String,
    pub value: Option<CellValue>,
    pub origin: CellOrigin,
    /// Header item behind a header cell (column or row tree per `origin`).
    pub item: Option<ItemId>,
    /// Cell descriptor behind a caption or data cell.
    pub descriptor: Option<usize>,
    /// Produced by a placeholder level or descriptor; a designer shows an
    /// "add here" hint instead of the text.
    pub is_placeholder: bool,
}

impl LayoutCell {
    fn new(x: usize, y: usize, origin: CellOrigin) -> Self {
        LayoutCell {
            x,
            y,
            col_span: 1,
            row_span: 1,
            text: String::new(),
            value: None,
            origin,
            item: None,
            descriptor: None,
            is_placeholder: false,
        }
    }

    fn with_span(mut self, col_span: usize, row_span: usize) -> Self {
        self.col_span = col_span.max(1);
        self.row_span = row_span.max(1);
        self
    }

    fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// The rectangular result of a finished print cycle.
#[derive(Debug, Clone, Default)]
pub struct MatrixLayout {
    pub header_width: usize,
    pub header_height: usize,
    pub body_width: usize,
    pub body_height: usize,
    pub width: usize,
    pub height: usize,
    /// Anchor cells in emission order.
    pub cells: Vec<LayoutCell>,
    /// Rows (y) starting a new page, from `page_break` row levels.
    pub page_breaks: Vec<usize>,
    /// Columns (x) starting a new page, from `page_break` column levels.
    pub column_breaks: Vec<usize>,
    index: FxHashMap<(usize, usize), usize>,
}

impl MatrixLayout {
    fn push(&mut self, cell: LayoutCell) {
        self.index.insert((cell.x, cell.y), self.cells.len());
        self.cells.push(cell);
    }

    /// Anchor cell at (x, y). Positions covered by a span have no anchor.
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&LayoutCell> {
        self.index.get(&(x, y)).map(|&i| &self.cells[i])
    }

    pub fn text_at(&self, x: usize, y: usize) -> &str {
        self.cell_at(x, y).map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Cells produced by data descriptors, in row-major body order.
    pub fn data_cells(&self) -> impl Iterator<Item = &LayoutCell> {
        self.cells
            .iter()
            .filter(|c| matches!(c.origin, CellOrigin::Data { .. }))
    }

    /// Writes the layout to a rendering surface.
    pub fn render(&self, surface: &mut dyn GridSurface) {
        surface.set_size(self.width, self.height);
        for cell in &self.cells {
            surface.write_cell(cell.x, cell.y, cell);
        }
    }
}

// ============================================================================
// HEADER WALK
// ============================================================================

/// A header item with its position among the axis terminals.
#[derive(Debug, Clone, Copy)]
struct HeaderEntry {
    id: ItemId,
    level: usize,
    /// Index of the first terminal under the item.
    position: usize,
    leaves: usize,
}

fn header_entries(tree: &HeaderTree) -> Vec<HeaderEntry> {
    let mut entries = Vec::new();
    let mut position = 0;
    walk_headers(tree, ROOT, &mut position, &mut entries);
    entries
}

fn walk_headers(tree: &HeaderTree, id: ItemId, position: &mut usize, out: &mut Vec<HeaderEntry>) {
    for &child in &tree.item(id).children {
        let item = tree.item(child);
        if item.is_splitted {
            continue;
        }
        out.push(HeaderEntry {
            id: child,
            level: item.level().unwrap_or(0),
            position: *position,
            leaves: tree.leaf_count(child),
        });
        if item.children.is_empty() {
            *position += 1;
        } else {
            walk_headers(tree, child, position, out);
        }
    }
}

fn header_text(tree: &HeaderTree, id: ItemId, level: usize) -> String {
    let item = tree.item(id);
    match item.kind {
        ItemKind::Total => tree
            .descriptor_of(id)
            .map(|d| d.total_caption(level))
            .unwrap_or_default(),
        ItemKind::Placeholder => String::new(),
        ItemKind::Detail => item
            .value
            .as_ref()
            .map(CellValue::display_value)
            .unwrap_or_default(),
    }
}

/// Levels a header cell covers: a total above the final level reaches down
/// (or across) to the last level.
fn header_depth(tree: &HeaderTree, entry: &HeaderEntry) -> usize {
    if tree.item(entry.id).is_total() {
        tree.level_count().saturating_sub(entry.level).max(1)
    } else {
        1
    }
}

fn header_cell(
    tree: &HeaderTree,
    entry: &HeaderEntry,
    x: usize,
    y: usize,
    origin: CellOrigin,
) -> LayoutCell {
    let item = tree.item(entry.id);
    let mut cell =
        LayoutCell::new(x, y, origin).with_text(header_text(tree, entry.id, entry.level));
    if item.kind == ItemKind::Detail {
        cell.value = item.value.clone();
    }
    cell.item = Some(entry.id);
    cell.is_placeholder = item.kind == ItemKind::Placeholder;
    cell
}

// ============================================================================
// MAPPER
// ============================================================================

/// Builds a `MatrixLayout` from a finished cycle.
pub struct LayoutMapper<'a> {
    definition: &'a MatrixDefinition,
    cells: &'a [CellDescriptor],
    is_template: bool,
}

impl<'a> LayoutMapper<'a> {
    /// `cells` is the effective descriptor list (with the placeholder when
    /// the definition has none).
    pub fn new(
        definition: &'a MatrixDefinition,
        cells: &'a [CellDescriptor],
        is_template: bool,
    ) -> Self {
        LayoutMapper {
            definition,
            cells,
            is_template,
        }
    }

    fn descriptor_count(&self) -> usize {
        self.cells.len().max(1)
    }

    fn side_by_side(&self) -> bool {
        self.definition.cells_side_by_side
    }

    fn has_captions(&self) -> bool {
        self.cells.len() > 1
    }

    /// Emits the grid. Split rows mutate the row tree (duplicate items).
    pub fn build(
        &self,
        columns: &HeaderTree,
        rows: &mut HeaderTree,
        store: &CellStore,
    ) -> MatrixLayout {
        let n = self.descriptor_count();
        let side = self.side_by_side();
        let col_mult = if side { n } else { 1 };
        let row_mult = if side { 1 } else { n };

        let title_rows = usize::from(self.definition.show_title);
        let caption_row = usize::from(self.has_captions() && side);
        let caption_col = usize::from(self.has_captions() && !side);
        let col_levels = columns.level_count();
        let row_levels = rows.level_count();

        let col_terminals = columns.terminal_items();
        let row_terminals = rows.terminal_items();

        let mut layout = MatrixLayout {
            header_width: row_levels + caption_col,
            header_height: title_rows + col_levels + caption_row,
            body_width: col_terminals.len() * col_mult,
            body_height: row_terminals.len() * row_mult,
            ..MatrixLayout::default()
        };
        layout.width = layout.header_width + layout.body_width;
        layout.height = layout.header_height + layout.body_height;
        let (hw, hh) = (layout.header_width, layout.header_height);

        if self.definition.show_title {
            let title = self.definition.title.clone().unwrap_or_default();
            layout.push(
                LayoutCell::new(0, 0, CellOrigin::Title)
                    .with_span(layout.width, 1)
                    .with_text(title),
            );
        }

        if hw > 0 {
            layout.push(
                LayoutCell::new(0, title_rows, CellOrigin::Corner)
                    .with_span(hw, col_levels + caption_row),
            );
        }

        // Column headers
        for entry in header_entries(columns) {
            let x = hw + entry.position * col_mult;
            let y = title_rows + entry.level;
            let origin = CellOrigin::ColumnHeader { level: entry.level };
            let cell = header_cell(columns, &entry, x, y, origin)
                .with_span(entry.leaves * col_mult, header_depth(columns, &entry));
            if columns.descriptor_of(entry.id).is_some_and(|d| d.page_break) && x > hw {
                layout.column_breaks.push(x);
            }
            layout.push(cell);
        }

        if caption_row == 1 {
            let y = title_rows + col_levels;
            for ci in 0..col_terminals.len() {
                for (d, descriptor) in self.cells.iter().enumerate() {
                    layout.push(self.caption_cell(hw + ci * n + d, y, d, descriptor));
                }
            }
        }

        // Row headers
        let split = self.definition.split_rows;
        for entry in header_entries(rows) {
            let x = entry.level;
            let y = hh + entry.position * row_mult;
            let span = entry.leaves * row_mult;
            let depth = header_depth(rows, &entry);
            let origin = CellOrigin::RowHeader { level: entry.level };

            if rows.descriptor_of(entry.id).is_some_and(|d| d.page_break) && y > hh {
                layout.page_breaks.push(y);
            }

            if split && span > 1 {
                let base = header_cell(rows, &entry, x, y, origin).with_span(depth, 1);
                for (k, id) in rows.split_item(entry.id, span).into_iter().enumerate() {
                    let mut cell = base.clone();
                    cell.y = y + k;
                    cell.item = Some(id);
                    layout.push(cell);
                }
            } else {
                layout.push(header_cell(rows, &entry, x, y, origin).with_span(depth, span));
            }
        }

        if caption_col == 1 {
            for ri in 0..row_terminals.len() {
                for (d, descriptor) in self.cells.iter().enumerate() {
                    layout.push(self.caption_cell(row_levels, hh + ri * n + d, d, descriptor));
                }
            }
        }

        // Data cells
        for (ri, &row_id) in row_terminals.iter().enumerate() {
            let Some(row_leaf) = rows.item(row_id).leaf_index else { continue };
            for (ci, &col_id) in col_terminals.iter().enumerate() {
                let Some(col_leaf) = columns.item(col_id).leaf_index else { continue };
                for (d, descriptor) in self.cells.iter().enumerate() {
                    let x = hw + ci * col_mult + if side { d } else { 0 };
                    let y = hh + ri * row_mult + if side { 0 } else { d };
                    let value = store.get_value(d, col_leaf, row_leaf);
                    layout.push(self.data_cell(x, y, d, descriptor, value));
                }
            }
        }

        layout.page_breaks.sort_unstable();
        layout.page_breaks.dedup();
        layout.column_breaks.sort_unstable();
        layout.column_breaks.dedup();
        layout
    }

    fn caption_cell(
        &self,
        x: usize,
        y: usize,
        d: usize,
        descriptor: &CellDescriptor,
    ) -> LayoutCell {
        let mut cell = LayoutCell::new(x, y, CellOrigin::Caption { descriptor: d })
            .with_text(descriptor.caption_text());
        cell.descriptor = Some(d);
        cell.is_placeholder = descriptor.is_placeholder();
        cell
    }

    fn data_cell(
        &self,
        x: usize,
        y: usize,
        d: usize,
        descriptor: &CellDescriptor,
        value: Option<&CellValue>,
    ) -> LayoutCell {
        let mut cell = LayoutCell::new(x, y, CellOrigin::Data { descriptor: d });
        if self.is_template {
            cell.text = descriptor.expression.clone();
        } else {
            cell.value = value.cloned();
            cell.text = value.map(CellValue::display_value).unwrap_or_default();
        }
        cell.descriptor = Some(d);
        cell.is_placeholder = descriptor.is_placeholder();
        cell
    }
}

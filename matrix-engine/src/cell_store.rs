//! FILENAME: matrix-engine/src/cell_store.rs
//! Cell Store - Sparse raw-value storage of the cross-tab body.
//!
//! Values are keyed by (cell descriptor, column leaf, row leaf). During
//! ingestion a slot collects every value contributed to it; aggregation then
//! replaces each slot with its single reduced result.

use engine::CellValue;

/// Contents of one (descriptor, column, row) position.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot {
    #[default]
    Empty,
    Single(CellValue),
    Many(Vec<CellValue>),
}

impl Slot {
    fn push(&mut self, value: CellValue) {
        *self = match std::mem::take(self) {
            Slot::Empty => Slot::Single(value),
            Slot::Single(first) => Slot::Many(vec![first, value]),
            Slot::Many(mut values) => {
                values.push(value);
                Slot::Many(values)
            }
        };
    }

    fn as_slice(&self) -> Option<&[CellValue]> {
        match self {
            Slot::Empty => None,
            Slot::Single(value) => Some(std::slice::from_ref(value)),
            Slot::Many(values) => Some(values),
        }
    }
}

/// Per descriptor: rows of slots, each row a vector of column slots.
#[derive(Debug, Clone, Default)]
pub struct CellStore {
    descriptors: Vec<Vec<Vec<Slot>>>,
}

impl CellStore {
    pub fn new(descriptor_count: usize) -> Self {
        CellStore {
            descriptors: vec![Vec::new(); descriptor_count],
        }
    }

    pub fn descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Drops every slot and sizes the store for `descriptor_count` descriptors.
    pub fn clear(&mut self, descriptor_count: usize) {
        self.descriptors.clear();
        self.descriptors.resize(descriptor_count, Vec::new());
    }

    fn slot(&self, descriptor: usize, col: usize, row: usize) -> Option<&Slot> {
        self.descriptors.get(descriptor)?.get(row)?.get(col)
    }

    /// Slot at the position, growing the store with Empty padding.
    fn slot_mut(&mut self, descriptor: usize, col: usize, row: usize) -> &mut Slot {
        if descriptor >= self.descriptors.len() {
            self.descriptors.resize(descriptor + 1, Vec::new());
        }
        let rows = &mut self.descriptors[descriptor];
        if row >= rows.len() {
            rows.resize(row + 1, Vec::new());
        }
        let cols = &mut rows[row];
        if col >= cols.len() {
            cols.resize(col + 1, Slot::Empty);
        }
        &mut cols[col]
    }

    /// Appends a raw value. Absent values are discarded.
    pub fn add_value(
        &mut self,
        descriptor: usize,
        col: usize,
        row: usize,
        value: Option<CellValue>,
    ) {
        if let Some(value) = value {
            self.slot_mut(descriptor, col, row).push(value);
        }
    }

    /// Every value stored at the position, or None for an empty slot.
    pub fn get_values(&self, descriptor: usize, col: usize, row: usize) -> Option<&[CellValue]> {
        self.slot(descriptor, col, row).and_then(Slot::as_slice)
    }

    /// First value at the position; the reduced result after aggregation.
    pub fn get_value(&self, descriptor: usize, col: usize, row: usize) -> Option<&CellValue> {
        self.get_values(descriptor, col, row).and_then(|values| values.first())
    }

    /// Replaces the slot with a single reduced value (Empty when absent).
    pub fn set_values(
        &mut self,
        descriptor: usize,
        col: usize,
        row: usize,
        value: Option<CellValue>,
    ) {
        match value {
            Some(value) => *self.slot_mut(descriptor, col, row) = Slot::Single(value),
            None => {
                if let Some(slot) = self
                    .descriptors
                    .get_mut(descriptor)
                    .and_then(|rows| rows.get_mut(row))
                    .and_then(|cols| cols.get_mut(col))
                {
                    *slot = Slot::Empty;
                }
            }
        }
    }
}

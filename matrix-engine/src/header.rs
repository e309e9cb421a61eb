//! FILENAME: matrix-engine/src/header.rs
//! Header Tree - Per-axis hierarchical index over the distinct value paths.
//!
//! Items live in an arena (`Vec<HeaderItem>`) and refer to each other by
//! `ItemId`: a parent owns the ordered list of its children's ids and every
//! child keeps the id of its parent. Item 0 is the root; it carries no value
//! and is never a terminal item.
//!
//! Lifecycle within one print cycle:
//! 1. `find(.., create = true, ..)` per ingested row builds the detail items
//!    and assigns leaf indices to items on the final level.
//! 2. `add_total_items` inserts the synthetic totals, exactly once.
//! 3. `terminal_items` enumerates the leaves in grid order.
//! 4. The layout may `split_item` row headers into unmerged duplicates.

use std::cmp::Ordering;

use engine::CellValue;
use smallvec::SmallVec;

use crate::definition::{HeaderDescriptor, SortOrder};

/// Index of an item in its tree's arena.
pub type ItemId = usize;

/// One value per header level, outermost first. `None` is the blank group.
pub type ValuePath = SmallVec<[Option<CellValue>; 4]>;

/// The root item of every tree.
pub const ROOT: ItemId = 0;

/// What an item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A distinct value seen in the data.
    Detail,
    /// A synthetic item aggregating its siblings.
    Total,
    /// The single item of a placeholder level (an axis with no descriptors).
    Placeholder,
}

/// A node of the header tree.
#[derive(Debug, Clone)]
pub struct HeaderItem {
    pub value: Option<CellValue>,
    pub parent: Option<ItemId>,
    pub children: Vec<ItemId>,
    /// Grid index along the axis; only terminal items have one.
    pub leaf_index: Option<usize>,
    pub kind: ItemKind,
    /// Row the item was created from.
    pub data_row_no: usize,
    /// Duplicate produced by split-row layout.
    pub is_splitted: bool,
    /// 0 for the root, `level + 1` for an item on descriptor `level`.
    pub depth: usize,
}

impl HeaderItem {
    fn root() -> Self {
        HeaderItem {
            value: None,
            parent: None,
            children: Vec::new(),
            leaf_index: None,
            kind: ItemKind::Detail,
            data_row_no: 0,
            is_splitted: false,
            depth: 0,
        }
    }

    /// Descriptor level of this item, or None for the root.
    pub fn level(&self) -> Option<usize> {
        self.depth.checked_sub(1)
    }

    pub fn is_total(&self) -> bool {
        self.kind == ItemKind::Total
    }
}

/// Orders header values; the blank group sorts first.
fn compare_values(a: &Option<CellValue>, b: &Option<CellValue>) -> Option<Ordering> {
    match (a, b) {
        (None, None) => Some(Ordering::Equal),
        (None, Some(_)) => Some(Ordering::Less),
        (Some(_), None) => Some(Ordering::Greater),
        (Some(a), Some(b)) => a.compare(b),
    }
}

fn values_equal(a: &Option<CellValue>, b: &Option<CellValue>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_value(b),
        _ => false,
    }
}

/// Hierarchical index of one axis (columns or rows).
#[derive(Debug, Clone)]
pub struct HeaderTree {
    descriptors: Vec<HeaderDescriptor>,
    items: Vec<HeaderItem>,
    next_leaf_index: usize,
    totals_added: bool,
}

impl HeaderTree {
    pub fn new(descriptors: Vec<HeaderDescriptor>) -> Self {
        HeaderTree {
            descriptors,
            items: vec![HeaderItem::root()],
            next_leaf_index: 0,
            totals_added: false,
        }
    }

    /// Drops every item and resets the leaf-index counter.
    pub fn clear(&mut self) {
        self.items.clear();
        self.items.push(HeaderItem::root());
        self.next_leaf_index = 0;
        self.totals_added = false;
    }

    /// Replaces the level configuration; implies `clear`.
    pub fn set_descriptors(&mut self, descriptors: Vec<HeaderDescriptor>) {
        self.descriptors = descriptors;
        self.clear();
    }

    pub fn descriptors(&self) -> &[HeaderDescriptor] {
        &self.descriptors
    }

    pub fn level_count(&self) -> usize {
        self.descriptors.len()
    }

    pub fn item(&self, id: ItemId) -> &HeaderItem {
        &self.items[id]
    }

    /// Descriptor of the level the item belongs to.
    pub fn descriptor_of(&self, id: ItemId) -> Option<&HeaderDescriptor> {
        self.items[id].level().and_then(|level| self.descriptors.get(level))
    }

    /// Number of leaf indices handed out so far.
    pub fn leaf_index_count(&self) -> usize {
        self.next_leaf_index
    }

    pub fn totals_added(&self) -> bool {
        self.totals_added
    }

    pub fn is_empty(&self) -> bool {
        self.items[ROOT].children.is_empty()
    }

    // ========================================================================
    // LOOKUP AND INSERTION
    // ========================================================================

    /// Walks the tree following `path`, one value per level.
    ///
    /// Returns the item reached by the last value. When a level has no match
    /// and `create` is false the lookup fails with None; with `create` the
    /// missing item is inserted at its sorted (or appended) position. Only
    /// items created on the final level receive a leaf index.
    pub fn find(
        &mut self,
        path: &[Option<CellValue>],
        create: bool,
        data_row_no: usize,
    ) -> Option<ItemId> {
        let mut current = ROOT;
        for (level, value) in path.iter().enumerate() {
            current = match self.search(current, level, value) {
                Ok(found) => found,
                Err(_) if !create => return None,
                Err(position) => {
                    self.insert_item(current, position, level, value.clone(), data_row_no)
                }
            };
        }
        Some(current)
    }

    /// Non-mutating `find` without creation.
    pub fn lookup(&self, path: &[Option<CellValue>]) -> Option<ItemId> {
        let mut current = ROOT;
        for (level, value) in path.iter().enumerate() {
            current = self.search(current, level, value).ok()?;
        }
        Some(current)
    }

    /// Range of a child list that holds detail items. Totals only ever sit
    /// at the front or the back.
    fn detail_range(&self, children: &[ItemId]) -> (usize, usize) {
        let start = match children.first() {
            Some(&first) if self.items[first].is_total() => 1,
            _ => 0,
        };
        let end = match children.last() {
            Some(&last) if children.len() > start && self.items[last].is_total() => {
                children.len() - 1
            }
            _ => children.len(),
        };
        (start, end)
    }

    /// Finds `value` among the children of `parent`.
    /// Ok(item) on a match, Err(insert position) otherwise.
    fn search(
        &self,
        parent: ItemId,
        level: usize,
        value: &Option<CellValue>,
    ) -> Result<ItemId, usize> {
        let children = &self.items[parent].children;
        let (start, end) = self.detail_range(children);
        let sort_order = self
            .descriptors
            .get(level)
            .map(|d| d.sort_order)
            .unwrap_or(SortOrder::None);

        if sort_order == SortOrder::None {
            return children[start..end]
                .iter()
                .copied()
                .find(|&id| values_equal(&self.items[id].value, value))
                .ok_or(end);
        }

        let descending = sort_order == SortOrder::Descending;
        let (mut lo, mut hi) = (start, end);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let ordering = match compare_values(&self.items[children[mid]].value, value) {
                Some(o) if descending => o.reverse(),
                Some(o) => o,
                // No ordering between the values: report "not found"
                None => return Err(end),
            };
            match ordering {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(children[mid]),
            }
        }
        Err(lo)
    }

    fn insert_item(
        &mut self,
        parent: ItemId,
        position: usize,
        level: usize,
        value: Option<CellValue>,
        data_row_no: usize,
    ) -> ItemId {
        let is_final = level + 1 == self.descriptors.len();
        let leaf_index = if is_final { Some(self.take_leaf_index()) } else { None };
        let kind = match self.descriptors.get(level) {
            Some(d) if d.is_placeholder() => ItemKind::Placeholder,
            _ => ItemKind::Detail,
        };

        let id = self.items.len();
        self.items.push(HeaderItem {
            value,
            parent: Some(parent),
            children: Vec::new(),
            leaf_index,
            kind,
            data_row_no,
            is_splitted: false,
            depth: level + 1,
        });
        self.items[parent].children.insert(position, id);
        id
    }

    fn take_leaf_index(&mut self) -> usize {
        let index = self.next_leaf_index;
        self.next_leaf_index += 1;
        index
    }

    // ========================================================================
    // TOTALS
    // ========================================================================

    /// Inserts a total item among the children of every item whose child
    /// level has `totals` enabled, depth first (post-order).
    ///
    /// Precondition: called once per print cycle, after the last row has been
    /// ingested. A second call without `clear` duplicates the totals.
    pub fn add_total_items(&mut self, is_template: bool) {
        self.add_totals_under(ROOT, is_template);
        self.totals_added = true;
    }

    fn add_totals_under(&mut self, parent: ItemId, is_template: bool) {
        let children = self.items[parent].children.clone();
        if children.is_empty() {
            return;
        }
        for &child in &children {
            self.add_totals_under(child, is_template);
        }

        // Children of an item at depth d are described by descriptor d
        let level = self.items[parent].depth;
        let (totals, totals_first, suppress) = match self.descriptors.get(level) {
            Some(d) => (d.totals, d.totals_first, d.suppress_totals),
            None => return,
        };
        if !totals || (suppress && !is_template && children.len() == 1) {
            return;
        }

        let leaf_index = self.take_leaf_index();
        let id = self.items.len();
        let (value, data_row_no) = {
            let p = &self.items[parent];
            (p.value.clone(), p.data_row_no)
        };
        self.items.push(HeaderItem {
            value,
            parent: Some(parent),
            children: Vec::new(),
            leaf_index: Some(leaf_index),
            kind: ItemKind::Total,
            data_row_no,
            is_splitted: false,
            depth: level + 1,
        });

        let siblings = &mut self.items[parent].children;
        if totals_first {
            siblings.insert(0, id);
        } else {
            siblings.push(id);
        }
    }

    // ========================================================================
    // ENUMERATION
    // ========================================================================

    /// Leaves in depth-first order, totals included, split duplicates
    /// excluded. This order is the grid order of the axis.
    pub fn terminal_items(&self) -> Vec<ItemId> {
        let mut result = Vec::new();
        self.collect_terminals(ROOT, &mut result);
        result
    }

    fn collect_terminals(&self, id: ItemId, out: &mut Vec<ItemId>) {
        for &child in &self.items[id].children {
            let item = &self.items[child];
            if item.is_splitted {
                continue;
            }
            if item.children.is_empty() {
                out.push(child);
            } else {
                self.collect_terminals(child, out);
            }
        }
    }

    /// Number of terminal items under `id` (1 for a terminal item).
    pub fn leaf_count(&self, id: ItemId) -> usize {
        let item = &self.items[id];
        if item.children.is_empty() {
            return 1;
        }
        item.children
            .iter()
            .filter(|&&c| !self.items[c].is_splitted)
            .map(|&c| self.leaf_count(c))
            .sum()
    }

    /// Leaf indices of the non-total terminal items under `id`.
    pub fn detail_leaves(&self, id: ItemId) -> Vec<usize> {
        let mut terminals = Vec::new();
        if self.items[id].children.is_empty() {
            terminals.push(id);
        } else {
            self.collect_terminals(id, &mut terminals);
        }
        terminals
            .into_iter()
            .filter(|&t| !self.items[t].is_total())
            .filter_map(|t| self.items[t].leaf_index)
            .collect()
    }

    /// Leaf indices a cell at this terminal item aggregates over: its own
    /// index for a detail item, the detail leaves of its parent's subtree
    /// (nested totals excluded) for a total.
    pub fn contributing_leaves(&self, id: ItemId) -> Vec<usize> {
        let item = &self.items[id];
        match (item.kind, item.parent) {
            (ItemKind::Total, Some(parent)) => self.detail_leaves(parent),
            _ => item.leaf_index.into_iter().collect(),
        }
    }

    /// Header values from the outermost level down to `id`.
    pub fn path(&self, id: ItemId) -> ValuePath {
        let mut path = ValuePath::new();
        let mut current = id;
        while let Some(parent) = self.items[current].parent {
            path.push(self.items[current].value.clone());
            current = parent;
        }
        path.reverse();
        path
    }

    // ========================================================================
    // SPLIT ROWS
    // ========================================================================

    /// Places `count - 1` duplicates of `id` right after it among its
    /// siblings. Duplicates carry the same value and are excluded from
    /// terminal enumeration. Returns the original followed by the copies.
    pub fn split_item(&mut self, id: ItemId, count: usize) -> Vec<ItemId> {
        let mut ids = vec![id];
        let Some(parent) = self.items[id].parent else {
            return ids;
        };
        let position = self.items[parent]
            .children
            .iter()
            .position(|&c| c == id)
            .map(|p| p + 1)
            .unwrap_or(self.items[parent].children.len());

        for n in 1..count {
            let copy_id = self.items.len();
            let source = &self.items[id];
            let copy = HeaderItem {
                value: source.value.clone(),
                parent: Some(parent),
                children: Vec::new(),
                leaf_index: None,
                kind: source.kind,
                data_row_no: source.data_row_no,
                is_splitted: true,
                depth: source.depth,
            };
            self.items.push(copy);
            self.items[parent].children.insert(position + n - 1, copy_id);
            ids.push(copy_id);
        }
        ids
    }
}

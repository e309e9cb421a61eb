//! FILENAME: matrix-engine/src/aggregate.rs
//! Aggregation Engine - Reduces the raw value lists of the cell store.
//!
//! Runs once per print cycle, after totals were added to both trees:
//! 1. Totals: positions where either axis item is a total aggregate the raw
//!    values of the detail leaves under that total's parent.
//! 2. Details: remaining positions reduce their own raw list.
//! 3. Custom: Custom descriptors are evaluated per position, after every
//!    other descriptor there has its reduced value.
//! 4. Percent: descriptors with a percent mode are divided by the value at
//!    the matching total position.
//!
//! Pass 1 must read unreduced detail lists, so the order is fixed.

use log::{debug, trace, warn};
use rustc_hash::FxHashSet;

use engine::CellValue;

use crate::cell_store::CellStore;
use crate::collab::{CustomContext, ExpressionEvaluator};
use crate::definition::{AggregateFunction, CellDescriptor, PercentMode};
use crate::error::Result;
use crate::header::{HeaderTree, ItemId};

// ============================================================================
// AGGREGATE FUNCTIONS
// ============================================================================

/// Running numeric sum with Int -> Decimal -> Float promotion.
#[derive(Debug, Default)]
struct NumericAccumulator {
    sum: Option<CellValue>,
    count: usize,
}

impl NumericAccumulator {
    fn add(&mut self, value: &CellValue) {
        if !value.is_numeric() {
            trace!("Skipping non-numeric value {:?}", value);
            return;
        }
        self.sum = match self.sum.take() {
            None => Some(value.clone()),
            Some(sum) => sum.add(value),
        };
        self.count += 1;
    }

    fn average(&self) -> Option<CellValue> {
        let count = i64::try_from(self.count).ok()?;
        self.sum.as_ref()?.div(&CellValue::Int(count))
    }
}

/// Picks the smallest (or largest) value by natural order, skipping values
/// that do not compare with the current pick.
fn extreme(values: &[CellValue], keep: std::cmp::Ordering) -> Option<CellValue> {
    let mut best: Option<&CellValue> = None;
    for value in values {
        best = match best {
            None => Some(value),
            Some(current) => match value.compare(current) {
                Some(ordering) if ordering == keep => Some(value),
                Some(_) => Some(current),
                None => {
                    trace!("Skipping incomparable value {:?}", value);
                    Some(current)
                }
            },
        };
    }
    best.cloned()
}

/// Reduces the values of one slot. Empty input gives an absent result.
/// Custom descriptors are not reduced here.
pub fn aggregate(function: AggregateFunction, values: &[CellValue]) -> Option<CellValue> {
    if values.is_empty() {
        return None;
    }
    match function {
        AggregateFunction::None => values.first().cloned(),
        AggregateFunction::Sum | AggregateFunction::Avg => {
            let mut acc = NumericAccumulator::default();
            for value in values {
                acc.add(value);
            }
            if function == AggregateFunction::Sum {
                acc.sum
            } else {
                acc.average()
            }
        }
        AggregateFunction::Min => extreme(values, std::cmp::Ordering::Less),
        AggregateFunction::Max => extreme(values, std::cmp::Ordering::Greater),
        AggregateFunction::Count => i64::try_from(values.len()).ok().map(CellValue::Int),
        AggregateFunction::CountDistinct => {
            let distinct: FxHashSet<_> = values.iter().map(CellValue::distinct_key).collect();
            i64::try_from(distinct.len()).ok().map(CellValue::Int)
        }
        AggregateFunction::Custom => None,
    }
}

// ============================================================================
// PASSES
// ============================================================================

/// A terminal item of one axis with what aggregation needs to know about it.
#[derive(Debug, Clone)]
struct Terminal {
    leaf: usize,
    is_total: bool,
    /// Leaf indices whose raw values feed this terminal.
    contributors: Vec<usize>,
}

fn terminals_of(tree: &HeaderTree) -> Vec<Terminal> {
    tree.terminal_items()
        .into_iter()
        .filter_map(|id: ItemId| {
            let item = tree.item(id);
            Some(Terminal {
                leaf: item.leaf_index?,
                is_total: item.is_total(),
                contributors: tree.contributing_leaves(id),
            })
        })
        .collect()
}

/// Leaf index of the total an axis divides by, or None when the axis has no
/// outer total. Subtotals of inner levels never qualify.
fn total_leaf(tree: &HeaderTree) -> Option<usize> {
    let totals_first = tree.descriptors().first().map(|d| d.totals_first)?;
    let terminals = tree.terminal_items();
    let id = if totals_first {
        terminals.first()
    } else {
        terminals.last()
    }?;
    let item = tree.item(*id);
    if item.is_total() && item.level() == Some(0) {
        item.leaf_index
    } else {
        None
    }
}

/// Drives the passes over both trees and the store.
pub struct AggregationEngine<'a> {
    columns: &'a HeaderTree,
    rows: &'a HeaderTree,
    cells: &'a [CellDescriptor],
}

impl<'a> AggregationEngine<'a> {
    pub fn new(columns: &'a HeaderTree, rows: &'a HeaderTree, cells: &'a [CellDescriptor]) -> Self {
        AggregationEngine {
            columns,
            rows,
            cells,
        }
    }

    /// Runs every pass in order. Evaluator failures in the custom pass abort
    /// the run.
    pub fn run(
        &self,
        store: &mut CellStore,
        evaluator: &mut dyn ExpressionEvaluator,
    ) -> Result<()> {
        let columns = terminals_of(self.columns);
        let rows = terminals_of(self.rows);
        debug!(
            "Aggregating {} column x {} row terminals for {} descriptors",
            columns.len(),
            rows.len(),
            self.cells.len()
        );

        self.totals_pass(store, &columns, &rows);
        self.details_pass(store, &columns, &rows);
        self.custom_pass(store, &columns, &rows, evaluator)?;
        self.percent_pass(store, &columns, &rows);
        Ok(())
    }

    fn plain_descriptors(&self) -> impl Iterator<Item = (usize, &CellDescriptor)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.function.is_custom())
    }

    fn totals_pass(&self, store: &mut CellStore, columns: &[Terminal], rows: &[Terminal]) {
        for row in rows {
            for col in columns {
                if !row.is_total && !col.is_total {
                    continue;
                }
                for (d, descriptor) in self.plain_descriptors() {
                    let mut values = Vec::new();
                    for &r in &row.contributors {
                        for &c in &col.contributors {
                            if let Some(raw) = store.get_values(d, c, r) {
                                values.extend_from_slice(raw);
                            }
                        }
                    }
                    let result = aggregate(descriptor.function, &values);
                    store.set_values(d, col.leaf, row.leaf, result);
                }
            }
        }
    }

    fn details_pass(&self, store: &mut CellStore, columns: &[Terminal], rows: &[Terminal]) {
        for row in rows.iter().filter(|r| !r.is_total) {
            for col in columns.iter().filter(|c| !c.is_total) {
                for (d, descriptor) in self.plain_descriptors() {
                    let result = store
                        .get_values(d, col.leaf, row.leaf)
                        .and_then(|values| aggregate(descriptor.function, values));
                    store.set_values(d, col.leaf, row.leaf, result);
                }
            }
        }
    }

    fn custom_pass(
        &self,
        store: &mut CellStore,
        columns: &[Terminal],
        rows: &[Terminal],
        evaluator: &mut dyn ExpressionEvaluator,
    ) -> Result<()> {
        let custom: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, d)| d.function.is_custom())
            .map(|(i, _)| i)
            .collect();
        if custom.is_empty() {
            return Ok(());
        }

        for row in rows {
            for col in columns {
                for &d in &custom {
                    let result = {
                        let context = CustomContext::new(store, col.leaf, row.leaf, d);
                        evaluator.evaluate_custom(&self.cells[d].expression, &context)?
                    };
                    store.set_values(d, col.leaf, row.leaf, result);
                }
            }
        }
        Ok(())
    }

    fn percent_pass(&self, store: &mut CellStore, columns: &[Terminal], rows: &[Terminal]) {
        let column_total = total_leaf(self.columns);
        let row_total = total_leaf(self.rows);

        // Every denominator is read before the first quotient is written
        let mut results = Vec::new();
        for (d, descriptor) in self.cells.iter().enumerate() {
            let (use_column_total, use_row_total) = match descriptor.percent {
                PercentMode::None => continue,
                PercentMode::ColumnTotal => (true, false),
                PercentMode::RowTotal => (false, true),
                PercentMode::GrandTotal => (true, true),
            };
            if (use_column_total && column_total.is_none())
                || (use_row_total && row_total.is_none())
            {
                warn!(
                    "Percent of '{}' has no total to divide by; values are left empty",
                    descriptor.expression
                );
            }

            for row in rows {
                for col in columns {
                    let denominator_col = if use_column_total {
                        column_total
                    } else {
                        Some(col.leaf)
                    };
                    let denominator_row = if use_row_total { row_total } else { Some(row.leaf) };
                    let quotient = match (denominator_col, denominator_row) {
                        (Some(dc), Some(dr)) => {
                            let numerator = store.get_value(d, col.leaf, row.leaf);
                            let denominator = store.get_value(d, dc, dr);
                            match (numerator, denominator) {
                                (Some(n), Some(t)) => n.div(t),
                                _ => None,
                            }
                        }
                        _ => None,
                    };
                    results.push((d, col.leaf, row.leaf, quotient));
                }
            }
        }

        for (d, col, row, value) in results {
            store.set_values(d, col, row, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::HeaderDescriptor;
    use crate::error::EvalError;
    use rust_decimal::Decimal;

    #[test]
    fn test_sum_promotes_and_skips_text() {
        let values = vec![CellValue::Int(1), CellValue::text("x"), CellValue::Int(2)];
        assert_eq!(aggregate(AggregateFunction::Sum, &values), Some(CellValue::Int(3)));

        let values = vec![CellValue::Int(1), CellValue::Decimal(Decimal::new(25, 1))];
        assert_eq!(
            aggregate(AggregateFunction::Sum, &values),
            Some(CellValue::Decimal(Decimal::new(35, 1)))
        );

        let values = vec![CellValue::Int(i64::MAX), CellValue::Int(1)];
        assert!(matches!(
            aggregate(AggregateFunction::Sum, &values),
            Some(CellValue::Decimal(_))
        ));

        let values = vec![CellValue::Int(1), CellValue::Float(0.5)];
        assert_eq!(aggregate(AggregateFunction::Sum, &values), Some(CellValue::Float(1.5)));
    }

    #[test]
    fn test_sum_of_text_only_is_absent() {
        let values = vec![CellValue::text("a")];
        assert_eq!(aggregate(AggregateFunction::Sum, &values), None);
        assert_eq!(aggregate(AggregateFunction::Avg, &values), None);
    }

    #[test]
    fn test_avg_divides_by_summed_count() {
        let values = vec![CellValue::Int(1), CellValue::Int(2), CellValue::text("x")];
        assert_eq!(
            aggregate(AggregateFunction::Avg, &values),
            Some(CellValue::Decimal(Decimal::new(15, 1)))
        );
    }

    #[test]
    fn test_min_max() {
        let values = vec![CellValue::Int(4), CellValue::Float(2.5), CellValue::Int(9)];
        assert_eq!(aggregate(AggregateFunction::Min, &values), Some(CellValue::Float(2.5)));
        assert_eq!(aggregate(AggregateFunction::Max, &values), Some(CellValue::Int(9)));

        // Text does not compare with the numeric seed and is skipped
        let values = vec![CellValue::Int(4), CellValue::text("z"), CellValue::Int(1)];
        assert_eq!(aggregate(AggregateFunction::Min, &values), Some(CellValue::Int(1)));
        assert_eq!(aggregate(AggregateFunction::Max, &values), Some(CellValue::Int(4)));
    }

    #[test]
    fn test_counts() {
        let values = vec![
            CellValue::Int(5),
            CellValue::Int(5),
            CellValue::Int(7),
            CellValue::Int(7),
        ];
        assert_eq!(aggregate(AggregateFunction::Count, &values), Some(CellValue::Int(4)));
        assert_eq!(aggregate(AggregateFunction::CountDistinct, &values), Some(CellValue::Int(2)));

        let mixed = vec![CellValue::Int(5), CellValue::Float(5.0), CellValue::text("5")];
        assert_eq!(aggregate(AggregateFunction::CountDistinct, &mixed), Some(CellValue::Int(2)));

        // Adjacent integers above 2^53 share an f64 but stay distinct
        let large = vec![
            CellValue::Int(9_007_199_254_740_992),
            CellValue::Int(9_007_199_254_740_993),
        ];
        assert_eq!(aggregate(AggregateFunction::CountDistinct, &large), Some(CellValue::Int(2)));
    }

    #[test]
    fn test_none_and_empty() {
        let values = vec![CellValue::text("first"), CellValue::text("second")];
        assert_eq!(aggregate(AggregateFunction::None, &values), Some(CellValue::text("first")));
        assert_eq!(aggregate(AggregateFunction::Sum, &[]), None);
        assert_eq!(aggregate(AggregateFunction::Count, &[]), None);
    }

    struct Blank;

    impl ExpressionEvaluator for Blank {
        fn evaluate(
            &mut self,
            _expression: &str,
            _row_no: usize,
        ) -> std::result::Result<Option<CellValue>, EvalError> {
            Ok(None)
        }
    }

    /// Files `data` (column path joined by '/', name, amount) and adds totals.
    fn fill(
        column_levels: Vec<HeaderDescriptor>,
        data: &[(&str, &str, i64)],
        cells: &[CellDescriptor],
    ) -> (HeaderTree, HeaderTree, CellStore) {
        let mut columns = HeaderTree::new(column_levels);
        let mut rows = HeaderTree::new(vec![HeaderDescriptor::new("[Name]")]);
        let mut store = CellStore::new(cells.len());

        for (no, (path, name, amount)) in data.iter().enumerate() {
            let path: Vec<_> = path.split('/').map(|v| Some(CellValue::text(v))).collect();
            let c = columns.find(&path, true, no).unwrap();
            let r = rows.find(&[Some(CellValue::text(*name))], true, no).unwrap();
            let (c, r) = (columns.item(c).leaf_index.unwrap(), rows.item(r).leaf_index.unwrap());
            for (d, descriptor) in cells.iter().enumerate() {
                if !descriptor.function.is_custom() {
                    store.add_value(d, c, r, Some(CellValue::Int(*amount)));
                }
            }
        }
        columns.add_total_items(false);
        rows.add_total_items(false);
        (columns, rows, store)
    }

    /// One row level, one column level, two cells per axis plus totals.
    fn build(cells: &[CellDescriptor]) -> (HeaderTree, HeaderTree, CellStore) {
        let data = [
            ("1996", "Ann", 10),
            ("1997", "Ann", 30),
            ("1996", "Bob", 20),
            ("1996", "Bob", 40),
        ];
        fill(vec![HeaderDescriptor::new("[Year]")], &data, cells)
    }

    fn leaf(tree: &HeaderTree, value: Option<&str>, total: bool) -> usize {
        tree.terminal_items()
            .into_iter()
            .map(|id| tree.item(id))
            .find(|item| item.is_total() == total && item.value == value.map(CellValue::text))
            .and_then(|item| item.leaf_index)
            .unwrap()
    }

    #[test]
    fn test_engine_totals_and_details() {
        let cells = vec![CellDescriptor::new("[Amount]", AggregateFunction::Sum)];
        let (columns, rows, mut store) = build(&cells);
        AggregationEngine::new(&columns, &rows, &cells)
            .run(&mut store, &mut Blank)
            .unwrap();

        let y1996 = leaf(&columns, Some("1996"), false);
        let col_total = leaf(&columns, None, true);
        let bob = leaf(&rows, Some("Bob"), false);
        let row_total = leaf(&rows, None, true);

        assert_eq!(store.get_values(0, y1996, bob), Some(&[CellValue::Int(60)][..]));
        assert_eq!(store.get_value(0, col_total, bob), Some(&CellValue::Int(60)));
        assert_eq!(store.get_value(0, y1996, row_total), Some(&CellValue::Int(70)));
        assert_eq!(store.get_value(0, col_total, row_total), Some(&CellValue::Int(100)));
    }

    #[test]
    fn test_engine_custom_reads_reduced_siblings() {
        let cells = vec![
            CellDescriptor::new("Double", AggregateFunction::Custom),
            CellDescriptor::new("[Amount]", AggregateFunction::Sum),
        ];
        struct Double;
        impl ExpressionEvaluator for Double {
            fn evaluate(
                &mut self,
                _e: &str,
                _r: usize,
            ) -> std::result::Result<Option<CellValue>, EvalError> {
                Ok(None)
            }
            fn evaluate_custom(
                &mut self,
                _e: &str,
                context: &CustomContext<'_>,
            ) -> std::result::Result<Option<CellValue>, EvalError> {
                Ok(Some(CellValue::Float(context.value(1) * 2.0)))
            }
        }

        let (columns, rows, mut store) = build(&cells);
        AggregationEngine::new(&columns, &rows, &cells)
            .run(&mut store, &mut Double)
            .unwrap();

        let col_total = leaf(&columns, None, true);
        let row_total = leaf(&rows, None, true);
        assert_eq!(store.get_value(0, col_total, row_total), Some(&CellValue::Float(200.0)));
    }

    #[test]
    fn test_engine_custom_error_propagates() {
        struct Failing;
        impl ExpressionEvaluator for Failing {
            fn evaluate(
                &mut self,
                _e: &str,
                _r: usize,
            ) -> std::result::Result<Option<CellValue>, EvalError> {
                Ok(None)
            }
        }
        let cells = vec![CellDescriptor::new("Broken", AggregateFunction::Custom)];
        let (columns, rows, mut store) = build(&cells);
        let result = AggregationEngine::new(&columns, &rows, &cells).run(&mut store, &mut Failing);
        assert!(result.is_err());
    }

    #[test]
    fn test_engine_percent_of_column_total() {
        let cells = vec![CellDescriptor::new("[Amount]", AggregateFunction::Sum)
            .with_percent(PercentMode::ColumnTotal)];
        let (columns, rows, mut store) = build(&cells);
        AggregationEngine::new(&columns, &rows, &cells)
            .run(&mut store, &mut Blank)
            .unwrap();

        let y1997 = leaf(&columns, Some("1997"), false);
        let col_total = leaf(&columns, None, true);
        let ann = leaf(&rows, Some("Ann"), false);
        let bob = leaf(&rows, Some("Bob"), false);

        // Ann: 30 of 40 in 1997
        assert_eq!(store.get_value(0, y1997, ann).and_then(CellValue::as_f64), Some(0.75));
        assert_eq!(store.get_value(0, col_total, ann).and_then(CellValue::as_f64), Some(1.0));
        // Bob has nothing in 1997
        assert!(store.get_value(0, y1997, bob).is_none());
    }

    #[test]
    fn test_engine_percent_without_total_is_absent() {
        let cells = vec![CellDescriptor::new("[Amount]", AggregateFunction::Sum)
            .with_percent(PercentMode::RowTotal)];
        let mut columns = HeaderTree::new(vec![HeaderDescriptor::new("[Year]")]);
        let mut rows = HeaderTree::new(vec![HeaderDescriptor::new("[Name]").with_totals(false)]);
        let mut store = CellStore::new(1);
        let c = columns.find(&[Some(CellValue::text("1996"))], true, 0).unwrap();
        let r = rows.find(&[Some(CellValue::text("Ann"))], true, 0).unwrap();
        let (c, r) = (columns.item(c).leaf_index.unwrap(), rows.item(r).leaf_index.unwrap());
        store.add_value(0, c, r, Some(CellValue::Int(10)));
        columns.add_total_items(false);
        rows.add_total_items(false);

        AggregationEngine::new(&columns, &rows, &cells)
            .run(&mut store, &mut Blank)
            .unwrap();
        assert!(store.get_value(0, c, r).is_none());
    }

    #[test]
    fn test_engine_percent_of_row_total() {
        let cells = vec![CellDescriptor::new("[Amount]", AggregateFunction::Sum)
            .with_percent(PercentMode::RowTotal)];
        let (columns, rows, mut store) = build(&cells);
        AggregationEngine::new(&columns, &rows, &cells)
            .run(&mut store, &mut Blank)
            .unwrap();

        let y1996 = leaf(&columns, Some("1996"), false);
        let y1997 = leaf(&columns, Some("1997"), false);
        let ann = leaf(&rows, Some("Ann"), false);
        let bob = leaf(&rows, Some("Bob"), false);
        let row_total = leaf(&rows, None, true);

        // 1996 sums to 70 over both names, 1997 to 30
        let ann_1996 = store.get_value(0, y1996, ann).and_then(CellValue::as_f64).unwrap();
        assert!((ann_1996 - 1.0 / 7.0).abs() < 1e-12);
        let bob_1996 = store.get_value(0, y1996, bob).and_then(CellValue::as_f64).unwrap();
        assert!((bob_1996 - 6.0 / 7.0).abs() < 1e-12);
        assert_eq!(store.get_value(0, y1997, ann), Some(&CellValue::Decimal(Decimal::ONE)));
        assert_eq!(store.get_value(0, y1996, row_total), Some(&CellValue::Decimal(Decimal::ONE)));
    }

    #[test]
    fn test_engine_percent_of_grand_total() {
        let cells = vec![CellDescriptor::new("[Amount]", AggregateFunction::Sum)
            .with_percent(PercentMode::GrandTotal)];
        let (columns, rows, mut store) = build(&cells);
        AggregationEngine::new(&columns, &rows, &cells)
            .run(&mut store, &mut Blank)
            .unwrap();

        let y1996 = leaf(&columns, Some("1996"), false);
        let y1997 = leaf(&columns, Some("1997"), false);
        let col_total = leaf(&columns, None, true);
        let ann = leaf(&rows, Some("Ann"), false);
        let bob = leaf(&rows, Some("Bob"), false);
        let row_total = leaf(&rows, None, true);

        // Every position divides by the grand total of 100
        assert_eq!(store.get_value(0, y1996, ann), Some(&CellValue::Decimal(Decimal::new(1, 1))));
        assert_eq!(store.get_value(0, y1997, ann), Some(&CellValue::Decimal(Decimal::new(3, 1))));
        assert_eq!(store.get_value(0, y1996, bob), Some(&CellValue::Decimal(Decimal::new(6, 1))));
        assert_eq!(
            store.get_value(0, col_total, ann),
            Some(&CellValue::Decimal(Decimal::new(4, 1)))
        );
        assert_eq!(
            store.get_value(0, col_total, row_total),
            Some(&CellValue::Decimal(Decimal::ONE))
        );
    }

    #[test]
    fn test_engine_percent_with_totals_first() {
        let cells = vec![CellDescriptor::new("[Amount]", AggregateFunction::Sum)
            .with_percent(PercentMode::ColumnTotal)];
        let data = [("1996", "Ann", 10), ("1997", "Ann", 30)];
        let (columns, rows, mut store) =
            fill(vec![HeaderDescriptor::new("[Year]").totals_first(true)], &data, &cells);
        AggregationEngine::new(&columns, &rows, &cells)
            .run(&mut store, &mut Blank)
            .unwrap();

        let first = columns.item(columns.terminal_items()[0]);
        assert!(first.is_total());

        let y1996 = leaf(&columns, Some("1996"), false);
        let y1997 = leaf(&columns, Some("1997"), false);
        let ann = leaf(&rows, Some("Ann"), false);
        assert_eq!(store.get_value(0, y1996, ann), Some(&CellValue::Decimal(Decimal::new(25, 2))));
        assert_eq!(store.get_value(0, y1997, ann), Some(&CellValue::Decimal(Decimal::new(75, 2))));
    }

    #[test]
    fn test_engine_percent_ignores_inner_subtotals() {
        let cells = vec![CellDescriptor::new("[Amount]", AggregateFunction::Sum)
            .with_percent(PercentMode::ColumnTotal)];
        let levels = vec![
            HeaderDescriptor::new("[Year]").with_totals(false),
            HeaderDescriptor::new("[Month]"),
        ];
        let data = [("1996/Jan", "Ann", 10), ("1997/Jan", "Ann", 30)];
        let (columns, rows, mut store) = fill(levels, &data, &cells);

        // The last terminal is the 1997 month subtotal, not a grand total
        let last = columns.item(*columns.terminal_items().last().unwrap());
        assert!(last.is_total());
        assert_eq!(last.level(), Some(1));

        AggregationEngine::new(&columns, &rows, &cells)
            .run(&mut store, &mut Blank)
            .unwrap();

        let jan_1996 = columns
            .lookup(&[Some(CellValue::text("1996")), Some(CellValue::text("Jan"))])
            .and_then(|id| columns.item(id).leaf_index)
            .unwrap();
        let ann = leaf(&rows, Some("Ann"), false);
        assert!(store.get_value(0, jan_1996, ann).is_none());
    }
}

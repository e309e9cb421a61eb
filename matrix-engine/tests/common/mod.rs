//! FILENAME: tests/common/mod.rs
//! Fixtures and helpers for matrix-engine integration tests.

#![allow(dead_code)]

use engine::CellValue;
use matrix_engine::{
    AggregateFunction, CellDescriptor, HeaderDescriptor, Matrix, MatrixDefinition, MatrixLayout,
    Table, TableEvaluator, TableSource,
};

/// Sales data used across the integration tests.
pub struct SalesFixture;

impl SalesFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Sales", "Quantity"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, i64, i64)> {
        vec![
            ("North", "Widget", "Q1", 10000, 100),
            ("North", "Widget", "Q2", 12000, 120),
            ("North", "Gadget", "Q1", 8000, 80),
            ("North", "Gadget", "Q2", 9000, 90),
            ("South", "Widget", "Q1", 15000, 150),
            ("South", "Widget", "Q2", 14000, 140),
            ("South", "Gadget", "Q1", 11000, 110),
            ("South", "Gadget", "Q2", 13000, 130),
            ("East", "Widget", "Q1", 9000, 90),
            ("East", "Widget", "Q2", 11000, 110),
            ("East", "Gadget", "Q1", 7000, 70),
            ("East", "Gadget", "Q2", 8500, 85),
        ]
    }

    pub fn table() -> Table {
        let mut table = Table::new(Self::headers());
        for (region, product, quarter, sales, quantity) in Self::data() {
            table.push_row(vec![
                Some(CellValue::text(region)),
                Some(CellValue::text(product)),
                Some(CellValue::text(quarter)),
                Some(CellValue::Int(sales)),
                Some(CellValue::Int(quantity)),
            ]);
        }
        table
    }

    /// Quarters across, regions down, summed sales.
    pub fn definition() -> MatrixDefinition {
        MatrixDefinition {
            name: Some("Sales".to_string()),
            columns: vec![HeaderDescriptor::new("[Quarter]")],
            rows: vec![HeaderDescriptor::new("[Region]")],
            cells: vec![CellDescriptor::new("[Sales]", AggregateFunction::Sum)],
            ..MatrixDefinition::new()
        }
    }
}

/// Definition for the employee/year examples: years across, employees down.
pub fn employee_definition(function: AggregateFunction) -> MatrixDefinition {
    MatrixDefinition {
        columns: vec![HeaderDescriptor::new("[Year]")],
        rows: vec![HeaderDescriptor::new("[Employee]")],
        cells: vec![CellDescriptor::new("[Amount]", function)],
        ..MatrixDefinition::new()
    }
}

pub fn text(s: &str) -> Option<CellValue> {
    Some(CellValue::text(s))
}

/// Runs a full cycle of `definition` over `table`.
pub fn run_over(definition: MatrixDefinition, table: &Table) -> (Matrix, MatrixLayout) {
    let mut matrix = Matrix::new(definition);
    let mut source = TableSource::new(table);
    let mut evaluator = TableEvaluator::new(table);
    let layout = matrix
        .run(&mut source, &mut evaluator)
        .expect("matrix run failed");
    (matrix, layout)
}

/// Reduced value of descriptor `d` at the detail position given by the two
/// header paths.
pub fn value_at(
    matrix: &Matrix,
    column_path: &[Option<CellValue>],
    row_path: &[Option<CellValue>],
    d: usize,
) -> Option<CellValue> {
    let col = matrix.columns().lookup(column_path)?;
    let row = matrix.rows().lookup(row_path)?;
    let col_leaf = matrix.columns().item(col).leaf_index?;
    let row_leaf = matrix.rows().item(row).leaf_index?;
    matrix.store().get_value(d, col_leaf, row_leaf).cloned()
}

/// Leaf index of the outermost total of an axis tree.
pub fn grand_total_leaf(tree: &matrix_engine::HeaderTree) -> Option<usize> {
    tree.terminal_items()
        .into_iter()
        .map(|id| tree.item(id))
        .find(|item| item.is_total() && item.level() == Some(0))
        .and_then(|item| item.leaf_index)
}

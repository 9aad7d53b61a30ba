//! Rectangular table built from records with sparse, differing key sets.

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

/// One attribute record: name → scalar value, in server key order
pub type Record = Map<String, Value>;

/// Table cell. `None` marks an attribute the record did not carry.
pub type Cell = Option<Value>;

/// Rectangular table with a canonical column set.
///
/// Columns are the union of all record keys in first-seen order;
/// every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Flatten records into a table, filling absent keys with `None`.
    ///
    /// Values pass through as received; no type coercion.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut sparse: Vec<Vec<(usize, &'a Value)>> = Vec::new();

        for record in records {
            let mut cells = Vec::with_capacity(record.len());
            for (key, value) in record {
                let col = match index.get(key.as_str()) {
                    Some(&col) => col,
                    None => {
                        let col = columns.len();
                        columns.push(key.clone());
                        index.insert(key.clone(), col);
                        col
                    }
                };
                cells.push((col, value));
            }
            sparse.push(cells);
        }

        // Second pass: row width is only known once every key has been seen
        let width = columns.len();
        let rows = sparse
            .into_iter()
            .map(|cells| {
                let mut row: Vec<Cell> = vec![None; width];
                for (col, value) in cells {
                    row[col] = Some(value.clone());
                }
                row
            })
            .collect();

        let table = Self { columns, rows };
        log::info!(
            "Normalized {} rows x {} columns",
            table.num_rows(),
            table.num_columns()
        );
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render a cell as CSV field text.
///
/// Absent and null are both empty; strings are verbatim; other scalars use
/// their JSON text.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| match v {
                Value::Object(m) => m,
                other => panic!("not an object: {other}"),
            })
            .collect()
    }

    #[test]
    fn sparse_schema_union_first_seen_order() {
        let recs = records(vec![json!({"a": 1}), json!({"b": 2}), json!({"a": 3, "b": 4})]);
        let table = Table::from_records(&recs);

        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(
            table.rows(),
            &[
                vec![Some(json!(1)), None],
                vec![None, Some(json!(2))],
                vec![Some(json!(3)), Some(json!(4))],
            ]
        );
    }

    #[test]
    fn column_order_follows_record_order_not_alphabet() {
        let recs = records(vec![json!({"zeta": 1, "alpha": 2}), json!({"mid": 3})]);
        let table = Table::from_records(&recs);
        assert_eq!(table.columns(), &["zeta", "alpha", "mid"]);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = Table::from_records(&Vec::<Record>::new());
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn empty_record_yields_row_of_absent_cells() {
        let recs = records(vec![json!({"a": 1}), json!({})]);
        let table = Table::from_records(&recs);
        assert_eq!(table.rows()[1], vec![None]);
    }

    #[test]
    fn values_are_not_coerced() {
        let recs = records(vec![json!({"s": "007", "n": 7, "z": null})]);
        let table = Table::from_records(&recs);
        assert_eq!(table.columns(), &["s", "n", "z"]);
        // Explicit null stays distinct from an absent key
        assert_eq!(
            table.rows()[0],
            vec![Some(json!("007")), Some(json!(7)), Some(Value::Null)]
        );
    }

    #[test]
    fn every_row_has_full_width() {
        let recs = records(vec![json!({"a": 1}), json!({"b": 2, "c": 3}), json!({"d": 4})]);
        let table = Table::from_records(&recs);
        assert!(table.rows().iter().all(|r| r.len() == table.num_columns()));
    }

    #[test]
    fn cell_text_rendering() {
        assert_eq!(cell_text(&None), "");
        assert_eq!(cell_text(&Some(Value::Null)), "");
        assert_eq!(cell_text(&Some(json!("x, y"))), "x, y");
        assert_eq!(cell_text(&Some(json!(1.5))), "1.5");
        assert_eq!(cell_text(&Some(json!(42))), "42");
        assert_eq!(cell_text(&Some(json!(true))), "true");
    }
}

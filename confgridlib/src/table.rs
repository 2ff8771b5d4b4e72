//! The in-memory table model.
//!
//! A [`Table`] is an ordered list of unique column names plus rows of text
//! cells. Rows are stored positionally, one cell per column, so the shape
//! invariant (every row has exactly the table's current columns) holds by
//! construction and cannot drift the way loosely-typed row maps can.
//!
//! All mutations validate their input and return `Result`; a failed mutation
//! leaves the table untouched.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ConfgridError;
use crate::parse::PastedBlock;
use crate::Result;

/// An ordered grid of text cells under named columns.
///
/// Cell values are always text; numbers and dates live as their literal
/// string form. Column names are unique and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table (no columns, no rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a column list and positional rows.
    ///
    /// Fails if a column name is blank or duplicated, or if any row's cell
    /// count differs from the column count.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Table::new();
        for column in &columns {
            let column = column.trim();
            if column.is_empty() {
                return Err(ConfgridError::validation("column name cannot be empty"));
            }
            if table.column_index(column).is_some() {
                return Err(ConfgridError::validation(format!(
                    "column '{column}' already exists"
                )));
            }
            table.columns.push(column.to_string());
        }
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// True when the table has no columns (and therefore no cells).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Positional rows, one cell per column.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value at a row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Append a new column, blank in every existing row.
    ///
    /// On an empty table this creates one column with a single blank row so
    /// the new column is immediately visible and editable.
    pub fn push_column(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfgridError::validation("column name cannot be empty"));
        }
        if self.column_index(name).is_some() {
            return Err(ConfgridError::validation(format!(
                "column '{name}' already exists"
            )));
        }
        let was_empty = self.is_empty();
        self.columns.push(name.to_string());
        if was_empty {
            self.rows.push(vec![String::new()]);
        } else {
            for row in &mut self.rows {
                row.push(String::new());
            }
        }
        Ok(())
    }

    /// Append a positional row. The cell count must match the column count.
    pub fn push_row(&mut self, cells: Vec<String>) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ConfgridError::validation(
                "add at least one column before adding rows",
            ));
        }
        if cells.len() != self.columns.len() {
            return Err(ConfgridError::SchemaMismatch {
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Append a row given as column-name/value pairs.
    ///
    /// Every current column must carry a non-empty value, and no key may
    /// name a column the table does not have.
    pub fn push_row_by_name(&mut self, values: &HashMap<String, String>) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ConfgridError::validation(
                "add at least one column before adding rows",
            ));
        }
        for key in values.keys() {
            if self.column_index(key).is_none() {
                return Err(ConfgridError::validation(format!(
                    "no such column: '{key}'"
                )));
            }
        }
        let mut cells = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            match values.get(column).map(|v| v.trim()) {
                Some(value) if !value.is_empty() => cells.push(value.to_string()),
                _ => {
                    return Err(ConfgridError::validation(format!(
                        "all fields must be filled to add a row (missing '{column}')"
                    )))
                }
            }
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Rename a column, keeping its cells.
    ///
    /// The new name must be non-blank, the old name must exist, and the new
    /// name must not collide with another column.
    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(ConfgridError::validation("column name cannot be empty"));
        }
        let index = self.column_index(old).ok_or_else(|| {
            ConfgridError::validation(format!("no such column: '{old}'"))
        })?;
        if new != old && self.column_index(new).is_some() {
            return Err(ConfgridError::validation(format!(
                "column '{new}' already exists"
            )));
        }
        self.columns[index] = new.to_string();
        Ok(())
    }

    /// Remove a column and its cell from every row.
    ///
    /// Returns `true` if the column existed. An absent name is a no-op, not
    /// an error. Removing the last column empties the table.
    pub fn remove_column(&mut self, name: &str) -> Result<bool> {
        if self.columns.is_empty() {
            return Err(ConfgridError::validation("the table has no columns"));
        }
        let Some(index) = self.column_index(name) else {
            return Ok(false);
        };
        self.columns.remove(index);
        if self.columns.is_empty() {
            self.rows.clear();
        } else {
            for row in &mut self.rows {
                row.remove(index);
            }
        }
        Ok(true)
    }

    /// Remove rows in the inclusive index range `[start, end]`.
    ///
    /// Remaining rows stay contiguous. Fails when `start > end` or either
    /// index is outside the current row count.
    pub fn remove_rows(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(ConfgridError::validation(format!(
                "start index {start} must not exceed end index {end}"
            )));
        }
        if end >= self.rows.len() {
            return Err(ConfgridError::validation(format!(
                "row index {end} is out of range (the table has {} rows)",
                self.rows.len()
            )));
        }
        self.rows.drain(start..=end);
        Ok(())
    }

    /// Overwrite a single cell. The empty string is allowed.
    pub fn set_cell(&mut self, row: usize, column: &str, value: &str) -> Result<()> {
        let col = self.column_index(column).ok_or_else(|| {
            ConfgridError::validation(format!("no such column: '{column}'"))
        })?;
        if row >= self.rows.len() {
            return Err(ConfgridError::validation(format!(
                "row index {row} is out of range (the table has {} rows)",
                self.rows.len()
            )));
        }
        self.rows[row][col] = value.to_string();
        Ok(())
    }

    /// Append the data rows of a pasted block positionally.
    ///
    /// Every block row must have exactly as many fields as the table has
    /// columns; the first offending row aborts the whole append and the
    /// table is left unchanged.
    pub fn append_block(&mut self, block: &PastedBlock) -> Result<()> {
        let expected = self.columns.len();
        for row in &block.rows {
            if row.len() != expected {
                return Err(ConfgridError::SchemaMismatch {
                    expected,
                    actual: row.len(),
                });
            }
        }
        self.rows.extend(block.rows.iter().cloned());
        Ok(())
    }

    /// Serialize to the stored JSON shape: an explicit column-order array
    /// plus a row-major list of records.
    pub fn to_json(&self) -> Value {
        let records: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                for (column, cell) in self.columns.iter().zip(row) {
                    record.insert(column.clone(), Value::String(cell.clone()));
                }
                Value::Object(record)
            })
            .collect();
        let mut top = Map::new();
        top.insert(
            "columns".to_string(),
            Value::Array(self.columns.iter().cloned().map(Value::String).collect()),
        );
        top.insert("rows".to_string(), Value::Array(records));
        Value::Object(top)
    }

    /// Deserialize from the stored JSON shape.
    ///
    /// Accepts both the current `{columns, rows}` object and the legacy
    /// bare array-of-records form, recovering column order from the first
    /// record in the latter case. Scalar cells that are not strings are
    /// stringified; null or absent cells become the empty string.
    pub fn from_json(value: &Value) -> std::result::Result<Self, String> {
        let (columns, records) = match value {
            Value::Object(top) => {
                let columns = match top.get("columns") {
                    Some(Value::Array(names)) => names
                        .iter()
                        .map(|n| match n {
                            Value::String(s) => Ok(s.clone()),
                            other => Err(format!("column name is not a string: {other}")),
                        })
                        .collect::<std::result::Result<Vec<_>, _>>()?,
                    Some(other) => return Err(format!("'columns' is not an array: {other}")),
                    None => return Err("missing 'columns' key".to_string()),
                };
                let records = match top.get("rows") {
                    Some(Value::Array(rows)) => rows.as_slice(),
                    Some(other) => return Err(format!("'rows' is not an array: {other}")),
                    None => return Err("missing 'rows' key".to_string()),
                };
                (columns, records)
            }
            Value::Array(records) => {
                // Legacy form: column order comes from the first record.
                let columns = match records.first() {
                    Some(Value::Object(record)) => record.keys().cloned().collect(),
                    Some(other) => return Err(format!("row is not an object: {other}")),
                    None => Vec::new(),
                };
                (columns, records.as_slice())
            }
            other => return Err(format!("table file is neither object nor array: {other}")),
        };

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let Value::Object(record) = record else {
                return Err(format!("row is not an object: {record}"));
            };
            let row = columns
                .iter()
                .map(|column| match record.get(column) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                })
                .collect();
            rows.push(row);
        }

        Table::from_parts(columns, rows).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_parts(
            vec!["Name".to_string(), "Age".to_string()],
            vec![
                vec!["Alice".to_string(), "30".to_string()],
                vec!["Bob".to_string(), "25".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_column_on_empty_table_seeds_blank_row() {
        let mut table = Table::new();
        table.push_column("Host").unwrap();
        assert_eq!(table.columns(), ["Host"]);
        assert_eq!(table.rows(), [vec![String::new()]]);
    }

    #[test]
    fn test_push_column_blanks_existing_rows() {
        let mut table = sample();
        table.push_column("City").unwrap();
        assert_eq!(table.column_count(), 3);
        for row in table.rows() {
            assert_eq!(row.len(), 3);
            assert_eq!(row[2], "");
        }
    }

    #[test]
    fn test_push_column_rejects_blank_and_duplicate() {
        let mut table = sample();
        assert!(matches!(
            table.push_column("   "),
            Err(ConfgridError::Validation(_))
        ));
        assert!(matches!(
            table.push_column("Name"),
            Err(ConfgridError::Validation(_))
        ));
        assert_eq!(table, sample());
    }

    #[test]
    fn test_push_row_by_name_requires_all_fields() {
        let mut table = sample();
        let mut values = HashMap::new();
        values.insert("Name".to_string(), "Carol".to_string());
        let err = table.push_row_by_name(&values).unwrap_err();
        assert!(err.to_string().contains("Age"));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_push_row_by_name_rejects_unknown_column() {
        let mut table = sample();
        let mut values = HashMap::new();
        values.insert("Name".to_string(), "Carol".to_string());
        values.insert("Age".to_string(), "41".to_string());
        values.insert("Shoe".to_string(), "9".to_string());
        assert!(table.push_row_by_name(&values).is_err());
    }

    #[test]
    fn test_rename_column_rejects_collision() {
        let mut table = sample();
        let err = table.rename_column("Name", "Age").unwrap_err();
        assert!(err.to_string().contains("already exists"));
        // renaming onto itself is fine
        table.rename_column("Name", "Name").unwrap();
    }

    #[test]
    fn test_remove_column_absent_is_noop() {
        let mut table = sample();
        assert!(!table.remove_column("Missing").unwrap());
        assert_eq!(table, sample());
    }

    #[test]
    fn test_remove_last_column_empties_table() {
        let mut table = sample();
        table.remove_column("Name").unwrap();
        table.remove_column("Age").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_delete_then_add_column_loses_cell_values() {
        let mut table = sample();
        table.remove_column("Age").unwrap();
        table.push_column("Age").unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(0, "Age"), Some(""));
    }

    #[test]
    fn test_remove_rows_inverted_range_fails() {
        let mut table = sample();
        assert!(table.remove_rows(1, 0).is_err());
        assert_eq!(table, sample());
    }

    #[test]
    fn test_remove_rows_out_of_range_fails() {
        let mut table = sample();
        assert!(table.remove_rows(0, 2).is_err());
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_remove_rows_reindexes_contiguously() {
        let mut table = sample();
        table.remove_rows(0, 0).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, "Name"), Some("Bob"));
    }

    #[test]
    fn test_set_cell_bounds() {
        let mut table = sample();
        table.set_cell(1, "Age", "26").unwrap();
        assert_eq!(table.cell(1, "Age"), Some("26"));
        assert!(table.set_cell(2, "Age", "99").is_err());
        assert!(table.set_cell(0, "Nope", "x").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let table = sample();
        let restored = Table::from_json(&table.to_json()).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_from_json_legacy_records_form() {
        let value = json!([
            {"Name": "Alice", "Age": "30"},
            {"Name": "Bob", "Age": "25"}
        ]);
        let table = Table::from_json(&value).unwrap();
        assert_eq!(table.columns(), ["Name", "Age"]);
        assert_eq!(table.cell(1, "Age"), Some("25"));
    }

    #[test]
    fn test_from_json_stringifies_scalars_and_blanks_nulls() {
        let value = json!({
            "columns": ["Name", "Age"],
            "rows": [{"Name": "Alice", "Age": 30}, {"Name": null}]
        });
        let table = Table::from_json(&value).unwrap();
        assert_eq!(table.cell(0, "Age"), Some("30"));
        assert_eq!(table.cell(1, "Name"), Some(""));
        assert_eq!(table.cell(1, "Age"), Some(""));
    }
}

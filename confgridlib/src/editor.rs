//! The table editing engine.
//!
//! A [`TableEditor`] binds a [`TableStore`] to one [`TableId`] and exposes
//! the user-facing operations: column and row mutations plus paste-import.
//! Every operation is one synchronous load-validate-mutate-save cycle; on
//! any error the persisted file is untouched.
//!
//! There is no cross-process locking. The tool assumes a single active
//! operator per table; two simultaneous editors race last-write-wins on the
//! underlying file.

use std::collections::HashMap;

use crate::error::ConfgridError;
use crate::parse::{parse_pasted, PastedBlock};
use crate::store::{TableId, TableStore};
use crate::table::Table;
use crate::Result;

/// The result of a successful edit: the table as persisted plus a
/// user-facing message describing what happened.
///
/// Messages are returned to the caller instead of being written into any
/// shared UI state, so the surface layer decides how to show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The table state after the operation.
    pub table: Table,
    /// One-line description of the applied change.
    pub message: String,
}

impl EditOutcome {
    fn new(table: Table, message: impl Into<String>) -> Self {
        Self {
            table,
            message: message.into(),
        }
    }
}

/// Editing engine for one stored table.
pub struct TableEditor {
    store: TableStore,
    id: TableId,
}

impl TableEditor {
    /// Bind an editor to a store and table id.
    pub fn new(store: TableStore, id: TableId) -> Self {
        Self { store, id }
    }

    /// The id this editor operates on.
    pub fn id(&self) -> &TableId {
        &self.id
    }

    /// Load the current table state without mutating it.
    pub fn table(&self) -> Result<Table> {
        self.store.load(&self.id)
    }

    /// Add a column, blank in every existing row.
    ///
    /// On an empty table this creates the column with a single blank row.
    /// Fails with a validation error on a blank or duplicate name.
    pub fn add_column(&self, name: &str) -> Result<EditOutcome> {
        let mut table = self.store.load(&self.id)?;
        table.push_column(name)?;
        self.store.save(&self.id, &table)?;
        Ok(EditOutcome::new(
            table,
            format!("Added new column '{}'.", name.trim()),
        ))
    }

    /// Add a row from column-name/value pairs.
    ///
    /// Every current column must carry a non-empty value; unknown keys are
    /// rejected.
    pub fn add_row(&self, values: &HashMap<String, String>) -> Result<EditOutcome> {
        let mut table = self.store.load(&self.id)?;
        table.push_row_by_name(values)?;
        self.store.save(&self.id, &table)?;
        Ok(EditOutcome::new(table, "Added new row."))
    }

    /// Rename a column, keeping its cells.
    pub fn rename_column(&self, old: &str, new: &str) -> Result<EditOutcome> {
        let mut table = self.store.load(&self.id)?;
        table.rename_column(old, new)?;
        self.store.save(&self.id, &table)?;
        Ok(EditOutcome::new(
            table,
            format!("Renamed '{}' to '{}'.", old, new.trim()),
        ))
    }

    /// Delete a column and its cell from every row.
    ///
    /// An absent column name is a no-op, reported in the outcome message.
    pub fn delete_column(&self, name: &str) -> Result<EditOutcome> {
        let mut table = self.store.load(&self.id)?;
        let removed = table.remove_column(name)?;
        if !removed {
            return Ok(EditOutcome::new(
                table,
                format!("Column '{name}' does not exist; nothing deleted."),
            ));
        }
        self.store.save(&self.id, &table)?;
        Ok(EditOutcome::new(table, format!("Deleted column '{name}'.")))
    }

    /// Delete rows in the inclusive 0-based index range `[start, end]`.
    pub fn delete_rows(&self, start: usize, end: usize) -> Result<EditOutcome> {
        let mut table = self.store.load(&self.id)?;
        table.remove_rows(start, end)?;
        self.store.save(&self.id, &table)?;
        Ok(EditOutcome::new(
            table,
            format!("Deleted rows from index {start} to {end}."),
        ))
    }

    /// Overwrite one cell with a new text value (empty allowed).
    pub fn set_cell(&self, row: usize, column: &str, value: &str) -> Result<EditOutcome> {
        let mut table = self.store.load(&self.id)?;
        table.set_cell(row, column, value)?;
        self.store.save(&self.id, &table)?;
        Ok(EditOutcome::new(
            table,
            format!("Updated row {row}, column '{column}' with value '{value}'."),
        ))
    }

    /// Import pasted spreadsheet text.
    ///
    /// Into an empty table the first line becomes the column headers and
    /// the rest replace the table wholesale. Into a non-empty table every
    /// line is a data row and must have exactly one field per existing
    /// column; fields map positionally onto the current column order.
    pub fn import(&self, text: &str) -> Result<EditOutcome> {
        let table = self.store.load(&self.id)?;
        if table.is_empty() {
            let block = parse_pasted(text, true)?;
            let replacement = table_from_block(&block)?;
            self.store.save(&self.id, &replacement)?;
            Ok(EditOutcome::new(
                replacement,
                "Data imported; first row used as column headers.",
            ))
        } else {
            let block = parse_pasted(text, false)?;
            let mut table = table;
            table.append_block(&block)?;
            self.store.save(&self.id, &table)?;
            let count = block.rows.len();
            let message = if count == 1 {
                "Added 1 new row.".to_string()
            } else {
                format!("Added {count} new rows.")
            };
            Ok(EditOutcome::new(table, message))
        }
    }
}

/// Build a whole table from a header-carrying block.
fn table_from_block(block: &PastedBlock) -> Result<Table> {
    let header = block
        .header
        .as_ref()
        .ok_or_else(|| ConfgridError::Parse("pasted data has no header row".to_string()))?;
    Table::from_parts(header.clone(), block.rows.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn editor(dir: &std::path::Path) -> TableEditor {
        let store = TableStore::new(dir);
        let id = TableId::new("Data Load Parameter").unwrap();
        TableEditor::new(store, id)
    }

    fn seeded(dir: &std::path::Path) -> TableEditor {
        let ed = editor(dir);
        ed.import("Name\tAge\nAlice\t30\nBob\t25").unwrap();
        ed
    }

    #[test]
    fn test_add_column_to_empty_table() {
        let dir = tempdir().unwrap();
        let ed = editor(dir.path());
        let outcome = ed.add_column("Host").unwrap();
        assert_eq!(outcome.table.columns(), ["Host"]);
        assert_eq!(outcome.table.row_count(), 1);
        assert_eq!(outcome.message, "Added new column 'Host'.");
        // persisted
        assert_eq!(ed.table().unwrap(), outcome.table);
    }

    #[test]
    fn test_add_column_increases_count_and_blanks_rows() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let before = ed.table().unwrap();
        let outcome = ed.add_column("City").unwrap();
        assert_eq!(outcome.table.column_count(), before.column_count() + 1);
        for row in outcome.table.rows() {
            assert_eq!(row.last().map(String::as_str), Some(""));
        }
    }

    #[test]
    fn test_add_duplicate_column_leaves_table_unchanged() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let before = ed.table().unwrap();
        let err = ed.add_column("Name").unwrap_err();
        assert!(matches!(err, ConfgridError::Validation(_)));
        assert_eq!(ed.table().unwrap(), before);
    }

    #[test]
    fn test_add_row_requires_all_fields_filled() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let mut values = HashMap::new();
        values.insert("Name".to_string(), "Carol".to_string());
        values.insert("Age".to_string(), "".to_string());
        assert!(ed.add_row(&values).is_err());
        assert_eq!(ed.table().unwrap().row_count(), 2);

        values.insert("Age".to_string(), "41".to_string());
        let outcome = ed.add_row(&values).unwrap();
        assert_eq!(outcome.table.row_count(), 3);
        assert_eq!(outcome.table.cell(2, "Name"), Some("Carol"));
    }

    #[test]
    fn test_add_row_to_empty_table_rejected() {
        let dir = tempdir().unwrap();
        let ed = editor(dir.path());
        assert!(ed.add_row(&HashMap::new()).is_err());
    }

    #[test]
    fn test_rename_column_persists() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let outcome = ed.rename_column("Age", "Years").unwrap();
        assert_eq!(outcome.table.columns(), ["Name", "Years"]);
        assert_eq!(ed.table().unwrap().cell(0, "Years"), Some("30"));
    }

    #[test]
    fn test_delete_column_then_add_restores_count_not_values() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        ed.delete_column("Age").unwrap();
        let outcome = ed.add_column("Age").unwrap();
        assert_eq!(outcome.table.column_count(), 2);
        assert_eq!(outcome.table.cell(0, "Age"), Some(""));
    }

    #[test]
    fn test_delete_absent_column_is_noop() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let before = ed.table().unwrap();
        let outcome = ed.delete_column("Missing").unwrap();
        assert!(outcome.message.contains("nothing deleted"));
        assert_eq!(ed.table().unwrap(), before);
    }

    #[test]
    fn test_delete_rows_inverted_range_leaves_table_unchanged() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let before = ed.table().unwrap();
        assert!(matches!(
            ed.delete_rows(1, 0),
            Err(ConfgridError::Validation(_))
        ));
        assert_eq!(ed.table().unwrap(), before);
    }

    #[test]
    fn test_delete_rows_reindexes() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let outcome = ed.delete_rows(0, 0).unwrap();
        assert_eq!(outcome.table.row_count(), 1);
        assert_eq!(outcome.table.cell(0, "Name"), Some("Bob"));
    }

    #[test]
    fn test_set_cell_out_of_range_rejected() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        assert!(ed.set_cell(5, "Name", "x").is_err());
        let outcome = ed.set_cell(1, "Age", "26").unwrap();
        assert_eq!(outcome.table.cell(1, "Age"), Some("26"));
    }

    #[test]
    fn test_import_into_empty_table_uses_first_row_as_header() {
        let dir = tempdir().unwrap();
        let ed = editor(dir.path());
        let outcome = ed.import("Name\tAge\nAlice\t30\nBob\t25").unwrap();
        assert_eq!(outcome.table.columns(), ["Name", "Age"]);
        assert_eq!(outcome.table.row_count(), 2);
        assert_eq!(outcome.table.cell(0, "Name"), Some("Alice"));
        assert_eq!(outcome.table.cell(0, "Age"), Some("30"));
        assert_eq!(outcome.table.cell(1, "Name"), Some("Bob"));
        assert_eq!(outcome.table.cell(1, "Age"), Some("25"));
    }

    #[test]
    fn test_import_with_more_fields_reports_mismatch_and_keeps_table() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let before = ed.table().unwrap();
        let err = ed.import("Carol\t41\textra\nDan\t52\textra").unwrap_err();
        match &err {
            ConfgridError::SchemaMismatch { expected, actual } => {
                assert_eq!(*expected, 2);
                assert_eq!(*actual, 3);
            }
            other => panic!("expected schema mismatch, got: {other}"),
        }
        // user messaging distinguishes the direction of the mismatch
        assert!(err.to_string().contains("more"));
        assert_eq!(ed.table().unwrap(), before);
    }

    #[test]
    fn test_import_with_fewer_fields_rejected() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let err = ed.import("Carol\nDan").unwrap_err();
        assert!(matches!(
            err,
            ConfgridError::SchemaMismatch {
                expected: 2,
                actual: 1
            }
        ));
        assert!(err.to_string().contains("fewer"));
    }

    #[test]
    fn test_import_appends_positionally() {
        let dir = tempdir().unwrap();
        let ed = seeded(dir.path());
        let outcome = ed.import("Carol\t41").unwrap();
        assert_eq!(outcome.table.row_count(), 3);
        assert_eq!(outcome.table.cell(2, "Name"), Some("Carol"));
        assert_eq!(outcome.table.cell(2, "Age"), Some("41"));
        assert_eq!(outcome.message, "Added 1 new row.");
    }

    #[test]
    fn test_import_duplicate_header_rejected() {
        let dir = tempdir().unwrap();
        let ed = editor(dir.path());
        assert!(ed.import("Name\tName\nAlice\tBob").is_err());
        assert!(ed.table().unwrap().is_empty());
    }
}

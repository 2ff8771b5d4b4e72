//! # confgridlib
//!
//! Editing engine for small JSON-backed "configuration tables": named
//! column/row grids of text cells that an operator maintains through a
//! fixed menu of actions, including paste-import of tab-separated
//! spreadsheet data.
//!
//! ## Overview
//!
//! The library is split the way the data flows:
//!
//! - **Table**: the in-memory model — ordered unique column names plus rows
//!   of text cells, one cell per column by construction
//! - **TableStore**: one JSON file per table, optionally namespaced per
//!   customer, with explicit column order on disk
//! - **PastedBlock / parse_pasted**: clipboard spreadsheet text split on
//!   literal tabs into structured rows
//! - **TableEditor**: the load-validate-mutate-save cycle behind each user
//!   action, returning the new state plus a user-facing message
//! - **CredentialStore**: username/password/customer entries for the login
//!   shell (collaborator data, kept alongside the tables)
//!
//! Every mutation either fully applies and persists, or fails and leaves
//! the stored table untouched. Cell values are always text; numbers and
//! dates are stored as their literal string form.
//!
//! ## Example
//!
//! ```rust
//! use confgridlib::{TableEditor, TableId, TableStore};
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let store = TableStore::new(dir.path());
//! let id = TableId::new("Data Load Parameter").unwrap();
//! let editor = TableEditor::new(store, id);
//!
//! // Paste-import into an empty table: first row becomes the headers.
//! let outcome = editor.import("Name\tAge\nAlice\t30\nBob\t25").unwrap();
//! assert_eq!(outcome.table.columns(), ["Name", "Age"]);
//! assert_eq!(outcome.table.row_count(), 2);
//!
//! // Regular edits load, mutate, and persist in one step.
//! let outcome = editor.add_column("City").unwrap();
//! assert_eq!(outcome.table.column_count(), 3);
//! assert_eq!(outcome.table.cell(0, "City"), Some(""));
//! ```

pub mod auth;
pub mod editor;
pub mod error;
pub mod parse;
pub mod store;
pub mod table;

pub use auth::{CredentialStore, UserEntry};
pub use editor::{EditOutcome, TableEditor};
pub use error::ConfgridError;
pub use parse::{parse_pasted, PastedBlock};
pub use store::{TableId, TableStore};
pub use table::Table;

/// Result type for confgridlib operations
pub type Result<T> = std::result::Result<T, ConfgridError>;

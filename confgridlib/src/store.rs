//! JSON-file persistence for tables.
//!
//! Each table lives in one JSON file under the store root, optionally
//! namespaced by a customer directory:
//! `<root>/<customer>/<slug>.json` or `<root>/<slug>.json`.
//!
//! The stored shape is an object with an explicit `columns` array (so column
//! order survives reload) and a `rows` array of record objects. Files
//! written by earlier versions hold a bare array of records; those still
//! load, with column order recovered from the first record.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfgridError;
use crate::table::Table;
use crate::Result;

/// Identifies one stored table: a logical name plus an optional customer
/// scope. The same table name under different customers is an independent
/// table instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableId {
    name: String,
    customer: Option<String>,
}

impl TableId {
    /// A table id without customer scoping.
    ///
    /// Fails when the name is blank.
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfgridError::validation("table name cannot be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            customer: None,
        })
    }

    /// Scope this id to a customer. A blank customer clears the scope.
    pub fn with_customer(mut self, customer: &str) -> Self {
        let customer = customer.trim();
        self.customer = (!customer.is_empty()).then(|| customer.to_string());
        self
    }

    /// The logical table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The customer scope, if any.
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    /// File stem for this table: lowercased, with path-hostile characters
    /// mapped to underscores ("Data Load Parameter" -> "data_load_parameter").
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

fn slugify(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Loads and saves tables as JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct TableStore {
    root: PathBuf,
}

impl TableStore {
    /// Create a store rooted at the given directory. The directory is
    /// created lazily on the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the file path backing a table id.
    pub fn path_for(&self, id: &TableId) -> PathBuf {
        let mut path = self.root.clone();
        if let Some(customer) = id.customer() {
            path.push(slugify(customer));
        }
        path.push(format!("{}.json", id.slug()));
        path
    }

    /// Load a table, returning an empty table when no file exists yet.
    ///
    /// An unreadable file is a [`ConfgridError::Storage`] and a file that is
    /// not valid table JSON is a [`ConfgridError::Corrupt`]; neither is
    /// silently treated as empty.
    pub fn load(&self, id: &TableId) -> Result<Table> {
        let path = self.path_for(id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Table::new())
            }
            Err(source) => return Err(ConfgridError::Storage { path, source }),
        };
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|source| ConfgridError::Corrupt {
                path: path.clone(),
                source,
            })?;
        Table::from_json(&value).map_err(|message| ConfgridError::InvalidShape { path, message })
    }

    /// Save a table, overwriting any previous file for this id.
    ///
    /// The parent directory is created if absent. The write goes to a
    /// sibling temp file first and is renamed into place, so a failed save
    /// leaves the previous file untouched.
    pub fn save(&self, id: &TableId, table: &Table) -> Result<()> {
        let path = self.path_for(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfgridError::Storage {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = serde_json::to_string_pretty(&table.to_json())
            .map_err(|source| ConfgridError::Corrupt {
                path: path.clone(),
                source,
            })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|source| ConfgridError::Storage {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| ConfgridError::Storage { path, source })
    }

    /// List the slugs of all tables stored for a customer scope (or the
    /// unscoped root when `customer` is `None`).
    pub fn list(&self, customer: Option<&str>) -> Result<Vec<String>> {
        let mut dir = self.root.clone();
        if let Some(customer) = customer {
            dir.push(slugify(customer));
        }
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new())
            }
            Err(source) => return Err(ConfgridError::Storage { path: dir, source }),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ConfgridError::Storage {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

//! JSON-backed credential store.
//!
//! Collaborator data for the login shell: one file mapping usernames to a
//! password plus the customer scopes the user may edit. Earlier versions of
//! the file stored a bare password string per user; those entries still
//! load and are upgraded to the full form on the next write.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfgridError;
use crate::Result;

/// One user's stored credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    /// Stored password (plain text; hardening is out of scope here).
    pub password: String,
    /// Customer scopes this user may edit.
    #[serde(default)]
    pub customers: Vec<String>,
}

/// Stored form of a user entry; the legacy form is a bare password string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredUser {
    Full(UserEntry),
    Legacy(String),
}

impl From<StoredUser> for UserEntry {
    fn from(stored: StoredUser) -> Self {
        match stored {
            StoredUser::Full(entry) => entry,
            StoredUser::Legacy(password) => UserEntry {
                password,
                customers: Vec::new(),
            },
        }
    }
}

/// Username/password store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store over the given file. The file is created lazily on
    /// the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all entries. A missing file is an empty credential set; an
    /// unreadable or malformed file is an error.
    pub fn load(&self) -> Result<BTreeMap<String, UserEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new())
            }
            Err(source) => {
                return Err(ConfgridError::Storage {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let stored: BTreeMap<String, StoredUser> =
            serde_json::from_str(&text).map_err(|source| ConfgridError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(stored
            .into_iter()
            .map(|(name, entry)| (name, entry.into()))
            .collect())
    }

    /// Write all entries back, always in the full form.
    pub fn save(&self, entries: &BTreeMap<String, UserEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfgridError::Storage {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let text = serde_json::to_string_pretty(entries).map_err(|source| {
            ConfgridError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, text).map_err(|source| ConfgridError::Storage {
            path: self.path.clone(),
            source,
        })
    }

    /// Check a username/password pair. Unknown users simply fail the check.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let entries = self.load()?;
        Ok(entries
            .get(username)
            .is_some_and(|entry| entry.password == password))
    }

    /// The customer scopes associated with a user (empty for unknown users).
    pub fn customers(&self, username: &str) -> Result<Vec<String>> {
        let entries = self.load()?;
        Ok(entries
            .get(username)
            .map(|entry| entry.customers.clone())
            .unwrap_or_default())
    }

    /// Create or update a user's password.
    pub fn set_password(&self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ConfgridError::validation("username cannot be empty"));
        }
        let mut entries = self.load()?;
        entries
            .entry(username.to_string())
            .or_default()
            .password = password.to_string();
        self.save(&entries)
    }

    /// Associate a customer scope with a user, creating the user entry when
    /// absent. Blank customers and duplicates are ignored.
    pub fn add_customer(&self, username: &str, customer: &str) -> Result<()> {
        let customer = customer.trim();
        if customer.is_empty() {
            return Ok(());
        }
        let mut entries = self.load()?;
        let entry = entries.entry(username.to_string()).or_default();
        if !entry.customers.iter().any(|c| c == customer) {
            entry.customers.push(customer.to_string());
        }
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &Path) -> CredentialStore {
        CredentialStore::new(dir.join("users.json"))
    }

    #[test]
    fn test_missing_file_is_empty_set() {
        let dir = tempdir().unwrap();
        let creds = store(dir.path());
        assert!(creds.load().unwrap().is_empty());
        assert!(!creds.authenticate("alice", "pw").unwrap());
        assert!(creds.customers("alice").unwrap().is_empty());
    }

    #[test]
    fn test_authenticate_round_trip() {
        let dir = tempdir().unwrap();
        let creds = store(dir.path());
        creds.set_password("alice", "secret").unwrap();
        assert!(creds.authenticate("alice", "secret").unwrap());
        assert!(!creds.authenticate("alice", "wrong").unwrap());
        assert!(!creds.authenticate("bob", "secret").unwrap());
    }

    #[test]
    fn test_legacy_bare_string_entries_load() {
        let dir = tempdir().unwrap();
        let creds = store(dir.path());
        fs::write(
            creds.path(),
            r#"{"alice": "secret", "bob": {"password": "pw", "customers": ["Acme"]}}"#,
        )
        .unwrap();
        assert!(creds.authenticate("alice", "secret").unwrap());
        assert_eq!(creds.customers("bob").unwrap(), ["Acme"]);
        assert!(creds.customers("alice").unwrap().is_empty());
    }

    #[test]
    fn test_add_customer_upgrades_legacy_entry() {
        let dir = tempdir().unwrap();
        let creds = store(dir.path());
        fs::write(creds.path(), r#"{"alice": "secret"}"#).unwrap();
        creds.add_customer("alice", "Acme").unwrap();
        // password survives the upgrade, entry is rewritten in full form
        assert!(creds.authenticate("alice", "secret").unwrap());
        assert_eq!(creds.customers("alice").unwrap(), ["Acme"]);
        let text = fs::read_to_string(creds.path()).unwrap();
        assert!(text.contains("password"));
    }

    #[test]
    fn test_add_customer_ignores_blank_and_duplicate() {
        let dir = tempdir().unwrap();
        let creds = store(dir.path());
        creds.add_customer("alice", "Acme").unwrap();
        creds.add_customer("alice", "Acme").unwrap();
        creds.add_customer("alice", "  ").unwrap();
        assert_eq!(creds.customers("alice").unwrap(), ["Acme"]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let creds = store(dir.path());
        fs::write(creds.path(), "not json").unwrap();
        assert!(matches!(
            creds.load(),
            Err(ConfgridError::Corrupt { .. })
        ));
    }
}

// 🗄️ Storage Layer - Key/value persistence for the expense list
//
// The whole collection lives under one key as a JSON array and is rewritten
// after every mutation. SQLite (WAL) backs the real store; MemoryStorage is
// for tests and throwaway sessions.

use crate::entities::Expense;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Key the serialized expense list is stored under
pub const STORAGE_KEY: &str = "expenses";

/// Where an unreadable blob is copied before it can be overwritten
pub const CORRUPT_BACKUP_KEY: &str = "expenses.corrupt";

// ============================================================================
// STORAGE TRAIT
// ============================================================================

pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

// ============================================================================
// SQLITE BACKEND
// ============================================================================

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file, creating parent directories
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        setup_database(&conn)?;

        tracing::debug!(path = %path.display(), "storage opened");
        Ok(SqliteStorage { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStorage { conn })
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery; in-memory databases silently keep "memory"
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM storage WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// ============================================================================
// EXPENSE BLOB
// ============================================================================

/// Read the stored list; a missing key is an empty list
pub fn load_expenses(storage: &dyn Storage) -> Result<Vec<Expense>> {
    match storage.get_item(STORAGE_KEY)? {
        Some(json) => serde_json::from_str(&json).context("Failed to parse stored expenses"),
        None => Ok(Vec::new()),
    }
}

/// Overwrite the stored list with `expenses`
pub fn save_expenses(storage: &dyn Storage, expenses: &[Expense]) -> Result<()> {
    let json = serde_json::to_string(expenses)?;
    storage
        .set_item(STORAGE_KEY, &json)
        .context("Failed to write expenses to storage")?;
    Ok(())
}

/// Copy the raw blob under `STORAGE_KEY` aside so it survives the next save.
/// Uses `expenses.corrupt`, or a timestamped key when that one is taken by
/// a different blob. Returns the key written, or `None` if there was nothing
/// to copy.
pub fn backup_raw_expenses(storage: &dyn Storage) -> Result<Option<String>> {
    let Some(raw) = storage.get_item(STORAGE_KEY)? else {
        return Ok(None);
    };

    let key = match storage.get_item(CORRUPT_BACKUP_KEY)? {
        None => CORRUPT_BACKUP_KEY.to_string(),
        Some(existing) if existing == raw => return Ok(Some(CORRUPT_BACKUP_KEY.to_string())),
        Some(_) => format!("{}.{}", CORRUPT_BACKUP_KEY, Utc::now().format("%Y%m%dT%H%M%S%.f")),
    };

    storage
        .set_item(&key, &raw)
        .with_context(|| format!("Failed to back up stored expenses to '{}'", key))?;
    tracing::warn!(key = %key, bytes = raw.len(), "unreadable expense blob backed up");
    Ok(Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, ExpenseDraft};

    fn create_test_expense(description: &str, amount: &str, category: &str, date: &str) -> Expense {
        let draft = ExpenseDraft {
            description: description.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.to_string(),
        };
        Expense::new(draft.validate().unwrap())
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(load_expenses(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_sqlite() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let expenses = vec![
            create_test_expense("Groceries", "45.99", "food", "2024-12-31"),
            create_test_expense("Metro card", "20", "transport", "2024-12-30"),
        ];

        save_expenses(&storage, &expenses).unwrap();
        assert_eq!(load_expenses(&storage).unwrap(), expenses);

        // Second save overwrites rather than appends
        save_expenses(&storage, &expenses[..1]).unwrap();
        assert_eq!(load_expenses(&storage).unwrap().len(), 1);
    }

    #[test]
    fn test_sqlite_file_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("expenses.db");
        let expenses = vec![create_test_expense("Doctor", "80", "health", "2025-01-02")];

        {
            let storage = SqliteStorage::open(&path).unwrap();
            save_expenses(&storage, &expenses).unwrap();
        }

        let reopened = SqliteStorage::open(&path).unwrap();
        assert_eq!(load_expenses(&reopened).unwrap(), expenses);
    }

    #[test]
    fn test_remove_item() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "[]").unwrap();
        storage.remove_item(STORAGE_KEY).unwrap();
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_blob_is_an_error() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        assert!(load_expenses(&storage).is_err());
    }

    #[test]
    fn test_unknown_category_survives_load() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                STORAGE_KEY,
                r#"[{"id":"1","description":"Gift","amount":15,"category":"gifts","date":"2025-05-01"}]"#,
            )
            .unwrap();

        let loaded = load_expenses(&storage).unwrap();
        assert_eq!(loaded[0].category, Category::Unrecognized("gifts".to_string()));
        assert_eq!(loaded[0].amount, 15.0);
    }

    #[test]
    fn test_backup_keeps_raw_blob() {
        let storage = MemoryStorage::new();
        assert_eq!(backup_raw_expenses(&storage).unwrap(), None);

        storage.set_item(STORAGE_KEY, "[{\"id\":\"1\"").unwrap();
        let key = backup_raw_expenses(&storage).unwrap().unwrap();
        assert_eq!(key, CORRUPT_BACKUP_KEY);
        assert_eq!(storage.get_item(CORRUPT_BACKUP_KEY).unwrap().as_deref(), Some("[{\"id\":\"1\""));

        // Same blob again reuses the key; a different one gets its own
        assert_eq!(backup_raw_expenses(&storage).unwrap().as_deref(), Some(CORRUPT_BACKUP_KEY));
        storage.set_item(STORAGE_KEY, "garbage").unwrap();
        let second = backup_raw_expenses(&storage).unwrap().unwrap();
        assert!(second.starts_with("expenses.corrupt."));
        assert_eq!(storage.get_item(&second).unwrap().as_deref(), Some("garbage"));
        assert_eq!(storage.get_item(CORRUPT_BACKUP_KEY).unwrap().as_deref(), Some("[{\"id\":\"1\""));
    }
}

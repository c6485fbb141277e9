use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;
use crate::models::BattleResult;

pub const LAST_BATTLE_RESULT_KEY: &str = "lastBattleResult";

/// Session-scoped key/value store. One database file is one session.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS session_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO session_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn remove_item(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM session_entries WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    pub fn save_battle_result(&self, result: &BattleResult) -> Result<()> {
        let json = serde_json::to_string(result)?;
        self.set_item(LAST_BATTLE_RESULT_KEY, &json)
    }

    pub fn load_battle_result(&self) -> Result<Option<BattleResult>> {
        match self.get_item(LAST_BATTLE_RESULT_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn clear_battle_result(&self) -> Result<bool> {
        self.remove_item(LAST_BATTLE_RESULT_KEY)
    }
}

/// Last battle of the session at `path`. An unreadable cache counts as empty.
pub fn read_last_battle<P: AsRef<Path>>(path: P) -> Option<BattleResult> {
    let path = path.as_ref();
    let loaded = Storage::new(path).and_then(|storage| storage.load_battle_result());
    loaded.unwrap_or_else(|e| {
        tracing::warn!("Session cache {} unreadable: {}", path.display(), e);
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_items_overwrite_and_remove() {
        let storage = Storage::in_memory().unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "first").unwrap();
        storage.set_item("k", "second").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("second"));

        assert!(storage.remove_item("k").unwrap());
        assert!(!storage.remove_item("k").unwrap());
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_corrupt_battle_result_is_a_serialization_error() {
        let storage = Storage::in_memory().unwrap();
        storage.set_item(LAST_BATTLE_RESULT_KEY, "{not json").unwrap();

        let err = storage.load_battle_result().unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_missing_battle_result() {
        let storage = Storage::in_memory().unwrap();
        assert!(storage.load_battle_result().unwrap().is_none());
        assert!(!storage.clear_battle_result().unwrap());
    }

    #[test]
    fn test_read_last_battle_treats_broken_cache_as_empty() {
        let dir = tempfile::tempdir().unwrap();

        let missing_dir = dir.path().join("no-such-dir").join("session.db");
        assert_eq!(read_last_battle(&missing_dir), None);

        let corrupt = dir.path().join("corrupt.db");
        Storage::new(&corrupt)
            .unwrap()
            .set_item(LAST_BATTLE_RESULT_KEY, "{not json")
            .unwrap();
        assert_eq!(read_last_battle(&corrupt), None);

        let fresh = dir.path().join("fresh.db");
        assert_eq!(read_last_battle(&fresh), None);
    }
}

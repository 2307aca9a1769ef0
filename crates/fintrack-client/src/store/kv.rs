use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use rusqlite::{OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::database::Database;
use crate::store::records::{StoredRecord, now_timestamp};
use crate::{ClientError, ClientResult};

pub const USERS_KEY: &str = "users";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const SESSION_TOKEN_KEY: &str = "session_token";

/// String keys to string values, the shape browser local storage exposes.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

impl<K> KeyValueStore for Rc<K>
where
    K: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        (**self).remove(key)
    }
}

/// Key-value pairs persisted in the `internal_kv` table.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    db: Rc<Database>,
}

impl SqliteKeyValueStore {
    pub fn new(db: Rc<Database>) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM internal_kv WHERE key = ?1 LIMIT 1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| self.db.map_error(&error))
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO internal_kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE
                 SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now_timestamp()],
            )
            .map_err(|error| self.db.map_error(&error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.db
            .connection()
            .execute("DELETE FROM internal_kv WHERE key = ?1", [key])
            .map_err(|error| self.db.map_error(&error))?;
        Ok(())
    }
}

/// Process-local map, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
    read_only: Cell<bool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail, the way a full or revoked storage quota does.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    fn ensure_writable(&self) -> ClientResult<()> {
        if self.read_only.get() {
            return Err(ClientError::store_failed(
                Path::new(":memory:"),
                "key-value store is read-only",
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.ensure_writable()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.ensure_writable()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reads and decodes a JSON value. Anything that does not decode counts as absent.
pub fn read_json<K, T>(kv: &K, key: &str) -> ClientResult<Option<T>>
where
    K: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = kv.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            tracing::warn!(key, error = %error, "ignoring malformed stored value");
            Ok(None)
        }
    }
}

pub fn write_json<K, T>(kv: &K, key: &str, value: &T) -> ClientResult<()>
where
    K: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
    kv.set(key, &encoded)
}

/// Decodes a stored array element by element, dropping entries that do not
/// match the record shape.
pub fn read_collection<K, R>(kv: &K, key: &str) -> ClientResult<Vec<R>>
where
    K: KeyValueStore + ?Sized,
    R: StoredRecord,
{
    let Some(elements) = read_json::<K, Vec<Value>>(kv, key)? else {
        return Ok(Vec::new());
    };
    Ok(decode_elements(key, elements))
}

pub(crate) fn decode_elements<R>(key: &str, elements: Vec<Value>) -> Vec<R>
where
    R: StoredRecord,
{
    let mut records = Vec::with_capacity(elements.len());
    for (position, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<R>(element) {
            Ok(record) if record.is_well_formed() => records.push(record),
            Ok(record) => {
                tracing::warn!(key, position, id = record.id(), "dropping out-of-range record");
            }
            Err(error) => {
                tracing::warn!(key, position, error = %error, "dropping malformed record");
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{
        KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, read_collection, read_json,
        write_json,
    };
    use crate::config::Config;
    use crate::models::Transaction;
    use crate::setup::ensure_initialized;
    use crate::store::database::Database;

    #[test]
    fn memory_store_round_trips_and_refuses_writes_when_read_only() {
        let kv = MemoryKeyValueStore::new();
        assert!(kv.set("a", "1").is_ok());
        assert_eq!(kv.get("a").ok().flatten(), Some("1".to_string()));

        kv.set_read_only(true);
        let failed = kv.set("a", "2");
        assert!(failed.is_err());
        if let Err(error) = failed {
            assert_eq!(error.code, "store_failed");
        }
        assert_eq!(kv.get("a").ok().flatten(), Some("1".to_string()));
    }

    #[test]
    fn malformed_json_reads_as_absent() {
        let kv = MemoryKeyValueStore::new();
        assert!(kv.set("currentUser", "{not json").is_ok());
        let value = read_json::<_, serde_json::Value>(&kv, "currentUser");
        assert!(matches!(value, Ok(None)));
    }

    #[test]
    fn collection_reads_drop_only_bad_elements() {
        let kv = MemoryKeyValueStore::new();
        let raw = r#"[
            {"id": 1, "description": "Rent", "amount": 900, "type": "expense",
             "category": "Bills", "date": "2026-10-01"},
            {"id": 2, "description": "Broken", "amount": 5, "type": "expense",
             "category": "Food", "date": "not-a-date"},
            {"id": 3, "description": "Refund", "amount": -5, "type": "income",
             "category": "Gift", "date": "2026-10-02"},
            {"id": 4, "description": "Pay", "amount": 2500, "type": "income",
             "category": "Salary", "date": "2026-10-03T09:00:00.000Z"}
        ]"#;
        assert!(kv.set("transactions_9", raw).is_ok());

        let records = read_collection::<_, Transaction>(&kv, "transactions_9");
        assert!(records.is_ok());
        if let Ok(records) = records {
            let ids: Vec<i64> = records.iter().map(|record| record.id).collect();
            assert_eq!(ids, vec![1, 4]);
        }
    }

    #[test]
    fn sqlite_store_persists_across_handles() {
        let temp = tempfile::tempdir();
        assert!(temp.is_ok());
        if let Ok(temp) = temp {
            let config = Config::default().with_home(Some(temp.path().to_path_buf()));
            let setup = ensure_initialized(&config);
            assert!(setup.is_ok());
            if let Ok(setup) = setup {
                let first = Database::open(&setup).map(|db| SqliteKeyValueStore::new(Rc::new(db)));
                assert!(first.is_ok());
                if let Ok(kv) = first {
                    assert!(write_json(&kv, "budgets_1", &Vec::<u8>::new()).is_ok());
                    assert!(kv.set("currentUser", "{}").is_ok());
                    assert!(kv.remove("currentUser").is_ok());
                }

                let second =
                    Database::open(&setup).map(|db| SqliteKeyValueStore::new(Rc::new(db)));
                assert!(second.is_ok());
                if let Ok(kv) = second {
                    assert_eq!(kv.get("budgets_1").ok().flatten(), Some("[]".to_string()));
                    assert_eq!(kv.get("currentUser").ok().flatten(), None);
                }
            }
        }
    }
}

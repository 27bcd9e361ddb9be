//! String key-value stores for view preferences.
//!
//! [`LocalStore`] survives restarts (SQLite), [`SessionStore`] lives for the
//! duration of the process. Values are plain strings; [`get_json`] and
//! [`set_json`] layer JSON on top.

use crate::CacheError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn remove_item(&self, key: &str) -> Result<(), CacheError>;
}

/// `base` when no scope is given, `base_scope` otherwise.
pub fn scoped_key(base: &str, scope: Option<&str>) -> String {
    match scope {
        Some(scope) => format!("{}_{}", base, scope),
        None => base.to_string(),
    }
}

pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, CacheError> {
    match store.get_item(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CacheError::SerializationError(e.to_string())),
        None => Ok(None),
    }
}

pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), CacheError> {
    let raw =
        serde_json::to_string(value).map_err(|e| CacheError::SerializationError(e.to_string()))?;
    store.set_item(key, &raw)
}

fn apply_migrations(conn: &mut Connection) -> Result<(), CacheError> {
    let migrations = Migrations::new(vec![M::up(
        "CREATE TABLE IF NOT EXISTS kv_store (\
             key TEXT PRIMARY KEY,\
             value TEXT NOT NULL,\
             updated_at INTEGER NOT NULL\
         );",
    )]);
    migrations
        .to_latest(conn)
        .map_err(|e| CacheError::DatabaseError(format!("Failed to apply migrations: {}", e)))?;
    Ok(())
}

/// Persistent store backed by a SQLite file.
#[derive(Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStore {
    pub fn new(db_path: &Path) -> Result<Self, CacheError> {
        let mut conn = Connection::open(db_path)
            .map_err(|e| CacheError::DatabaseError(format!("Failed to open database: {}", e)))?;
        apply_migrations(&mut conn)?;
        tracing::debug!("Opened local store at {}", db_path.display());
        Ok(LocalStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, CacheError> {
        let mut conn = Connection::open_in_memory()
            .map_err(|e| CacheError::DatabaseError(format!("Failed to open database: {}", e)))?;
        apply_migrations(&mut conn)?;
        Ok(LocalStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Other("Poisoned lock".into()))
    }

    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare("SELECT key FROM kv_store ORDER BY key")
            .map_err(|e| CacheError::DatabaseError(format!("Failed to prepare statement: {}", e)))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| CacheError::DatabaseError(format!("Failed to query keys: {}", e)))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key.map_err(|e| CacheError::DatabaseError(e.to_string()))?);
        }
        Ok(keys)
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM kv_store", [])
            .map_err(|e| CacheError::DatabaseError(format!("Failed to clear store: {}", e)))?;
        Ok(())
    }
}

impl KeyValueStore for LocalStore {
    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        let conn = self.lock_conn()?;
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| CacheError::DatabaseError(format!("Failed to read {}: {}", key, e)))
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp()],
        )
        .map_err(|e| CacheError::DatabaseError(format!("Failed to write {}: {}", key, e)))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| CacheError::DatabaseError(format!("Failed to remove {}: {}", key, e)))?;
        Ok(())
    }
}

/// In-memory store that lasts for one run of the application.
#[derive(Clone, Default)]
pub struct SessionStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_items(&self) -> Result<std::sync::MutexGuard<HashMap<String, String>>, CacheError> {
        self.items
            .lock()
            .map_err(|_| CacheError::Other("Poisoned lock".into()))
    }
}

impl KeyValueStore for SessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.lock_items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.lock_items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        self.lock_items()?.remove(key);
        Ok(())
    }
}

use crate::error::DemoError;
use dashmap::DashMap;

/// Durable key-value storage the ledger persists into.
///
/// Mirrors browser `localStorage`: string keys, string values, no capacity
/// guarantee. Implementations must be thread-safe (`Send + Sync`).
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, DemoError>;

    /// Write (or overwrite) a value.
    fn set(&self, key: &str, value: &str) -> Result<(), DemoError>;
}

/// In-memory store backed by DashMap. Fast but lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    values: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DemoError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DemoError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(feature = "full")]
pub use sqlite::SqliteStore;

#[cfg(feature = "full")]
mod sqlite {
    use super::KeyValueStore;
    use crate::error::DemoError;
    use std::sync::Mutex;

    /// Persistent store backed by SQLite. Survives restarts.
    pub struct SqliteStore {
        conn: Mutex<rusqlite::Connection>,
    }

    impl SqliteStore {
        /// Open (or create) a SQLite key-value database at the given path.
        ///
        /// On Unix the file is restricted to 0600: the ledger reveals which
        /// transactions this user sent.
        pub fn open(path: &str) -> Result<Self, DemoError> {
            let conn = rusqlite::Connection::open(path).map_err(persistence)?;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
                PRAGMA journal_mode=WAL;",
            )
            .map_err(persistence)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) =
                    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                {
                    tracing::warn!(
                        path = %path,
                        error = %e,
                        "failed to set store file permissions to 0600"
                    );
                }
            }

            Ok(Self {
                conn: Mutex::new(conn),
            })
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, rusqlite::Connection> {
            match self.conn.lock() {
                Ok(c) => c,
                Err(poisoned) => {
                    tracing::error!("sqlite store mutex poisoned, recovering");
                    poisoned.into_inner()
                }
            }
        }
    }

    fn persistence(e: rusqlite::Error) -> DemoError {
        DemoError::PersistenceUnavailable(e.to_string())
    }

    impl KeyValueStore for SqliteStore {
        fn get(&self, key: &str) -> Result<Option<String>, DemoError> {
            let conn = self.lock();
            match conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            }) {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(persistence(e)),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), DemoError> {
            let conn = self.lock();
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )
            .map(|_| ())
            .map_err(persistence)
        }
    }
}

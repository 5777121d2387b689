use std::collections::HashMap;

use crate::error::CoreResult;

#[cfg(feature = "sqlite")]
use crate::error::CoreError;
#[cfg(feature = "sqlite")]
use rusqlite::{params, OptionalExtension};

pub const LAST_SEARCHED_CITY_KEY: &str = "last_searched_city";

pub trait PreferenceStore: Send + Sync {
    fn save_last_searched_city(&mut self, city: &str) -> CoreResult<()>;
    /// Empty when nothing has been saved yet.
    fn last_searched_city(&self) -> CoreResult<String>;
}

#[derive(Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryPreferences {
    fn save_last_searched_city(&mut self, city: &str) -> CoreResult<()> {
        self.values
            .insert(LAST_SEARCHED_CITY_KEY.to_string(), city.to_string());
        Ok(())
    }

    fn last_searched_city(&self) -> CoreResult<String> {
        Ok(self
            .values
            .get(LAST_SEARCHED_CITY_KEY)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(feature = "sqlite")]
pub struct SqlitePreferences {
    pub path: String,
}

#[cfg(feature = "sqlite")]
impl SqlitePreferences {
    pub fn new(path: impl Into<String>) -> CoreResult<Self> {
        let prefs = Self { path: path.into() };
        prefs.init()?;
        Ok(prefs)
    }

    fn conn(&self) -> CoreResult<rusqlite::Connection> {
        rusqlite::Connection::open(&self.path)
            .map_err(|err| CoreError::Storage(err.to_string()))
    }

    fn init(&self) -> CoreResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .map_err(|err| CoreError::Storage(err.to_string()))?;
        Ok(())
    }

    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|err| CoreError::Storage(err.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
            params![key, value],
        )
        .map_err(|err| CoreError::Storage(err.to_string()))?;
        Ok(())
    }
}

#[cfg(feature = "sqlite")]
impl PreferenceStore for SqlitePreferences {
    fn save_last_searched_city(&mut self, city: &str) -> CoreResult<()> {
        self.set(LAST_SEARCHED_CITY_KEY, city)
    }

    fn last_searched_city(&self) -> CoreResult<String> {
        Ok(self.get(LAST_SEARCHED_CITY_KEY)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_starts_empty_and_keeps_latest() {
        let mut prefs = MemoryPreferences::default();
        assert_eq!(prefs.last_searched_city().unwrap(), "");
        prefs.save_last_searched_city("Dallas").unwrap();
        prefs.save_last_searched_city("Oslo").unwrap();
        assert_eq!(prefs.last_searched_city().unwrap(), "Oslo");
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db").to_string_lossy().to_string();

        let mut prefs = SqlitePreferences::new(path.clone()).unwrap();
        assert_eq!(prefs.last_searched_city().unwrap(), "");
        prefs.save_last_searched_city("Dallas").unwrap();
        prefs.save_last_searched_city("São Paulo").unwrap();

        let reopened = SqlitePreferences::new(path).unwrap();
        assert_eq!(reopened.last_searched_city().unwrap(), "São Paulo");
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_open_failure_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("prefs.db");
        let err = SqlitePreferences::new(path.to_string_lossy().to_string())
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::Storage(_)));
    }
}

use rusqlite::{OptionalExtension, Result as SqlResult, params};
use std::path::Path;

use super::database::Database;

pub const KEY_AUTH_TOKEN: &str = "auth_token";
pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_USER_EMAIL: &str = "user_email";
pub const KEY_THEME: &str = "theme";

/// Durable key-value storage for the client profile: bearer token,
/// denormalized user fields, and the theme choice. Survives restarts.
pub struct ProfileDatabase {
    db: Database,
}

impl ProfileDatabase {
    /// Initialize profile database at default location
    pub fn new() -> SqlResult<Self> {
        Self::with_path("data/profile.db")
    }

    /// Initialize profile database at custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        let db = Database::new(path)?;
        let profile_db = Self { db };
        profile_db.init_schema()?;
        Ok(profile_db)
    }

    /// In-memory instance for tests
    pub fn in_memory() -> SqlResult<Self> {
        let db = Database::in_memory()?;
        let profile_db = Self { db };
        profile_db.init_schema()?;
        Ok(profile_db)
    }

    fn init_schema(&self) -> SqlResult<()> {
        let conn = self.db.connection();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS profile (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> SqlResult<Option<String>> {
        let conn = self.db.connection();
        conn.query_row(
            "SELECT value FROM profile WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
    }

    pub fn set(&self, key: &str, value: &str) -> SqlResult<()> {
        let conn = self.db.connection();
        conn.execute(
            "INSERT OR REPLACE INTO profile (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> SqlResult<()> {
        let conn = self.db.connection();
        conn.execute("DELETE FROM profile WHERE key = ?1", params![key])?;
        Ok(())
    }
}

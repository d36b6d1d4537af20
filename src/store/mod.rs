pub mod database;
pub mod profile_db;
pub mod session_store;

pub use profile_db::ProfileDatabase;
pub use session_store::{AuthState, SessionStore};

use std::fs;

/// Ensure data directory exists
pub fn ensure_data_dir() -> std::io::Result<()> {
    fs::create_dir_all("data")?;
    Ok(())
}

pub mod app_repo;
pub mod migrations;
pub mod settings_repo;

use rusqlite::Connection;
use std::path::Path;

use crate::utils::AppResult;

pub struct Database {
    pub conn: Connection,
}

impl Database {
    pub fn new(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        let mut db = Self { conn };
        migrations::run_migrations(&mut db)?;
        Ok(db)
    }
}

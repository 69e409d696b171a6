use crate::db::Database;
use crate::utils::AppResult;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    "
    CREATE TABLE IF NOT EXISTS apps (
        id                  INTEGER PRIMARY KEY,
        position            INTEGER NOT NULL,
        name                TEXT NOT NULL,
        package_name        TEXT NOT NULL,
        icon                TEXT,
        graphic             TEXT,
        description         TEXT,
        developer_name      TEXT,
        developer_website   TEXT,
        downloads           TEXT,
        rating              REAL,
        rating_count        INTEGER,
        version_name        TEXT,
        size                INTEGER,
        is_favorite         INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS settings (
        key         TEXT PRIMARY KEY,
        value       TEXT NOT NULL,
        updated_at  TEXT DEFAULT (datetime('now'))
    );
    ",
    // Migration 2: Indexes for ordered reads and favorite lookups
    "
    CREATE INDEX IF NOT EXISTS idx_apps_position ON apps(position);
    CREATE INDEX IF NOT EXISTS idx_apps_is_favorite ON apps(is_favorite);
    ",
];

pub fn run_migrations(db: &mut Database) -> AppResult<()> {
    db.conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            applied_at TEXT DEFAULT (datetime('now'))
        );",
    )?;

    let applied: i64 = db
        .conn
        .query_row("SELECT COALESCE(MAX(id), 0) FROM _migrations", [], |row| {
            row.get(0)
        })?;

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i64;
        if version > applied {
            let tx = db.conn.transaction()?;
            tx.execute_batch(migration)?;
            tx.execute("INSERT INTO _migrations (id) VALUES (?1)", [version])?;
            tx.commit()?;
            log::info!("Applied migration {}", version);
        }
    }

    Ok(())
}

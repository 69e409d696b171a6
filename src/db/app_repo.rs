use std::collections::HashSet;

use rusqlite::Row;

use crate::db::Database;
use crate::models::{AppRecord, FavoritePolicy};
use crate::utils::AppResult;

const APP_COLUMNS: &str = "id, name, package_name, icon, graphic, description,
    developer_name, developer_website, downloads, rating, rating_count,
    version_name, size, is_favorite";

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<AppRecord> {
    Ok(AppRecord {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        package_name: row.get(2)?,
        icon: row.get(3)?,
        graphic: row.get(4)?,
        description: row.get(5)?,
        developer_name: row.get(6)?,
        developer_website: row.get(7)?,
        downloads: row.get(8)?,
        rating: row.get(9)?,
        rating_count: row.get::<_, Option<i64>>(10)?.map(|c| c as u32),
        version_name: row.get(11)?,
        size: row.get::<_, Option<i64>>(12)?.map(|s| s as u64),
        is_favorite: row.get::<_, i32>(13)? != 0,
    })
}

impl Database {
    /// Every cached record, in the order of the last replace.
    pub fn get_all_apps(&self) -> AppResult<Vec<AppRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM apps ORDER BY position", APP_COLUMNS))?;
        let apps = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(apps)
    }

    pub fn get_favorite_apps(&self) -> AppResult<Vec<AppRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM apps WHERE is_favorite = 1 ORDER BY position",
            APP_COLUMNS
        ))?;
        let apps = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(apps)
    }

    /// Clear the table and insert `apps` in a single transaction.
    /// Duplicate ids keep their first occurrence. Returns the stored row count.
    pub fn replace_all_apps(&self, apps: &[AppRecord], policy: FavoritePolicy) -> AppResult<usize> {
        let tx = self.conn.unchecked_transaction()?;

        let prior_favorites: HashSet<i64> = {
            let mut stmt = tx.prepare("SELECT id FROM apps WHERE is_favorite = 1")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<HashSet<i64>, _>>()?;
            ids
        };

        tx.execute("DELETE FROM apps", [])?;

        let mut stored = 0usize;
        {
            let mut insert = tx.prepare(
                "INSERT INTO apps (id, position, name, package_name, icon, graphic, description,
                                   developer_name, developer_website, downloads, rating,
                                   rating_count, version_name, size, is_favorite)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                 ON CONFLICT(id) DO NOTHING",
            )?;
            for (position, app) in apps.iter().enumerate() {
                let id = app.id as i64;
                let is_favorite = match policy {
                    FavoritePolicy::Preserve => app.is_favorite || prior_favorites.contains(&id),
                    FavoritePolicy::ReplaceWins => app.is_favorite,
                };
                stored += insert.execute(rusqlite::params![
                    id,
                    position as i64,
                    app.name,
                    app.package_name,
                    app.icon,
                    app.graphic,
                    app.description,
                    app.developer_name,
                    app.developer_website,
                    app.downloads,
                    app.rating,
                    app.rating_count.map(i64::from),
                    app.version_name,
                    app.size.map(|s| s as i64),
                    is_favorite as i32,
                ])?;
            }
        }

        tx.commit()?;

        if stored < apps.len() {
            log::debug!("Skipped {} duplicate app ids during replace", apps.len() - stored);
        }
        Ok(stored)
    }

    /// Returns false when no record has this id.
    pub fn set_favorite(&self, id: u64, is_favorite: bool) -> AppResult<bool> {
        let updated = self.conn.execute(
            "UPDATE apps SET is_favorite = ?1 WHERE id = ?2",
            rusqlite::params![is_favorite as i32, id as i64],
        )?;
        Ok(updated > 0)
    }

    pub fn get_app_count(&self) -> AppResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM apps", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

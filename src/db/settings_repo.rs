use crate::db::Database;
use crate::models::SyncSettings;
use crate::utils::{AppError, AppResult};

const SETTINGS_KEY: &str = "sync_settings";

impl Database {
    /// Stored settings, or defaults when none are stored or they cannot be read.
    pub fn load_settings(&self) -> SyncSettings {
        let json: Option<String> = match self.conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [SETTINGS_KEY],
            |row| row.get(0),
        ) {
            Ok(j) => Some(j),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                log::error!("Settings: failed to read stored settings, using defaults: {}", e);
                None
            }
        };

        match json {
            Some(j) => serde_json::from_str(&j).unwrap_or_else(|e| {
                log::warn!("Settings: stored value is unreadable, using defaults: {}", e);
                SyncSettings::default()
            }),
            None => SyncSettings::default(),
        }
    }

    pub fn save_settings(&self, settings: &SyncSettings) -> AppResult<()> {
        let json = serde_json::to_string(settings)
            .map_err(|e| AppError::Custom(format!("Failed to serialize settings: {}", e)))?;
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            [SETTINGS_KEY, json.as_str()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FavoritePolicy;

    #[test]
    fn defaults_when_nothing_stored() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.load_settings(), SyncSettings::default());
    }

    #[test]
    fn saved_settings_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let settings = SyncSettings {
            refresh_interval_minutes: 120,
            favorite_policy: FavoritePolicy::ReplaceWins,
            ..SyncSettings::default()
        };
        db.save_settings(&settings).unwrap();
        db.save_settings(&settings).unwrap();

        assert_eq!(db.load_settings(), settings);
    }

    #[test]
    fn corrupt_row_falls_back_to_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, 'not json')",
                [SETTINGS_KEY],
            )
            .unwrap();
        assert_eq!(db.load_settings(), SyncSettings::default());
    }

    #[test]
    fn unreadable_store_falls_back_to_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.conn.execute("DROP TABLE settings", []).unwrap();
        assert_eq!(db.load_settings(), SyncSettings::default());
    }
}

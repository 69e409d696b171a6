use serde::{Deserialize, Serialize};

pub const DEFAULT_CATALOGUE_URL: &str =
    "http://ws2.aptoide.com/api/6/bulkRequest/api_list/listApps?store_name=apps&limit=10";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    pub catalogue_url: String,
    pub refresh_interval_minutes: u32,
    pub notify_on_refresh: bool,
    pub favorite_policy: FavoritePolicy,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

/// How favorite flags are treated when the cache is fully replaced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FavoritePolicy {
    /// Records whose id was a favorite before the replace stay favorites.
    #[default]
    Preserve,
    /// Incoming flags are stored verbatim.
    ReplaceWins,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            catalogue_url: DEFAULT_CATALOGUE_URL.to_string(),
            refresh_interval_minutes: 15,
            notify_on_refresh: true,
            favorite_policy: FavoritePolicy::Preserve,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

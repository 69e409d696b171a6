use reqwest::Client;
use std::time::Duration;

use crate::models::SyncSettings;
use crate::utils::AppResult;

/// User-agent string derived from Cargo.toml version at compile time.
pub const APP_USER_AGENT: &str = concat!("appshelf/", env!("CARGO_PKG_VERSION"));

pub fn create_http_client(settings: &SyncSettings) -> AppResult<Client> {
    let client = Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .gzip(true)
        .pool_max_idle_per_host(3)
        .tcp_nodelay(true)
        .build()?;
    Ok(client)
}

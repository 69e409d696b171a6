use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::RemoteSource;
use crate::models::AppRecord;
use crate::utils::{AppError, AppResult};

// Envelope of the bulk `listApps` endpoint. Every level is optional; a
// missing level decodes as an empty catalogue.
#[derive(Debug, Deserialize)]
struct CatalogueResponse {
    responses: Option<Responses>,
}

#[derive(Debug, Deserialize)]
struct Responses {
    #[serde(rename = "listApps")]
    list_apps: Option<ListApps>,
}

#[derive(Debug, Deserialize)]
struct ListApps {
    datasets: Option<Datasets>,
}

#[derive(Debug, Deserialize)]
struct Datasets {
    all: Option<DatasetAll>,
}

#[derive(Debug, Deserialize)]
struct DatasetAll {
    data: Option<DataList>,
}

#[derive(Debug, Deserialize)]
struct DataList {
    list: Option<Vec<RemoteApp>>,
}

#[derive(Debug, Deserialize)]
struct RemoteApp {
    id: Option<u64>,
    name: Option<String>,
    #[serde(rename = "package")]
    package_name: Option<String>,
    icon: Option<String>,
    graphic: Option<String>,
    description: Option<String>,
    developer: Option<Developer>,
    stats: Option<Stats>,
    file: Option<FileInfo>,
}

#[derive(Debug, Deserialize)]
struct Developer {
    name: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Stats {
    downloads: Option<serde_json::Value>,
    rating: Option<Rating>,
}

#[derive(Debug, Deserialize)]
struct Rating {
    avg: Option<f64>,
    total: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    size: Option<u64>,
    vername: Option<String>,
}

impl CatalogueResponse {
    fn into_records(self) -> Vec<AppRecord> {
        let list = self
            .responses
            .and_then(|r| r.list_apps)
            .and_then(|l| l.datasets)
            .and_then(|d| d.all)
            .and_then(|a| a.data)
            .and_then(|d| d.list)
            .unwrap_or_default();

        let total = list.len();
        let records: Vec<AppRecord> = list.into_iter().filter_map(RemoteApp::into_record).collect();
        if records.len() < total {
            log::debug!("Catalogue: dropped {} entries without an id", total - records.len());
        }
        records
    }
}

impl RemoteApp {
    fn into_record(self) -> Option<AppRecord> {
        let id = self.id?;
        let (developer_name, developer_website) = match self.developer {
            Some(d) => (d.name, d.website),
            None => (None, None),
        };
        let (downloads, rating, rating_count) = match self.stats {
            Some(s) => {
                let (avg, total) = match s.rating {
                    Some(r) => (r.avg, r.total),
                    None => (None, None),
                };
                (s.downloads.and_then(display_value), avg, total)
            }
            None => (None, None, None),
        };
        let (size, version_name) = match self.file {
            Some(f) => (f.size, f.vername),
            None => (None, None),
        };

        Some(AppRecord {
            id,
            name: self.name.unwrap_or_default(),
            package_name: self.package_name.unwrap_or_default(),
            icon: self.icon,
            graphic: self.graphic,
            description: self.description,
            developer_name,
            developer_website,
            downloads,
            rating,
            rating_count,
            version_name,
            size,
            is_favorite: false,
        })
    }
}

/// Downloads arrive as either a string or a bare number depending on the store.
fn display_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Remote catalogue served by the Aptoide bulk `listApps` API.
pub struct AptoideSource {
    client: Client,
    endpoint: Url,
}

impl AptoideSource {
    pub fn new(client: Client, endpoint: &str) -> AppResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AppError::InvalidConfig(format!("catalogue url '{}': {}", endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::InvalidConfig(format!(
                "catalogue url must be http(s), got '{}'",
                endpoint.scheme()
            )));
        }
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteSource for AptoideSource {
    async fn fetch_all(&self) -> AppResult<Vec<AppRecord>> {
        let resp = self.client.get(self.endpoint.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("Catalogue request returned status {}", status);
            return Err(AppError::Upstream(format!("catalogue returned status {}", status)));
        }

        let body: CatalogueResponse = resp.json().await?;
        let records = body.into_records();
        log::info!("Fetched {} apps from {}", records.len(), self.endpoint);
        Ok(records)
    }
}

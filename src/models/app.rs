use serde::{Deserialize, Serialize};

/// One catalogued application entry.
///
/// `id` is the join key between remote and cached copies. `is_favorite` is
/// never supplied by the remote catalogue; it lives in the local cache only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: u64,
    pub name: String,
    pub package_name: String,
    pub icon: Option<String>,
    pub graphic: Option<String>,
    pub description: Option<String>,
    pub developer_name: Option<String>,
    pub developer_website: Option<String>,
    pub downloads: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub version_name: Option<String>,
    pub size: Option<u64>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl AppRecord {
    /// A record with only the required fields set.
    pub fn new(id: u64, name: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            package_name: package_name.into(),
            icon: None,
            graphic: None,
            description: None,
            developer_name: None,
            developer_website: None,
            downloads: None,
            rating: None,
            rating_count: None,
            version_name: None,
            size: None,
            is_favorite: false,
        }
    }

    pub fn with_favorite(self, is_favorite: bool) -> Self {
        Self { is_favorite, ..self }
    }

    /// Case-insensitive match against name, developer name and package name.
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .developer_name
                .as_deref()
                .map(|d| d.to_lowercase().contains(needle))
                .unwrap_or(false)
            || self.package_name.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_any_of_the_searchable_fields() {
        let mut app = AppRecord::new(1, "Test App", "com.acme.test");
        app.developer_name = Some("Acme Corp".into());

        assert!(app.matches_query("test"));
        assert!(app.matches_query("acme corp"));
        assert!(app.matches_query("com.acme"));
        assert!(!app.matches_query("other"));
    }

    #[test]
    fn missing_developer_does_not_match() {
        let app = AppRecord::new(2, "Maps", "org.maps");
        assert!(!app.matches_query("google"));
    }

    #[test]
    fn favorite_defaults_to_false_when_absent() {
        let app: AppRecord = serde_json::from_str(
            r#"{"id":3,"name":"Chat","packageName":"im.chat","icon":null,"graphic":null,
                "description":null,"developerName":null,"developerWebsite":null,
                "downloads":null,"rating":4.5,"ratingCount":10,"versionName":"1.0","size":2048}"#,
        )
        .unwrap();
        assert!(!app.is_favorite);
        assert_eq!(app.rating, Some(4.5));
    }
}

use crate::models::AppRecord;

/// Derive the visible list from the three view inputs.
///
/// Favorites-only drops non-favorites; a non-blank query keeps records whose
/// name, developer name or package name contains it, ignoring case. Order
/// always follows `apps`.
pub fn filter_apps(apps: &[AppRecord], query: &str, favorites_only: bool) -> Vec<AppRecord> {
    let needle = if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    };

    apps.iter()
        .filter(|app| !favorites_only || app.is_favorite)
        .filter(|app| needle.as_deref().map_or(true, |n| app.matches_query(n)))
        .cloned()
        .collect()
}

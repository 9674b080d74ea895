use crate::errors::AppError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

/// Writes `data` next to `path` and renames it into place, so a crash never
/// leaves a half-written file behind.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, payload).await.map_err(AppError::internal)?;
    if let Err(err) = fs::rename(&staging, path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(AppError::internal(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tweet;
    use chrono::Utc;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("like_toggle_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn persisted_data_loads_back() {
        let path = temp_path("roundtrip");
        let mut data = AppData::default();
        data.next_id = 2;
        data.tweets.insert(
            1,
            Tweet {
                id: 1,
                author: "alice".into(),
                content: "first".into(),
                created_at: Utc::now(),
                liked_by: ["bob".to_string()].into_iter().collect(),
            },
        );

        persist_data(&path, &data).await.unwrap();
        let staging_left = path.with_extension("json.tmp").exists();
        let loaded = load_data(&path).await;
        let _ = std::fs::remove_file(&path);

        assert!(!staging_left);
        assert_eq!(loaded.next_id, 2);
        assert!(loaded.tweets[&1].liked_by.contains("bob"));
    }

    #[tokio::test]
    async fn missing_file_is_empty_data() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.tweets.is_empty());
    }

    #[tokio::test]
    async fn unwritable_location_is_an_error() {
        let path = std::path::PathBuf::from("/like_toggle_no_such_dir/data.json");
        let err = persist_data(&path, &AppData::default()).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}

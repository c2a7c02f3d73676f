use super::write_atomic;
use crate::error::{DatagenError, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

pub const INDEX_FILE: &str = "index.json";

/// Set names listed in `dir/index.json`, empty when there is no index yet
pub async fn read_index(dir: &Path) -> Result<Vec<String>> {
    let path = dir.join(INDEX_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path).await?;
    serde_json::from_str(&content).map_err(|e| {
        DatagenError::Source(format!("malformed index {}: {}", path.display(), e))
    })
}

/// Append `name` to `dir/index.json` unless it is already listed.
///
/// Returns `true` when the index changed.
pub async fn update_index(dir: &Path, name: &str) -> Result<bool> {
    let mut names = read_index(dir).await?;

    if names.iter().any(|existing| existing == name) {
        debug!("Set already in index: {}", name);
        return Ok(false);
    }

    names.push(name.to_string());
    let json = serde_json::to_vec_pretty(&names)?;
    write_atomic(&dir.join(INDEX_FILE), &json).await?;
    info!("📇 Added '{}' to {} ({} sets)", name, dir.join(INDEX_FILE).display(), names.len());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_index_appends_without_duplicates() {
        let temp_dir = TempDir::new().unwrap();

        assert!(update_index(temp_dir.path(), "levanti_sentences").await.unwrap());
        assert!(update_index(temp_dir.path(), "youtube_apc_ar").await.unwrap());
        assert!(!update_index(temp_dir.path(), "levanti_sentences").await.unwrap());

        let names = read_index(temp_dir.path()).await.unwrap();
        assert_eq!(names, vec!["levanti_sentences", "youtube_apc_ar"]);
    }

    #[tokio::test]
    async fn test_existing_entries_are_kept() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(INDEX_FILE), r#"["Handwritten Set"]"#)
            .await
            .unwrap();

        update_index(temp_dir.path(), "New Set").await.unwrap();

        let names = read_index(temp_dir.path()).await.unwrap();
        assert_eq!(names, vec!["Handwritten Set", "New Set"]);
    }

    #[tokio::test]
    async fn test_malformed_index_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(INDEX_FILE), "{not json").await.unwrap();
        assert!(update_index(temp_dir.path(), "x").await.is_err());
    }
}

use super::SourceAdapter;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// One titled web resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub title: String,
    pub url: String,
}

/// JSON array of `{title, url}` objects
pub struct LinksFile {
    path: PathBuf,
}

impl LinksFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceAdapter for LinksFile {
    type Item = LinkEntry;

    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_items(&self) -> Result<Vec<LinkEntry>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read links file {}", self.path.display()))?;
        let entries: Vec<LinkEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Malformed links file {}", self.path.display()))?;
        debug!("Loaded {} links from {}", entries.len(), self.path.display());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_links_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("links.json");
        tokio::fs::write(
            &path,
            r#"[{"title": "Greetings", "url": "https://a.example"}, {"title": "Food", "url": "https://b.example"}]"#,
        )
        .await
        .unwrap();

        let entries = LinksFile::new(&path).fetch_items().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].title, "Food");
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = LinksFile::new(temp_dir.path().join("absent.json")).fetch_items().await;
        assert!(result.is_err());
    }
}

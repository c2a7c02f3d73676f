use super::write_atomic;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Write a set document as pretty-printed UTF-8 JSON
pub async fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(document)?;
    write_atomic(path, &json).await?;
    info!("📄 Wrote {}", path.display());
    Ok(())
}

/// Load a previously written document, `None` if the file does not exist
pub async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).await?;
    Ok(Some(serde_json::from_str(&content)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{RemoteVocab, RemoteVocabSet};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_document_round_trip_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocab_sets/apc/words.json");

        let missing: Option<RemoteVocabSet> = read_document(&path).await.unwrap();
        assert!(missing.is_none());

        let set = RemoteVocabSet {
            name: "Words".to_string(),
            vocabs: vec![RemoteVocab::simple("apc", "مي", "water")],
        };
        write_document(&path, &set).await.unwrap();

        let raw = fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains("\n  \"name\": \"Words\""));
        assert!(raw.contains("مي"));

        let loaded: Option<RemoteVocabSet> = read_document(&path).await.unwrap();
        assert_eq!(loaded, Some(set));
    }
}

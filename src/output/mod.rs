/// Writers for the on-disk set formats
///
/// - monolithic JSON documents (`document`)
/// - four line-delimited entity collections per set (`jsonl`)
/// - the `index.json` catalog next to every set directory (`index`)

pub mod document;
pub mod index;
pub mod jsonl;

pub use document::{read_document, write_document};
pub use index::{read_index, update_index, INDEX_FILE};
pub use jsonl::{read_jsonl, write_entity_set};

use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Directory families below the output root
#[derive(Debug, Clone)]
pub struct OutputLayout {
    base_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resource_sets(&self, language: &str) -> PathBuf {
        self.base_dir.join("resource_sets").join(language)
    }

    pub fn vocab_sets(&self, language: &str) -> PathBuf {
        self.base_dir.join("vocab_sets").join(language)
    }

    pub fn immersion_content_sets(&self, language: &str) -> PathBuf {
        self.base_dir.join("immersion_content_sets").join(language)
    }

    pub fn task_sets(&self, language: &str) -> PathBuf {
        self.base_dir.join("task_sets").join(language)
    }

    /// Parent of all JSONL sets of a language; holds their `index.json`
    pub fn entity_sets(&self, language: &str) -> PathBuf {
        self.base_dir.join("sets").join(language)
    }

    pub fn entity_set(&self, language: &str, set_name: &str) -> PathBuf {
        self.entity_sets(language).join(set_name)
    }
}

/// Write through a sibling temp file so readers never see half a file
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, bytes).await?;
    fs::rename(&tmp_path, path).await?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let layout = OutputLayout::new("/data");
        assert_eq!(layout.resource_sets("apc"), PathBuf::from("/data/resource_sets/apc"));
        assert_eq!(
            layout.entity_set("arz", "lisaanmasry-examples"),
            PathBuf::from("/data/sets/arz/lisaanmasry-examples")
        );
    }

    #[tokio::test]
    async fn test_write_atomic_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a/b/c.json");

        write_atomic(&path, b"[]").await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "[]");
        assert!(!temp_dir.path().join("a/b/c.json.tmp").exists());
    }
}

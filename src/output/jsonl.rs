use super::write_atomic;
use crate::entities::{EntityCounts, EntityExport};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::info;

pub const VOCAB_FILE: &str = "vocab.jsonl";
pub const TRANSLATIONS_FILE: &str = "translations.jsonl";
pub const NOTES_FILE: &str = "notes.jsonl";
pub const LINKS_FILE: &str = "links.jsonl";

/// One compact JSON record per line
pub fn to_jsonl<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    for record in records {
        serde_json::to_writer(&mut buffer, record)?;
        buffer.push(b'\n');
    }
    Ok(buffer)
}

/// Write the four collections of one set into `dir`.
///
/// Every file is written even when its collection is empty, in which case
/// it has zero lines.
pub async fn write_entity_set(dir: &Path, export: &EntityExport<'_>) -> Result<EntityCounts> {
    fs::create_dir_all(dir).await?;

    write_atomic(&dir.join(VOCAB_FILE), &to_jsonl(export.vocab)?).await?;
    write_atomic(&dir.join(TRANSLATIONS_FILE), &to_jsonl(export.translations)?).await?;
    write_atomic(&dir.join(NOTES_FILE), &to_jsonl(export.notes)?).await?;
    write_atomic(&dir.join(LINKS_FILE), &to_jsonl(export.links)?).await?;

    let counts = export.counts();
    info!("💾 Saved {} to {}", counts, dir.display());
    Ok(counts)
}

/// Read a JSONL file back, skipping blank lines
pub async fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path).await?;
    let mut records = Vec::new();
    for line in content.lines().filter(|line| !line.trim().is_empty()) {
        records.push(serde_json::from_str(line)?);
    }
    Ok(records)
}

/// Run-once pipelines, one per CLI subcommand
///
/// Every pipeline fetches raw items from a source, reshapes them into set
/// records and writes the result below an [`OutputLayout`]. Per-item
/// failures are logged and skipped; only setup errors abort a run.

pub mod levanti_sentences;
pub mod levantine_words;
pub mod lisaanmasry;
pub mod picture_vocab;
pub mod resources;
pub mod tatoeba;
pub mod translation_tasks;
pub mod youtube;

pub use levanti_sentences::run_levanti_sentences;
pub use levantine_words::run_levantine_words;
pub use lisaanmasry::{run_lisaanmasry, LisaanMasryOptions};
pub use picture_vocab::{run_picture_vocab, PictureVocabOptions, PictureVocabServices};
pub use resources::run_resources;
pub use tatoeba::run_tatoeba;
pub use translation_tasks::run_translation_tasks;
pub use youtube::{run_youtube, YoutubeOptions};

use crate::entities::{EntityAccumulator, EntityCounts};
use crate::output::jsonl::{LINKS_FILE, NOTES_FILE, TRANSLATIONS_FILE, VOCAB_FILE};
use crate::output::{update_index, write_document, write_entity_set, OutputLayout};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// What one pipeline run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineSummary {
    pub pipeline: String,
    /// Source items turned into output
    pub processed: usize,
    /// Source items dropped after a failure or filter
    pub skipped: usize,
    /// Entity counts for JSONL sets, zero for document sets
    pub counts: EntityCounts,
    pub files: Vec<PathBuf>,
}

impl PipelineSummary {
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            ..Self::default()
        }
    }

    /// Combine the summaries of several sets produced by one run
    pub fn absorb(&mut self, other: PipelineSummary) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.counts.vocab += other.counts.vocab;
        self.counts.translations += other.counts.translations;
        self.counts.notes += other.counts.notes;
        self.counts.links += other.counts.links;
        self.files.extend(other.files);
    }

    pub fn log(&self) {
        info!("📊 Pipeline '{}' finished", self.pipeline);
        info!("   Processed: {}", self.processed);
        info!("   Skipped: {}", self.skipped);
        if self.counts.total() > 0 {
            info!("   Entities: {}", self.counts);
        }
        for file in &self.files {
            info!("   💾 {}", file.display());
        }
    }
}

/// Write an accumulator as the JSONL set `sets/<language>/<set_name>` and
/// list it in the language index
pub(crate) async fn save_entity_set(
    layout: &OutputLayout,
    language: &str,
    set_name: &str,
    accumulator: &EntityAccumulator,
    summary: &mut PipelineSummary,
) -> anyhow::Result<()> {
    let dir = layout.entity_set(language, set_name);
    summary.counts = write_entity_set(&dir, &accumulator.export()).await?;
    update_index(&layout.entity_sets(language), set_name).await?;

    summary.files.extend(
        [VOCAB_FILE, TRANSLATIONS_FILE, NOTES_FILE, LINKS_FILE]
            .iter()
            .map(|file| dir.join(file)),
    );
    Ok(())
}

/// Write `<dir>/<stem>.json` and list `stem` in the directory index
pub(crate) async fn save_document_set<T: Serialize>(
    dir: &Path,
    stem: &str,
    document: &T,
    summary: &mut PipelineSummary,
) -> anyhow::Result<()> {
    let path = dir.join(format!("{}.json", stem));
    write_document(&path, document).await?;
    update_index(dir, stem).await?;
    if !summary.files.contains(&path) {
        summary.files.push(path);
    }
    Ok(())
}

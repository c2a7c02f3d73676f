use super::{save_document_set, PipelineSummary};
use crate::output::OutputLayout;
use crate::remote::{RemoteNote, RemoteTranslation, RemoteVocab, RemoteVocabSet};
use crate::sources::{SourceAdapter, WordRow};
use anyhow::Result;
use tracing::info;

pub const SET_NAME: &str = "1000 Common Levantine Words";
pub const FILE_STEM: &str = "1000_common_levantine";
pub const LANGUAGE: &str = "apc";

/// Arabic word with its English translation; the English note is shown
/// before the exercise, the pronunciation is not
pub fn word_to_vocab(row: WordRow) -> RemoteVocab {
    let mut translation = RemoteTranslation::new(row.english);
    if let Some(note) = row.english_note {
        translation = translation.with_note(RemoteNote::new(note, true));
    }

    RemoteVocab {
        language: LANGUAGE.to_string(),
        priority: 1,
        content: row.arabic,
        translations: vec![translation],
        notes: row
            .pronunciation
            .into_iter()
            .map(|p| RemoteNote::new(p, false))
            .collect(),
    }
}

/// Word table -> `vocab_sets/apc/1000_common_levantine.json`
pub async fn run_levantine_words<S>(source: &S, layout: &OutputLayout) -> Result<PipelineSummary>
where
    S: SourceAdapter<Item = WordRow>,
{
    let mut summary = PipelineSummary::new("levantine-words");

    info!("📖 Parsing word table {}", source.name());
    let rows = source.fetch_items().await?;
    let vocabs: Vec<RemoteVocab> = rows.into_iter().map(word_to_vocab).collect();
    info!("Extracted {} vocabulary items", vocabs.len());
    summary.processed = vocabs.len();

    let set = RemoteVocabSet {
        name: SET_NAME.to_string(),
        vocabs,
    };
    save_document_set(&layout.vocab_sets(LANGUAGE), FILE_STEM, &set, &mut summary).await?;
    Ok(summary)
}

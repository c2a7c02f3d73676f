use super::{save_document_set, PipelineSummary};
use crate::llm::vocab_extraction::{ExtractedVocab, VocabExtractor};
use crate::output::OutputLayout;
use crate::remote::{RemoteTask, RemoteTaskSet, UnitOfMeaning, UnitTranslation};
use crate::sources::{SentencePair, SourceAdapter};
use anyhow::Result;
use tracing::{info, warn};

pub const LANGUAGE: &str = "apc";
pub const TRANSLATION_LANGUAGE: &str = "eng";

/// `translate_sentence_` plus the sentence with every non-alphanumeric
/// character replaced, cut to 40 characters
pub fn task_file_stem(arabic: &str) -> String {
    let safe: String = arabic
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(40)
        .collect();
    format!("translate_sentence_{}", safe)
}

/// Both directions for every extracted pair
pub fn units_of_meaning(vocab: &[ExtractedVocab]) -> Vec<UnitOfMeaning> {
    vocab
        .iter()
        .flat_map(|v| {
            [
                UnitOfMeaning {
                    language: LANGUAGE.to_string(),
                    content: v.original.clone(),
                    translations: vec![UnitTranslation {
                        language: TRANSLATION_LANGUAGE.to_string(),
                        content: v.translation.clone(),
                    }],
                },
                UnitOfMeaning {
                    language: TRANSLATION_LANGUAGE.to_string(),
                    content: v.translation.clone(),
                    translations: vec![UnitTranslation {
                        language: LANGUAGE.to_string(),
                        content: v.original.clone(),
                    }],
                },
            ]
        })
        .collect()
}

pub fn build_task_set(arabic: &str, vocab: &[ExtractedVocab]) -> RemoteTaskSet {
    RemoteTaskSet {
        name: format!("Translate: {}", arabic),
        language: LANGUAGE.to_string(),
        tasks: vec![RemoteTask {
            content: format!("Translate the sentence '{}'", arabic),
            language: LANGUAGE.to_string(),
            primary_units_of_meaning: units_of_meaning(vocab),
            secondary_units_of_meaning: Vec::new(),
        }],
    }
}

/// Sampled sentences -> one `task_sets/apc/translate_sentence_*.json` each
pub async fn run_translation_tasks<S>(
    source: &S,
    extractor: &VocabExtractor,
    layout: &OutputLayout,
) -> Result<PipelineSummary>
where
    S: SourceAdapter<Item = SentencePair>,
{
    let mut summary = PipelineSummary::new("translation-tasks");
    let dir = layout.task_sets(LANGUAGE);

    let sentences = source.fetch_items().await?;
    info!("🎲 Sampled {} sentences from {}", sentences.len(), source.name());

    let total = sentences.len();
    for (i, sentence) in sentences.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, total, sentence.arabic);
        let vocab = extractor
            .extract_from_sentence(&sentence.arabic, &sentence.english)
            .await;
        if vocab.is_empty() {
            warn!("Skipping sentence due to no vocab: {}", sentence.arabic);
            summary.skipped += 1;
            continue;
        }

        let set = build_task_set(&sentence.arabic, &vocab);
        save_document_set(&dir, &task_file_stem(&sentence.arabic), &set, &mut summary).await?;
        summary.processed += 1;
    }

    Ok(summary)
}

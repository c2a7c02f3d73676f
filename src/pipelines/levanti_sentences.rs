use super::{save_document_set, PipelineSummary};
use crate::output::OutputLayout;
use crate::remote::{RemoteImmersionContent, RemoteImmersionContentSet, RemoteNote, RemoteVocab};
use crate::sources::{LevantiSentence, SourceAdapter};
use anyhow::Result;
use tracing::info;

pub const SET_NAME: &str = "Levanti Dataset Sentences";
pub const FILE_STEM: &str = "levanti_sentences";
pub const LANGUAGE: &str = "apc";

/// `position` is 1-based and ends up in the title
pub fn sentence_to_immersion(sentence: LevantiSentence, position: usize) -> RemoteImmersionContent {
    RemoteImmersionContent {
        language: LANGUAGE.to_string(),
        priority: 1,
        title: format!("Levanti Sentence {}", position),
        content: sentence.apc,
        needed_vocab: sentence
            .vocab
            .into_iter()
            .map(|v| RemoteVocab::simple(LANGUAGE, v.apc, v.eng))
            .collect(),
        notes: vec![RemoteNote::new(format!("English: {}", sentence.eng), false)],
    }
}

/// Sentence dataset -> `immersion_content_sets/apc/levanti_sentences.json`
pub async fn run_levanti_sentences<S>(source: &S, layout: &OutputLayout) -> Result<PipelineSummary>
where
    S: SourceAdapter<Item = LevantiSentence>,
{
    let mut summary = PipelineSummary::new("levanti-sentences");

    let sentences = source.fetch_items().await?;
    info!("📚 Loaded {} sentences from {}", sentences.len(), source.name());

    let immersion_content: Vec<_> = sentences
        .into_iter()
        .enumerate()
        .map(|(i, sentence)| sentence_to_immersion(sentence, i + 1))
        .collect();
    summary.processed = immersion_content.len();
    info!("Converted to {} immersion content items", immersion_content.len());

    let set = RemoteImmersionContentSet {
        name: SET_NAME.to_string(),
        immersion_content,
    };
    save_document_set(&layout.immersion_content_sets(LANGUAGE), FILE_STEM, &set, &mut summary)
        .await?;
    Ok(summary)
}

use super::{save_entity_set, PipelineSummary};
use crate::entities::{
    EntityAccumulator, EntityId, NewLink, NewNote, NewTranslation, NewVocab, VocabRelations,
};
use crate::output::OutputLayout;
use crate::sources::lisaanmasry::{
    ATTRIBUTION_LABEL, ATTRIBUTION_LICENSE, ATTRIBUTION_OWNER, ATTRIBUTION_OWNER_LINK,
};
use crate::sources::{ExampleSentence, LisaanMasryClient, WordEntry};
use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

pub const SET_NAME: &str = "lisaanmasry-examples";
pub const LANGUAGE: &str = "arz";

const PRONUNCIATION: &str = "pronunciation";
const LINGUISTIC_TYPE: &str = "linguistic type";

#[derive(Debug, Clone)]
pub struct LisaanMasryOptions {
    pub max_sentences: usize,
    pub page_pause: Duration,
}

fn attribution_link(url: String) -> NewLink {
    NewLink::new(ATTRIBUTION_LABEL, url)
        .owner(ATTRIBUTION_OWNER)
        .owner_link(ATTRIBUTION_OWNER_LINK)
        .license(ATTRIBUTION_LICENSE)
}

fn linguistic_type_note(acc: &mut EntityAccumulator, content: &str) -> EntityId {
    acc.create_note(
        NewNote::new(content)
            .note_type(LINGUISTIC_TYPE)
            .show_before_exercise(true),
    )
}

/// Sentence vocab with its translation; returns the vocab id
pub fn add_sentence(
    acc: &mut EntityAccumulator,
    sentence: &ExampleSentence,
    sentence_link: &EntityId,
) -> EntityId {
    let mut notes = Vec::new();
    if let Some(transliteration) = &sentence.transliteration {
        notes.push(acc.create_note(NewNote::new(transliteration).note_type(PRONUNCIATION)));
    }
    if let Some(general) = &sentence.notes {
        notes.push(acc.create_note(NewNote::new(general)));
    }
    let translation = acc.create_translation(NewTranslation::new(&sentence.english));

    acc.create_vocab(
        NewVocab::new(LANGUAGE, &sentence.arabic)
            .notes(notes)
            .translations([translation])
            .links([sentence_link.clone()]),
    )
}

/// One vocab per form; every meaning becomes a translation of all forms.
///
/// Returns the form vocab ids in table order.
pub fn add_word(acc: &mut EntityAccumulator, client: &LisaanMasryClient, entry: &WordEntry) -> Vec<EntityId> {
    let mut form_ids = Vec::new();

    for form in &entry.forms {
        let mut notes = Vec::new();
        if !form.transliteration.is_empty() {
            notes.push(acc.create_note(NewNote::new(&form.transliteration).note_type(PRONUNCIATION)));
        }
        notes.push(linguistic_type_note(acc, &entry.base_type));

        let link = acc.create_link(attribution_link(client.word_link(&form.arabic)));
        form_ids.push(acc.create_vocab(
            NewVocab::new(&entry.language, &form.arabic)
                .notes(notes)
                .links([link]),
        ));
    }

    for meaning in &entry.meanings {
        let mut notes = Vec::new();
        if let Some(note) = &meaning.note {
            notes.push(acc.create_note(NewNote::new(note)));
        }
        if let Some(meaning_type) = &meaning.meaning_type {
            notes.push(linguistic_type_note(acc, meaning_type));
        }

        let translation = acc.create_translation(NewTranslation::new(&meaning.english).notes(notes));
        for form_id in &form_ids {
            acc.relate_vocab(form_id, VocabRelations::new().translations([translation.clone()]));
        }
    }

    form_ids
}

async fn scrape_sentence(
    acc: &mut EntityAccumulator,
    client: &LisaanMasryClient,
    sentence_link: &EntityId,
) -> Result<()> {
    let sentence = client.fetch_example().await?;
    info!("Sentence: {}", sentence.arabic);
    let sentence_id = add_sentence(acc, &sentence, sentence_link);

    let mut word_ids = Vec::new();
    for (i, word) in sentence.words.iter().enumerate() {
        info!("Processing word {} of {}: {}", i + 1, sentence.words.len(), word);
        match client.fetch_word(word).await {
            Ok(Some(entry)) => word_ids.extend(add_word(acc, client, &entry)),
            Ok(None) => warn!("No word details for '{}'", word),
            Err(e) => warn!("Error processing word '{}': {}", word, e),
        }
    }

    if !word_ids.is_empty() {
        acc.relate_vocab(&sentence_id, VocabRelations::new().related_vocab(word_ids));
    }
    info!("Successfully processed sentence: {}", sentence.arabic);
    Ok(())
}

/// Random example sentences and their words -> JSONL set
/// `sets/arz/lisaanmasry-examples`. The first failed page ends the run.
pub async fn run_lisaanmasry(
    client: &LisaanMasryClient,
    layout: &OutputLayout,
    options: &LisaanMasryOptions,
) -> Result<PipelineSummary> {
    let mut summary = PipelineSummary::new("lisaanmasry");
    let mut acc = EntityAccumulator::new();
    let sentence_link = acc.create_link(attribution_link(client.example_url()));

    for i in 0..options.max_sentences {
        info!("📜 Scraping sentence {} of {}", i + 1, options.max_sentences);
        if let Err(e) = scrape_sentence(&mut acc, client, &sentence_link).await {
            warn!("Failed to scrape sentence {}: {}. Stopping.", i + 1, e);
            summary.skipped += 1;
            break;
        }
        summary.processed += 1;

        if i + 1 < options.max_sentences && !options.page_pause.is_zero() {
            tokio::time::sleep(options.page_pause).await;
        }
    }

    save_entity_set(layout, LANGUAGE, SET_NAME, &acc, &mut summary).await?;
    Ok(summary)
}

use super::{save_entity_set, PipelineSummary};
use crate::entities::{EntityAccumulator, EntityId, NewLink, NewTranslation, NewVocab, VocabLength};
use crate::output::OutputLayout;
use crate::sources::{SourceAdapter, TatoebaSentence};
use anyhow::Result;
use tracing::{debug, info};

pub const SET_NAME: &str = "tatoeba-sentences";

fn sentence_link(sentence: &TatoebaSentence) -> NewLink {
    let mut link = NewLink::new(sentence.label(), sentence.page_url());
    if let Some(owner) = &sentence.owner {
        link = link.owner(owner.clone());
    }
    if let Some(profile) = sentence.owner_profile_url() {
        link = link.owner_link(profile);
    }
    if let Some(license) = &sentence.license {
        link = link.license(license.clone());
    }
    link
}

/// Add one source sentence and its translation in `target_language`.
///
/// Returns `false` when the pair is unusable and nothing was created.
pub fn add_sentence_pair(
    acc: &mut EntityAccumulator,
    sentence: &TatoebaSentence,
    target_language: &str,
    shared_link: &EntityId,
) -> bool {
    let source_text = sentence.text.trim();
    if source_text.is_empty() {
        return false;
    }
    let Some(target) = sentence.translation_in(target_language) else {
        debug!("No {} sentence found for: {}", target_language, source_text);
        return false;
    };

    acc.create_link(sentence_link(sentence));
    let target_link = acc.create_link(sentence_link(target));
    let translation = acc.create_translation(NewTranslation::new(source_text).priority(1));
    acc.create_vocab(
        NewVocab::new(target_language, target.text.trim())
            .length(VocabLength::Sentence)
            .priority(2)
            .translations([translation])
            .links([target_link, shared_link.clone()]),
    );
    true
}

/// Tatoeba pages -> JSONL set `sets/<target>/tatoeba-sentences`
pub async fn run_tatoeba<S>(
    source: &S,
    target_language: &str,
    layout: &OutputLayout,
) -> Result<PipelineSummary>
where
    S: SourceAdapter<Item = TatoebaSentence>,
{
    let mut summary = PipelineSummary::new("tatoeba");
    let sentences = source.fetch_items().await?;
    info!("Processing {} sentences from {}", sentences.len(), source.name());

    let mut acc = EntityAccumulator::new();
    let shared_link = acc.create_link(
        NewLink::new("tatoeba.org", "https://tatoeba.org").license("CC BY 2.0"),
    );

    for sentence in &sentences {
        if add_sentence_pair(&mut acc, sentence, target_language, &shared_link) {
            summary.processed += 1;
            if summary.processed % 50 == 0 {
                info!("Processed {} sentence pairs...", summary.processed);
            }
        } else {
            summary.skipped += 1;
        }
    }
    info!("Successfully processed {} sentence pairs", summary.processed);

    save_entity_set(layout, target_language, SET_NAME, &acc, &mut summary).await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(id: u64, text: &str, lang: &str, translations: Vec<TatoebaSentence>) -> TatoebaSentence {
        TatoebaSentence {
            id: Some(id),
            text: text.to_string(),
            lang: Some(lang.to_string()),
            owner: Some("alice".to_string()),
            license: Some("CC BY 2.0 FR".to_string()),
            translations: vec![translations],
        }
    }

    #[test]
    fn test_pair_creates_links_translation_and_vocab() {
        let mut acc = EntityAccumulator::new();
        let shared = acc.create_link(NewLink::new("tatoeba.org", "https://tatoeba.org"));
        let pair = sentence(1, "Hello.", "eng", vec![sentence(2, "Привет.", "rus", Vec::new())]);

        assert!(add_sentence_pair(&mut acc, &pair, "rus", &shared));

        let export = acc.export();
        assert_eq!(export.links.len(), 3);
        assert_eq!(export.links[2].label, "Tatoeba #2");
        assert_eq!(
            export.links[2].owner_link.as_deref(),
            Some("https://tatoeba.org/en/user/profile/alice")
        );
        assert_eq!(export.translations[0].priority, Some(1));
        let vocab = &export.vocab[0];
        assert_eq!(vocab.content, "Привет.");
        assert_eq!(vocab.length, Some(VocabLength::Sentence));
        assert_eq!(vocab.priority, Some(2));
        assert_eq!(vocab.links, vec![EntityId::from("3"), EntityId::from("1")]);
    }

    #[test]
    fn test_pair_without_target_language_is_skipped() {
        let mut acc = EntityAccumulator::new();
        let shared = acc.create_link(NewLink::new("tatoeba.org", "https://tatoeba.org"));
        let pair = sentence(1, "Hello.", "eng", vec![sentence(3, "Hallo.", "deu", Vec::new())]);

        assert!(!add_sentence_pair(&mut acc, &pair, "rus", &shared));
        assert_eq!(acc.counts().links, 1);
        assert_eq!(acc.counts().vocab, 0);
    }
}

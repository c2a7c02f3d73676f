use super::{save_entity_set, PipelineSummary};
use crate::config::PictureLanguage;
use crate::entities::{EntityAccumulator, EntityId, NewLink, NewTranslation, NewVocab, SoundRef};
use crate::output::OutputLayout;
use crate::services::{
    audio_filename, ensure_audio, find_or_fetch_image, translate_or_skip, ImageLibrary,
    ImageSearch, SpeechSynthesizer, Translator,
};
use crate::sources::SourceAdapter;
use anyhow::{anyhow, Result};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Words handled by a debug run
const DEBUG_WORD_LIMIT: usize = 2;

/// External services for one picture-vocabulary run
pub struct PictureVocabServices<'a> {
    pub translator: &'a dyn Translator,
    pub speech: &'a dyn SpeechSynthesizer,
    /// Only set with `--fetch-images`; otherwise images must already exist
    pub image_search: Option<&'a dyn ImageSearch>,
    pub images: &'a ImageLibrary,
    pub translate_timeout: Duration,
    pub speech_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PictureVocabOptions {
    pub set_name: String,
    pub word_pause: Duration,
    pub debug: bool,
}

/// Translate one English word and add it with its image and audio.
///
/// Returns `false` when the word had to be skipped.
async fn process_word(
    acc: &mut EntityAccumulator,
    english_word: &str,
    language: &PictureLanguage,
    services: &PictureVocabServices<'_>,
    audio_dir: &Path,
    pexels_link: &EntityId,
) -> bool {
    info!("Processing word '{}' for {}", english_word, language.name);

    let image_search = services.image_search;
    let Some(image_filename) = find_or_fetch_image(services.images, image_search, english_word).await
    else {
        warn!(
            "Skipping '{}' for {} - no fitting image exists",
            english_word, language.name
        );
        return false;
    };

    let Some(translated) = translate_or_skip(
        services.translator,
        english_word,
        &language.deepl_code,
        services.translate_timeout,
    )
    .await
    else {
        warn!("Skipping '{}' for {} - translation failed", english_word, language.name);
        return false;
    };
    let target_word = translated.text;
    info!("Translated '{}' to '{}' ({})", english_word, target_word, language.name);

    let audio = audio_filename(&target_word, services.speech.format());
    let has_audio = ensure_audio(
        services.speech,
        &target_word,
        audio_dir,
        &audio,
        services.speech_timeout,
    )
    .await;

    let translation = acc.create_translation(NewTranslation::new(english_word));
    let sounds = has_audio.then(|| SoundRef { filename: audio });
    acc.create_vocab(
        NewVocab::new(&language.code, &target_word)
            .considered_word(true)
            .picturable(true)
            .translations([translation])
            .links([pexels_link.clone()])
            .images([ImageLibrary::image_ref(english_word, &image_filename)])
            .sounds(sounds),
    );

    info!(
        "Successfully processed '{}' -> '{}' ({})",
        english_word, target_word, language.name
    );
    true
}

/// English picture words -> JSONL set `sets/<language>/<set name>` for one
/// language, with audio under the set's `audio/` directory
pub async fn run_picture_vocab<S>(
    words: &S,
    language: &PictureLanguage,
    services: &PictureVocabServices<'_>,
    options: &PictureVocabOptions,
    layout: &OutputLayout,
) -> Result<PipelineSummary>
where
    S: SourceAdapter<Item = String>,
{
    if services.image_search.is_none() && !services.images.exists() {
        return Err(anyhow!(
            "Existing images directory not found: {}",
            services.images.dir().display()
        ));
    }

    let mut summary = PipelineSummary::new(format!("picture-vocab ({})", language.code));
    let mut words = words.fetch_items().await?;
    if options.debug {
        words.truncate(DEBUG_WORD_LIMIT);
        info!("Debug mode: processing only the first {} words", words.len());
    }

    info!("🌍 Processing {} words for {}", words.len(), language.name);
    let audio_dir = layout.entity_set(&language.code, &options.set_name).join("audio");

    let mut acc = EntityAccumulator::new();
    let pexels_link = acc.create_link(
        NewLink::new("Pexels", "https://pexels.com").license("Pexels License"),
    );

    let total = words.len();
    for (i, word) in words.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, total, word);
        if process_word(&mut acc, word, language, services, &audio_dir, &pexels_link).await {
            summary.processed += 1;
        } else {
            summary.skipped += 1;
        }

        if i + 1 < total && !options.word_pause.is_zero() {
            tokio::time::sleep(options.word_pause).await;
        }
    }

    info!(
        "Completed {}: {} successful, {} failed",
        language.name, summary.processed, summary.skipped
    );
    save_entity_set(layout, &language.code, &options.set_name, &acc, &mut summary).await?;
    Ok(summary)
}

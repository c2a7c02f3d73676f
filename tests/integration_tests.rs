use anyhow::{anyhow, Result};
use async_trait::async_trait;
use linguanodon_sets::config::PictureLanguage;
use linguanodon_sets::entities::{Link, Translation, Vocab};
use linguanodon_sets::llm::{ChatMessage, LLMProvider, LLMResponse, VocabExtractor, LLM};
use linguanodon_sets::output::{read_document, read_index, read_jsonl, OutputLayout};
use linguanodon_sets::pipelines::{
    run_picture_vocab, run_tatoeba, run_translation_tasks, run_youtube, PictureVocabOptions,
    PictureVocabServices, YoutubeOptions,
};
use linguanodon_sets::remote::{RemoteImmersionContentSet, RemoteTaskSet};
use linguanodon_sets::services::{ImageLibrary, SpeechSynthesizer, TranslatedText, Translator};
use linguanodon_sets::sources::{
    SentencePair, StaticSource, SubtitleSource, TatoebaSentence, VideoList,
};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;

/// Answers with every known word that occurs in the prompt
struct GlossaryLLM {
    glossary: Vec<(&'static str, &'static str)>,
}

impl GlossaryLLM {
    fn boxed() -> Box<dyn LLM> {
        Box::new(Self {
            glossary: vec![("بيت", "house"), ("سيارة", "car"), ("كبير", "big")],
        })
    }
}

#[async_trait]
impl LLM for GlossaryLLM {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        let found: Vec<_> = self
            .glossary
            .iter()
            .filter(|(original, _)| prompt.contains(original))
            .map(|(original, translation)| {
                serde_json::json!({"original": original, "translation": translation})
            })
            .collect();
        Ok(LLMResponse {
            content: serde_json::json!({ "vocabulary": found }).to_string(),
            tokens_used: None,
        })
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::LMStudio
    }
}

struct FakeSubtitles {
    videos: HashMap<&'static str, Vec<&'static str>>,
}

#[async_trait]
impl SubtitleSource for FakeSubtitles {
    async fn fetch_lines(&self, video_id: &str, _language: &str) -> Result<Vec<String>> {
        self.videos
            .get(video_id)
            .map(|lines| lines.iter().map(|l| l.to_string()).collect())
            .ok_or_else(|| anyhow!("No subtitles for {}", video_id))
    }
}

fn subtitles() -> FakeSubtitles {
    let mut videos = HashMap::new();
    videos.insert("vid1", vec!["هاد بيت كبير", "بيت و سيارة"]);
    videos.insert("vid3", vec!["[موسيقى]"]);
    FakeSubtitles { videos }
}

fn video_list(ids: &[&str]) -> VideoList {
    VideoList {
        target_language: "apc".to_string(),
        subtitle_language: "ar".to_string(),
        video_ids: ids.iter().map(|id| id.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_youtube_skips_failed_and_already_processed_videos() {
    let temp_dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp_dir.path());
    let extractor = VocabExtractor::new(GlossaryLLM::boxed());
    let list = video_list(&["vid1", "vid2", "vid3"]);

    let summary = run_youtube(&list, &subtitles(), &extractor, &layout, YoutubeOptions::default())
        .await
        .unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);

    let path = layout
        .immersion_content_sets("apc")
        .join("youtube_apc_ar.json");
    let set: RemoteImmersionContentSet = read_document(&path).await.unwrap().unwrap();
    assert_eq!(set.name, "YouTube Videos (apc)");
    assert_eq!(set.immersion_content.len(), 2);

    let first = &set.immersion_content[0];
    assert_eq!(first.title, "YouTube Video - vid1");
    let needed: Vec<_> = first.needed_vocab.iter().map(|v| v.content.as_str()).collect();
    assert_eq!(needed, vec!["بيت", "كبير", "سيارة"]);
    assert!(set.immersion_content[1].needed_vocab.is_empty());

    let rerun = run_youtube(&list, &subtitles(), &extractor, &layout, YoutubeOptions::default())
        .await
        .unwrap();
    assert_eq!(rerun.processed, 0);
    let set: RemoteImmersionContentSet = read_document(&path).await.unwrap().unwrap();
    assert_eq!(set.immersion_content.len(), 2);

    let index = read_index(&layout.immersion_content_sets("apc")).await.unwrap();
    assert_eq!(index, vec!["youtube_apc_ar".to_string()]);
}

#[tokio::test]
async fn test_youtube_keeps_unreadable_set_file() {
    let temp_dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp_dir.path());
    let extractor = VocabExtractor::new(GlossaryLLM::boxed());
    let dir = layout.immersion_content_sets("apc");
    fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("youtube_apc_ar.json");
    fs::write(&path, "{ not json").await.unwrap();

    let result = run_youtube(
        &video_list(&["vid1"]),
        &subtitles(),
        &extractor,
        &layout,
        YoutubeOptions::default(),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).await.unwrap(), "{ not json");
}

#[tokio::test]
async fn test_youtube_debug_stops_after_two_videos() {
    let temp_dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp_dir.path());
    let extractor = VocabExtractor::new(GlossaryLLM::boxed());
    let list = video_list(&["vid1", "vid3", "vid1b"]);

    let summary = run_youtube(
        &list,
        &subtitles(),
        &extractor,
        &layout,
        YoutubeOptions { debug: true },
    )
    .await
    .unwrap();

    assert_eq!(summary.processed + summary.skipped, 2);
}

#[tokio::test]
async fn test_translation_tasks_skip_sentences_without_vocab() {
    let temp_dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp_dir.path());
    let extractor = VocabExtractor::new(GlossaryLLM::boxed());
    let source = StaticSource::new(
        "sample",
        vec![
            SentencePair {
                arabic: "البيت كبير".to_string(),
                english: "The house is big".to_string(),
            },
            SentencePair {
                arabic: "شو اسمك".to_string(),
                english: "What is your name".to_string(),
            },
        ],
    );

    let summary = run_translation_tasks(&source, &extractor, &layout).await.unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);

    let dir = layout.task_sets("apc");
    let path = dir.join("translate_sentence_البيت_كبير.json");
    let set: RemoteTaskSet = read_document(&path).await.unwrap().unwrap();
    assert_eq!(set.name, "Translate: البيت كبير");
    // بيت and كبير, each in both directions
    assert_eq!(set.tasks[0].primary_units_of_meaning.len(), 4);
    assert!(set.tasks[0].secondary_units_of_meaning.is_empty());

    let index = read_index(&dir).await.unwrap();
    assert_eq!(index, vec!["translate_sentence_البيت_كبير".to_string()]);
}

fn tatoeba_sentence(id: u64, text: &str, lang: &str, translations: Vec<TatoebaSentence>) -> TatoebaSentence {
    TatoebaSentence {
        id: Some(id),
        text: text.to_string(),
        lang: Some(lang.to_string()),
        owner: Some("kat".to_string()),
        license: Some("CC BY 2.0 FR".to_string()),
        translations: vec![translations],
    }
}

#[tokio::test]
async fn test_tatoeba_writes_jsonl_set() {
    let temp_dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp_dir.path());
    let source = StaticSource::new(
        "tatoeba",
        vec![
            tatoeba_sentence(10, "I'm hungry.", "eng", vec![tatoeba_sentence(11, "Я голоден.", "rus", Vec::new())]),
            tatoeba_sentence(12, "Hi.", "eng", vec![tatoeba_sentence(13, "Salut.", "fra", Vec::new())]),
            tatoeba_sentence(14, "I'm hungry.", "eng", vec![tatoeba_sentence(15, "Я голодна.", "rus", Vec::new())]),
        ],
    );

    let summary = run_tatoeba(&source, "rus", &layout).await.unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);

    let dir = layout.entity_set("rus", "tatoeba-sentences");
    let vocab: Vec<Vocab> = read_jsonl(&dir.join("vocab.jsonl")).await.unwrap();
    let translations: Vec<Translation> = read_jsonl(&dir.join("translations.jsonl")).await.unwrap();
    let links: Vec<Link> = read_jsonl(&dir.join("links.jsonl")).await.unwrap();

    assert_eq!(vocab.len(), 2);
    // Both Russian sentences translate the same English one
    assert_eq!(translations.len(), 1);
    assert_eq!(vocab[0].translations, vocab[1].translations);
    assert_eq!(links.len(), 5);
    assert_eq!(links[0].license.as_deref(), Some("CC BY 2.0"));

    let notes = fs::read_to_string(dir.join("notes.jsonl")).await.unwrap();
    assert!(notes.is_empty());

    let index = read_index(&layout.entity_sets("rus")).await.unwrap();
    assert_eq!(index, vec!["tatoeba-sentences".to_string()]);
}

struct DictionaryTranslator;

#[async_trait]
impl Translator for DictionaryTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<TranslatedText> {
        let translated = match (text, target_language) {
            ("the apple", "ES") => "la manzana",
            ("the dog", "ES") => "el perro",
            _ => return Err(anyhow!("unknown word {}", text)),
        };
        Ok(TranslatedText {
            text: translated.to_string(),
            detected_source_language: Some("EN".to_string()),
        })
    }
}

struct EchoSpeech;

#[async_trait]
impl SpeechSynthesizer for EchoSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }

    fn format(&self) -> &str {
        "opus"
    }
}

#[tokio::test]
async fn test_picture_vocab_requires_images_and_merges_repeats() {
    let temp_dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp_dir.path().join("out"));
    let images_dir = temp_dir.path().join("images");
    fs::create_dir_all(&images_dir).await.unwrap();
    fs::write(images_dir.join("apple.jpg"), b"jpg").await.unwrap();
    fs::write(images_dir.join("cat.jpg"), b"jpg").await.unwrap();

    let images = ImageLibrary::new(&images_dir);
    let services = PictureVocabServices {
        translator: &DictionaryTranslator,
        speech: &EchoSpeech,
        image_search: None,
        images: &images,
        translate_timeout: Duration::from_secs(1),
        speech_timeout: Duration::from_secs(1),
    };
    let options = PictureVocabOptions {
        set_name: "basic-vocab-with-images-and-sound".to_string(),
        word_pause: Duration::ZERO,
        debug: false,
    };
    let words = StaticSource::new(
        "words",
        vec![
            "the apple".to_string(),
            "the dog".to_string(),
            "the cat".to_string(),
            "the apple".to_string(),
        ],
    );
    let spanish = PictureLanguage::new("spa", "Spanish", "ES");

    let summary = run_picture_vocab(&words, &spanish, &services, &options, &layout)
        .await
        .unwrap();

    // dog has no image, cat has no translation
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 2);

    let dir = layout.entity_set("spa", "basic-vocab-with-images-and-sound");
    let vocab: Vec<Vocab> = read_jsonl(&dir.join("vocab.jsonl")).await.unwrap();
    assert_eq!(vocab.len(), 1);
    let manzana = &vocab[0];
    assert_eq!(manzana.content, "la manzana");
    assert_eq!(manzana.is_picturable, Some(true));
    assert_eq!(manzana.considered_word, Some(true));
    assert_eq!(manzana.images[0].alt, "Image of apple");
    assert_eq!(manzana.sounds[0].filename, "la manzana.opus");
    assert!(dir.join("audio").join("la manzana.opus").exists());

    let links: Vec<Link> = read_jsonl(&dir.join("links.jsonl")).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].label, "Pexels");
    assert_eq!(manzana.links, vec![links[0].id.clone()]);
}

#[tokio::test]
async fn test_picture_vocab_fails_without_image_directory() {
    let temp_dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp_dir.path());
    let images = ImageLibrary::new(temp_dir.path().join("missing"));
    let services = PictureVocabServices {
        translator: &DictionaryTranslator,
        speech: &EchoSpeech,
        image_search: None,
        images: &images,
        translate_timeout: Duration::from_secs(1),
        speech_timeout: Duration::from_secs(1),
    };
    let options = PictureVocabOptions {
        set_name: "basic".to_string(),
        word_pause: Duration::ZERO,
        debug: true,
    };
    let words = StaticSource::new("words", vec!["the apple".to_string()]);
    let german = PictureLanguage::new("deu", "German", "DE");

    let result = run_picture_vocab(&words, &german, &services, &options, &layout).await;
    assert!(result.is_err());
}

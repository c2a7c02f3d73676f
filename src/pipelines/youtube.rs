use super::{save_document_set, PipelineSummary};
use crate::llm::vocab_extraction::{ExtractedVocab, VocabExtractor};
use crate::output::{read_document, OutputLayout};
use crate::remote::{RemoteImmersionContent, RemoteImmersionContentSet, RemoteNote, RemoteVocab};
use crate::sources::{SubtitleSource, VideoList};
use anyhow::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Videos looked at before a debug run stops
const DEBUG_VIDEO_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct YoutubeOptions {
    pub debug: bool,
}

pub fn set_name(target_language: &str) -> String {
    format!("YouTube Videos ({})", target_language)
}

pub fn video_title(video_id: &str) -> String {
    format!("YouTube Video - {}", video_id)
}

/// Drop repeated `(original, translation)` pairs, keeping first-seen order
pub fn unique_vocab(vocab: Vec<ExtractedVocab>) -> Vec<ExtractedVocab> {
    let mut seen = HashSet::new();
    vocab.into_iter().filter(|v| seen.insert(v.clone())).collect()
}

pub fn video_to_immersion(
    video_id: &str,
    target_language: &str,
    subtitle_language: &str,
    vocab: Vec<ExtractedVocab>,
) -> RemoteImmersionContent {
    RemoteImmersionContent {
        language: target_language.to_string(),
        priority: 1,
        title: video_title(video_id),
        content: format!("Watch this video: https://www.youtube.com/watch?v={}", video_id),
        needed_vocab: unique_vocab(vocab)
            .into_iter()
            .map(|v| RemoteVocab::simple(target_language, v.original, v.translation))
            .collect(),
        notes: vec![RemoteNote::new(
            format!(
                "YouTube Video ID: {}\nSubtitle language: {}",
                video_id, subtitle_language
            ),
            false,
        )],
    }
}

async fn process_video(
    video_id: &str,
    list: &VideoList,
    subtitles: &dyn SubtitleSource,
    extractor: &VocabExtractor,
) -> Result<RemoteImmersionContent> {
    let lines = subtitles.fetch_lines(video_id, &list.subtitle_language).await?;
    for (i, line) in lines.iter().take(3).enumerate() {
        debug!("Line {}: {}", i + 1, line);
    }

    let mut all_vocab = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        debug!("Processing line {}/{}: {}", i + 1, lines.len(), line);
        all_vocab.extend(extractor.extract_from_line(line, &list.subtitle_language).await);
    }
    info!("Extracted {} vocab objects from {} lines", all_vocab.len(), lines.len());

    Ok(video_to_immersion(
        video_id,
        &list.target_language,
        &list.subtitle_language,
        all_vocab,
    ))
}

/// Video list -> `immersion_content_sets/<target>/youtube_<target>_<subtitle>.json`.
///
/// The set file is rewritten after every video; videos already present in
/// an existing file are not fetched again.
pub async fn run_youtube(
    list: &VideoList,
    subtitles: &dyn SubtitleSource,
    extractor: &VocabExtractor,
    layout: &OutputLayout,
    options: YoutubeOptions,
) -> Result<PipelineSummary> {
    let mut summary = PipelineSummary::new("youtube");
    let dir = layout.immersion_content_sets(&list.target_language);
    let stem = list.set_file_stem();
    let path = dir.join(format!("{}.json", stem));

    // An unreadable set would be overwritten by the first saved video
    let existing = read_document::<RemoteImmersionContentSet>(&path)
        .await
        .with_context(|| format!("Refusing to overwrite unreadable set {}", path.display()))?;
    let mut set = match existing {
        Some(existing) => {
            info!(
                "📂 Resuming {} with {} existing videos",
                path.display(),
                existing.immersion_content.len()
            );
            existing
        }
        None => RemoteImmersionContentSet {
            name: set_name(&list.target_language),
            immersion_content: Vec::new(),
        },
    };

    let done: HashSet<String> = set
        .immersion_content
        .iter()
        .map(|item| item.title.clone())
        .collect();

    let total = list.video_ids.len();
    let mut attempted = 0;
    for (i, video_id) in list.video_ids.iter().enumerate() {
        if done.contains(&video_title(video_id)) {
            info!("[{}/{}] Video {} already processed, skipping", i + 1, total, video_id);
            summary.skipped += 1;
            continue;
        }

        info!("[{}/{}] 📹 Processing video: {}", i + 1, total, video_id);
        attempted += 1;
        match process_video(video_id, list, subtitles, extractor).await {
            Ok(item) => {
                info!("✅ {} needs {} vocab", video_id, item.needed_vocab.len());
                set.immersion_content.push(item);
                summary.processed += 1;
                save_document_set(&dir, &stem, &set, &mut summary).await?;
            }
            Err(e) => {
                warn!("❌ Error processing video {}: {}. Skipping this video.", video_id, e);
                summary.skipped += 1;
            }
        }

        if options.debug && attempted >= DEBUG_VIDEO_LIMIT {
            info!("Debug mode: stopping after {} videos", DEBUG_VIDEO_LIMIT);
            break;
        }
    }

    if summary.files.is_empty() {
        save_document_set(&dir, &stem, &set, &mut summary).await?;
    }
    info!("Set contains {} immersion content items", set.immersion_content.len());
    Ok(summary)
}

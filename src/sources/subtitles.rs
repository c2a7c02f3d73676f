use super::{element_text, selector, squash_whitespace, SourceAdapter};
use crate::error::DatagenError;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Fetches the subtitle lines of one video
#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// Trimmed, non-empty lines in playback order
    async fn fetch_lines(&self, video_id: &str, language: &str) -> Result<Vec<String>>;
}

/// Video ids read from `<target>_<subtitle>.txt`, one per line
#[derive(Debug, Clone, PartialEq)]
pub struct VideoList {
    /// Language the immersion content is filed under
    pub target_language: String,
    /// Language of the subtitle track to fetch
    pub subtitle_language: String,
    pub video_ids: Vec<String>,
}

impl VideoList {
    pub async fn load(path: &Path) -> Result<Self> {
        let (target_language, subtitle_language) = parse_language_codes(path)?;
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read video list {}", path.display()))?;
        let video_ids = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        info!("📼 Loaded {} video IDs from {}", video_ids.len(), path.display());

        Ok(Self {
            target_language,
            subtitle_language,
            video_ids,
        })
    }

    /// Name of the immersion set produced from this list
    pub fn set_file_stem(&self) -> String {
        format!("youtube_{}_{}", self.target_language, self.subtitle_language)
    }
}

#[async_trait]
impl SourceAdapter for VideoList {
    type Item = String;

    fn name(&self) -> String {
        self.set_file_stem()
    }

    async fn fetch_items(&self) -> Result<Vec<String>> {
        Ok(self.video_ids.clone())
    }
}

/// Split a `<target>_<subtitle>` file stem into its two language codes
pub fn parse_language_codes(path: &Path) -> std::result::Result<(String, String), DatagenError> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let invalid = || {
        DatagenError::InvalidConfig(format!(
            "Could not parse language codes from '{}'. Expected '<target>_<subtitle>.txt'",
            path.display()
        ))
    };

    let mut parts = stem.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(target), Some(subtitle), None) if !target.is_empty() && !subtitle.is_empty() => {
            Ok((target.to_string(), subtitle.to_string()))
        }
        _ => Err(invalid()),
    }
}

/// Subtitles from YouTube's timed-text endpoint
pub struct TimedTextClient {
    client: Client,
    endpoint: String,
}

impl TimedTextClient {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SubtitleSource for TimedTextClient {
    async fn fetch_lines(&self, video_id: &str, language: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("v", video_id), ("lang", language)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error {} for video {}", response.status(), video_id));
        }

        let body = response.text().await?;
        let lines = parse_timed_text(&body)?;
        if lines.is_empty() {
            return Err(anyhow!("No '{}' subtitles for video {}", language, video_id));
        }

        info!("Downloaded {} subtitle lines (language: {})", lines.len(), language);
        Ok(lines)
    }
}

/// Text of every `<text>` cue, entities decoded
pub fn parse_timed_text(xml: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(xml);
    let cue_selector = selector("text")?;

    // Cue text arrives escaped twice (`&amp;#39;`); the XML parse undoes one layer
    Ok(document
        .select(&cue_selector)
        .map(|cue| html_escape::decode_html_entities(&element_text(&cue)).into_owned())
        .filter(|line| !line.is_empty())
        .collect())
}

/// Local `<video id>.srt` files
pub struct SrtDirectory {
    dir: PathBuf,
}

impl SrtDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SubtitleSource for SrtDirectory {
    async fn fetch_lines(&self, video_id: &str, _language: &str) -> Result<Vec<String>> {
        let path = self.dir.join(format!("{}.srt", video_id));
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("No subtitle file {}", path.display()))?;
        let cues = parse_srt(&content)?;
        debug!("Parsed {} cues from {}", cues.len(), path.display());
        Ok(cues.into_iter().map(|cue| cue.text).collect())
    }
}

/// One SubRip cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    pub index: u32,
    pub start: Duration,
    pub end: Duration,
    pub text: String,
}

/// Parse SubRip content; cues with empty text are dropped
pub fn parse_srt(content: &str) -> Result<Vec<SubtitleCue>> {
    let normalized = content.replace("\r\n", "\n");
    let mut cues = Vec::new();

    for block in normalized.split("\n\n") {
        let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
        let Some(first) = lines.next() else {
            continue;
        };

        // The index line is optional in the wild
        let (index, timing) = match first.parse::<u32>() {
            Ok(index) => (index, lines.next().unwrap_or_default()),
            Err(_) => (cues.len() as u32 + 1, first),
        };

        let (start, end) = parse_timing(timing)
            .with_context(|| format!("Invalid SRT timing line '{}'", timing))?;
        let text = squash_whitespace(&lines.collect::<Vec<_>>().join(" "));
        if text.is_empty() {
            continue;
        }

        cues.push(SubtitleCue {
            index,
            start,
            end,
            text,
        });
    }

    Ok(cues)
}

fn parse_timing(line: &str) -> Result<(Duration, Duration)> {
    let (start, end) = line
        .split_once(" --> ")
        .ok_or_else(|| anyhow!("Invalid timestamp format"))?;
    Ok((parse_single_timestamp(start)?, parse_single_timestamp(end)?))
}

/// Parse a single timestamp (HH:MM:SS,mmm)
fn parse_single_timestamp(timestamp: &str) -> Result<Duration> {
    let (hms, millis) = timestamp
        .trim()
        .split_once(|c: char| c == ',' || c == '.')
        .ok_or_else(|| anyhow!("Invalid timestamp format"))?;

    let hms_parts: Vec<&str> = hms.split(':').collect();
    if hms_parts.len() != 3 {
        return Err(anyhow!("Invalid time format"));
    }

    let hours: u64 = hms_parts[0].parse()?;
    let minutes: u64 = hms_parts[1].parse()?;
    let seconds: u64 = hms_parts[2].parse()?;
    let milliseconds: u64 = millis.parse()?;

    let total_seconds = hours * 3600 + minutes * 60 + seconds;
    Ok(Duration::from_millis(total_seconds * 1000 + milliseconds))
}

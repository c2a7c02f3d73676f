use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Text-to-speech returning encoded audio bytes
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// File extension of the produced audio
    fn format(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

/// OpenAI audio speech endpoint
pub struct OpenAISpeech {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    voice: String,
    format: String,
}

impl OpenAISpeech {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
        format: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
            format: format.into(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAISpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
            response_format: &self.format,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI speech error {}: {}", status, body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn format(&self) -> &str {
        &self.format
    }
}

/// `<text>.<format>`, with path separators replaced
pub fn audio_filename(text: &str, format: &str) -> String {
    let safe: String = text
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.{}", safe, format)
}

/// Make sure `audio_dir/filename` exists, synthesizing it if needed.
///
/// Returns whether the file is available afterwards; failures are logged.
pub async fn ensure_audio(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
    audio_dir: &Path,
    filename: &str,
    limit: Duration,
) -> bool {
    let audio_path = audio_dir.join(filename);
    if audio_path.exists() {
        info!("Audio already exists for '{}': {}", text, filename);
        return true;
    }

    let audio = match tokio::time::timeout(limit, synthesizer.synthesize(text)).await {
        Ok(Ok(audio)) => audio,
        Ok(Err(e)) => {
            warn!("Failed to generate audio for '{}': {}", text, e);
            return false;
        }
        Err(_) => {
            warn!("Speech synthesis timed out after {}s for '{}'", limit.as_secs(), text);
            return false;
        }
    };

    if let Err(e) = tokio::fs::create_dir_all(audio_dir).await {
        warn!("Cannot create {}: {}", audio_dir.display(), e);
        return false;
    }
    match tokio::fs::write(&audio_path, audio).await {
        Ok(()) => {
            info!("🔊 Generated audio for '{}'", text);
            true
        }
        Err(e) => {
            warn!("Failed to save audio {}: {}", audio_path.display(), e);
            false
        }
    }
}

use crate::error::{DatagenError, Result};
use crate::llm::{LLMConfig, LLMProvider};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the set generators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where inputs are read and sets are written
    pub output: OutputConfig,

    /// Chat model used for vocabulary extraction
    pub llm: LLMConfig,

    /// Machine translation service
    pub translation: TranslationConfig,

    /// Speech synthesis and image search
    pub media: MediaConfig,

    /// Per-source settings
    pub sources: SourcesConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root below which all set families are written
    pub base_dir: PathBuf,

    /// Directory holding the local input files (links, HTML table, datasets)
    pub input_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            input_dir: PathBuf::from("data_in"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-free.deepl.com/v2/translate".to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub pexels_api_key: Option<String>,
    pub pexels_endpoint: String,

    pub speech_endpoint: String,
    pub speech_model: String,
    pub speech_voice: String,
    pub speech_format: String,
    pub speech_timeout_seconds: u64,

    /// Existing images shared between picture sets, relative to `output.base_dir`
    pub shared_images_dir: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            pexels_api_key: None,
            pexels_endpoint: "https://api.pexels.com/v1/search".to_string(),
            speech_endpoint: "https://api.openai.com/v1/audio/speech".to_string(),
            speech_model: "tts-1".to_string(),
            speech_voice: "alloy".to_string(),
            speech_format: "opus".to_string(),
            speech_timeout_seconds: 60,
            shared_images_dir: PathBuf::from("sets/cmn/basic-vocab-with-images-and-sound/images"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub tatoeba: TatoebaConfig,
    pub lisaanmasry: LisaanMasryConfig,
    pub youtube: YoutubeConfig,
    pub levanti: LevantiConfig,
    pub picture: PictureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TatoebaConfig {
    pub endpoint: String,
    /// Language of the sentences queried
    pub source_language: String,
    /// Language the sentences must be translated into
    pub target_language: String,
    pub page_size: u32,
    pub page_pause_ms: u64,
    /// Stop after this many pages; unlimited when unset
    pub max_pages: Option<u32>,
}

impl Default for TatoebaConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.tatoeba.org/unstable/sentences".to_string(),
            source_language: "eng".to_string(),
            target_language: "rus".to_string(),
            page_size: 20,
            page_pause_ms: 1000,
            max_pages: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LisaanMasryConfig {
    pub base_url: String,
    pub max_sentences: usize,
    pub debug_sentences: usize,
    pub page_pause_ms: u64,
    pub request_timeout_seconds: u64,
}

impl Default for LisaanMasryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://eu.lisaanmasry.org/online/".to_string(),
            max_sentences: 25,
            debug_sentences: 5,
            page_pause_ms: 1000,
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// Video list named `<target>_<subtitle>.txt`, relative to `output.input_dir`
    pub video_list: PathBuf,
    pub timedtext_endpoint: String,
    /// Read `<video id>.srt` files from here instead of downloading
    pub subtitles_dir: Option<PathBuf>,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            video_list: PathBuf::from("apc_ar.txt"),
            timedtext_endpoint: "https://www.youtube.com/api/timedtext".to_string(),
            subtitles_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevantiConfig {
    /// JSON dataset of sentences with their vocabulary
    pub sentences_file: PathBuf,
    /// CSV dataset with `arabic` and `english` columns
    pub csv_file: PathBuf,
    pub sentence_count: usize,
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for LevantiConfig {
    fn default() -> Self {
        Self {
            sentences_file: PathBuf::from("usable_sentences_with_vocab.json"),
            csv_file: PathBuf::from("levanti_filtered_3cols.csv"),
            sentence_count: 10,
            min_words: 3,
            max_words: 6,
        }
    }
}

/// A language the picture vocabulary is generated for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureLanguage {
    /// ISO 639-3 code used in the output
    pub code: String,
    pub name: String,
    /// Target language code understood by the translation service
    pub deepl_code: String,
}

impl PictureLanguage {
    pub fn new(code: &str, name: &str, deepl_code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            deepl_code: deepl_code.to_string(),
        }
    }

    /// Languages known by code, so the CLI can pick them by name
    pub fn known(code: &str) -> Option<Self> {
        match code {
            "spa" => Some(Self::new("spa", "Spanish", "ES")),
            "deu" => Some(Self::new("deu", "German", "DE")),
            "cmn" => Some(Self::new("cmn", "Mandarin", "ZH")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureConfig {
    pub languages: Vec<PictureLanguage>,
    pub set_name: String,
    pub word_pause_ms: u64,
}

impl Default for PictureConfig {
    fn default() -> Self {
        Self {
            languages: vec![
                PictureLanguage::new("spa", "Spanish", "ES"),
                PictureLanguage::new("deu", "German", "DE"),
            ],
            set_name: "basic-vocab-with-images-and-sound".to_string(),
            word_pause_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the first default location
    /// that exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let config_paths = ["linguanodon-sets.toml", "config/linguanodon-sets.toml"];
                let mut found = None;
                for candidate in &config_paths {
                    let candidate = Path::new(candidate);
                    if candidate.exists() {
                        found = Some(Self::from_file(candidate)?);
                        break;
                    }
                }
                found.unwrap_or_default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let config = toml::from_str(&config_str).map_err(|e| {
            DatagenError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override settings with environment variables when present
    pub fn apply_env(&mut self) {
        if let Some(key) = env_value("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some(key) = env_value("DEEPL_API_KEY") {
            self.translation.api_key = Some(key);
        }

        if let Some(key) = env_value("PEXELS_API_KEY") {
            self.media.pexels_api_key = Some(key);
        }

        if let Some(dir) = env_value("LINGUANODON_OUTPUT_DIR") {
            self.output.base_dir = PathBuf::from(dir);
        }

        if let Some(dir) = env_value("LINGUANODON_INPUT_DIR") {
            self.output.input_dir = PathBuf::from(dir);
        }

        if let Some(level) = env_value("LINGUANODON_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| DatagenError::InvalidConfig(e.to_string()))?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sources.tatoeba.page_size == 0 {
            return Err(DatagenError::InvalidConfig(
                "sources.tatoeba.page_size must be greater than 0".to_string(),
            ));
        }

        let levanti = &self.sources.levanti;
        if levanti.min_words > levanti.max_words {
            return Err(DatagenError::InvalidConfig(format!(
                "sources.levanti.min_words ({}) exceeds max_words ({})",
                levanti.min_words, levanti.max_words
            )));
        }

        if self.sources.picture.languages.is_empty() {
            return Err(DatagenError::InvalidConfig(
                "sources.picture.languages must not be empty".to_string(),
            ));
        }

        if self.translation.timeout_seconds == 0 || self.media.speech_timeout_seconds == 0 {
            return Err(DatagenError::InvalidConfig(
                "service timeouts must be greater than 0".to_string(),
            ));
        }

        if self.llm.provider == LLMProvider::LMStudio && self.llm.model.is_empty() {
            return Err(DatagenError::InvalidConfig(
                "llm.model must name the model loaded in LMStudio".to_string(),
            ));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    pub fn require_openai_key(&self) -> Result<&str> {
        self.llm
            .api_key
            .as_deref()
            .ok_or(DatagenError::MissingCredential("OPENAI_API_KEY"))
    }

    pub fn require_deepl_key(&self) -> Result<&str> {
        self.translation
            .api_key
            .as_deref()
            .ok_or(DatagenError::MissingCredential("DEEPL_API_KEY"))
    }

    pub fn require_pexels_key(&self) -> Result<&str> {
        self.media
            .pexels_api_key
            .as_deref()
            .ok_or(DatagenError::MissingCredential("PEXELS_API_KEY"))
    }

    /// Resolve a path relative to the input directory
    pub fn input_path(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.output.input_dir.join(relative)
        }
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Linguanodon Sets Configuration:\n\
            - Output Directory: {}\n\
            - Input Directory: {}\n\
            - LLM: {:?} ({})\n\
            - OpenAI key: {}\n\
            - DeepL key: {}\n\
            - Pexels key: {}",
            self.output.base_dir.display(),
            self.output.input_dir.display(),
            self.llm.provider,
            self.llm.model,
            key_state(&self.llm.api_key),
            key_state(&self.translation.api_key),
            key_state(&self.media.pexels_api_key),
        )
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn key_state(key: &Option<String>) -> &'static str {
    if key.is_some() {
        "set"
    } else {
        "missing"
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.base_dir = dir.into();
        self
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.input_dir = dir.into();
        self
    }

    pub fn with_openai_key(mut self, key: impl Into<String>) -> Self {
        self.config.llm.api_key = Some(key.into());
        self
    }

    pub fn with_deepl_key(mut self, key: impl Into<String>) -> Self {
        self.config.translation.api_key = Some(key.into());
        self
    }

    pub fn with_pexels_key(mut self, key: impl Into<String>) -> Self {
        self.config.media.pexels_api_key = Some(key.into());
        self
    }

    pub fn with_llm_provider(mut self, provider: LLMProvider) -> Self {
        self.config.llm.provider = provider;
        self
    }

    pub fn with_picture_languages(mut self, languages: Vec<PictureLanguage>) -> Self {
        self.config.sources.picture.languages = languages;
        self
    }

    /// Remove pauses between requests, for tests and local sources
    pub fn without_pauses(mut self) -> Self {
        self.config.sources.tatoeba.page_pause_ms = 0;
        self.config.sources.lisaanmasry.page_pause_ms = 0;
        self.config.sources.picture.word_pause_ms = 0;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

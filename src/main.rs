use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use linguanodon_sets::config::{Config, PictureLanguage};
use linguanodon_sets::error::DatagenError;
use linguanodon_sets::llm::{create_llm, LLMProvider, VocabExtractor};
use linguanodon_sets::output::OutputLayout;
use linguanodon_sets::pipelines::{self, PictureVocabOptions, PictureVocabServices, PipelineSummary};
use linguanodon_sets::services::{DeepLTranslator, ImageLibrary, ImageSearch, OpenAISpeech, PexelsClient};
use linguanodon_sets::sources::{
    HttpPageFetcher, LevantiCsvFile, LevantiJsonFile, LinksFile, LisaanMasryClient,
    PictureWordList, SrtDirectory, SubtitleSource, TatoebaClient, TimedTextClient, VideoList,
    WordTableFile,
};

const SUBTITLE_TIMEOUT_SECONDS: u64 = 30;

#[derive(Parser)]
#[command(name = "linguanodon-sets")]
#[command(version, about = "Generate language-learning content sets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to linguanodon-sets.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory for generated sets
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Directory holding input datasets
    #[arg(short, long, global = true)]
    input_dir: Option<PathBuf>,

    /// Process only a few items
    #[arg(long, global = true)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Links file -> English resource set for apc
    Resources {
        #[arg(long, default_value = "links.json")]
        links: PathBuf,
    },
    /// HTML word table -> "1000 Common Levantine Words"
    LevantineWords {
        #[arg(long, default_value = "1000_common_levantine.html")]
        table: PathBuf,
    },
    /// Levanti JSON dataset -> immersion content
    LevantiSentences {
        #[arg(long)]
        sentences: Option<PathBuf>,
    },
    /// YouTube subtitles -> immersion content with extracted vocabulary
    Youtube {
        /// Video list named <target>_<subtitle>.txt
        #[arg(long)]
        video_list: Option<PathBuf>,
        /// Read <video id>.srt files from this directory instead of YouTube
        #[arg(long)]
        subtitles_dir: Option<PathBuf>,
    },
    /// Levanti CSV dataset -> one translation task set per sentence
    TranslationTasks {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        count: Option<usize>,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Tatoeba sentence pairs -> JSONL set
    Tatoeba {
        #[arg(long)]
        source_language: Option<String>,
        #[arg(long)]
        target_language: Option<String>,
    },
    /// Picture words -> JSONL sets with images and audio per language
    PictureVocab {
        /// Language codes (spa, deu, cmn); defaults to the configured list
        #[arg(short, long = "language")]
        languages: Vec<String>,
        /// Download missing images from Pexels
        #[arg(long)]
        fetch_images: bool,
    },
    /// Lisaan Masry example sentences -> JSONL set
    Lisaanmasry {
        #[arg(long)]
        max_sentences: Option<usize>,
    },
}

fn init_logging(verbose: bool, level: &str) {
    let default_filter = if verbose {
        "linguanodon_sets=debug,warn".to_string()
    } else {
        format!("linguanodon_sets={},warn", level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn picture_languages(codes: &[String], config: &Config) -> Result<Vec<PictureLanguage>> {
    if codes.is_empty() {
        return Ok(config.sources.picture.languages.clone());
    }
    codes
        .iter()
        .map(|code| {
            PictureLanguage::known(code).ok_or_else(|| {
                DatagenError::InvalidConfig(format!("unsupported picture language '{}'", code)).into()
            })
        })
        .collect()
}

fn require_llm_credentials(config: &Config) -> Result<()> {
    if config.llm.provider == LLMProvider::OpenAI {
        config.require_openai_key()?;
    }
    Ok(())
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

async fn run(cli: Cli, config: Config) -> Result<PipelineSummary> {
    let layout = OutputLayout::new(&config.output.base_dir);

    match cli.command {
        Commands::Resources { links } => {
            let source = LinksFile::new(config.input_path(&links));
            pipelines::run_resources(&source, &layout).await
        }
        Commands::LevantineWords { table } => {
            let source = WordTableFile::new(config.input_path(&table));
            pipelines::run_levantine_words(&source, &layout).await
        }
        Commands::LevantiSentences { sentences } => {
            let path = sentences.unwrap_or_else(|| config.sources.levanti.sentences_file.clone());
            let source = LevantiJsonFile::new(config.input_path(&path));
            pipelines::run_levanti_sentences(&source, &layout).await
        }
        Commands::Youtube {
            video_list,
            subtitles_dir,
        } => {
            require_llm_credentials(&config)?;
            let youtube = &config.sources.youtube;
            let list_path = video_list.unwrap_or_else(|| youtube.video_list.clone());
            let list = VideoList::load(&config.input_path(&list_path)).await?;

            let subtitles: Box<dyn SubtitleSource> =
                match subtitles_dir.or_else(|| youtube.subtitles_dir.clone()) {
                    Some(dir) => Box::new(SrtDirectory::new(config.input_path(&dir))),
                    None => Box::new(TimedTextClient::new(
                        youtube.timedtext_endpoint.clone(),
                        SUBTITLE_TIMEOUT_SECONDS,
                    )?),
                };
            let extractor = VocabExtractor::new(create_llm(&config.llm)?);
            let options = pipelines::YoutubeOptions { debug: cli.debug };
            pipelines::run_youtube(&list, subtitles.as_ref(), &extractor, &layout, options).await
        }
        Commands::TranslationTasks { csv, count, seed } => {
            require_llm_credentials(&config)?;
            let levanti = &config.sources.levanti;
            let path = csv.unwrap_or_else(|| levanti.csv_file.clone());
            let mut source = LevantiCsvFile::new(
                config.input_path(&path),
                count.unwrap_or(levanti.sentence_count),
                levanti.min_words,
                levanti.max_words,
            );
            if let Some(seed) = seed {
                source = source.with_seed(seed);
            }
            let extractor = VocabExtractor::new(create_llm(&config.llm)?);
            pipelines::run_translation_tasks(&source, &extractor, &layout).await
        }
        Commands::Tatoeba {
            source_language,
            target_language,
        } => {
            let mut tatoeba = config.sources.tatoeba.clone();
            if let Some(language) = source_language {
                tatoeba.source_language = language;
            }
            if let Some(language) = target_language {
                tatoeba.target_language = language;
            }
            let target = tatoeba.target_language.clone();
            let source = TatoebaClient::new(tatoeba)?.first_page_only(cli.debug);
            pipelines::run_tatoeba(&source, &target, &layout).await
        }
        Commands::PictureVocab {
            languages,
            fetch_images,
        } => {
            let languages = picture_languages(&languages, &config)?;
            let deepl_key = config.require_deepl_key()?;
            let openai_key = config.require_openai_key()?;
            let media = &config.media;

            let pexels = if fetch_images {
                Some(PexelsClient::new(
                    media.pexels_endpoint.clone(),
                    config.require_pexels_key()?,
                )?)
            } else {
                None
            };
            let translator = DeepLTranslator::new(config.translation.endpoint.clone(), deepl_key)?;
            let speech = OpenAISpeech::new(
                media.speech_endpoint.clone(),
                openai_key,
                media.speech_model.clone(),
                media.speech_voice.clone(),
                media.speech_format.clone(),
            )?;
            let images = ImageLibrary::new(resolve(&config.output.base_dir, &media.shared_images_dir));

            let services = PictureVocabServices {
                translator: &translator,
                speech: &speech,
                image_search: pexels.as_ref().map(|p| p as &dyn ImageSearch),
                images: &images,
                translate_timeout: Duration::from_secs(config.translation.timeout_seconds),
                speech_timeout: Duration::from_secs(media.speech_timeout_seconds),
            };
            let options = PictureVocabOptions {
                set_name: config.sources.picture.set_name.clone(),
                word_pause: Duration::from_millis(config.sources.picture.word_pause_ms),
                debug: cli.debug,
            };

            let words = PictureWordList::default();
            let mut summary = PipelineSummary::new("picture-vocab");
            for language in &languages {
                info!("🌍 Starting {} ({})", language.name, language.code);
                let result =
                    pipelines::run_picture_vocab(&words, language, &services, &options, &layout)
                        .await?;
                result.log();
                summary.absorb(result);
            }
            Ok(summary)
        }
        Commands::Lisaanmasry { max_sentences } => {
            let settings = &config.sources.lisaanmasry;
            let max_sentences = max_sentences.unwrap_or(if cli.debug {
                settings.debug_sentences
            } else {
                settings.max_sentences
            });
            let fetcher = HttpPageFetcher::new(settings.request_timeout_seconds)?;
            let client = LisaanMasryClient::new(Box::new(fetcher), &settings.base_url)?;
            let options = pipelines::LisaanMasryOptions {
                max_sentences,
                page_pause: Duration::from_millis(settings.page_pause_ms),
            };
            pipelines::run_lisaanmasry(&client, &layout, &options).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.output.base_dir = dir.clone();
    }
    if let Some(dir) = &cli.input_dir {
        config.output.input_dir = dir.clone();
    }

    init_logging(cli.verbose, &config.logging.level);
    config.validate()?;

    info!("🚀 Linguanodon set generator starting...");
    info!("{}", config.summary());
    if cli.debug {
        warn!("Debug mode: only a few items will be processed");
    }

    let summary = run(cli, config).await?;
    summary.log();
    Ok(())
}

/// Adapters that turn external data into raw items for the pipelines
///
/// File-backed and paginated sources implement [`SourceAdapter`]. Sources
/// that are looked up per item (subtitles per video, dictionary pages per
/// word) expose their own narrower traits so tests can swap them out.

pub mod html_table;
pub mod levanti;
pub mod links;
pub mod lisaanmasry;
pub mod subtitles;
pub mod tatoeba;
pub mod word_list;

pub use html_table::{WordRow, WordTableFile};
pub use levanti::{LevantiCsvFile, LevantiJsonFile, LevantiSentence, LevantiVocab, SentencePair};
pub use links::{LinkEntry, LinksFile};
pub use lisaanmasry::{ExampleSentence, HttpPageFetcher, LisaanMasryClient, PageFetcher, WordEntry};
pub use subtitles::{SrtDirectory, SubtitleSource, TimedTextClient, VideoList};
pub use tatoeba::{TatoebaClient, TatoebaSentence};
pub use word_list::{clean_word_for_search, PictureWordList};

use anyhow::Result;
use async_trait::async_trait;

/// Produces the raw items of one source, in source order
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    type Item: Send;

    /// Short human-readable name used in progress logs
    fn name(&self) -> String;

    async fn fetch_items(&self) -> Result<Vec<Self::Item>>;
}

/// In-memory source, handy when items are already at hand
pub struct StaticSource<T> {
    name: String,
    items: Vec<T>,
}

impl<T> StaticSource<T> {
    pub fn new(name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> SourceAdapter for StaticSource<T> {
    type Item = T;

    fn name(&self) -> String {
        self.name.clone()
    }

    async fn fetch_items(&self) -> Result<Vec<T>> {
        Ok(self.items.clone())
    }
}

/// Collapse whitespace runs, including newlines, into single spaces
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn selector(css: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector '{}': {:?}", css, e))
}

/// Whitespace-normalised text content of an element
pub(crate) fn element_text(element: &scraper::ElementRef<'_>) -> String {
    squash_whitespace(&element.text().collect::<String>())
}

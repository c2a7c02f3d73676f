/// Lisaan Masry online dictionary: random example sentences and word pages
use super::{element_text, selector};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const ATTRIBUTION_OWNER: &str = "Mike Green";
pub const ATTRIBUTION_OWNER_LINK: &str = "https://eu.lisaanmasry.org/info/en/copyright.html";
pub const ATTRIBUTION_LICENSE: &str = "Non-Commercial, Credit Required";
pub const ATTRIBUTION_LABEL: &str = "www.lisaanmasry.org";

/// Retrieves a page body by URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("HTTP error {}: {}", response.status(), url));
        }
        Ok(response.text().await?)
    }
}

/// Example sentence with the words it links to
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleSentence {
    pub arabic: String,
    pub transliteration: Option<String>,
    pub english: String,
    pub notes: Option<String>,
    /// Text of each word span, in sentence order
    pub words: Vec<String>,
}

/// Inflected form of a dictionary word
#[derive(Debug, Clone, PartialEq)]
pub struct WordForm {
    pub transliteration: String,
    pub form_type: Option<String>,
    pub arabic: String,
}

/// English meaning of a dictionary word
#[derive(Debug, Clone, PartialEq)]
pub struct WordMeaning {
    pub english: String,
    /// Free text between the meaning and its type
    pub note: Option<String>,
    pub meaning_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    /// The `Element:` row, e.g. "noun"
    pub base_type: String,
    /// `arb` for Modern Standard, `arz` otherwise
    pub language: String,
    pub forms: Vec<WordForm>,
    pub meanings: Vec<WordMeaning>,
}

/// Example and word lookups against one dictionary site
pub struct LisaanMasryClient {
    fetcher: Box<dyn PageFetcher>,
    base_url: Url,
}

impl LisaanMasryClient {
    pub fn new(fetcher: Box<dyn PageFetcher>, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { fetcher, base_url })
    }

    pub fn example_url(&self) -> String {
        self.base_url
            .join("example.php")
            .map(String::from)
            .unwrap_or_else(|_| format!("{}example.php", self.base_url))
    }

    pub fn word_url(&self, word: &str) -> String {
        match self.base_url.join("word.php") {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("word", word);
                url.into()
            }
            Err(_) => self.word_link(word),
        }
    }

    /// Readable word page address for attribution links; not percent-encoded
    pub fn word_link(&self, word: &str) -> String {
        format!("{}word.php?word={}", self.base_url, word)
    }

    /// A random example sentence
    pub async fn fetch_example(&self) -> Result<ExampleSentence> {
        let url = self.example_url();
        let html = self.fetcher.fetch_page(&url).await?;
        parse_example_page(&html)?.ok_or_else(|| anyhow!("No example sentence on {}", url))
    }

    /// The dictionary entry behind one word of a sentence, `None` when the
    /// page carries no element or language information
    pub async fn fetch_word(&self, word: &str) -> Result<Option<WordEntry>> {
        let url = self.word_url(word);
        debug!("Looking up word {}", url);
        let html = self.fetcher.fetch_page(&url).await?;
        parse_word_page(&html)
    }
}

fn following_element<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == name)
}

fn heading_followed_by<'a>(
    scope: ElementRef<'a>,
    heading: &str,
    title: &str,
    next: &str,
) -> Result<Option<ElementRef<'a>>> {
    let heading_selector = selector(heading)?;
    Ok(scope
        .select(&heading_selector)
        .find(|h| element_text(h) == title)
        .and_then(|h| following_element(h, next)))
}

/// Parse the `#example` block. `None` when the sentence or its translation
/// is missing.
pub fn parse_example_page(html: &str) -> Result<Option<ExampleSentence>> {
    let document = Html::parse_document(html);
    let example_selector = selector("#example")?;
    let arabic_selector = selector("p.ar")?;
    let paragraph_selector = selector("p")?;
    let span_selector = selector("span")?;

    let Some(example) = document.select(&example_selector).next() else {
        return Ok(None);
    };
    let Some(arabic_p) = example.select(&arabic_selector).next() else {
        return Ok(None);
    };

    let arabic = element_text(&arabic_p);
    if arabic.is_empty() {
        return Ok(None);
    }

    let words = arabic_p
        .select(&span_selector)
        .map(|span| element_text(&span))
        .filter(|word| !word.is_empty())
        .collect();

    let transliteration = example
        .select(&paragraph_selector)
        .map(|p| element_text(&p))
        .find(|text| text.contains("Individual words:"))
        .map(|text| text.replace("Individual words:", "").trim().to_string())
        .filter(|text| !text.is_empty());

    let Some(english) = heading_followed_by(example, "h3", "Translation", "p")?
        .map(|p| element_text(&p))
        .filter(|text| !text.is_empty())
    else {
        debug!("Could not find translation heading");
        return Ok(None);
    };

    let notes = heading_followed_by(example, "h3", "Notes", "p")?
        .map(|p| element_text(&p))
        .filter(|text| !text.is_empty());

    Ok(Some(ExampleSentence {
        arabic,
        transliteration,
        english,
        notes,
        words,
    }))
}

/// Second cell of the first row whose text mentions `label`
fn labelled_value(document: &Html, label: &str) -> Result<Option<String>> {
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    Ok(document
        .select(&row_selector)
        .find(|row| element_text(row).contains(label))
        .and_then(|row| row.select(&cell_selector).nth(1))
        .map(|cell| element_text(&cell)))
}

pub fn language_for(code: &str) -> &'static str {
    if code == "MS" {
        "arb"
    } else {
        "arz"
    }
}

pub fn parse_word_page(html: &str) -> Result<Option<WordEntry>> {
    let document = Html::parse_document(html);

    let (Some(base_type), Some(language_code)) = (
        labelled_value(&document, "Element:")?,
        labelled_value(&document, "Language:")?,
    ) else {
        return Ok(None);
    };
    if base_type.is_empty() {
        return Ok(None);
    }

    let root = document.root_element();
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let bold_selector = selector("b")?;
    let italic_selector = selector("i")?;
    let anchor_selector = selector("a")?;

    let mut forms = Vec::new();
    if let Some(table) = heading_followed_by(root, "h1", "Forms", "table")? {
        for row in table.select(&row_selector) {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < 3 {
                continue;
            }
            let arabic = element_text(&cells[2]);
            if arabic.is_empty() || arabic == "-" {
                continue;
            }
            let transliteration = cells[1]
                .select(&bold_selector)
                .next()
                .map(|b| element_text(&b))
                .unwrap_or_default();
            let form_type = cells[1]
                .select(&italic_selector)
                .next()
                .map(|i| element_text(&i))
                .filter(|t| !t.is_empty());

            forms.push(WordForm {
                transliteration,
                form_type,
                arabic,
            });
        }
    } else {
        debug!("No forms table found");
    }

    let mut meanings = Vec::new();
    if let Some(table) = heading_followed_by(root, "h1", "Meanings", "table")? {
        for row in table.select(&row_selector) {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < 2 {
                continue;
            }
            let Some(english) = cells[1]
                .select(&anchor_selector)
                .next()
                .map(|a| element_text(&a))
                .filter(|t| !t.is_empty())
            else {
                continue;
            };
            let meaning_type = cells[1]
                .select(&italic_selector)
                .next()
                .map(|i| element_text(&i))
                .filter(|t| !t.is_empty());

            let note = meaning_type.as_ref().and_then(|meaning_type| {
                let text = element_text(&cells[1]);
                let (_, after) = text.split_once(english.as_str())?;
                let between = after.split(meaning_type.as_str()).next()?.trim();
                (!between.is_empty()).then(|| between.to_string())
            });

            meanings.push(WordMeaning {
                english,
                note,
                meaning_type,
            });
        }
    } else {
        debug!("No meanings table found");
    }

    Ok(Some(WordEntry {
        base_type,
        language: language_for(&language_code).to_string(),
        forms,
        meanings,
    }))
}

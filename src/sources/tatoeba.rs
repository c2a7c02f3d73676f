use super::SourceAdapter;
use crate::config::TatoebaConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Sentence record of the Tatoeba API, source or translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TatoebaSentence {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    /// Translations grouped by directness
    #[serde(default)]
    pub translations: Vec<Vec<TatoebaSentence>>,
}

impl TatoebaSentence {
    /// First translation in `language` with non-empty text
    pub fn translation_in(&self, language: &str) -> Option<&TatoebaSentence> {
        self.translations
            .iter()
            .flatten()
            .find(|t| t.lang.as_deref() == Some(language) && !t.text.trim().is_empty())
    }

    pub fn page_url(&self) -> String {
        match self.id {
            Some(id) => format!("https://tatoeba.org/en/sentences/show/{}", id),
            None => "https://tatoeba.org".to_string(),
        }
    }

    pub fn owner_profile_url(&self) -> Option<String> {
        self.owner
            .as_ref()
            .filter(|owner| !owner.is_empty())
            .map(|owner| format!("https://tatoeba.org/en/user/profile/{}", owner))
    }

    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("Tatoeba #{}", id),
            None => "Tatoeba".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SentencePage {
    #[serde(default)]
    data: Vec<TatoebaSentence>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<String>,
}

/// The decoded `after` query parameter of a next-page URL
pub fn after_cursor(next_url: &str) -> Option<String> {
    let url = Url::parse(next_url)
        .or_else(|_| Url::parse("https://api.tatoeba.org/").and_then(|base| base.join(next_url)))
        .ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "after")
        .map(|(_, value)| value.into_owned())
}

/// Paginated sentence search with translations in one language
pub struct TatoebaClient {
    client: Client,
    config: TatoebaConfig,
    first_page_only: bool,
}

impl TatoebaClient {
    pub fn new(config: TatoebaConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            config,
            first_page_only: false,
        })
    }

    /// Stop after the first page
    pub fn first_page_only(mut self, enabled: bool) -> Self {
        self.first_page_only = enabled;
        self
    }

    fn query(&self, after: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lang", self.config.source_language.clone()),
            ("trans:lang", self.config.target_language.clone()),
            ("sort", "words".to_string()),
            ("limit", self.config.page_size.to_string()),
        ];
        if let Some(after) = after {
            params.push(("after", after.to_string()));
        }
        params
    }

    async fn fetch_page(&self, after: Option<&str>) -> Result<SentencePage> {
        let params = self.query(after);
        debug!("Request {} {:?}", self.config.endpoint, params);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Tatoeba API error {}", response.status()));
        }

        let body = response.text().await?;
        debug!("Response data: {}", body);
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SourceAdapter for TatoebaClient {
    type Item = TatoebaSentence;

    fn name(&self) -> String {
        format!(
            "tatoeba {} -> {}",
            self.config.source_language, self.config.target_language
        )
    }

    async fn fetch_items(&self) -> Result<Vec<TatoebaSentence>> {
        let mut all_sentences = Vec::new();
        let mut after: Option<String> = None;
        let mut page_count = 0u32;

        info!("=== Starting Tatoeba API requests ===");

        loop {
            page_count += 1;
            info!("Fetching page {}...", page_count);

            let page = self.fetch_page(after.as_deref()).await?;
            let fetched = page.data.len();
            info!("Page {}: fetched {} sentences", page_count, fetched);
            all_sentences.extend(page.data);

            if self.first_page_only {
                info!("Stopping after the first page");
                break;
            }
            if self.config.max_pages.is_some_and(|max| page_count >= max) {
                info!("Reached page limit of {}", page_count);
                break;
            }

            let next_url = page.paging.and_then(|p| p.next);
            let Some(next_url) = next_url.filter(|_| fetched > 0) else {
                info!("No more pages available. Total sentences fetched: {}", all_sentences.len());
                break;
            };

            match after_cursor(&next_url) {
                Some(cursor) => {
                    debug!("Next page will use after={}", cursor);
                    after = Some(cursor);
                }
                None => {
                    error!("Could not extract 'after' from {}. Stopping pagination.", next_url);
                    break;
                }
            }

            if self.config.page_pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.page_pause_ms)).await;
            }
        }

        info!("Fetched {} sentence pairs total", all_sentences.len());
        Ok(all_sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "data": [
            {
                "id": 1276, "text": "Let's try something.", "lang": "eng",
                "owner": "CK", "license": "CC BY 2.0 FR",
                "translations": [
                    [{"id": 9, "text": "Lass uns etwas versuchen!", "lang": "deu", "owner": null}],
                    [{"id": 243, "text": "Давайте что-нибудь попробуем.", "lang": "rus", "owner": "sharptoothed", "license": "CC BY 2.0 FR"}]
                ]
            },
            {"id": 1277, "text": "I have to go to sleep.", "lang": "eng", "translations": [[]]}
        ],
        "paging": {"next": "https://api.tatoeba.org/unstable/sentences?lang=eng&trans%3Alang=rus&sort=words&limit=20&after=5%2C1277"}
    }"#;

    #[test]
    fn test_page_parsing_and_translation_lookup() {
        let page: SentencePage = serde_json::from_str(PAGE).unwrap();
        assert_eq!(page.data.len(), 2);

        let first = &page.data[0];
        let russian = first.translation_in("rus").unwrap();
        assert_eq!(russian.id, Some(243));
        assert_eq!(
            russian.owner_profile_url().as_deref(),
            Some("https://tatoeba.org/en/user/profile/sharptoothed")
        );
        assert!(first.translation_in("fra").is_none());
        assert!(page.data[1].translation_in("rus").is_none());
    }

    #[test]
    fn test_after_cursor_is_decoded() {
        let page: SentencePage = serde_json::from_str(PAGE).unwrap();
        let next = page.paging.unwrap().next.unwrap();
        assert_eq!(after_cursor(&next).as_deref(), Some("5,1277"));
        assert_eq!(after_cursor("/unstable/sentences?after=a%20b").as_deref(), Some("a b"));
        assert_eq!(after_cursor("https://api.tatoeba.org/unstable/sentences?lang=eng"), None);
    }

    #[test]
    fn test_links_for_sentence_without_id() {
        let sentence = TatoebaSentence {
            id: None,
            text: "x".to_string(),
            lang: None,
            owner: None,
            license: None,
            translations: Vec::new(),
        };
        assert_eq!(sentence.page_url(), "https://tatoeba.org");
        assert_eq!(sentence.owner_profile_url(), None);
        assert_eq!(sentence.label(), "Tatoeba");
    }

    #[test]
    fn test_query_includes_cursor() {
        let client = TatoebaClient::new(TatoebaConfig::default()).unwrap();
        let params = client.query(Some("5,1277"));
        assert!(params.contains(&("trans:lang", "rus".to_string())));
        assert!(params.contains(&("after", "5,1277".to_string())));
        assert_eq!(client.query(None).len(), 4);
    }
}

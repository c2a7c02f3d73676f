use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Result of a machine translation
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedText {
    pub text: String,
    pub detected_source_language: Option<String>,
}

/// Machine translation into a target language code
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<TranslatedText>;
}

/// Translate with a wall-clock limit; failures and timeouts become `None`
pub async fn translate_or_skip(
    translator: &dyn Translator,
    text: &str,
    target_language: &str,
    limit: Duration,
) -> Option<TranslatedText> {
    match tokio::time::timeout(limit, translator.translate(text, target_language)).await {
        Ok(Ok(translated)) => Some(translated),
        Ok(Err(e)) => {
            warn!("Translation failed for '{}' to {}: {}", text, target_language, e);
            None
        }
        Err(_) => {
            warn!(
                "Translation timed out after {}s for '{}' to {}",
                limit.as_secs(),
                text,
                target_language
            );
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct DeepLRequest<'a> {
    text: [&'a str; 1],
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
    detected_source_language: Option<String>,
}

/// DeepL REST API client
pub struct DeepLTranslator {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DeepLTranslator {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<TranslatedText> {
        let request = DeepLRequest {
            text: [text],
            target_lang: target_language,
        };

        debug!("Translating '{}' to {}", text, target_language);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("DeepL API error {}: {}", status, body));
        }

        let parsed: DeepLResponse = response.json().await?;
        let first = parsed
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("DeepL returned no translation"))?;

        Ok(TranslatedText {
            text: first.text,
            detected_source_language: first.detected_source_language,
        })
    }
}

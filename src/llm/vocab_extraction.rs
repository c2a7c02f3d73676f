use super::{ChatMessage, LLM};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are a helpful assistant specialized in language learning and vocabulary extraction. Always respond with valid JSON.";

/// One word or phrase pulled out of a text, with its English translation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedVocab {
    pub original: String,
    pub translation: String,
}

/// Vocabulary extractor backed by a chat model
pub struct VocabExtractor {
    llm: Box<dyn LLM>,
}

impl VocabExtractor {
    pub fn new(llm: Box<dyn LLM>) -> Self {
        Self { llm }
    }

    /// Extract learnable vocabulary from one subtitle line in `language`
    pub async fn extract_from_line(&self, line: &str, language: &str) -> Vec<ExtractedVocab> {
        let prompt = subtitle_prompt(line, language);
        self.extract(prompt, line).await
    }

    /// Extract vocabulary from an Arabic sentence, using its English
    /// rendering as the reference for translations
    pub async fn extract_from_sentence(&self, arabic: &str, english: &str) -> Vec<ExtractedVocab> {
        let prompt = sentence_prompt(arabic, english);
        self.extract(prompt, arabic).await
    }

    async fn extract(&self, prompt: String, source: &str) -> Vec<ExtractedVocab> {
        let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        let response = match self.llm.chat(messages).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Vocabulary extraction failed for '{}': {}", source, e);
                return Vec::new();
            }
        };

        debug!(
            "LLM vocabulary response (tokens: {:?}): {}",
            response.tokens_used, response.content
        );

        match parse_vocab_response(&response.content) {
            Some(vocab) => vocab,
            None => {
                warn!(
                    "Could not parse vocabulary for '{}'. Raw response: {}",
                    source, response.content
                );
                Vec::new()
            }
        }
    }
}

fn subtitle_prompt(line: &str, language: &str) -> String {
    format!(
        "You are an expert in language teaching.

Extract language learning vocabulary from the following subtitle snippet in {language} language.

Guidelines:
- Extract meaningful words and phrases that would be useful for language learners
- Ignore music indicators like [موسيقى] or [music]
- Extract even single words if they are meaningful vocabulary
- Ignore proper nouns (names, places, brands), exclamations (oh, wow), and non-translatable words
- For each extracted word/phrase, provide an English translation suitable for learning
- Retain correct capitalization and spelling
- Focus on common, everyday vocabulary that learners would encounter
- Even if snippets are short, extract any meaningful vocabulary
- Avoid comma-separated synonyms. Simply give the most fitting translation!
- Only add the pure words/expressions themselves. Do not add notes or extra infos.

Return your answer as a JSON object with a 'vocabulary' array of objects containing 'original' and 'translation' fields.

Subtitle snippet to analyze:
{line}
"
    )
}

fn sentence_prompt(arabic: &str, english: &str) -> String {
    format!(
        "You are an expert in language teaching.

Extract language learning vocabulary from the following sentence in Levantine Arabic.

Guidelines:
- Extract meaningful words and phrases that would be useful for language learners
- Ignore music indicators, exclamations, proper nouns, and non-translatable words
- For each extracted word/phrase, provide the correct English translation (use the provided English sentence for reference)
- Retain correct spelling
- Only add the pure words/expressions themselves. Do not add notes or extra infos.
- Return your answer as a JSON object with a 'vocabulary' array of objects containing 'original' and 'translation' fields.

Arabic sentence:
{arabic}
English sentence:
{english}
"
    )
}

/// Strip a surrounding ``` or ```json fence
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse a model answer into vocabulary entries.
///
/// Accepts a bare array or an object holding the array under `vocabulary`
/// or `words`. Entries use `original` (or `word`) plus `translation`;
/// entries missing either are dropped. `None` means the answer was not
/// usable JSON at all.
pub fn parse_vocab_response(response: &str) -> Option<Vec<ExtractedVocab>> {
    let parsed: Value = serde_json::from_str(strip_code_fence(response)).ok()?;

    let entries = match &parsed {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("vocabulary").or_else(|| map.get("words")) {
            Some(Value::Array(entries)) => entries,
            _ => return Some(Vec::new()),
        },
        _ => return None,
    };

    let vocab = entries
        .iter()
        .filter_map(|entry| {
            let original = ["original", "word"]
                .iter()
                .filter_map(|key| entry.get(*key).and_then(Value::as_str))
                .map(str::trim)
                .find(|text| !text.is_empty())?;
            let translation = entry.get("translation").and_then(Value::as_str)?.trim();
            if original.is_empty() || translation.is_empty() {
                return None;
            }
            Some(ExtractedVocab {
                original: original.to_string(),
                translation: translation.to_string(),
            })
        })
        .collect();

    Some(vocab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LLMProvider, LLMResponse};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct CannedLLM(Option<&'static str>);

    #[async_trait]
    impl LLM for CannedLLM {
        async fn chat(&self, _messages: Vec<ChatMessage>) -> Result<LLMResponse> {
            match self.0 {
                Some(content) => Ok(LLMResponse {
                    content: content.to_string(),
                    tokens_used: None,
                }),
                None => Err(anyhow!("connection refused")),
            }
        }

        async fn is_available(&self) -> bool {
            self.0.is_some()
        }

        fn provider_type(&self) -> LLMProvider {
            LLMProvider::LMStudio
        }
    }

    #[test]
    fn test_parse_bare_array() {
        let vocab =
            parse_vocab_response(r#"[{"original": "بيت", "translation": "house"}]"#).unwrap();
        assert_eq!(
            vocab,
            vec![ExtractedVocab {
                original: "بيت".to_string(),
                translation: "house".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_wrapped_objects() {
        let vocab = parse_vocab_response(
            r#"{"vocabulary": [{"original": "مي", "translation": "water"}, {"original": "", "translation": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(vocab.len(), 1);

        let vocab =
            parse_vocab_response(r#"{"words": [{"word": "كتير", "translation": "a lot"}]}"#)
                .unwrap();
        assert_eq!(vocab[0].original, "كتير");

        let vocab = parse_vocab_response(
            r#"[{"original": "", "word": "بيت", "translation": "house"}, {"original": null, "word": "مي", "translation": "water"}]"#,
        )
        .unwrap();
        let originals: Vec<_> = vocab.iter().map(|v| v.original.as_str()).collect();
        assert_eq!(originals, vec!["بيت", "مي"]);
    }

    #[test]
    fn test_parse_fenced_response() {
        let response = "```json\n[{\"original\": \"شو\", \"translation\": \"what\"}]\n```";
        assert_eq!(parse_vocab_response(response).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_unknown_shapes() {
        assert_eq!(parse_vocab_response(r#"{"result": []}"#), Some(Vec::new()));
        assert_eq!(parse_vocab_response("Sorry, I cannot help."), None);
        assert_eq!(parse_vocab_response("42"), None);
    }

    #[tokio::test]
    async fn test_failures_yield_no_vocab() {
        let extractor = VocabExtractor::new(Box::new(CannedLLM(None)));
        assert!(extractor.extract_from_line("مرحبا", "apc").await.is_empty());

        let extractor = VocabExtractor::new(Box::new(CannedLLM(Some("not json"))));
        assert!(extractor.extract_from_sentence("مرحبا", "hello").await.is_empty());
    }

    #[tokio::test]
    async fn test_extract_from_line() {
        let extractor = VocabExtractor::new(Box::new(CannedLLM(Some(
            r#"{"vocabulary": [{"original": "صباح الخير", "translation": "good morning"}]}"#,
        ))));
        let vocab = extractor.extract_from_line("صباح الخير يا جماعة", "apc").await;
        assert_eq!(vocab[0].translation, "good morning");
    }

    #[test]
    fn test_prompts_embed_inputs() {
        assert!(subtitle_prompt("hola amigos", "es").contains("in es language"));
        let prompt = sentence_prompt("وين البيت", "where is the house");
        assert!(prompt.contains("وين البيت"));
        assert!(prompt.contains("where is the house"));
    }
}

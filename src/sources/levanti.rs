use super::SourceAdapter;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Word pair attached to a dataset sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevantiVocab {
    pub apc: String,
    pub eng: String,
}

/// Sentence from the curated JSON dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevantiSentence {
    pub apc: String,
    pub eng: String,
    #[serde(default)]
    pub vocab: Vec<LevantiVocab>,
}

/// `[{apc, eng, vocab: [{apc, eng}]}]`
pub struct LevantiJsonFile {
    path: PathBuf,
}

impl LevantiJsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceAdapter for LevantiJsonFile {
    type Item = LevantiSentence;

    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_items(&self) -> Result<Vec<LevantiSentence>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Input file not found: {}", self.path.display()))?;
        let sentences: Vec<LevantiSentence> = serde_json::from_str(&content)
            .with_context(|| format!("Malformed dataset {}", self.path.display()))?;
        info!("📚 Loaded {} sentences from {}", sentences.len(), self.path.display());
        Ok(sentences)
    }
}

/// Arabic sentence with its English rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SentencePair {
    pub arabic: String,
    pub english: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    arabic: Option<String>,
    english: Option<String>,
}

/// CSV dataset with `arabic` and `english` columns, sampled at random
pub struct LevantiCsvFile {
    path: PathBuf,
    count: usize,
    min_words: usize,
    max_words: usize,
    seed: Option<u64>,
}

impl LevantiCsvFile {
    pub fn new(path: impl Into<PathBuf>, count: usize, min_words: usize, max_words: usize) -> Self {
        Self {
            path: path.into(),
            count,
            min_words,
            max_words,
            seed: None,
        }
    }

    /// Make the sample reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rows with both fields whose Arabic side has an accepted word count
    pub fn eligible_rows(&self, content: &str) -> crate::error::Result<Vec<SentencePair>> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut pairs = Vec::new();

        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let (Some(arabic), Some(english)) = (row.arabic, row.english) else {
                continue;
            };
            let (arabic, english) = (arabic.trim().to_string(), english.trim().to_string());
            if arabic.is_empty() || english.is_empty() {
                continue;
            }

            let words = arabic.split_whitespace().count();
            if words < self.min_words || words > self.max_words {
                continue;
            }
            pairs.push(SentencePair { arabic, english });
        }

        Ok(pairs)
    }
}

#[async_trait]
impl SourceAdapter for LevantiCsvFile {
    type Item = SentencePair;

    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_items(&self) -> Result<Vec<SentencePair>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read dataset {}", self.path.display()))?;
        let eligible = self.eligible_rows(&content)?;
        debug!(
            "{} rows with {}-{} Arabic words",
            eligible.len(),
            self.min_words,
            self.max_words
        );

        if eligible.len() < self.count {
            return Err(anyhow!(
                "Not enough sentences in dataset: found {}, need {}",
                eligible.len(),
                self.count
            ));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(eligible
            .choose_multiple(&mut rng, self.count)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatagenError;
    use tempfile::TempDir;

    const CSV: &str = "arabic,english,dialect\n\
        وين رايح هلق,where are you going now,lev\n\
        مرحبا,hello,lev\n\
        بدي روح عالبيت بكرا الصبح بكير كتير,I want to go home tomorrow very early in the morning,lev\n\
        شو عم تعمل اليوم,what are you doing today,lev\n\
        ,missing arabic,lev\n\
        كيف حالك انت اليوم,,lev\n";

    #[test]
    fn test_word_count_filter() {
        let source = LevantiCsvFile::new("unused.csv", 1, 3, 6);
        let rows = source.eligible_rows(CSV).unwrap();
        let arabic: Vec<_> = rows.iter().map(|r| r.arabic.as_str()).collect();
        assert_eq!(arabic, vec!["وين رايح هلق", "شو عم تعمل اليوم"]);
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let source = LevantiCsvFile::new("unused.csv", 1, 1, 6);
        let err = source
            .eligible_rows("arabic,english,dialect
مرحبا
")
            .unwrap_err();
        assert!(matches!(err, DatagenError::Csv(_)));
    }

    #[tokio::test]
    async fn test_sample_size_and_shortage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("levanti.csv");
        tokio::fs::write(&path, CSV).await.unwrap();

        let sampled = LevantiCsvFile::new(&path, 2, 3, 6)
            .with_seed(7)
            .fetch_items()
            .await
            .unwrap();
        assert_eq!(sampled.len(), 2);
        assert_ne!(sampled[0], sampled[1]);

        let short = LevantiCsvFile::new(&path, 5, 3, 6).fetch_items().await;
        assert!(short.is_err());
    }

    #[tokio::test]
    async fn test_json_dataset_without_vocab() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sentences.json");
        tokio::fs::write(
            &path,
            r#"[{"apc": "كيفك؟", "eng": "How are you?"}, {"apc": "منيح", "eng": "Good", "vocab": [{"apc": "منيح", "eng": "good"}]}]"#,
        )
        .await
        .unwrap();

        let sentences = LevantiJsonFile::new(&path).fetch_items().await.unwrap();
        assert!(sentences[0].vocab.is_empty());
        assert_eq!(sentences[1].vocab[0].eng, "good");
    }
}

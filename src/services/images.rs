use crate::entities::ImageRef;
use crate::sources::clean_word_for_search;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Directory of `<search term>.jpg` files shared between sets
#[derive(Debug, Clone)]
pub struct ImageLibrary {
    dir: PathBuf,
}

impl ImageLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    pub fn filename_for(word: &str) -> String {
        format!("{}.jpg", clean_word_for_search(word))
    }

    /// Filename of the stored image for `word`, if there is one
    pub fn find(&self, word: &str) -> Option<String> {
        let filename = Self::filename_for(word);
        if self.dir.join(&filename).exists() {
            Some(filename)
        } else {
            None
        }
    }

    /// Reference recorded on a vocab entry
    pub fn image_ref(word: &str, filename: &str) -> ImageRef {
        ImageRef {
            filename: filename.to_string(),
            alt: format!("Image of {}", clean_word_for_search(word)),
        }
    }

    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(filename), bytes).await?;
        Ok(())
    }
}

/// A stock photo found for a search term
#[derive(Debug, Clone, PartialEq)]
pub struct FoundImage {
    pub image_url: String,
    pub photographer: String,
    pub page_url: String,
}

/// Stock-photo search
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, term: &str) -> Result<Option<FoundImage>>;
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
struct PexelsSearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    url: String,
    photographer: String,
    src: PexelsSources,
}

#[derive(Debug, Deserialize)]
struct PexelsSources {
    medium: String,
}

pub struct PexelsClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PexelsClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ImageSearch for PexelsClient {
    async fn search(&self, term: &str) -> Result<Option<FoundImage>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", term),
                ("per_page", "1"),
                ("page", "1"),
                ("orientation", "landscape"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Pexels API error {}", response.status()));
        }

        let parsed: PexelsSearchResponse = response.json().await?;
        Ok(parsed.photos.into_iter().next().map(|photo| FoundImage {
            image_url: photo.src.medium,
            photographer: photo.photographer,
            page_url: photo.url,
        }))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Image download failed {}: {}", response.status(), url));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Look up `word` in the library, downloading a stock photo when absent.
///
/// Returns the stored filename, or `None` when nothing could be found.
pub async fn find_or_fetch_image(
    library: &ImageLibrary,
    search: Option<&dyn ImageSearch>,
    word: &str,
) -> Option<String> {
    if let Some(filename) = library.find(word) {
        return Some(filename);
    }

    let Some(search) = search else {
        warn!(
            "No existing image found for '{}' (looking for {})",
            word,
            ImageLibrary::filename_for(word)
        );
        return None;
    };

    let term = clean_word_for_search(word);
    let found = match search.search(&term).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            warn!("No images found for '{}'", term);
            return None;
        }
        Err(e) => {
            warn!("Image search failed for '{}': {}", term, e);
            return None;
        }
    };

    let filename = ImageLibrary::filename_for(word);
    let stored = async {
        let bytes = search.download(&found.image_url).await?;
        library.store(&filename, &bytes).await
    };
    match stored.await {
        Ok(()) => {
            info!("🖼️ Downloaded image for '{}' from {}", term, found.photographer);
            Some(filename)
        }
        Err(e) => {
            warn!("Failed to store image for '{}': {}", term, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FakeSearch {
        has_result: bool,
    }

    #[async_trait]
    impl ImageSearch for FakeSearch {
        async fn search(&self, term: &str) -> Result<Option<FoundImage>> {
            Ok(self.has_result.then(|| FoundImage {
                image_url: format!("https://images.example/{}.jpg", term),
                photographer: "Jane Doe".to_string(),
                page_url: "https://pexels.example/photo/1".to_string(),
            }))
        }

        async fn download(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(vec![0xFF, 0xD8, 0xFF])
        }
    }

    #[tokio::test]
    async fn test_existing_image_is_reused() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("apple.jpg"), b"jpg").unwrap();
        let library = ImageLibrary::new(temp_dir.path());

        assert_eq!(library.find("the apple").as_deref(), Some("apple.jpg"));
        assert_eq!(library.find("the pear"), None);
        assert_eq!(
            find_or_fetch_image(&library, None, "the apple").await.as_deref(),
            Some("apple.jpg")
        );
        assert_eq!(find_or_fetch_image(&library, None, "the pear").await, None);
    }

    #[tokio::test]
    async fn test_missing_image_is_downloaded() {
        let temp_dir = TempDir::new().unwrap();
        let library = ImageLibrary::new(temp_dir.path().join("images"));
        let search = FakeSearch { has_result: true };

        let filename = find_or_fetch_image(&library, Some(&search), "the kite").await;
        assert_eq!(filename.as_deref(), Some("kite.jpg"));
        assert!(library.dir().join("kite.jpg").exists());

        let empty = FakeSearch { has_result: false };
        assert_eq!(find_or_fetch_image(&library, Some(&empty), "the doll").await, None);
    }

    #[test]
    fn test_image_ref_alt_text() {
        let image = ImageLibrary::image_ref("the apple", "apple.jpg");
        assert_eq!(image.alt, "Image of apple");
    }

    #[test]
    fn test_pexels_response_shape() {
        let parsed: PexelsSearchResponse = serde_json::from_str(
            r#"{"photos": [{"id": 1, "url": "https://www.pexels.com/photo/1", "photographer": "A", "src": {"medium": "https://images.pexels.com/1.jpeg", "large": "x"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.photos[0].src.medium, "https://images.pexels.com/1.jpeg");
    }
}

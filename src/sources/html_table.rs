use super::{element_text, selector, SourceAdapter};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::path::PathBuf;
use tracing::debug;

/// One row of the common-words table
#[derive(Debug, Clone, PartialEq)]
pub struct WordRow {
    pub english: String,
    /// Text found in parentheses after the English word
    pub english_note: Option<String>,
    pub arabic: String,
    pub pronunciation: Option<String>,
}

/// Saved HTML page with an `english | arabic | pronunciation` table
pub struct WordTableFile {
    path: PathBuf,
}

impl WordTableFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceAdapter for WordTableFile {
    type Item = WordRow;

    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_items(&self) -> Result<Vec<WordRow>> {
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read word table {}", self.path.display()))?;
        parse_word_table(&html)
    }
}

/// Parse the body rows of the first table; rows without exactly three
/// cells or missing either word are dropped.
pub fn parse_word_table(html: &str) -> Result<Vec<WordRow>> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tbody tr")?;
    let cell_selector = selector("td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| anyhow!("No table found in HTML file"))?;

    let mut rows = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() != 3 {
            continue;
        }

        let (english, english_note) = clean_english(&element_text(&cells[0]));
        let arabic = clean_arabic(&element_text(&cells[1]));
        let pronunciation = strip_tags(&element_text(&cells[2]));

        if english.is_empty() || arabic.is_empty() {
            debug!("Skipping incomplete row: '{}' / '{}'", english, arabic);
            continue;
        }

        rows.push(WordRow {
            english,
            english_note,
            arabic,
            pronunciation: (!pronunciation.is_empty()).then_some(pronunciation),
        });
    }

    Ok(rows)
}

/// Keep the part before a slash, move parenthesised text to a note and
/// lower-case the rest
pub fn clean_english(raw: &str) -> (String, Option<String>) {
    let mut text = before_slash(raw).to_string();
    let mut note = None;

    if let Ok(re) = Regex::new(r"\(([^)]+)\)") {
        if let Some(captures) = re.captures(&text) {
            let content = captures[1].trim().to_string();
            if !content.is_empty() {
                note = Some(content);
            }
            if let Ok(strip) = Regex::new(r"\s*\([^)]*\)") {
                text = strip.replace_all(&text, "").trim().to_string();
            }
        }
    }

    (text.to_lowercase(), note)
}

pub fn clean_arabic(raw: &str) -> String {
    before_slash(raw).to_string()
}

fn before_slash(text: &str) -> &str {
    text.split('/').next().unwrap_or_default().trim()
}

fn strip_tags(text: &str) -> String {
    match Regex::new(r"<[^>]+>") {
        Ok(re) => re.replace_all(text, "").trim().to_string(),
        Err(_) => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        <html><body><table>
          <thead><tr><th>English</th><th>Arabic</th><th>Pronunciation</th></tr></thead>
          <tbody>
            <tr><td>House / Home</td><td>بيت / دار</td><td><em>bēt</em></td></tr>
            <tr><td>To Go (masc.)</td><td>روح</td><td></td></tr>
            <tr><td></td><td>فاضي</td><td>fāḍi</td></tr>
            <tr><td>only two</td><td>cells</td></tr>
          </tbody>
        </table></body></html>"#;

    #[test]
    fn test_parse_rows() {
        let rows = parse_word_table(TABLE).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].english, "house");
        assert_eq!(rows[0].arabic, "بيت");
        assert_eq!(rows[0].pronunciation.as_deref(), Some("bēt"));
        assert_eq!(rows[0].english_note, None);

        assert_eq!(rows[1].english, "to go");
        assert_eq!(rows[1].english_note.as_deref(), Some("masc."));
        assert_eq!(rows[1].pronunciation, None);
    }

    #[test]
    fn test_no_table_is_error() {
        assert!(parse_word_table("<p>nothing here</p>").is_err());
    }

    #[test]
    fn test_clean_english_variants() {
        assert_eq!(clean_english("Big"), ("big".to_string(), None));
        assert_eq!(
            clean_english("Car (vehicle) / Auto"),
            ("car".to_string(), Some("vehicle".to_string()))
        );
        assert_eq!(clean_arabic(" سيارة/عربية "), "سيارة");
    }
}

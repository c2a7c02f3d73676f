/// Monolithic set documents consumed by the app's remote set browser.
///
/// Each document is a named container with one array of items; nested
/// translations, notes and links are embedded instead of referenced by id.

use serde::{Deserialize, Serialize};

/// Inline note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteNote {
    pub content: String,
    pub show_before_exercise: bool,
}

impl RemoteNote {
    pub fn new(content: impl Into<String>, show_before_exercise: bool) -> Self {
        Self {
            content: content.into(),
            show_before_exercise,
        }
    }
}

/// Inline translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTranslation {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<RemoteNote>,
}

impl RemoteTranslation {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: RemoteNote) -> Self {
        self.notes.push(note);
        self
    }
}

/// Inline link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteVocab {
    pub language: String,
    pub priority: u32,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<RemoteTranslation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<RemoteNote>,
}

impl RemoteVocab {
    /// Priority-1 vocab with one plain translation
    pub fn simple(
        language: impl Into<String>,
        content: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            priority: 1,
            content: content.into(),
            translations: vec![RemoteTranslation::new(translation)],
            notes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteImmersionContent {
    pub language: String,
    pub priority: u32,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needed_vocab: Vec<RemoteVocab>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<RemoteNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResource {
    pub language: String,
    pub priority: u32,
    pub title: String,
    pub prompt: String,
    pub link: RemoteLink,
}

/// Translation counterpart of a unit of meaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTranslation {
    pub language: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOfMeaning {
    pub language: String,
    pub content: String,
    pub translations: Vec<UnitTranslation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTask {
    pub content: String,
    pub language: String,
    pub primary_units_of_meaning: Vec<UnitOfMeaning>,
    pub secondary_units_of_meaning: Vec<UnitOfMeaning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteVocabSet {
    pub name: String,
    pub vocabs: Vec<RemoteVocab>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteImmersionContentSet {
    pub name: String,
    pub immersion_content: Vec<RemoteImmersionContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResourceSet {
    pub name: String,
    pub resources: Vec<RemoteResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTaskSet {
    pub name: String,
    pub language: String,
    pub tasks: Vec<RemoteTask>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_immersion_content_field_names() {
        let set = RemoteImmersionContentSet {
            name: "Levanti Dataset Sentences".to_string(),
            immersion_content: vec![RemoteImmersionContent {
                language: "apc".to_string(),
                priority: 1,
                title: "Levanti Sentence 1".to_string(),
                content: "كيفك؟".to_string(),
                needed_vocab: Vec::new(),
                notes: vec![RemoteNote::new("English: How are you?", false)],
            }],
        };

        let value = serde_json::to_value(&set).unwrap();
        let item = &value["immersionContent"][0];
        assert!(item.get("neededVocab").is_none());
        assert_eq!(item["notes"][0]["showBeforeExercise"], json!(false));
    }

    #[test]
    fn test_vocab_without_notes_omits_field() {
        let vocab = RemoteVocab::simple("apc", "بيت", "house");
        let value = serde_json::to_value(&vocab).unwrap();
        assert_eq!(
            value,
            json!({
                "language": "apc",
                "priority": 1,
                "content": "بيت",
                "translations": [{"content": "house"}]
            })
        );
    }

    #[test]
    fn test_task_field_names() {
        let task = RemoteTask {
            content: "Translate the sentence 'x'".to_string(),
            language: "apc".to_string(),
            primary_units_of_meaning: Vec::new(),
            secondary_units_of_meaning: Vec::new(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("primaryUnitsOfMeaning").is_some());
        assert!(value.get("secondaryUnitsOfMeaning").is_some());
    }
}

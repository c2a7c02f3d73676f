/// Content records and the accumulator that deduplicates them
///
/// Records cross-reference each other only through [`EntityId`]s; the JSONL
/// writers in [`crate::output`] serialize them one per line.

pub mod accumulator;
pub mod ids;

pub use accumulator::{
    DuplicateNotes, EntityAccumulator, EntityCounts, EntityExport, NewLink, NewNote,
    NewTranslation, NewVocab, VocabRelations,
};
pub use ids::{EntityId, EntityKind, IdAllocator};

use serde::{Deserialize, Serialize};

/// Granularity of a vocab entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabLength {
    Character,
    Word,
    Sentence,
}

/// Image attached to a vocab entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub filename: String,
    pub alt: String,
}

/// Audio attached to a vocab entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundRef {
    pub filename: String,
}

/// A word, phrase or sentence in one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocab {
    pub id: EntityId,
    pub language: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<VocabLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub considered_word: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_picturable: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_vocab: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sounds: Vec<SoundRef>,
}

/// Content in another language, shared by every vocab that points at it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub id: EntityId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<EntityId>,
}

/// Auxiliary text such as a pronunciation or a grammatical type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EntityId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_before_exercise: Option<bool>,
}

/// Attribution for where a record came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: EntityId,
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

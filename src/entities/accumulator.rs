use super::{
    EntityId, EntityKind, IdAllocator, ImageRef, Link, Note, SoundRef, Translation, Vocab,
    VocabLength,
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// What happens to the notes of a translation whose content already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateNotes {
    /// Append unseen note ids to the existing translation
    #[default]
    Merge,
    /// Keep the existing translation untouched
    Ignore,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Append ids that are not present yet, keeping first-appearance order
fn merge_ids(target: &mut Vec<EntityId>, incoming: Vec<EntityId>) {
    for id in incoming {
        if !target.contains(&id) {
            target.push(id);
        }
    }
}

/// Parameters for [`EntityAccumulator::create_link`]
#[derive(Debug, Clone)]
pub struct NewLink {
    label: String,
    url: String,
    owner: Option<String>,
    owner_link: Option<String>,
    license: Option<String>,
}

impl NewLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            owner: None,
            owner_link: None,
            license: None,
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = non_empty(owner.into());
        self
    }

    pub fn owner_link(mut self, owner_link: impl Into<String>) -> Self {
        self.owner_link = non_empty(owner_link.into());
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.license = non_empty(license.into());
        self
    }
}

/// Parameters for [`EntityAccumulator::create_note`]
#[derive(Debug, Clone)]
pub struct NewNote {
    content: String,
    note_type: Option<String>,
    show_before_exercise: Option<bool>,
}

impl NewNote {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            note_type: None,
            show_before_exercise: None,
        }
    }

    pub fn note_type(mut self, note_type: impl Into<String>) -> Self {
        self.note_type = non_empty(note_type.into());
        self
    }

    pub fn show_before_exercise(mut self, show: bool) -> Self {
        self.show_before_exercise = Some(show);
        self
    }
}

/// Parameters for [`EntityAccumulator::create_translation`]
#[derive(Debug, Clone)]
pub struct NewTranslation {
    content: String,
    notes: Vec<EntityId>,
    priority: Option<u32>,
}

impl NewTranslation {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            notes: Vec::new(),
            priority: None,
        }
    }

    pub fn notes(mut self, notes: impl IntoIterator<Item = EntityId>) -> Self {
        self.notes.extend(notes);
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Relationship lists of a vocab entry, merged on duplicate insertion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocabRelations {
    pub notes: Vec<EntityId>,
    pub translations: Vec<EntityId>,
    pub links: Vec<EntityId>,
    pub related_vocab: Vec<EntityId>,
}

impl VocabRelations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.notes.extend(ids);
        self
    }

    pub fn translations(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.translations.extend(ids);
        self
    }

    pub fn links(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.links.extend(ids);
        self
    }

    pub fn related_vocab(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.related_vocab.extend(ids);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
            && self.translations.is_empty()
            && self.links.is_empty()
            && self.related_vocab.is_empty()
    }

    fn merge_into(self, vocab: &mut Vocab) {
        merge_ids(&mut vocab.notes, self.notes);
        merge_ids(&mut vocab.translations, self.translations);
        merge_ids(&mut vocab.links, self.links);
        merge_ids(&mut vocab.related_vocab, self.related_vocab);
    }
}

/// Parameters for [`EntityAccumulator::create_vocab`]
///
/// Relationship lists merge into an existing entry with the same
/// `(language, content)`; the remaining attributes only apply when the
/// entry is first created.
#[derive(Debug, Clone)]
pub struct NewVocab {
    language: String,
    content: String,
    relations: VocabRelations,
    length: Option<VocabLength>,
    priority: Option<u32>,
    considered_word: Option<bool>,
    is_picturable: Option<bool>,
    images: Vec<ImageRef>,
    sounds: Vec<SoundRef>,
}

impl NewVocab {
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            content: content.into(),
            relations: VocabRelations::default(),
            length: None,
            priority: None,
            considered_word: None,
            is_picturable: None,
            images: Vec::new(),
            sounds: Vec::new(),
        }
    }

    pub fn relations(mut self, relations: VocabRelations) -> Self {
        self.relations = relations;
        self
    }

    pub fn notes(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.relations.notes.extend(ids);
        self
    }

    pub fn translations(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.relations.translations.extend(ids);
        self
    }

    pub fn links(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.relations.links.extend(ids);
        self
    }

    pub fn related_vocab(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.relations.related_vocab.extend(ids);
        self
    }

    pub fn length(mut self, length: VocabLength) -> Self {
        self.length = Some(length);
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn considered_word(mut self, considered: bool) -> Self {
        self.considered_word = Some(considered);
        self
    }

    pub fn picturable(mut self, picturable: bool) -> Self {
        self.is_picturable = Some(picturable);
        self
    }

    pub fn images(mut self, images: impl IntoIterator<Item = ImageRef>) -> Self {
        self.images.extend(images);
        self
    }

    pub fn sounds(mut self, sounds: impl IntoIterator<Item = SoundRef>) -> Self {
        self.sounds.extend(sounds);
        self
    }
}

/// Number of records per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub vocab: usize,
    pub translations: usize,
    pub notes: usize,
    pub links: usize,
}

impl EntityCounts {
    pub fn total(&self) -> usize {
        self.vocab + self.translations + self.notes + self.links
    }
}

impl fmt::Display for EntityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vocab, {} translations, {} notes, {} links",
            self.vocab, self.translations, self.notes, self.links
        )
    }
}

/// Borrowed view of all four collections in insertion order
#[derive(Debug, Clone, Copy)]
pub struct EntityExport<'a> {
    pub vocab: &'a [Vocab],
    pub translations: &'a [Translation],
    pub notes: &'a [Note],
    pub links: &'a [Link],
}

impl EntityExport<'_> {
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            vocab: self.vocab.len(),
            translations: self.translations.len(),
            notes: self.notes.len(),
            links: self.links.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }
}

/// In-memory registry that assigns identifiers and collapses duplicates.
///
/// Vocab entries are unique per `(language, content)` and translations per
/// `content`. Notes and links are always appended. Nothing is ever removed,
/// so identifiers stay valid for the whole run.
#[derive(Debug, Clone, Default)]
pub struct EntityAccumulator {
    ids: IdAllocator,
    duplicate_notes: DuplicateNotes,
    vocab: Vec<Vocab>,
    translations: Vec<Translation>,
    notes: Vec<Note>,
    links: Vec<Link>,
    vocab_by_key: HashMap<(String, String), usize>,
    vocab_by_id: HashMap<EntityId, usize>,
    translation_by_content: HashMap<String, usize>,
}

impl EntityAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator with an explicit policy for notes on duplicate translations
    pub fn with_duplicate_notes(policy: DuplicateNotes) -> Self {
        Self {
            duplicate_notes: policy,
            ..Self::default()
        }
    }

    pub fn duplicate_notes(&self) -> DuplicateNotes {
        self.duplicate_notes
    }

    /// Append a link record
    pub fn create_link(&mut self, link: NewLink) -> EntityId {
        let id = self.ids.next(EntityKind::Link);
        self.links.push(Link {
            id: id.clone(),
            label: link.label,
            url: link.url,
            owner: link.owner,
            owner_link: link.owner_link,
            license: link.license,
        });
        id
    }

    /// Append a note record
    pub fn create_note(&mut self, note: NewNote) -> EntityId {
        let id = self.ids.next(EntityKind::Note);
        self.notes.push(Note {
            id: id.clone(),
            content: note.content,
            note_type: note.note_type,
            show_before_exercise: note.show_before_exercise,
        });
        id
    }

    /// Return the translation with this content, creating it if needed
    pub fn create_translation(&mut self, translation: NewTranslation) -> EntityId {
        if let Some(&index) = self.translation_by_content.get(&translation.content) {
            let existing = &mut self.translations[index];
            if self.duplicate_notes == DuplicateNotes::Merge {
                merge_ids(&mut existing.notes, translation.notes);
            }
            return existing.id.clone();
        }

        let id = self.ids.next(EntityKind::Translation);
        let mut notes = Vec::new();
        merge_ids(&mut notes, translation.notes);

        self.translation_by_content
            .insert(translation.content.clone(), self.translations.len());
        self.translations.push(Translation {
            id: id.clone(),
            content: translation.content,
            priority: translation.priority,
            notes,
        });
        id
    }

    /// Return the vocab with this `(language, content)`, creating it if needed.
    ///
    /// On a duplicate the relationship lists are merged into the existing
    /// entry and its identifier is returned unchanged.
    pub fn create_vocab(&mut self, vocab: NewVocab) -> EntityId {
        let key = (vocab.language, vocab.content);
        if let Some(&index) = self.vocab_by_key.get(&key) {
            let existing = &mut self.vocab[index];
            vocab.relations.merge_into(existing);
            return existing.id.clone();
        }

        let id = self.ids.next(EntityKind::Vocab);
        let (language, content) = key;
        let mut entry = Vocab {
            id: id.clone(),
            language: language.clone(),
            content: content.clone(),
            length: vocab.length,
            priority: vocab.priority,
            considered_word: vocab.considered_word,
            is_picturable: vocab.is_picturable,
            notes: Vec::new(),
            translations: Vec::new(),
            links: Vec::new(),
            related_vocab: Vec::new(),
            images: vocab.images,
            sounds: vocab.sounds,
        };
        vocab.relations.merge_into(&mut entry);

        let index = self.vocab.len();
        self.vocab_by_key.insert((language, content), index);
        self.vocab_by_id.insert(id.clone(), index);
        self.vocab.push(entry);
        id
    }

    /// Merge relationships into an already-created vocab entry.
    ///
    /// Returns `false` when no vocab has this identifier.
    pub fn relate_vocab(&mut self, vocab_id: &EntityId, relations: VocabRelations) -> bool {
        match self.vocab_by_id.get(vocab_id) {
            Some(&index) => {
                relations.merge_into(&mut self.vocab[index]);
                true
            }
            None => false,
        }
    }

    pub fn vocab(&self, id: &EntityId) -> Option<&Vocab> {
        self.vocab_by_id.get(id).map(|&index| &self.vocab[index])
    }

    pub fn find_vocab(&self, language: &str, content: &str) -> Option<&Vocab> {
        self.vocab_by_key
            .get(&(language.to_string(), content.to_string()))
            .map(|&index| &self.vocab[index])
    }

    pub fn find_translation(&self, content: &str) -> Option<&Translation> {
        self.translation_by_content
            .get(content)
            .map(|&index| &self.translations[index])
    }

    pub fn counts(&self) -> EntityCounts {
        self.export().counts()
    }

    pub fn is_empty(&self) -> bool {
        self.export().is_empty()
    }

    /// All records in insertion order
    pub fn export(&self) -> EntityExport<'_> {
        EntityExport {
            vocab: &self.vocab,
            translations: &self.translations,
            notes: &self.notes,
            links: &self.links,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of records that receive their own identifier sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Vocab,
    Translation,
    Note,
    Link,
}

impl EntityKind {
    fn slot(self) -> usize {
        match self {
            EntityKind::Vocab => 0,
            EntityKind::Translation => 1,
            EntityKind::Note => 2,
            EntityKind::Link => 3,
        }
    }
}

/// String identifier of a record, unique within its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Issues "1", "2", ... independently for every entity kind.
///
/// Counters only move forward; a fresh allocator belongs to every
/// accumulator so separate datasets never share a sequence.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    counters: [u64; 4],
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier for `kind`
    pub fn next(&mut self, kind: EntityKind) -> EntityId {
        let counter = &mut self.counters[kind.slot()];
        *counter += 1;
        EntityId(counter.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_starts_at_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next(EntityKind::Vocab).as_str(), "1");
        assert_eq!(ids.next(EntityKind::Vocab).as_str(), "2");
        assert_eq!(ids.next(EntityKind::Vocab).as_str(), "3");
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut ids = IdAllocator::new();
        ids.next(EntityKind::Vocab);
        ids.next(EntityKind::Vocab);
        assert_eq!(ids.next(EntityKind::Link).as_str(), "1");
        assert_eq!(ids.next(EntityKind::Note).as_str(), "1");
        assert_eq!(ids.next(EntityKind::Vocab).as_str(), "3");
        assert_eq!(ids.next(EntityKind::Translation).as_str(), "1");
    }

    #[test]
    fn test_no_gaps_or_reuse() {
        let mut ids = IdAllocator::new();
        let issued: Vec<u64> = (0..50)
            .map(|_| ids.next(EntityKind::Translation).as_str().parse().unwrap())
            .collect();
        let expected: Vec<u64> = (1..=50).collect();
        assert_eq!(issued, expected);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = EntityId::from("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }
}

/// Linguanodon Sets - content set generation for language learning
///
/// Run-once pipelines that turn subtitles, datasets, a web dictionary and
/// AI services into vocabulary, immersion, resource and task sets.

pub mod config;
pub mod entities;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipelines;
pub mod remote;
pub mod services;
pub mod sources;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder, PictureLanguage};
pub use crate::entities::{
    DuplicateNotes, EntityAccumulator, EntityCounts, EntityId, EntityKind, IdAllocator,
};
pub use crate::error::{DatagenError, Result};
pub use crate::llm::{create_llm, LLMConfig, LLMProvider, VocabExtractor};
pub use crate::output::OutputLayout;
pub use crate::pipelines::PipelineSummary;
pub use crate::sources::SourceAdapter;

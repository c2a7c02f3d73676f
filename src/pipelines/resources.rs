use super::{save_document_set, PipelineSummary};
use crate::output::OutputLayout;
use crate::remote::{RemoteLink, RemoteResource, RemoteResourceSet};
use crate::sources::{LinkEntry, SourceAdapter};
use anyhow::Result;
use tracing::info;

pub const SET_NAME: &str = "Common English Sentences";
pub const LANGUAGE: &str = "apc";

pub fn resource_prompt(title: &str) -> String {
    format!(
        "Check out this resource about '{}' and learn useful English expressions for this topic.",
        title
    )
}

/// Resources in source order, prioritised by position
pub fn build_resource_set(entries: Vec<LinkEntry>) -> RemoteResourceSet {
    let resources = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RemoteResource {
            language: LANGUAGE.to_string(),
            priority: i as u32 + 1,
            prompt: resource_prompt(&entry.title),
            link: RemoteLink {
                label: entry.title.clone(),
                url: entry.url,
            },
            title: entry.title,
        })
        .collect();

    RemoteResourceSet {
        name: SET_NAME.to_string(),
        resources,
    }
}

/// Links file -> `resource_sets/apc/Common English Sentences.json`
pub async fn run_resources<S>(source: &S, layout: &OutputLayout) -> Result<PipelineSummary>
where
    S: SourceAdapter<Item = LinkEntry>,
{
    let mut summary = PipelineSummary::new("resources");

    info!("🔗 Reading links from {}", source.name());
    let entries = source.fetch_items().await?;
    let set = build_resource_set(entries);
    summary.processed = set.resources.len();
    info!("Created resource set '{}' with {} resources", set.name, set.resources.len());

    save_document_set(&layout.resource_sets(LANGUAGE), SET_NAME, &set, &mut summary).await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::read_index;
    use crate::sources::StaticSource;
    use tempfile::TempDir;

    fn entry(title: &str, url: &str) -> LinkEntry {
        LinkEntry {
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_priority_follows_position() {
        let set = build_resource_set(vec![
            entry("Greetings", "https://example.com/a"),
            entry("At the market", "https://example.com/b"),
        ]);

        assert_eq!(set.resources[0].priority, 1);
        assert_eq!(set.resources[1].priority, 2);
        assert_eq!(set.resources[1].link.label, "At the market");
        assert_eq!(
            set.resources[0].prompt,
            "Check out this resource about 'Greetings' and learn useful English expressions for this topic."
        );
    }

    #[tokio::test]
    async fn test_rerun_keeps_single_index_entry() {
        let temp_dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp_dir.path());
        let source = StaticSource::new("links", vec![entry("Greetings", "https://example.com/a")]);

        run_resources(&source, &layout).await.unwrap();
        let summary = run_resources(&source, &layout).await.unwrap();

        assert_eq!(summary.processed, 1);
        assert!(layout
            .resource_sets("apc")
            .join("Common English Sentences.json")
            .exists());
        let index = read_index(&layout.resource_sets("apc")).await.unwrap();
        assert_eq!(index, vec!["Common English Sentences".to_string()]);
    }
}

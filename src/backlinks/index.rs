//! Reverse index from target page to the contexts that reference it.

use std::collections::BTreeMap;

use crate::{
    backlinks::extract::{extract, LinkReference, PageDirectory},
    codec::Page,
    properties::{Block, PageId},
};

/// All contexts from one source page that reference a given target.
#[derive(Debug, Clone, PartialEq)]
pub struct BacklinkGroup {
    pub source: PageId,
    /// The source page's own title; its id when the title is unknown.
    pub title: String,
    pub contexts: Vec<Block>,
}

/// Group consecutive entries by source page, keeping first-seen order.
pub fn group_entries<F>(entries: &[(PageId, Block)], title_of: F) -> Vec<BacklinkGroup>
where
    F: Fn(&PageId) -> Option<String>,
{
    let mut groups: Vec<BacklinkGroup> = Vec::new();
    for (source, context) in entries {
        match groups.last_mut() {
            Some(group) if &group.source == source => {
                group.contexts.push(context.clone());
                continue;
            }
            _ => {}
        }
        groups.push(BacklinkGroup {
            source: source.clone(),
            title: title_of(source).unwrap_or_else(|| source.to_string()),
            contexts: vec![context.clone()],
        });
    }
    groups
}

/// Backlinks of a whole page set: for each target page, every `(source, context)` pair in the
/// order the source pages were visited.
#[derive(Debug, Clone, Default)]
pub struct BacklinkIndex {
    entries: BTreeMap<PageId, Vec<(PageId, Block)>>,
    directory: PageDirectory,
}

impl BacklinkIndex {
    /// Extract links from every page and bucket them by target.
    #[tracing::instrument(skip_all)]
    pub fn build(pages: &[Page]) -> BacklinkIndex {
        let directory = PageDirectory::from_pages(pages);
        let mut index = BacklinkIndex {
            entries: BTreeMap::new(),
            directory,
        };
        for page in pages {
            let references = extract(page, &index.directory);
            index.extend(references);
        }
        tracing::info!(
            "Indexed backlinks for {} target page(s) across {} page(s)",
            index.entries.len(),
            pages.len()
        );
        index
    }

    pub fn extend<I: IntoIterator<Item = LinkReference>>(&mut self, references: I) {
        for reference in references {
            self.entries
                .entry(reference.target)
                .or_default()
                .push((reference.source, reference.context));
        }
    }

    pub fn directory(&self) -> &PageDirectory {
        &self.directory
    }

    /// Raw `(source, context)` entries for `target`; empty when nothing links to it.
    pub fn entries(&self, target: &PageId) -> &[(PageId, Block)] {
        self.entries.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn groups(&self, target: &PageId) -> Vec<BacklinkGroup> {
        group_entries(self.entries(target), |source| {
            self.directory.title_of(source).map(str::to_string)
        })
    }

    pub fn targets(&self) -> impl Iterator<Item = &PageId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

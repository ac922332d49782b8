//! Finding the references one page makes to other pages.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    codec::{
        md::{href_to_page_id, scan_references, InlineReference, ReferenceKind},
        Page,
    },
    properties::{Block, BlockId, PageId},
};

/// A reference from `source` to `target`, with the bullet it appears in.
///
/// `context` is the whole enclosing bullet including its children, so a backlink shows the
/// local subtree around the reference rather than only the matching line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkReference {
    pub source: PageId,
    pub target: PageId,
    pub context: Block,
}

/// Page ids and titles of the notebook, used to resolve `[[Page Title]]` references and to label
/// backlink groups.
#[derive(Debug, Clone, Default)]
pub struct PageDirectory {
    titles: BTreeMap<PageId, String>,
    by_title: BTreeMap<String, PageId>,
}

impl PageDirectory {
    pub fn from_pages<'a, I: IntoIterator<Item = &'a Page>>(pages: I) -> Self {
        let mut directory = PageDirectory::default();
        for page in pages {
            directory.insert(page.id.clone(), page.title.clone());
        }
        directory
    }

    pub fn insert(&mut self, id: PageId, title: String) {
        // First page to claim a title keeps it.
        self.by_title
            .entry(title.to_lowercase())
            .or_insert_with(|| id.clone());
        self.titles.insert(id, title);
    }

    pub fn title_of(&self, id: &PageId) -> Option<&str> {
        self.titles.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &PageId) -> bool {
        self.titles.contains_key(id)
    }

    /// Case-insensitive title lookup, falling back to an exact page id.
    pub fn resolve_title(&self, title: &str) -> Option<PageId> {
        self.by_title
            .get(&title.to_lowercase())
            .cloned()
            .or_else(|| {
                let id = PageId::from(title);
                self.contains(&id).then_some(id)
            })
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

fn resolve(reference: &InlineReference, directory: &PageDirectory) -> Option<PageId> {
    match &reference.kind {
        ReferenceKind::Link { dest } => href_to_page_id(dest),
        ReferenceKind::Hashtag { tag } => Some(PageId::from(tag.as_str())),
        ReferenceKind::WikiLink { title } => {
            let resolved = directory.resolve_title(title);
            if resolved.is_none() {
                tracing::debug!("Unresolved wikilink [[{title}]]");
            }
            resolved
        }
    }
}

/// Distinct targets referenced in `content`, in order of first occurrence, excluding `source`.
fn targets_in(
    content: &str,
    source: &PageId,
    directory: &PageDirectory,
) -> Vec<(PageId, InlineReference)> {
    let mut seen = BTreeSet::new();
    scan_references(content)
        .into_iter()
        .filter_map(|reference| resolve(&reference, directory).map(|id| (id, reference)))
        .filter(|(id, _)| id != source && seen.insert(id.clone()))
        .collect()
}

/// Every reference `page` makes to another page, one per (context, target) pair, in outline
/// order.
///
/// Pages whose body failed to parse contribute nothing.
pub fn extract(page: &Page, directory: &PageDirectory) -> Vec<LinkReference> {
    if page.is_malformed() {
        tracing::debug!("Skipping link extraction for malformed page {}", page.id);
        return Vec::new();
    }
    let mut references = Vec::new();

    // The root is never a bullet; anything it holds gets a synthetic context.
    for (target, reference) in targets_in(&page.body.content, &page.id, directory) {
        let fragment = reference.fragment(&page.body.content);
        references.push(LinkReference {
            source: page.id.clone(),
            target,
            context: Block {
                id: BlockId::nil(),
                content: fragment.to_string(),
                children: Vec::new(),
            },
        });
    }

    for (block, _depth) in page.body.descendants() {
        for (target, _) in targets_in(&block.content, &page.id, directory) {
            references.push(LinkReference {
                source: page.id.clone(),
                target,
                context: block.clone(),
            });
        }
    }
    tracing::debug!(
        "Page {} references {} other page(s)",
        page.id,
        references
            .iter()
            .map(|r| &r.target)
            .collect::<BTreeSet<_>>()
            .len()
    );
    references
}

//! Rendering backlinks into a page's sentinel-delimited region.

use crate::{
    backlinks::index::{BacklinkGroup, BacklinkIndex},
    codec::{outline, Page, BACKLINKS_END, BACKLINKS_START},
    properties::Block,
};

pub const BACKLINKS_HEADING: &str = "## Backlinks";

fn escape_link_text(title: &str) -> String {
    title.replace('[', "\\[").replace(']', "\\]")
}

/// The full region text, sentinels included, or `None` when there is nothing to show.
pub fn render_region(groups: &[BacklinkGroup]) -> Option<String> {
    if groups.is_empty() {
        return None;
    }
    let mut outline_root = Block::root();
    for group in groups {
        outline_root.children.push(Block::with_children(
            format!(
                "[{}]({})",
                escape_link_text(&group.title),
                group.source.href()
            ),
            group.contexts.clone(),
        ));
    }
    Some(format!(
        "{BACKLINKS_START}\n{BACKLINKS_HEADING}\n\n{}\n{BACKLINKS_END}",
        outline::serialize(&outline_root)
    ))
}

/// Replace `page`'s backlinks region with one generated from `groups`.
///
/// The body is re-serialized and reassembled with the frontmatter. With no groups the region is
/// dropped entirely, so stale backlinks never survive. Injecting the same groups again yields
/// byte-identical text. Pages whose body could not be parsed are returned unchanged, since
/// re-serializing them would overwrite the user's text with the error block.
pub fn inject(page: &Page, groups: &[BacklinkGroup]) -> Page {
    if page.is_malformed() {
        tracing::warn!("Not injecting backlinks into malformed page {}", page.id);
        return page.clone();
    }
    let region = render_region(groups);
    let mut injected = page.clone();
    injected.raw = page.assemble(region.as_deref());
    injected.backlinks_raw = region;
    injected
}

impl BacklinkIndex {
    /// `page` with its backlinks region regenerated from this index.
    pub fn inject_into(&self, page: &Page) -> Page {
        inject(page, &self.groups(&page.id))
    }
}

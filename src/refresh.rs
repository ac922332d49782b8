//! Batch backlink refresh and single-page load/save.

use std::fmt;

use crate::{
    backlinks::BacklinkIndex,
    codec::Page,
    error::NotazaError,
    properties::PageId,
    store::PageStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Save rewritten pages. When false the refresh only reports.
    pub write: bool,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        RefreshOptions { write: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub scanned: usize,
    /// Pages whose text changed (saved unless this was a dry run).
    pub rewritten: Vec<PageId>,
    pub unchanged: usize,
    /// Pages left alone because they could not be read or their body could not be parsed.
    pub failed: Vec<(PageId, NotazaError)>,
    pub dry_run: bool,
}

impl fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "would rewrite" } else { "rewrote" };
        writeln!(
            f,
            "scanned {} page(s): {verb} {}, {} unchanged, {} failed",
            self.scanned,
            self.rewritten.len(),
            self.unchanged,
            self.failed.len()
        )?;
        for id in self.rewritten.iter() {
            writeln!(f, "  {verb} {id}")?;
        }
        for (id, err) in self.failed.iter() {
            writeln!(f, "  failed {id}: {err}")?;
        }
        Ok(())
    }
}

/// Load a page, synthesizing an empty one if it does not exist yet.
pub fn load_page(store: &dyn PageStore, id: &PageId) -> Result<Page, NotazaError> {
    match store.load(id)? {
        Some(raw) => Ok(Page::parse(id.clone(), &raw)),
        None => {
            tracing::debug!("Page {id} does not exist yet");
            Ok(Page::empty(id.clone()))
        }
    }
}

/// Load and parse every page in the store, setting aside the ones that cannot be read.
///
/// Only a failure to list the store is an error; a page whose text cannot be read (missing
/// permissions, invalid UTF-8) is returned with its error next to the pages that loaded.
pub fn read_pages(
    store: &dyn PageStore,
) -> Result<(Vec<Page>, Vec<(PageId, NotazaError)>), NotazaError> {
    let mut pages = Vec::new();
    let mut unreadable = Vec::new();
    for id in store.list()? {
        match store.load(&id) {
            Ok(Some(raw)) => pages.push(Page::parse(id, &raw)),
            Ok(None) => tracing::warn!("Listed page {id} vanished before it could be read"),
            Err(e) => {
                tracing::warn!("Could not read page {id}: {e}");
                unreadable.push((id, e));
            }
        }
    }
    Ok((pages, unreadable))
}

/// Load and parse every readable page in the store.
pub fn load_all(store: &dyn PageStore) -> Result<Vec<Page>, NotazaError> {
    Ok(read_pages(store)?.0)
}

/// Persist one page's current body, keeping its existing backlinks region verbatim.
///
/// Other pages' backlinks are not touched; they catch up on the next [refresh_backlinks]. A page
/// whose body failed to parse is refused until it is given a new body, so the error block never
/// replaces the user's text.
pub fn save_page(store: &dyn PageStore, page: &Page) -> Result<(), NotazaError> {
    if let Some(err) = &page.parse_error {
        return Err(err.clone());
    }
    store.save(&page.id, &page.render())
}

pub fn refresh_backlinks(store: &dyn PageStore) -> Result<RefreshReport, NotazaError> {
    refresh_backlinks_with(store, RefreshOptions::default())
}

/// Rebuild every page's backlinks region.
///
/// All pages are read and indexed before anything is written, so no page's new region depends on
/// another page's already-rewritten text. Each page is then rewritten from its own index bucket
/// only; pages nobody links to lose their region. Pages whose text would not change are not
/// saved. A page that cannot be read is reported in [RefreshReport::failed] and the batch goes on.
#[tracing::instrument(skip_all, fields(write = options.write))]
pub fn refresh_backlinks_with(
    store: &dyn PageStore,
    options: RefreshOptions,
) -> Result<RefreshReport, NotazaError> {
    let (pages, unreadable) = read_pages(store)?;
    let index = BacklinkIndex::build(&pages);

    let mut report = RefreshReport {
        scanned: pages.len() + unreadable.len(),
        failed: unreadable,
        dry_run: !options.write,
        ..Default::default()
    };
    for page in pages.iter() {
        if let Some(err) = &page.parse_error {
            tracing::warn!("Skipping malformed page {}: {err}", page.id);
            report.failed.push((page.id.clone(), err.clone()));
            continue;
        }
        let refreshed = index.inject_into(page);
        if refreshed.raw == page.raw {
            report.unchanged += 1;
            continue;
        }
        if options.write {
            store.save(&page.id, &refreshed.raw)?;
        }
        tracing::debug!("Refreshed backlinks of {}", page.id);
        report.rewritten.push(page.id.clone());
    }
    tracing::info!(
        "Backlink refresh: {} scanned, {} rewritten, {} unchanged, {} failed",
        report.scanned,
        report.rewritten.len(),
        report.unchanged,
        report.failed.len()
    );
    Ok(report)
}

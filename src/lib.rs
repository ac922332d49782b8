//! # notaza
//!
//! The document model of a personal markdown notebook: every page is a tree of bullet blocks,
//! edited structurally and cross-referenced through automatically maintained backlinks.
//!
//! ## Overview
//!
//! A page on disk is plain markdown in a strict bullet-outline form, optionally preceded by YAML
//! frontmatter and followed by a generated backlinks region:
//!
//! ```markdown
//! ---
//! title: Reading List
//! ---
//! * Books for the winter
//!     * see [Library](./library.md) and #fiction
//!
//! <!-- notaza backlinks start -->
//! ## Backlinks
//!
//! * [Inbox](./inbox.md)
//!     * add to [[Reading List]]
//! <!-- notaza backlinks end -->
//! ```
//!
//! ### Key Features
//!
//! - **Lossless outline codec**: parse a page body into a [`Block`](properties::Block) tree and
//!   serialize it back in normalized form
//! - **Structural editing**: split, remove, indent, unindent, reorder and merge blocks through
//!   [`OutlineEditor`](editor::OutlineEditor), with undo and redo
//! - **Backlinks**: markdown links, `[[wikilinks]]` and `#hashtags` are collected across the
//!   notebook and written into each target page's backlinks region
//! - **Error tolerance**: a page that fails to parse is shown as an explanatory block and is
//!   never overwritten
//!
//! ## Architecture
//!
//! - **[`properties`]**: identifiers ([`BlockId`](properties::BlockId), [`PageId`](properties::PageId)) and the [`Block`](properties::Block) tree
//! - **[`codec`]**: outline parser/serializer, [`Page`](codec::Page) splitting and reassembly, inline reference scanning
//! - **[`editor`]**: copy-on-write structural edits
//! - **[`backlinks`]**: link extraction, the reverse index and region injection
//! - **[`store`]**: [`PageStore`](store::PageStore) backends (filesystem, in-memory)
//! - **[`refresh`]**: the two-phase batch backlink refresh and single-page save
//! - **[`config`]**: `notaza.toml`
//!
//! ## Quick Start
//!
//! ```rust
//! use notaza::{refresh::refresh_backlinks, store::MemoryPageStore};
//!
//! let store = MemoryPageStore::with_pages([
//!     ("inbox", "* read [Reading List](./reading.md)\n"),
//!     ("reading", "* winter books\n"),
//! ]);
//! let report = refresh_backlinks(&store).unwrap();
//! assert_eq!(report.rewritten.len(), 1);
//! assert!(store.get("reading").unwrap().contains("* [inbox](./inbox.md)"));
//! ```
//!
//! ### Editing
//!
//! ```rust
//! use notaza::{codec::outline, editor::OutlineEditor};
//!
//! let root = outline::parse("* first\n* second").unwrap();
//! let second = root.children[1].id;
//! let mut editor = OutlineEditor::new(root);
//! editor.indent_block(second).unwrap();
//! assert_eq!(outline::serialize(editor.root()), "* first\n    * second");
//! ```
//!
//! ## Features
//!
//! - **default**: the library
//! - **bin**: the `notaza` command line tool (`refresh`, `check`, `show`)

pub mod backlinks;
pub mod codec;
pub mod config;
pub mod editor;
pub mod error;
pub mod properties;
pub mod refresh;
pub mod store;
#[cfg(test)]
mod tests;

pub use error::*;

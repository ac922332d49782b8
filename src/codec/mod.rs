//! Parsing pages into outlines and writing them back.
//!
//! ## Key Components
//!
//! - [`outline`] - the bidirectional codec between a page body and its [`Block`](crate::properties::Block) tree
//! - [`page`] - [`Page`]: frontmatter, outline body and the generated backlinks region of one file
//! - [`md`] - inline markdown scanning for page references (links, wikilinks, hashtags)
//!
//! ## Round Trip
//!
//! For any tree produced by [`outline::parse`], `parse(serialize(tree))` is structurally equal to
//! the tree. Raw text is normalized on the way through: indentation widths become four spaces
//! per level and surrounding blank lines are dropped.
//!
//! ```rust
//! use notaza::codec::outline::{parse, serialize};
//!
//! let root = parse("* one\n  * two\n* three").unwrap();
//! assert_eq!(serialize(&root), "* one\n    * two\n* three");
//! ```
//!
//! ## Error Recovery
//!
//! [`outline::parse`] reports [`NotazaError::MalformedOutline`](crate::NotazaError::MalformedOutline);
//! [`Page::parse`] never fails and substitutes an explanatory block instead, so a single broken
//! page cannot prevent loading or saving the others.

pub mod md;
pub mod outline;
pub mod page;

pub use page::{Page, BACKLINKS_END, BACKLINKS_START};

//! Backlinks: which pages reference a page, and the generated region that lists them.
//!
//! Refreshing backlinks is two-phase. Every page is first scanned by [`extract`] and the results
//! bucketed into a [`BacklinkIndex`]; only then is each page rewritten by [`inject`]. The region
//! between [`BACKLINKS_START`](crate::codec::BACKLINKS_START) and
//! [`BACKLINKS_END`](crate::codec::BACKLINKS_END) is excluded from parsing, so generated links
//! never feed back into the next extraction and repeated refreshes are byte-stable.

pub mod extract;
pub mod index;
pub mod inject;

pub use extract::{extract, LinkReference, PageDirectory};
pub use index::{BacklinkGroup, BacklinkIndex};
pub use inject::{inject, render_region, BACKLINKS_HEADING};

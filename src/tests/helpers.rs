//! Shared test utilities for page and notebook testing

use crate::{
    properties::{Block, BlockPath},
    store::MemoryPageStore,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Block at `path` below `root`; panics if there is none
pub fn block_at<'a>(root: &'a Block, path: &[usize]) -> &'a Block {
    root.get(&BlockPath(path.to_vec()))
        .unwrap_or_else(|| panic!("no block at {path:?}"))
}

/// A small notebook exercising every reference form:
///
/// - `inbox` links `reading` by markdown link and `projects/garden` by hashtag
/// - `journal` links `reading` by wikilink title and itself by hashtag
/// - `reading` links nothing
/// - `projects/garden` links `inbox` from a nested bullet
/// - `broken` is malformed and mentions `reading`
pub fn create_test_notebook() -> MemoryPageStore {
    init_logging();
    MemoryPageStore::with_pages([
        (
            "inbox",
            "---\ntitle: Inbox\n---\n* buy seeds #projects/garden\n* finish [the list](./reading.md)\n    * two more books\n",
        ),
        (
            "journal",
            "* monday\n    * started [[Reading List]]\n    * wrote in #journal\n",
        ),
        ("reading", "---\ntitle: Reading List\n---\n* winter books\n"),
        (
            "projects/garden",
            "* plan\n    * from [Inbox](./inbox.md)\n        * tomatoes\n",
        ),
        ("broken", "no bullet here [R](./reading.md)\n* later\n"),
    ])
}

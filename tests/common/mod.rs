//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::{fs, io, path::Path};
use tempfile::{tempdir, TempDir};

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

fn copy_dir_all(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> io::Result<()> {
    fs::create_dir_all(&dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        if ty.is_dir() {
            copy_dir_all(entry.path(), dst.as_ref().join(entry.file_name()))?;
        } else {
            fs::copy(entry.path(), dst.as_ref().join(entry.file_name()))?;
        }
    }
    Ok(())
}

/// Copy the fixture notebook `tests/<name>` into a fresh temporary directory.
///
/// `notebook_1` holds:
/// - `index.md` (title "Index"): wikilink to Daily Log, `#rust`, link to topics/gardening
/// - `daily.md` (title "Daily Log"): `#rust` with a child bullet, a fragment link to
///   topics/gardening, a `[[index]]` wikilink inside a multi-line parent
/// - `rust.md`: only an external link
/// - `scratch.md`: malformed (text before the first bullet)
/// - `topics/gardening.md`: no outbound references
#[allow(dead_code)]
pub fn generate_test_root(name: &str) -> io::Result<TempDir> {
    init_logging();
    let temp_dir = tempdir()?;
    let content_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join(name);
    tracing::debug!("Copying content from {:?}", content_root);
    copy_dir_all(&content_root, temp_dir.path())?;
    Ok(temp_dir)
}

/// Read a page file relative to `root`.
#[allow(dead_code)]
pub fn read_page(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

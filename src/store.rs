//! Where pages live between edits.

use parking_lot::RwLock;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

use crate::{config::NotazaConfig, error::NotazaError, properties::PageId};

/// Persisted raw page text, addressed by page id.
pub trait PageStore: Send + Sync {
    /// Every page id in the store, sorted.
    fn list(&self) -> Result<Vec<PageId>, NotazaError>;
    /// The raw text of a page, or `None` if it does not exist yet.
    fn load(&self, id: &PageId) -> Result<Option<String>, NotazaError>;
    fn save(&self, id: &PageId, raw: &str) -> Result<(), NotazaError>;
}

/// A directory of markdown files. Page `a/b` lives at `<root>/a/b.<extension>`.
#[derive(Debug, Clone)]
pub struct FsPageStore {
    root: PathBuf,
    extension: String,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

impl FsPageStore {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(root: P, extension: S) -> Self {
        FsPageStore {
            root: root.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(config: &NotazaConfig) -> Self {
        FsPageStore::new(config.pages_dir.clone(), config.extension.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &PageId) -> PathBuf {
        let mut path = self.root.clone();
        for segment in id.as_str().split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        // `set_extension` would clip dotted page names.
        let mut file = path.into_os_string();
        file.push(".");
        file.push(&self.extension);
        PathBuf::from(file)
    }

    fn page_id_for(&self, path: &Path) -> Result<PageId, NotazaError> {
        let relative = path.strip_prefix(&self.root)?.with_extension("");
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(PageId::new(segments.join("/")))
    }
}

impl PageStore for FsPageStore {
    fn list(&self) -> Result<Vec<PageId>, NotazaError> {
        if !self.root.is_dir() {
            return Err(NotazaError::NotFound(format!(
                "pages directory {:?}",
                self.root
            )));
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| !is_hidden(e) || e.path() == self.root.as_path())
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
            {
                files.push(path.to_path_buf());
            }
        }
        files.sort_by(|a, b| a.components().cmp(b.components()));
        let ids = files
            .iter()
            .map(|path| self.page_id_for(path))
            .collect::<Result<Vec<PageId>, NotazaError>>()?;
        tracing::debug!("Found {} page(s) under {:?}", ids.len(), self.root);
        Ok(ids)
    }

    fn load(&self, id: &PageId) -> Result<Option<String>, NotazaError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&self, id: &PageId, raw: &str) -> Result<(), NotazaError> {
        let path = self.path_for(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        tracing::debug!("Writing page {id} to {:?}", path);
        fs::write(path, raw)?;
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: RwLock<BTreeMap<PageId, String>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        MemoryPageStore::default()
    }

    pub fn with_pages<I, K, V>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<PageId>,
        V: Into<String>,
    {
        MemoryPageStore {
            pages: RwLock::new(
                pages
                    .into_iter()
                    .map(|(id, raw)| (id.into(), raw.into()))
                    .collect(),
            ),
        }
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.pages.read().get(id).cloned()
    }
}

impl PageStore for MemoryPageStore {
    fn list(&self) -> Result<Vec<PageId>, NotazaError> {
        Ok(self.pages.read().keys().cloned().collect())
    }

    fn load(&self, id: &PageId) -> Result<Option<String>, NotazaError> {
        Ok(self.pages.read().get(id).cloned())
    }

    fn save(&self, id: &PageId, raw: &str) -> Result<(), NotazaError> {
        self.pages.write().insert(id.clone(), raw.to_string());
        Ok(())
    }
}

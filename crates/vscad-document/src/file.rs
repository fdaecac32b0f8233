//! File-backed document store.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::store::{DocumentStore, DOCUMENT_EXTENSION};

/// Stores each document as a JSON file `<dir>/<name>.vsdoc`.
pub struct FileStore {
    dir: PathBuf,
    open: IndexMap<String, Document>,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            open: IndexMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding document `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, DOCUMENT_EXTENSION))
    }
}

impl DocumentStore for FileStore {
    fn read_persisted(&self, name: &str) -> Result<Option<Document>> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        let document: Document = serde_json::from_slice(&bytes)?;
        if document.name() != name {
            return Err(StoreError::NameMismatch {
                file: name.to_string(),
                found: document.name().to_string(),
            });
        }
        Ok(Some(document))
    }

    fn write_persisted(&mut self, document: &Document) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        fs::write(self.path_for(document.name()), bytes)?;
        Ok(())
    }

    fn is_persisted(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn persisted_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn open_documents(&self) -> &IndexMap<String, Document> {
        &self.open
    }

    fn open_documents_mut(&mut self) -> &mut IndexMap<String, Document> {
        &mut self.open
    }
}

//! In-memory document store.

use indexmap::IndexMap;

use crate::document::Document;
use crate::error::Result;
use crate::store::DocumentStore;

/// Keeps persisted documents in memory. Useful for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    persisted: IndexMap<String, Document>,
    open: IndexMap<String, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a persisted document.
    pub fn persisted(&self, name: &str) -> Option<&Document> {
        self.persisted.get(name)
    }

    pub fn persisted_count(&self) -> usize {
        self.persisted.len()
    }
}

impl DocumentStore for MemoryStore {
    fn read_persisted(&self, name: &str) -> Result<Option<Document>> {
        Ok(self.persisted.get(name).cloned())
    }

    fn write_persisted(&mut self, document: &Document) -> Result<()> {
        self.persisted
            .insert(document.name().to_string(), document.clone());
        Ok(())
    }

    fn is_persisted(&self, name: &str) -> bool {
        self.persisted.contains_key(name)
    }

    fn persisted_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.persisted.keys().cloned().collect();
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

//! Document store trait.
//!
//! A store owns the persisted documents and the set of documents currently
//! open in the host session. Documents are addressed purely by unique name.
//! Writing is checkout based: `open_or_create` hands out an owned document
//! and `save_and_close` takes it back, so at most one writer exists per name.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{Result, StoreError};

/// Extension of persisted document files.
pub const DOCUMENT_EXTENSION: &str = "vsdoc";

/// Trait for document stores.
///
/// Implement the persistence hooks; the open/save protocol is provided.
pub trait DocumentStore {
    /// Read a persisted document, `None` when nothing is stored under `name`.
    fn read_persisted(&self, name: &str) -> Result<Option<Document>>;

    /// Persist a document under its own name, replacing any previous version.
    fn write_persisted(&mut self, document: &Document) -> Result<()>;

    /// Check whether a document is persisted under `name`.
    fn is_persisted(&self, name: &str) -> bool;

    /// Names of all persisted documents, sorted.
    fn persisted_names(&self) -> Result<Vec<String>>;

    /// Documents currently open in the session.
    fn open_documents(&self) -> &IndexMap<String, Document>;

    /// Mutable access to the open documents.
    fn open_documents_mut(&mut self) -> &mut IndexMap<String, Document>;

    fn is_open(&self, name: &str) -> bool {
        self.open_documents().contains_key(name)
    }

    /// Check whether a document is open or persisted under `name`.
    fn contains(&self, name: &str) -> bool {
        self.is_open(name) || self.is_persisted(name)
    }

    /// Check out a document for writing.
    ///
    /// Reuses an open document, else loads the persisted one, else creates a
    /// new empty document.
    fn open_or_create(&mut self, name: &str) -> Result<Document> {
        if let Some(document) = self.open_documents_mut().shift_remove(name) {
            debug!(document = name, "reusing open document");
            return Ok(document);
        }
        match self.read_persisted(name)? {
            Some(document) => {
                debug!(document = name, "loaded document");
                Ok(document)
            }
            None => {
                debug!(document = name, "created document");
                Ok(Document::new(name))
            }
        }
    }

    /// Persist a checked-out document and release it.
    fn save_and_close(&mut self, mut document: Document) -> Result<()> {
        if document.is_dirty() {
            document.recompute();
        }
        self.write_persisted(&document)?;
        info!(
            document = document.name(),
            objects = document.object_count(),
            "saved document"
        );
        Ok(())
    }

    /// Open a persisted document in the session for interactive use.
    fn reopen(&mut self, name: &str) -> Result<&Document> {
        if !self.is_open(name) {
            let document = self
                .read_persisted(name)?
                .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
            self.open_documents_mut().insert(name.to_string(), document);
        }
        self.open_documents()
            .get(name)
            .ok_or_else(|| StoreError::NotOpen(name.to_string()))
    }

    /// Close an open document without saving it.
    fn close(&mut self, name: &str) -> Option<Document> {
        self.open_documents_mut().shift_remove(name)
    }

    /// Read a document without checking it out.
    ///
    /// The open version wins over the persisted one.
    fn load(&self, name: &str) -> Result<Document> {
        if let Some(document) = self.open_documents().get(name) {
            return Ok(document.clone());
        }
        self.read_persisted(name)?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}

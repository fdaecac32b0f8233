//! vscad-document: the persisted CAD document model.
//!
//! This crate stands in for the host CAD application's document layer:
//! documents made of named objects with placements, attribute tables that
//! carry metadata alongside the geometry, and stores that persist documents by
//! unique name.
//!
//! # Stores
//!
//! | Store | Persistence |
//! |-------|-------------|
//! | [`FileStore`] | One JSON file per document in a working directory |
//! | [`MemoryStore`] | In memory |
//!
//! Both implement [`DocumentStore`], which provides the open/save protocol:
//!
//! ```ignore
//! use vscad_document::{DocumentStore, FileStore, ObjectKind};
//!
//! let mut store = FileStore::new("work")?;
//! let mut doc = store.open_or_create("part_Beam_1234")?;
//! doc.ensure_object("Box", ObjectKind::Box).set_property("Length", 40.0);
//! store.save_and_close(doc)?;
//! ```

pub mod document;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use document::{DocObject, Document, ObjectKind, DOCUMENT_SHEET};
pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{DocumentStore, DOCUMENT_EXTENSION};

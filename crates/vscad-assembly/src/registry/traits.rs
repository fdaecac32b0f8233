//! Exchange plugin trait.

use vscad_document::DocumentStore;

use crate::error::Result;
use crate::exporter::ExportOptions;
use crate::importer::{ImportOptions, ImportSummary};

/// Trait for exchange plugins.
///
/// A plugin converts between one external format and the document store.
/// Implement this trait to add a new exchange format.
pub trait ExchangePlugin: Send + Sync {
    /// Get the plugin name (e.g., "json").
    fn name(&self) -> &'static str;

    /// One-line description shown when listing plugins.
    fn description(&self) -> &'static str;

    /// Get supported file extensions (e.g., ["json"]).
    fn extensions(&self) -> &[&'static str];

    /// Import `data` into `store`.
    fn import(
        &self,
        data: &[u8],
        store: &mut dyn DocumentStore,
        options: &ImportOptions,
    ) -> Result<ImportSummary>;

    /// Export the tree rooted in `root_document`.
    fn export(
        &self,
        store: &dyn DocumentStore,
        root_document: &str,
        options: &ExportOptions,
    ) -> Result<Vec<u8>>;
}

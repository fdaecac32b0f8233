//! vscad-assembly: build-order resolution, materialization and export.
//!
//! This crate turns Virtual Satellite JSON into persisted documents and back:
//!
//! - [`traverser`]: depth-bucketed build plan for product trees
//! - [`importer`]: materializes parts, then assemblies deepest level first
//! - [`exporter`]: reads documents back into JSON, parts deduplicated
//! - [`registry`]: exchange plugins, with the JSON format built in
//!
//! # Example
//!
//! ```ignore
//! use vscad_assembly::{ImportOptions, Importer};
//! use vscad_document::FileStore;
//!
//! let mut store = FileStore::new("work")?;
//! let value: serde_json::Value = serde_json::from_str(&input)?;
//! let summary = Importer::new(&mut store, ImportOptions::new()).import(&value)?;
//! ```

pub mod error;
pub mod exporter;
pub mod formats;
pub mod importer;
pub mod part_sync;
pub mod product_sync;
pub mod registry;
pub mod traverser;

pub use error::{AssemblyError, Result};
pub use exporter::{export, Export, ExportOptions, Exporter};
pub use formats::json::JsonPlugin;
pub use importer::{import, AssemblyMode, BuildReport, ImportOptions, ImportSummary, Importer};
pub use part_sync::{read_part, write_part};
pub use product_sync::{write_assembly, write_flat};
pub use registry::{ExchangePlugin, PluginRegistry};
pub use traverser::BuildPlan;

//! Virtual Satellite JSON exchange format.

use serde_json::Value;
use tracing::debug;
use vscad_document::DocumentStore;

use crate::error::Result;
use crate::exporter::{ExportOptions, Exporter};
use crate::importer::{ImportOptions, ImportSummary, Importer};
use crate::registry::ExchangePlugin;

/// Plugin for `{"Products": …, "Parts": […]}` JSON files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPlugin;

impl JsonPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl ExchangePlugin for JsonPlugin {
    fn name(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "Virtual Satellite JSON (meters, radians, 24-bit RGB)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn import(
        &self,
        data: &[u8],
        store: &mut dyn DocumentStore,
        options: &ImportOptions,
    ) -> Result<ImportSummary> {
        let value: Value = serde_json::from_slice(data)?;
        debug!(bytes = data.len(), mode = %options.mode, "parsed JSON input");
        Importer::new(store, options.clone()).import(&value)
    }

    fn export(
        &self,
        store: &dyn DocumentStore,
        root_document: &str,
        options: &ExportOptions,
    ) -> Result<Vec<u8>> {
        let export = Exporter::new(store).export(root_document)?;
        Ok(export.to_json_string(options)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblyError;
    use vscad_document::MemoryStore;

    const INPUT: &str = r#"{
        "Products": {
            "name": "Sat", "uuid": "r1",
            "children": [
                {"name": "A", "uuid": "c1", "partName": "Beam", "partUuid": "p1",
                 "posX": 0.5, "posY": 0.0, "posZ": 0.0,
                 "rotX": 0.0, "rotY": 0.0, "rotZ": 0.0, "children": []}
            ]
        },
        "Parts": [
            {"name": "Beam", "uuid": "p1", "shape": "SPHERE", "lengthX": 0.0,
             "lengthY": 0.0, "lengthZ": 0.0, "radius": 0.25, "color": 255}
        ]
    }"#;

    #[test]
    fn test_import_then_export() {
        let plugin = JsonPlugin::new();
        let mut store = MemoryStore::new();
        let summary = plugin
            .import(INPUT.as_bytes(), &mut store, &ImportOptions::new())
            .unwrap();
        let root = summary.build.unwrap().root;

        let bytes = plugin
            .export(&store, &root, &ExportOptions::new().with_pretty(false))
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["Products"]["children"][0]["posX"], 0.5);
        assert_eq!(value["Parts"][0]["radius"], 0.25);
        assert_eq!(value["Parts"][0]["color"], 255);
    }

    #[test]
    fn test_malformed_input() {
        let mut store = MemoryStore::new();
        let err = JsonPlugin
            .import(b"{not json", &mut store, &ImportOptions::new())
            .unwrap_err();
        assert!(matches!(err, AssemblyError::Json(_)));
    }
}

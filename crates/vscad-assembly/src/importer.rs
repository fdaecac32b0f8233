//! Importing Virtual Satellite JSON into a document store.
//!
//! Parts are materialized first, one document each. The product tree is then
//! planned by depth and built deepest level first, so every sub-assembly
//! document is saved and closed before the assembly that places it is opened.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use vscad_core::{json, ModelError, Part, ProductNode};
use vscad_document::DocumentStore;

use crate::error::{AssemblyError, Result};
use crate::part_sync::write_part;
use crate::product_sync::{write_assembly, write_flat};
use crate::traverser::BuildPlan;

/// How the product tree is laid out across documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyMode {
    /// One document per node with children.
    #[default]
    Nested,
    /// The whole tree in the root document, with absolute placements.
    Flat,
}

impl AssemblyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyMode::Nested => "nested",
            AssemblyMode::Flat => "flat",
        }
    }
}

impl fmt::Display for AssemblyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssemblyMode {
    type Err = ModelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nested" => Ok(AssemblyMode::Nested),
            "flat" => Ok(AssemblyMode::Flat),
            _ => Err(ModelError::InvalidValue {
                field: "assemblyMode".into(),
                reason: format!("unknown mode '{}'", s),
            }),
        }
    }
}

/// Options for importing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportOptions {
    pub mode: AssemblyMode,
    /// Open the root document in the store once the build finished.
    pub reopen_root: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            mode: AssemblyMode::Nested,
            reopen_root: true,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: AssemblyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_reopen_root(mut self, reopen: bool) -> Self {
        self.reopen_root = reopen;
        self
    }
}

/// Assembly documents built by one run, in build order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// The root assembly document.
    pub root: String,
    pub documents: Vec<String>,
}

/// Outcome of a full import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Part documents written, in input order.
    pub parts: Vec<String>,
    /// `None` when the product tree had nothing to build.
    pub build: Option<BuildReport>,
}

/// Imports parts and product trees into a document store.
pub struct Importer<'s, S: DocumentStore + ?Sized> {
    store: &'s mut S,
    options: ImportOptions,
    materialized: IndexSet<String>,
}

impl<'s, S: DocumentStore + ?Sized> Importer<'s, S> {
    pub fn new(store: &'s mut S, options: ImportOptions) -> Self {
        Self {
            store,
            options,
            materialized: IndexSet::new(),
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import a complete `{"Products": …, "Parts": […]}` document.
    pub fn import(&mut self, value: &Value) -> Result<ImportSummary> {
        let obj = json::object(value, "document")?;
        let parts = json::required(obj, json::PARTS, "document")?
            .as_array()
            .ok_or_else(|| ModelError::invalid_type(json::PARTS, "array"))?;
        let products = json::required(obj, json::PRODUCTS, "document")?;

        let parts = self.import_parts(parts)?;
        let build = self.import_products(products)?;
        Ok(ImportSummary { parts, build })
    }

    /// Parse and materialize every part in `parts`.
    ///
    /// Parts are written one by one; a malformed part aborts the call but
    /// leaves the parts before it persisted.
    pub fn import_parts(&mut self, parts: &[Value]) -> Result<Vec<String>> {
        let mut written = Vec::with_capacity(parts.len());
        for raw in parts {
            let part = Part::from_json(raw)?;
            if self.import_part(&part)? {
                written.push(part.unique_name());
            }
        }
        info!(parts = written.len(), "imported parts");
        Ok(written)
    }

    /// Materialize one part. Returns `false` when the part was already
    /// written by this importer.
    pub fn import_part(&mut self, part: &Part) -> Result<bool> {
        let name = part.unique_name();
        if self.materialized.contains(&name) {
            warn!(part = %name, "duplicate part skipped");
            return Ok(false);
        }
        let mut doc = self.store.open_or_create(&name)?;
        write_part(part, &mut doc);
        self.store.save_and_close(doc)?;
        self.materialized.insert(name);
        Ok(true)
    }

    /// Build the assembly documents for the product tree rooted at `root`.
    pub fn import_products(&mut self, root: &Value) -> Result<Option<BuildReport>> {
        match self.options.mode {
            AssemblyMode::Nested => {
                let plan = BuildPlan::from_root(root)?;
                self.resolve(&plan)
            }
            AssemblyMode::Flat => self.build_flat(root),
        }
    }

    /// Build every assembly in `plan`, deepest level first.
    pub fn resolve(&mut self, plan: &BuildPlan<'_>) -> Result<Option<BuildReport>> {
        if plan.is_empty() {
            info!("product tree has no assemblies, nothing to build");
            return Ok(None);
        }

        let mut documents = Vec::with_capacity(plan.assembly_count());
        for (depth, bucket) in plan.levels() {
            debug!(depth, assemblies = bucket.len(), "building level");
            for raw in bucket {
                // Every assembly is built in its own frame; the parent
                // document applies the sub-assembly's transform.
                let Some(node) = ProductNode::parse_assembly(raw)? else {
                    continue;
                };
                documents.push(self.build_assembly(&node)?);
            }
        }
        self.finish(documents)
    }

    fn build_assembly(&mut self, node: &ProductNode) -> Result<String> {
        let name = node.unique_name();
        let mut doc = self.store.open_or_create(&name)?;
        write_assembly(node, &mut doc, &*self.store)?;
        self.store.save_and_close(doc)?;
        Ok(name)
    }

    fn build_flat(&mut self, root: &Value) -> Result<Option<BuildReport>> {
        let Some(node) = ProductNode::parse_assembly(root)? else {
            info!("product tree has no assemblies, nothing to build");
            return Ok(None);
        };
        let name = node.unique_name();
        let mut doc = self.store.open_or_create(&name)?;
        write_flat(&node, &mut doc, &*self.store)?;
        self.store.save_and_close(doc)?;
        self.finish(vec![name])
    }

    fn finish(&mut self, documents: Vec<String>) -> Result<Option<BuildReport>> {
        let Some(root) = documents.last().cloned() else {
            return Err(AssemblyError::invalid_document(
                "<root>",
                "build plan produced no document",
            ));
        };
        if self.options.reopen_root {
            self.store.reopen(&root)?;
        }
        info!(root = %root, documents = documents.len(), "built assembly");
        Ok(Some(BuildReport { root, documents }))
    }
}

/// Import `value` into `store` with the given options.
pub fn import<S>(store: &mut S, value: &Value, options: ImportOptions) -> Result<ImportSummary>
where
    S: DocumentStore + ?Sized,
{
    Importer::new(store, options).import(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vscad_document::MemoryStore;

    fn input() -> Value {
        json!({
            "Products": {
                "name": "Sat", "uuid": "r1",
                "children": [
                    {"name": "Arm", "uuid": "c1", "posX": 0.1, "posY": 0.0, "posZ": 0.0,
                     "rotX": 0.0, "rotY": 0.0, "rotZ": 0.0,
                     "children": [
                        {"name": "Boom", "uuid": "c2", "partName": "Beam", "partUuid": "p1",
                         "posX": 0.0, "posY": 0.0, "posZ": 0.0,
                         "rotX": 0.0, "rotY": 0.0, "rotZ": 0.0, "children": []}
                     ]}
                ]
            },
            "Parts": [
                {"name": "Beam", "uuid": "p1", "shape": "BOX", "lengthX": 0.04,
                 "lengthY": 0.01, "lengthZ": 0.01, "radius": 0.0, "color": 0}
            ]
        })
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("FLAT".parse::<AssemblyMode>().unwrap(), AssemblyMode::Flat);
        assert_eq!(AssemblyMode::Nested.to_string(), "nested");
        assert!("deep".parse::<AssemblyMode>().is_err());
    }

    #[test]
    fn test_import_nested() {
        let mut store = MemoryStore::new();
        let summary = import(&mut store, &input(), ImportOptions::new()).unwrap();

        assert_eq!(summary.parts, vec!["part_Beam_p1"]);
        let build = summary.build.unwrap();
        assert_eq!(build.documents, vec!["assembly_Arm_c1", "assembly_Sat_r1"]);
        assert_eq!(build.root, "assembly_Sat_r1");
        assert!(store.is_open("assembly_Sat_r1"));
        assert_eq!(store.persisted_count(), 3);
    }

    #[test]
    fn test_import_flat() {
        let mut store = MemoryStore::new();
        let options = ImportOptions::new()
            .with_mode(AssemblyMode::Flat)
            .with_reopen_root(false);
        let summary = import(&mut store, &input(), options).unwrap();

        let build = summary.build.unwrap();
        assert_eq!(build.documents, vec!["assembly_Sat_r1"]);
        assert!(!store.is_open("assembly_Sat_r1"));
        assert_eq!(store.persisted("assembly_Sat_r1").unwrap().object_count(), 2);
    }

    #[test]
    fn test_duplicate_part_written_once() {
        let mut store = MemoryStore::new();
        let mut importer = Importer::new(&mut store, ImportOptions::new());
        let part = json!({"name": "Beam", "uuid": "p1", "shape": "BOX", "lengthX": 0.04,
                          "lengthY": 0.01, "lengthZ": 0.01, "radius": 0.0, "color": 0});

        let written = importer.import_parts(&[part.clone(), part]).unwrap();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn test_missing_products_key() {
        let mut store = MemoryStore::new();
        let err = import(&mut store, &json!({"Parts": []}), ImportOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Model(ModelError::MissingField { .. })
        ));
    }

    #[test]
    fn test_bad_part_keeps_earlier_parts() {
        let mut store = MemoryStore::new();
        let value = json!({
            "Products": {"name": "Sat", "uuid": "r1", "children": []},
            "Parts": [
                {"name": "Beam", "uuid": "p1", "shape": "BOX", "lengthX": 0.04,
                 "lengthY": 0.01, "lengthZ": 0.01, "radius": 0.0, "color": 0},
                {"name": "Bad", "uuid": "p2", "shape": "PYRAMID", "lengthX": 0.0,
                 "lengthY": 0.0, "lengthZ": 0.0, "radius": 0.0, "color": 0}
            ]
        });
        let err = import(&mut store, &value, ImportOptions::new()).unwrap_err();

        assert!(matches!(err, AssemblyError::Model(ModelError::UnknownShape(_))));
        assert!(store.is_persisted("part_Beam_p1"));
    }
}

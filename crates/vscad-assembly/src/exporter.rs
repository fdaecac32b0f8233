//! Exporting persisted documents back to Virtual Satellite JSON.
//!
//! The root assembly document is read back into a product tree. Identity of
//! every node, the root included, comes from its attribute table; position
//! and rotation come from the live placement so edits made in the documents
//! are exported. Recorded angles are kept while they still describe the live
//! rotation.
//! Part documents referenced anywhere in the tree are read exactly once.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};
use vscad_core::{
    json as keys, split_unique_name, NodeRole, Part, PartRef, Placement, ProductNode,
    ASSEMBLY_PREFIX, PRODUCT_PREFIX,
};
use vscad_document::{Document, DocumentStore, ObjectKind};

use crate::error::{AssemblyError, Result};
use crate::part_sync::read_part;

/// Options for exporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Indent the written JSON.
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// A product tree and the parts it references.
#[derive(Debug, Clone)]
pub struct Export {
    pub root: ProductNode,
    /// Referenced parts, each once, in first-reference order.
    pub parts: Vec<Part>,
}

impl Export {
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(keys::PRODUCTS.into(), self.root.to_json());
        obj.insert(
            keys::PARTS.into(),
            Value::Array(self.parts.iter().map(Part::to_json).collect()),
        );
        Value::Object(obj)
    }

    /// Serialize to JSON text.
    pub fn to_json_string(&self, options: &ExportOptions) -> Result<String> {
        let value = self.to_json();
        let text = if options.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }
}

/// Reads product trees out of a document store.
pub struct Exporter<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
    visited: IndexSet<String>,
    parts: Vec<Part>,
    /// Assembly documents currently being read, to reject cycles.
    stack: Vec<String>,
}

impl<'s, S: DocumentStore + ?Sized> Exporter<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            visited: IndexSet::new(),
            parts: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Export the tree whose root lives in `root_document`.
    pub fn export(mut self, root_document: &str) -> Result<Export> {
        let doc = self.store.load(root_document)?;
        let mut root = root_identity(&doc)?;
        if let Some(part) = &root.part {
            self.collect_part(&root.name, part)?;
        }

        self.stack.push(root_document.to_string());
        root.children = self.read_children(&doc, None, &Placement::IDENTITY)?;
        self.stack.pop();

        info!(
            root = root_document,
            nodes = root.node_count(),
            parts = self.parts.len(),
            "exported assembly"
        );
        Ok(Export {
            root,
            parts: self.parts,
        })
    }

    /// Read the components of `doc` whose parent is `parent`.
    ///
    /// `parent_absolute` is the absolute placement of that parent inside
    /// `doc`; component placements are made local to it.
    fn read_children(
        &mut self,
        doc: &Document,
        parent: Option<&str>,
        parent_absolute: &Placement,
    ) -> Result<Vec<ProductNode>> {
        let to_local = parent_absolute.inverse();
        let mut children = Vec::new();

        for object in doc.objects() {
            let is_placement =
                object.kind == ObjectKind::Component && object.name.starts_with(PRODUCT_PREFIX);
            if !is_placement || object.parent.as_deref() != parent {
                continue;
            }
            let sheet = doc.sheet(&object.name).ok_or_else(|| {
                AssemblyError::invalid_document(
                    doc.name(),
                    format!("placement {} has no attribute table", object.name),
                )
            })?;
            let mut node = ProductNode::from_attributes(sheet, NodeRole::Child)?;
            node.set_local_placement(&to_local.compose(&object.placement));

            if let Some(source) = object.source.as_deref() {
                if source.starts_with(ASSEMBLY_PREFIX) {
                    node.children = self.read_sub_assembly(&node.name, source)?;
                }
            }
            if let Some(part) = &node.part {
                self.collect_part(&node.name, part)?;
            }
            // Flat documents nest placements through parent links.
            let nested = self.read_children(doc, Some(&object.name), &object.placement)?;
            node.children.extend(nested);

            debug!(node = %node.name, children = node.children.len(), "read placement");
            children.push(node);
        }
        Ok(children)
    }

    fn read_sub_assembly(&mut self, node: &str, document: &str) -> Result<Vec<ProductNode>> {
        if self.stack.iter().any(|open| open == document) {
            return Err(AssemblyError::invalid_document(
                document,
                "assembly places itself",
            ));
        }
        if !self.store.contains(document) {
            return Err(AssemblyError::MissingSubAssembly {
                node: node.to_string(),
                document: document.to_string(),
            });
        }
        let doc = self.store.load(document)?;
        self.stack.push(document.to_string());
        let children = self.read_children(&doc, None, &Placement::IDENTITY)?;
        self.stack.pop();
        Ok(children)
    }

    fn collect_part(&mut self, node: &str, part: &PartRef) -> Result<()> {
        let name = part.unique_name();
        if !self.visited.insert(name.clone()) {
            return Ok(());
        }
        if !self.store.contains(&name) {
            return Err(AssemblyError::DanglingPart {
                node: node.to_string(),
                part: name,
            });
        }
        let doc = self.store.load(&name)?;
        self.parts.push(read_part(&doc)?);
        Ok(())
    }
}

/// Identity of the root node, from the document's own attribute table.
///
/// The document name only serves as a fallback: names or uuids ending in an
/// escaped character cannot be split back apart.
fn root_identity(doc: &Document) -> Result<ProductNode> {
    if let Some(sheet) = doc.document_sheet() {
        return Ok(ProductNode::from_attributes(sheet, NodeRole::Root)?);
    }
    let (name, uuid) = split_unique_name(ASSEMBLY_PREFIX, doc.name())?;
    Ok(ProductNode::root(name, uuid))
}

/// Export the tree rooted in `root_document`.
pub fn export<S>(store: &S, root_document: &str) -> Result<Export>
where
    S: DocumentStore + ?Sized,
{
    Exporter::new(store).export(root_document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use vscad_core::{AttributeTable, Shape};
    use vscad_document::{MemoryStore, DOCUMENT_SHEET};

    use crate::part_sync::write_part;
    use crate::product_sync::write_assembly;

    fn save_part(store: &mut MemoryStore, part: &Part) {
        let mut doc = store.open_or_create(&part.unique_name()).unwrap();
        write_part(part, &mut doc);
        store.save_and_close(doc).unwrap();
    }

    fn save_assembly(store: &mut MemoryStore, node: &ProductNode) {
        let mut doc = store.open_or_create(&node.unique_name()).unwrap();
        write_assembly(node, &mut doc, &*store).unwrap();
        store.save_and_close(doc).unwrap();
    }

    #[test]
    fn test_shared_part_read_once() {
        let mut store = MemoryStore::new();
        let beam = Part::new("Beam", "p1", Shape::Box).with_lengths(40.0, 10.0, 10.0);
        save_part(&mut store, &beam);

        let root = ProductNode::root("Sat", "r1")
            .with_child(ProductNode::child("A", "c1").with_part(PartRef::new("Beam", "p1")))
            .with_child(
                ProductNode::child("B", "c2")
                    .with_part(PartRef::new("Beam", "p1"))
                    .with_position(DVec3::new(5.0, 0.0, 0.0)),
            );
        save_assembly(&mut store, &root);

        let export = export(&store, "assembly_Sat_r1").unwrap();
        assert_eq!(export.parts.len(), 1);
        assert_eq!(export.root.children.len(), 2);
        assert_eq!(export.root.name, "Sat");
        assert_eq!(export.root.children[1].position, DVec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_live_placement_wins() {
        let mut store = MemoryStore::new();
        save_part(&mut store, &Part::new("Beam", "p1", Shape::Box));
        let root = ProductNode::root("Sat", "r1")
            .with_child(ProductNode::child("A", "c1").with_part(PartRef::new("Beam", "p1")));
        save_assembly(&mut store, &root);

        let mut doc = store.open_or_create("assembly_Sat_r1").unwrap();
        doc.object_mut("product_A_c1").unwrap().placement.base = DVec3::new(1.0, 2.0, 3.0);
        store.save_and_close(doc).unwrap();

        let export = export(&store, "assembly_Sat_r1").unwrap();
        assert_eq!(export.root.children[0].position, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_missing_part_document() {
        let mut store = MemoryStore::new();
        let mut doc = store.open_or_create("assembly_Sat_r1").unwrap();
        let child = ProductNode::child("A", "c1").with_part(PartRef::new("Gone", "p9"));
        doc.ensure_object("product_A_c1", ObjectKind::Component).source =
            Some("part_Gone_p9".into());
        doc.set_sheet("product_A_c1", AttributeTable::from_entity(&child));
        store.save_and_close(doc).unwrap();

        let err = export(&store, "assembly_Sat_r1").unwrap_err();
        assert!(matches!(err, AssemblyError::DanglingPart { .. }));
    }

    #[test]
    fn test_self_placing_assembly_rejected() {
        let mut store = MemoryStore::new();
        let mut doc = store.open_or_create("assembly_Sat_r1").unwrap();
        let child = ProductNode::child("Loop", "c1");
        doc.ensure_object("product_Loop_c1", ObjectKind::Component).source =
            Some("assembly_Sat_r1".into());
        doc.set_sheet("product_Loop_c1", AttributeTable::from_entity(&child));
        doc.set_sheet(
            DOCUMENT_SHEET,
            AttributeTable::from_entity(&ProductNode::root("Sat", "r1")),
        );
        store.save_and_close(doc).unwrap();

        let err = export(&store, "assembly_Sat_r1").unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidDocument { .. }));
    }

    #[test]
    fn test_root_names_ending_in_escaped_characters() {
        for name in ["Sat-", "Satellite ", "Sat_", "Sat.", "My_Sat_"] {
            let mut store = MemoryStore::new();
            save_part(&mut store, &Part::new("Beam", "p1", Shape::Box));
            let root = ProductNode::root(name, "6201a731-d703").with_child(
                ProductNode::child("A", "c1").with_part(PartRef::new("Beam", "p1")),
            );
            save_assembly(&mut store, &root);

            let export = export(&store, &root.unique_name()).unwrap();
            assert_eq!(export.root.name, name);
            assert_eq!(export.root.uuid, "6201a731-d703");
            assert_eq!(export.root.children.len(), 1);
        }
    }

    #[test]
    fn test_root_identity_falls_back_to_document_name() {
        let mut store = MemoryStore::new();
        let doc = store.open_or_create("assembly_Cube____Sat_cs___1").unwrap();
        store.save_and_close(doc).unwrap();

        let export = export(&store, "assembly_Cube____Sat_cs___1").unwrap();
        assert_eq!(export.root.name, "Cube Sat");
        assert_eq!(export.root.uuid, "cs-1");
        assert!(export.root.children.is_empty());
    }

    #[test]
    fn test_export_json_shape() {
        let mut store = MemoryStore::new();
        save_part(&mut store, &Part::new("Beam", "p1", Shape::Box));
        let root = ProductNode::root("Sat", "r1")
            .with_child(ProductNode::child("A", "c1").with_part(PartRef::new("Beam", "p1")));
        save_assembly(&mut store, &root);

        let value = export(&store, "assembly_Sat_r1").unwrap().to_json();
        assert_eq!(value["Products"]["name"], "Sat");
        assert!(value["Products"].get("posX").is_none());
        assert_eq!(value["Products"]["children"][0]["partName"], "Beam");
        assert_eq!(value["Parts"][0]["shape"], "BOX");
    }
}

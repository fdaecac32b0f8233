//! The persisted document model.
//!
//! A `Document` mirrors what the host CAD application keeps per file: a flat,
//! ordered set of named objects with placements and properties, plus attribute
//! tables ("sheets") carrying metadata the geometry cannot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vscad_core::{AttributeTable, Placement};

/// Owner key of the document-level attribute table.
pub const DOCUMENT_SHEET: &str = "Attributes";

/// Kind of a document object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Box,
    Cylinder,
    Cone,
    Sphere,
    /// Triangle mesh imported from a file; `source` holds the path.
    Mesh,
    /// Boundary representation derived from the object named in `source`.
    Shape,
    /// Refined solid derived from the object named in `source`.
    Solid,
    /// Another document placed into this one; `source` holds its name.
    Component,
}

/// A named object inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocObject {
    pub name: String,
    pub label: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub placement: Placement,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl DocObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            placement: Placement::IDENTITY,
            visible: true,
            color: None,
            properties: IndexMap::new(),
            source: None,
            parent: None,
        }
    }

    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties.get(name).copied()
    }

    pub fn set_property(&mut self, name: &str, value: f64) {
        self.properties.insert(name.to_string(), value);
    }
}

/// A persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    name: String,
    #[serde(default)]
    objects: IndexMap<String, DocObject>,
    #[serde(default)]
    sheets: IndexMap<String, AttributeTable>,
    #[serde(skip)]
    dirty: bool,
}

impl Document {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: IndexMap::new(),
            sheets: IndexMap::new(),
            dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the object `name`, creating it if absent.
    ///
    /// An existing object of a different kind is replaced.
    pub fn ensure_object(&mut self, name: &str, kind: ObjectKind) -> &mut DocObject {
        self.dirty = true;
        let replace = self
            .objects
            .get(name)
            .is_some_and(|existing| existing.kind != kind);
        if replace {
            debug!(document = %self.name, object = name, "replacing object of different kind");
            self.objects
                .insert(name.to_string(), DocObject::new(name, kind));
        }
        self.objects
            .entry(name.to_string())
            .or_insert_with(|| DocObject::new(name, kind))
    }

    pub fn object(&self, name: &str) -> Option<&DocObject> {
        self.objects.get(name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut DocObject> {
        self.dirty = true;
        self.objects.get_mut(name)
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &DocObject> {
        self.objects.values()
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Remove an object together with its attribute table.
    pub fn remove_object(&mut self, name: &str) -> Option<DocObject> {
        self.dirty = true;
        self.sheets.shift_remove(name);
        self.objects.shift_remove(name)
    }

    /// Remove every object and every object-level attribute table.
    pub fn clear_objects(&mut self) {
        self.dirty = true;
        for name in self.objects.keys() {
            self.sheets.shift_remove(name);
        }
        self.objects.clear();
    }

    /// Keep only the objects in `keep`, in that order.
    ///
    /// Returns the number of objects removed.
    pub fn retain_objects(&mut self, keep: &[String]) -> usize {
        let mut previous = std::mem::take(&mut self.objects);
        for name in keep {
            if let Some(object) = previous.shift_remove(name) {
                self.objects.insert(name.clone(), object);
            }
        }
        for name in previous.keys() {
            debug!(document = %self.name, object = %name, "removing stale object");
            self.sheets.shift_remove(name);
        }
        if !previous.is_empty() {
            self.dirty = true;
        }
        previous.len()
    }

    pub fn sheet(&self, owner: &str) -> Option<&AttributeTable> {
        self.sheets.get(owner)
    }

    /// The document-level attribute table.
    pub fn document_sheet(&self) -> Option<&AttributeTable> {
        self.sheet(DOCUMENT_SHEET)
    }

    pub fn set_sheet(&mut self, owner: &str, table: AttributeTable) {
        self.dirty = true;
        self.sheets.insert(owner.to_string(), table);
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the document changed since the last recompute.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Validate object links after a batch of changes.
    ///
    /// Returns the number of broken links found; each is logged.
    pub fn recompute(&mut self) -> usize {
        let mut broken = 0;
        for object in self.objects.values() {
            let derived = matches!(object.kind, ObjectKind::Shape | ObjectKind::Solid);
            if derived {
                if let Some(source) = &object.source {
                    if !self.objects.contains_key(source) {
                        warn!(
                            document = %self.name,
                            object = %object.name,
                            source = %source,
                            "derived object has no source"
                        );
                        broken += 1;
                    }
                }
            }
            if let Some(parent) = &object.parent {
                if !self.objects.contains_key(parent) {
                    warn!(
                        document = %self.name,
                        object = %object.name,
                        parent = %parent,
                        "object parent missing"
                    );
                    broken += 1;
                }
            }
        }
        self.dirty = false;
        broken
    }
}

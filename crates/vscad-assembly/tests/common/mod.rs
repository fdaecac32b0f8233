//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use indexmap::IndexMap;
use serde_json::{json, Value};
use vscad_document::{Document, DocumentStore, MemoryStore, Result};

pub const BEAM_UUID: &str = "6201a731-d703-43f8-ab37-6a0581dfe022";
pub const BEAM_DOCUMENT: &str = "part_Beam_6201a731___d703___43f8___ab37___6a0581dfe022";
pub const ROOT_DOCUMENT: &str = "assembly_Satellite_0a1b2c3d";
pub const STRUCTURE_DOCUMENT: &str = "assembly_Primary____Structure_5e6f";
pub const DECK_DOCUMENT: &str = "assembly_Deck_7a8b";

/// The Beam part: 40 × 20 × 10 mm, silver.
pub fn beam() -> Value {
    json!({
        "name": "Beam",
        "uuid": BEAM_UUID,
        "shape": "BOX",
        "lengthX": 0.04,
        "lengthY": 0.02,
        "lengthZ": 0.01,
        "radius": 0.0,
        "color": 12632256
    })
}

pub fn parts() -> Vec<Value> {
    vec![
        beam(),
        json!({
            "name": "Mast", "uuid": "m-1", "shape": "CYLINDER",
            "lengthX": 0.0, "lengthY": 0.5, "lengthZ": 0.0, "radius": 0.02, "color": 255
        }),
        json!({
            "name": "Fuel Tank", "uuid": "t-1", "shape": "SPHERE",
            "lengthX": 0.0, "lengthY": 0.0, "lengthZ": 0.0, "radius": 0.15, "color": 65280
        }),
        json!({
            "name": "Harness", "uuid": "h-1", "shape": "NONE",
            "lengthX": 0.0, "lengthY": 0.0, "lengthZ": 0.0, "radius": 0.0, "color": 0
        }),
    ]
}

/// A child placement with position in meters and rotation in radians.
pub fn child(
    name: &str,
    uuid: &str,
    part: Option<(&str, &str)>,
    pos: [f64; 3],
    rot: [f64; 3],
    children: Vec<Value>,
) -> Value {
    let mut node = json!({
        "name": name,
        "uuid": uuid,
        "posX": pos[0], "posY": pos[1], "posZ": pos[2],
        "rotX": rot[0], "rotY": rot[1], "rotZ": rot[2],
        "children": children,
    });
    if let Some((part_name, part_uuid)) = part {
        node["partName"] = json!(part_name);
        node["partUuid"] = json!(part_uuid);
    }
    node
}

/// A childless placement of `part`.
pub fn leaf(name: &str, uuid: &str, part: (&str, &str), pos: [f64; 3], rot: [f64; 3]) -> Value {
    child(name, uuid, Some(part), pos, rot, vec![])
}

/// Satellite → Primary Structure → Deck → Fuel Tank, plus leaves on every
/// level. Three assembly levels in total.
pub fn products() -> Value {
    let deck = child(
        "Deck",
        "7a8b",
        None,
        [0.0, 0.0, 0.2],
        [0.0, 0.0, 0.0],
        vec![
            leaf("Tank", "c-5", ("Fuel Tank", "t-1"), [0.0, 0.1, 0.0], [0.0, 0.0, 0.0]),
            leaf("Wiring", "c-6", ("Harness", "h-1"), [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
        ],
    );
    let structure = child(
        "Primary Structure",
        "5e6f",
        None,
        [0.1, 0.0, 0.0],
        [0.0, 0.0, std::f64::consts::FRAC_PI_2],
        vec![
            leaf("Panel A", "c-2", ("Beam", BEAM_UUID), [0.0, 0.05, 0.0], [0.1, 0.2, 0.3]),
            leaf("Panel B", "c-3", ("Beam", BEAM_UUID), [0.0, -0.05, 0.0], [0.0, 0.0, 0.0]),
            deck,
        ],
    );
    json!({
        "name": "Satellite",
        "uuid": "0a1b2c3d",
        "children": [
            structure,
            leaf("Antenna Mast", "c-4", ("Mast", "m-1"), [0.0, 0.0, 0.3], [-0.4, 0.5, 1.2]),
        ]
    })
}

pub fn satellite() -> Value {
    json!({ "Products": products(), "Parts": parts() })
}

/// Store operations observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(String),
    Save(String),
}

/// Memory store that records every checkout and save.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub events: Vec<Event>,
}

impl RecordingStore {
    pub fn position(&self, event: &Event) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }
}

impl DocumentStore for RecordingStore {
    fn read_persisted(&self, name: &str) -> Result<Option<Document>> {
        self.inner.read_persisted(name)
    }

    fn write_persisted(&mut self, document: &Document) -> Result<()> {
        self.inner.write_persisted(document)
    }

    fn is_persisted(&self, name: &str) -> bool {
        self.inner.is_persisted(name)
    }

    fn persisted_names(&self) -> Result<Vec<String>> {
        self.inner.persisted_names()
    }

    fn open_documents(&self) -> &IndexMap<String, Document> {
        self.inner.open_documents()
    }

    fn open_documents_mut(&mut self) -> &mut IndexMap<String, Document> {
        self.inner.open_documents_mut()
    }

    fn open_or_create(&mut self, name: &str) -> Result<Document> {
        self.events.push(Event::Open(name.to_string()));
        self.inner.open_or_create(name)
    }

    fn save_and_close(&mut self, document: Document) -> Result<()> {
        self.events.push(Event::Save(document.name().to_string()));
        self.inner.save_and_close(document)
    }
}

/// Object count of every persisted document, by name.
pub fn object_counts(store: &MemoryStore) -> Vec<(String, usize)> {
    store
        .persisted_names()
        .unwrap()
        .into_iter()
        .map(|name| {
            let count = store.persisted(&name).unwrap().object_count();
            (name, count)
        })
        .collect()
}

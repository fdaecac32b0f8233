//! Materializing parts as documents and reading them back.
//!
//! Each part lives in its own document named by the part's unique name. The
//! document holds the shape objects plus a document-level attribute table
//! that records the part's values, so the part can be rebuilt on export and
//! shape changes can be detected on re-import.

use glam::DVec3;
use tracing::{debug, info};
use vscad_core::{json, AttributeTable, Part, Placement, Shape};
use vscad_document::{DocObject, Document, ObjectKind, DOCUMENT_SHEET};

use crate::error::{AssemblyError, Result};

/// Edge length of the placeholder box standing in for a part without
/// geometry, in millimetres.
pub const DUMMY_EDGE: f64 = 0.001;

/// Mesh object imported from the STL file of a geometry part.
pub const MESH_OBJECT: &str = "Mesh";

/// Shape object derived from the mesh.
pub const SHAPE_OBJECT: &str = "Shape";

// Property names on the primitive objects.
const LENGTH: &str = "Length";
const WIDTH: &str = "Width";
const HEIGHT: &str = "Height";
const RADIUS: &str = "Radius";
const RADIUS1: &str = "Radius1";
const RADIUS2: &str = "Radius2";
const REFINE: &str = "Refine";

/// Write `part` into `doc`, replacing what a previous import left behind.
///
/// Objects are updated in place when the shape is unchanged. When the
/// recorded shape differs, every object is removed first so no geometry of
/// the old shape survives.
pub fn write_part(part: &Part, doc: &mut Document) {
    let recorded = doc
        .document_sheet()
        .and_then(|sheet| sheet.text(json::SHAPE))
        .and_then(|shape| shape.parse::<Shape>().ok());
    if let Some(previous) = recorded {
        if previous != part.shape {
            info!(
                document = doc.name(),
                from = %previous,
                to = %part.shape,
                "shape changed, removing old geometry"
            );
            doc.clear_objects();
        }
    }

    let object = match part.shape {
        Shape::Box => write_box(doc, Shape::Box, part.length_x, part.length_y, part.length_z),
        Shape::Cylinder | Shape::Cone => write_axial(doc, part),
        Shape::Sphere => {
            let object = doc.ensure_object(part.shape.object_name(), ObjectKind::Sphere);
            object.set_property(RADIUS, part.radius);
            object.placement = Placement::IDENTITY;
            object
        }
        Shape::Geometry => write_geometry(doc, part),
        Shape::None => write_box(doc, Shape::None, DUMMY_EDGE, DUMMY_EDGE, DUMMY_EDGE),
    };
    object.label = part.name.clone();
    object.color = Some(part.color);
    object.visible = true;

    doc.set_sheet(DOCUMENT_SHEET, AttributeTable::from_entity(part));
    let broken = doc.recompute();
    debug!(document = doc.name(), shape = %part.shape, broken, "materialized part");
}

/// Box centered on the origin.
fn write_box(doc: &mut Document, shape: Shape, x: f64, y: f64, z: f64) -> &mut DocObject {
    let object = doc.ensure_object(shape.object_name(), ObjectKind::Box);
    object.set_property(LENGTH, x);
    object.set_property(WIDTH, y);
    object.set_property(HEIGHT, z);
    object.placement = Placement::from_translation(DVec3::new(-x / 2.0, -y / 2.0, -z / 2.0));
    object
}

/// Cylinder or cone along the part's Y axis, centered on the origin.
///
/// The host primitives extend along their local Z axis from the base, so they
/// are turned 90° about X and shifted by half the height.
fn write_axial<'d>(doc: &'d mut Document, part: &Part) -> &'d mut DocObject {
    let height = part.length_y;
    let object = match part.shape {
        Shape::Cone => {
            let object = doc.ensure_object(part.shape.object_name(), ObjectKind::Cone);
            object.set_property(RADIUS1, part.radius);
            object.set_property(RADIUS2, 0.0);
            object
        }
        _ => {
            let object = doc.ensure_object(part.shape.object_name(), ObjectKind::Cylinder);
            object.set_property(RADIUS, part.radius);
            object
        }
    };
    object.set_property(HEIGHT, height);

    let mut placement = Placement::IDENTITY;
    placement.rotate_global(DVec3::X, 90.0);
    placement.base = DVec3::new(0.0, height / 2.0, 0.0);
    object.placement = placement;
    object
}

/// Mesh, shape and refined solid chain for an STL based part.
fn write_geometry<'d>(doc: &'d mut Document, part: &Part) -> &'d mut DocObject {
    let mesh = doc.ensure_object(MESH_OBJECT, ObjectKind::Mesh);
    mesh.source = part.stl_path.clone();
    mesh.label = format!("{}_mesh", part.name);
    mesh.visible = false;

    let shape = doc.ensure_object(SHAPE_OBJECT, ObjectKind::Shape);
    shape.source = Some(MESH_OBJECT.to_string());
    shape.visible = false;

    let solid = doc.ensure_object(Shape::Geometry.object_name(), ObjectKind::Solid);
    solid.source = Some(SHAPE_OBJECT.to_string());
    solid.set_property(REFINE, 1.0);
    solid
}

/// Rebuild a part from its document.
///
/// Identity comes from the document attribute table. Dimensions, color and
/// the STL path are taken from the live objects when present, so edits made
/// in the document are exported.
pub fn read_part(doc: &Document) -> Result<Part> {
    let sheet = doc
        .document_sheet()
        .ok_or_else(|| AssemblyError::invalid_document(doc.name(), "no attribute table"))?;
    let mut part = Part::from_attributes(sheet)?;

    if part.shape == Shape::None {
        return Ok(part);
    }
    let Some(object) = doc.object(part.shape.object_name()) else {
        debug!(document = doc.name(), "no shape object, using recorded values");
        return Ok(part);
    };
    if let Some(color) = object.color {
        part.color = color;
    }
    let overlay = |value: &mut f64, property: &str| {
        if let Some(live) = object.property(property) {
            *value = live;
        }
    };
    match part.shape {
        Shape::Box => {
            overlay(&mut part.length_x, LENGTH);
            overlay(&mut part.length_y, WIDTH);
            overlay(&mut part.length_z, HEIGHT);
        }
        Shape::Cylinder => {
            overlay(&mut part.radius, RADIUS);
            overlay(&mut part.length_y, HEIGHT);
        }
        Shape::Cone => {
            overlay(&mut part.radius, RADIUS1);
            overlay(&mut part.length_y, HEIGHT);
        }
        Shape::Sphere => overlay(&mut part.radius, RADIUS),
        Shape::Geometry => {
            if let Some(path) = doc.object(MESH_OBJECT).and_then(|mesh| mesh.source.clone()) {
                part.stl_path = Some(path);
            }
        }
        Shape::None => {}
    }
    Ok(part)
}

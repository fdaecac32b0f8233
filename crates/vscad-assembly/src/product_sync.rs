//! Materializing product nodes as assembly documents.
//!
//! A node with children becomes a document holding one component object per
//! child. Components point at the document they place: the child's own
//! assembly document when it has children, else the part it references.
//! Every component carries an attribute table with the child's values, and
//! the document-level table carries the values of the node itself.
//!
//! In flat mode the whole tree is written into the root document instead.
//! Components then carry absolute placements and a link to their parent
//! component.

use tracing::{debug, trace};
use vscad_core::{AttributeTable, PartRef, Placement, ProductNode};
use vscad_document::{Document, DocumentStore, ObjectKind, DOCUMENT_SHEET};

use crate::error::{AssemblyError, Result};

/// Write `node` into its assembly document.
///
/// All documents the node places must already exist in `store`. Components
/// left over from a previous import that no longer correspond to a child are
/// removed.
pub fn write_assembly<S>(node: &ProductNode, doc: &mut Document, store: &S) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    let mut placed = Vec::with_capacity(node.children.len() + 1);
    if let Some(name) = place_own_part(node, doc, store)? {
        placed.push(name);
    }

    for child in &node.children {
        let source = child.part_unique_name();
        if let Some(source) = &source {
            require_source(child, source, store)?;
        }
        let name = child.object_name();
        place_component(doc, &name, source, &child.local_placement(), &child.name, None);
        doc.set_sheet(&name, AttributeTable::from_entity(child));
        placed.push(name);
    }

    finish(node, doc, &placed);
    Ok(())
}

/// Write the whole tree below `root` into one document.
pub fn write_flat<S>(root: &ProductNode, doc: &mut Document, store: &S) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    let mut placed = Vec::with_capacity(root.node_count());
    if let Some(name) = place_own_part(root, doc, store)? {
        placed.push(name);
    }
    for child in &root.children {
        place_flat(child, &Placement::IDENTITY, None, doc, store, &mut placed)?;
    }

    finish(root, doc, &placed);
    Ok(())
}

fn place_flat<S>(
    node: &ProductNode,
    parent_absolute: &Placement,
    parent: Option<&str>,
    doc: &mut Document,
    store: &S,
    placed: &mut Vec<String>,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    let absolute = parent_absolute.compose(&node.local_placement());
    let source = node.part.as_ref().map(PartRef::unique_name);
    if let Some(source) = &source {
        require_source(node, source, store)?;
    }

    let name = node.object_name();
    place_component(doc, &name, source, &absolute, &node.name, parent);
    doc.set_sheet(&name, AttributeTable::from_entity(node));
    placed.push(name.clone());

    for child in &node.children {
        place_flat(child, &absolute, Some(&name), doc, store, placed)?;
    }
    Ok(())
}

/// Place the part the node itself references, at the node's origin.
fn place_own_part<S>(node: &ProductNode, doc: &mut Document, store: &S) -> Result<Option<String>>
where
    S: DocumentStore + ?Sized,
{
    let Some(part) = &node.part else {
        return Ok(None);
    };
    let source = part.unique_name();
    if !store.contains(&source) {
        return Err(AssemblyError::DanglingPart {
            node: node.name.clone(),
            part: source,
        });
    }
    place_component(
        doc,
        &source,
        Some(source.clone()),
        &Placement::IDENTITY,
        &part.name,
        None,
    );
    Ok(Some(source))
}

fn require_source<S>(node: &ProductNode, source: &str, store: &S) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    if store.contains(source) {
        return Ok(());
    }
    // A node with children imports its own assembly document, which only
    // flat mode skips; there the source is always a part.
    if node.has_children() && node.part_unique_name().as_deref() == Some(source) {
        Err(AssemblyError::MissingSubAssembly {
            node: node.name.clone(),
            document: source.to_string(),
        })
    } else {
        Err(AssemblyError::DanglingPart {
            node: node.name.clone(),
            part: source.to_string(),
        })
    }
}

fn place_component(
    doc: &mut Document,
    name: &str,
    source: Option<String>,
    placement: &Placement,
    label: &str,
    parent: Option<&str>,
) {
    let object = doc.ensure_object(name, ObjectKind::Component);
    object.label = label.to_string();
    object.source = source;
    object.parent = parent.map(str::to_string);
    // Overwrite instead of composing onto what a previous import left.
    object.placement = *placement;
    trace!(object = name, base = ?placement.base, "placed component");
}

fn finish(node: &ProductNode, doc: &mut Document, placed: &[String]) {
    let removed = doc.retain_objects(placed);
    doc.set_sheet(DOCUMENT_SHEET, AttributeTable::from_entity(node));
    let broken = doc.recompute();
    debug!(
        document = doc.name(),
        components = placed.len(),
        removed,
        broken,
        "materialized assembly"
    );
}

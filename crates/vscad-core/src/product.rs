//! Product node model: placements of parts and nested assemblies.
//!
//! A node's structural role decides how it is parsed. In the root (assembly)
//! role the position and rotation fields are ignored because the node defines
//! the frame its children live in. In the child role they are read as a
//! transform relative to the immediate parent. Transforms are never
//! accumulated while parsing; absolute placements are composed by whoever
//! materializes the tree.

use glam::DVec3;
use serde_json::{json, Map, Value};

use crate::attributes::{AttributeTable, Attributed};
use crate::codec::unique_name;
use crate::errors::{ModelError, Result};
use crate::json::{self, *};
use crate::part::PART_PREFIX;
use crate::placement::Placement;
use crate::units::{degrees_to_radians, meters_to_mm, mm_to_meters, radians_to_degrees};

/// Role prefix of assembly documents.
pub const ASSEMBLY_PREFIX: &str = "assembly_";

/// Role prefix of placement objects inside an assembly document.
pub const PRODUCT_PREFIX: &str = "product_";

const ENTITY: &str = "product";

/// Tolerance for treating a live placement as unchanged.
const PLACEMENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Defines a frame; carries no transform of its own.
    Root,
    /// Placed relative to its parent.
    Child,
}

/// Reference from a node to a part definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartRef {
    pub name: String,
    pub uuid: String,
}

impl PartRef {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
        }
    }

    /// Unique name of the referenced part document.
    pub fn unique_name(&self) -> String {
        unique_name(PART_PREFIX, &self.name, &self.uuid)
    }
}

/// A placement of a part or sub-assembly.
///
/// Position is millimetres and rotation degrees, both local to the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductNode {
    pub name: String,
    pub uuid: String,
    pub role: NodeRole,
    pub part: Option<PartRef>,
    pub position: DVec3,
    pub rotation: DVec3,
    pub children: Vec<ProductNode>,
}

impl ProductNode {
    pub fn root(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self::with_role(name, uuid, NodeRole::Root)
    }

    pub fn child(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self::with_role(name, uuid, NodeRole::Child)
    }

    fn with_role(name: impl Into<String>, uuid: impl Into<String>, role: NodeRole) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            role,
            part: None,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            children: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: PartRef) -> Self {
        self.part = Some(part);
        self
    }

    /// Set the position in millimetres.
    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_child(mut self, child: ProductNode) -> Self {
        self.children.push(child);
        self
    }

    /// Parse a node in the root role.
    ///
    /// Returns `None` when the node has no children: an assembly without
    /// children has nothing to build.
    pub fn parse_assembly(value: &Value) -> Result<Option<Self>> {
        let obj = json::object(value, ENTITY)?;
        if json::children(obj)?.is_empty() {
            return Ok(None);
        }
        Self::parse_with_role(obj, NodeRole::Root).map(Some)
    }

    /// Parse a node in the child role, including all of its descendants.
    pub fn parse_child(value: &Value) -> Result<Self> {
        let obj = json::object(value, ENTITY)?;
        Self::parse_with_role(obj, NodeRole::Child)
    }

    fn parse_with_role(obj: &Map<String, Value>, role: NodeRole) -> Result<Self> {
        let mut node = Self::with_role(
            required_str(obj, NAME, ENTITY)?,
            required_str(obj, UUID, ENTITY)?,
            role,
        );
        node.part = parse_part_ref(obj)?;

        if role == NodeRole::Child {
            node.position = DVec3::new(
                meters_to_mm(required_f64(obj, POS_X, ENTITY)?),
                meters_to_mm(required_f64(obj, POS_Y, ENTITY)?),
                meters_to_mm(required_f64(obj, POS_Z, ENTITY)?),
            );
            node.rotation = DVec3::new(
                radians_to_degrees(required_f64(obj, ROT_X, ENTITY)?),
                radians_to_degrees(required_f64(obj, ROT_Y, ENTITY)?),
                radians_to_degrees(required_f64(obj, ROT_Z, ENTITY)?),
            );
        }

        node.children = json::children(obj)?
            .iter()
            .map(Self::parse_child)
            .collect::<Result<Vec<_>>>()?;

        Ok(node)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Unique name of the document this node materializes as when it has
    /// children.
    pub fn unique_name(&self) -> String {
        unique_name(ASSEMBLY_PREFIX, &self.name, &self.uuid)
    }

    /// Name of the placement object representing this node inside its
    /// parent's document.
    pub fn object_name(&self) -> String {
        unique_name(PRODUCT_PREFIX, &self.name, &self.uuid)
    }

    /// Document a parent imports to place this node.
    ///
    /// A sub-assembly is imported through its own document; a leaf through
    /// the part it references. A leaf without a part reference has nothing to
    /// import.
    pub fn part_unique_name(&self) -> Option<String> {
        if self.has_children() {
            Some(self.unique_name())
        } else {
            self.part.as_ref().map(PartRef::unique_name)
        }
    }

    /// Local transform relative to the parent; identity for the root role.
    pub fn local_placement(&self) -> Placement {
        match self.role {
            NodeRole::Root => Placement::IDENTITY,
            NodeRole::Child => Placement::from_position_rotation(self.position, self.rotation),
        }
    }

    /// Set position and rotation from a local placement.
    ///
    /// The current angles are kept while they still produce `placement`, so
    /// recorded values outside the principal Euler range survive. Otherwise
    /// the rotation is decomposed again.
    pub fn set_local_placement(&mut self, placement: &Placement) {
        let recorded = Placement::from_position_rotation(placement.base, self.rotation);
        if !recorded.abs_diff_eq(placement, PLACEMENT_EPSILON) {
            self.rotation = placement.euler_degrees();
        }
        self.position = placement.base;
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ProductNode::node_count).sum::<usize>()
    }

    /// Serialize to the exchange format (meters, radians).
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(NAME.into(), json!(self.name));
        obj.insert(UUID.into(), json!(self.uuid));
        if let Some(part) = &self.part {
            obj.insert(PART_NAME.into(), json!(part.name));
            obj.insert(PART_UUID.into(), json!(part.uuid));
        }
        if self.role == NodeRole::Child {
            obj.insert(POS_X.into(), json!(mm_to_meters(self.position.x)));
            obj.insert(POS_Y.into(), json!(mm_to_meters(self.position.y)));
            obj.insert(POS_Z.into(), json!(mm_to_meters(self.position.z)));
            obj.insert(ROT_X.into(), json!(degrees_to_radians(self.rotation.x)));
            obj.insert(ROT_Y.into(), json!(degrees_to_radians(self.rotation.y)));
            obj.insert(ROT_Z.into(), json!(degrees_to_radians(self.rotation.z)));
        }
        obj.insert(
            CHILDREN.into(),
            Value::Array(self.children.iter().map(ProductNode::to_json).collect()),
        );
        Value::Object(obj)
    }

    /// Rebuild a node's identity from its attribute table.
    ///
    /// Position and rotation are taken from the table as recorded; callers
    /// that have the live placement should overwrite them.
    pub fn from_attributes(table: &AttributeTable, role: NodeRole) -> Result<Self> {
        let text = |key: &str| {
            table
                .text(key)
                .map(str::to_string)
                .ok_or_else(|| ModelError::missing(ENTITY, key))
        };
        let number = |key: &str| table.number(key).unwrap_or(0.0);

        let mut node = Self::with_role(text(NAME)?, text(UUID)?, role);
        node.part = match (table.text(PART_NAME), table.text(PART_UUID)) {
            (Some(name), Some(uuid)) => Some(PartRef::new(name, uuid)),
            (None, None) => None,
            (Some(_), None) => return Err(ModelError::missing(ENTITY, PART_UUID)),
            (None, Some(_)) => return Err(ModelError::missing(ENTITY, PART_NAME)),
        };
        if role == NodeRole::Child {
            node.position = DVec3::new(number(POS_X), number(POS_Y), number(POS_Z));
            node.rotation = DVec3::new(number(ROT_X), number(ROT_Y), number(ROT_Z));
        }
        Ok(node)
    }

    /// True when name, uuid and all six transform components match exactly.
    pub fn has_equal_values(&self, other: &ProductNode) -> bool {
        self.name == other.name
            && self.uuid == other.uuid
            && self.position == other.position
            && self.rotation == other.rotation
    }

    /// Recursive comparison with a tolerance on the transform components.
    pub fn approx_eq(&self, other: &ProductNode, epsilon: f64) -> bool {
        self.name == other.name
            && self.uuid == other.uuid
            && self.part == other.part
            && self.position.abs_diff_eq(other.position, epsilon)
            && self.rotation.abs_diff_eq(other.rotation, epsilon)
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.approx_eq(b, epsilon))
    }
}

impl Attributed for ProductNode {
    fn write_attributes(&self, table: &mut AttributeTable) {
        table.set_text(NAME, &self.name);
        table.set_text(UUID, &self.uuid);
        if let Some(part) = &self.part {
            table.set_text(PART_NAME, &part.name);
            table.set_text(PART_UUID, &part.uuid);
        }
        if self.role == NodeRole::Child {
            table.set_number(POS_X, self.position.x, Some("mm"));
            table.set_number(POS_Y, self.position.y, Some("mm"));
            table.set_number(POS_Z, self.position.z, Some("mm"));
            table.set_number(ROT_X, self.rotation.x, Some("deg"));
            table.set_number(ROT_Y, self.rotation.y, Some("deg"));
            table.set_number(ROT_Z, self.rotation.z, Some("deg"));
        }
    }
}

fn parse_part_ref(obj: &Map<String, Value>) -> Result<Option<PartRef>> {
    match (optional_str(obj, PART_NAME)?, optional_str(obj, PART_UUID)?) {
        (Some(name), Some(uuid)) => Ok(Some(PartRef::new(name, uuid))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ModelError::missing(ENTITY, PART_UUID)),
        (None, Some(_)) => Err(ModelError::missing(ENTITY, PART_NAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, uuid: &str, x: f64) -> Value {
        json!({
            "name": name,
            "uuid": uuid,
            "partName": "Beam",
            "partUuid": "beam-uuid",
            "posX": x, "posY": 0.0, "posZ": 0.0,
            "rotX": 0.0, "rotY": 0.0, "rotZ": std::f64::consts::FRAC_PI_2,
            "children": []
        })
    }

    fn tree() -> Value {
        json!({
            "name": "Satellite",
            "uuid": "root-uuid",
            "posX": 5.0, "posY": 5.0, "posZ": 5.0,
            "rotX": 1.0, "rotY": 1.0, "rotZ": 1.0,
            "children": [
                {
                    "name": "Panel",
                    "uuid": "panel-uuid",
                    "posX": 0.1, "posY": 0.0, "posZ": 0.0,
                    "rotX": 0.0, "rotY": 0.0, "rotZ": 0.0,
                    "children": [leaf("Beam A", "a-uuid", 0.01), leaf("Beam B", "b-uuid", 0.02)]
                },
                leaf("Beam C", "c-uuid", 0.03)
            ]
        })
    }

    #[test]
    fn test_root_ignores_transform() {
        let root = ProductNode::parse_assembly(&tree()).unwrap().unwrap();
        assert_eq!(root.role, NodeRole::Root);
        assert_eq!(root.position, DVec3::ZERO);
        assert_eq!(root.rotation, DVec3::ZERO);
        assert!(root.local_placement().is_identity());
    }

    #[test]
    fn test_child_transforms_stay_local() {
        let root = ProductNode::parse_assembly(&tree()).unwrap().unwrap();
        let panel = &root.children[0];
        assert_eq!(panel.role, NodeRole::Child);
        assert_eq!(panel.position, DVec3::new(100.0, 0.0, 0.0));

        // Beam A is relative to Panel, not accumulated.
        let beam_a = &panel.children[0];
        assert_eq!(beam_a.position, DVec3::new(10.0, 0.0, 0.0));
        assert!((beam_a.rotation.z - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_node_parsed_as_child_reads_transform() {
        let value = tree();
        let as_child = ProductNode::parse_child(&value).unwrap();
        assert_eq!(as_child.position, DVec3::new(5000.0, 5000.0, 5000.0));
    }

    #[test]
    fn test_children_order_preserved() {
        let root = ProductNode::parse_assembly(&tree()).unwrap().unwrap();
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Panel", "Beam C"]);
        assert_eq!(root.node_count(), 5);
    }

    #[test]
    fn test_empty_children_is_no_assembly() {
        let value = json!({ "name": "Empty", "uuid": "e", "children": [] });
        assert!(ProductNode::parse_assembly(&value).unwrap().is_none());
        let value = json!({ "name": "Empty", "uuid": "e" });
        assert!(ProductNode::parse_assembly(&value).unwrap().is_none());
    }

    #[test]
    fn test_part_unique_name() {
        let root = ProductNode::parse_assembly(&tree()).unwrap().unwrap();
        let panel = &root.children[0];
        assert_eq!(panel.part_unique_name().unwrap(), "assembly_Panel_panel___uuid");
        let beam_c = &root.children[1];
        assert_eq!(beam_c.part_unique_name().unwrap(), "part_Beam_beam___uuid");
        assert_eq!(beam_c.object_name(), "product_Beam____C_c___uuid");
    }

    #[test]
    fn test_part_ref_requires_both_fields() {
        let mut value = leaf("Beam", "x", 0.0);
        value.as_object_mut().unwrap().remove("partUuid");
        assert_eq!(
            ProductNode::parse_child(&value).unwrap_err(),
            ModelError::missing("product", PART_UUID)
        );
    }

    #[test]
    fn test_child_requires_transform() {
        let mut value = leaf("Beam", "x", 0.0);
        value.as_object_mut().unwrap().remove("rotY");
        assert_eq!(
            ProductNode::parse_child(&value).unwrap_err(),
            ModelError::missing("product", ROT_Y)
        );
    }

    #[test]
    fn test_json_round_trip() {
        let root = ProductNode::parse_assembly(&tree()).unwrap().unwrap();
        let again = ProductNode::parse_assembly(&root.to_json()).unwrap().unwrap();
        assert!(root.approx_eq(&again, 1e-9));
        assert!(root.to_json().get("posX").is_none());
    }

    #[test]
    fn test_has_equal_values() {
        let a = ProductNode::child("A", "1").with_position(DVec3::new(1.0, 2.0, 3.0));
        let mut b = a.clone();
        assert!(a.has_equal_values(&b));
        b.rotation.y = 1e-12;
        assert!(!a.has_equal_values(&b));
    }

    #[test]
    fn test_recorded_angles_survive_unchanged_placement() {
        let cases = [
            DVec3::new(0.0, radians_to_degrees(2.0), 0.0),
            DVec3::new(
                radians_to_degrees(0.3),
                radians_to_degrees(std::f64::consts::FRAC_PI_2),
                radians_to_degrees(0.2),
            ),
            DVec3::new(270.0, -200.0, 400.0),
        ];
        for rotation in cases {
            let mut node = ProductNode::child("Arm", "a")
                .with_position(DVec3::new(10.0, 0.0, 0.0))
                .with_rotation(rotation);
            let live = node.local_placement();
            node.set_local_placement(&live);
            assert_eq!(node.rotation, rotation);
        }
    }

    #[test]
    fn test_edited_placement_is_decomposed() {
        let mut node = ProductNode::child("Arm", "a").with_rotation(DVec3::new(0.0, 120.0, 0.0));
        let edited = Placement::from_position_rotation(
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(0.0, 0.0, 30.0),
        );
        node.set_local_placement(&edited);

        assert_eq!(node.position, DVec3::new(1.0, 2.0, 3.0));
        assert!(node.rotation.abs_diff_eq(DVec3::new(0.0, 0.0, 30.0), 1e-9));
    }

    #[test]
    fn test_attributes_round_trip() {
        let node = ProductNode::child("Beam", "b")
            .with_part(PartRef::new("Beam", "p"))
            .with_position(DVec3::new(1.0, 2.0, 3.0))
            .with_rotation(DVec3::new(0.0, 45.0, 0.0));
        let table = AttributeTable::from_entity(&node);
        let read = ProductNode::from_attributes(&table, NodeRole::Child).unwrap();
        assert!(node.has_equal_values(&read));
        assert_eq!(read.part, node.part);
    }
}

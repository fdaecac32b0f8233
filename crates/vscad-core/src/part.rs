//! Part model: a single geometric primitive or mesh reference.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::attributes::{AttributeTable, Attributed};
use crate::codec::unique_name;
use crate::errors::{ModelError, Result};
use crate::json::{self, *};
use crate::units::{meters_to_mm, mm_to_meters, rgb_to_rgba, rgba_to_rgb, RGB_MAX};

/// Role prefix of part documents.
pub const PART_PREFIX: &str = "part_";

const ENTITY: &str = "part";

/// Shape of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Box,
    Cylinder,
    Cone,
    Sphere,
    /// Free-form geometry loaded from an STL file.
    Geometry,
    /// No geometry; only a placeholder is materialized.
    None,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Box,
        Shape::Cylinder,
        Shape::Cone,
        Shape::Sphere,
        Shape::Geometry,
        Shape::None,
    ];

    /// Name used in the exchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Box => "BOX",
            Shape::Cylinder => "CYLINDER",
            Shape::Cone => "CONE",
            Shape::Sphere => "SPHERE",
            Shape::Geometry => "GEOMETRY",
            Shape::None => "NONE",
        }
    }

    /// Name of the visible object that carries this shape in a part document.
    pub fn object_name(&self) -> &'static str {
        match self {
            Shape::Box => "Box",
            Shape::Cylinder => "Cylinder",
            Shape::Cone => "Cone",
            Shape::Sphere => "Sphere",
            Shape::Geometry => "Solid",
            Shape::None => "Dummy",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::UnknownShape(s.to_string()))
    }
}

/// A part definition.
///
/// Lengths and radius are millimetres, color is RGBA with a zero alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub uuid: String,
    pub shape: Shape,
    pub length_x: f64,
    pub length_y: f64,
    pub length_z: f64,
    pub radius: f64,
    pub color: u32,
    pub stl_path: Option<String>,
}

impl Part {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            shape,
            length_x: 0.0,
            length_y: 0.0,
            length_z: 0.0,
            radius: 0.0,
            color: 0,
            stl_path: None,
        }
    }

    /// Set the three edge lengths in millimetres.
    pub fn with_lengths(mut self, x: f64, y: f64, z: f64) -> Self {
        self.length_x = x;
        self.length_y = y;
        self.length_z = z;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the color from a 24-bit RGB value.
    pub fn with_rgb(mut self, rgb: u32) -> Self {
        self.color = rgb_to_rgba(rgb);
        self
    }

    pub fn with_stl_path(mut self, path: impl Into<String>) -> Self {
        self.stl_path = Some(path.into());
        self
    }

    /// Storage key of the part document.
    pub fn unique_name(&self) -> String {
        unique_name(PART_PREFIX, &self.name, &self.uuid)
    }

    /// Parse a part from its exchange-format JSON object.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = json::object(value, ENTITY)?;

        let shape: Shape = required_str(obj, SHAPE, ENTITY)?.parse()?;
        let color = required_u64(obj, COLOR, ENTITY)?;
        if color > u64::from(RGB_MAX) {
            return Err(ModelError::InvalidValue {
                field: COLOR.to_string(),
                reason: format!("{} exceeds 24-bit RGB", color),
            });
        }

        let stl_path = if shape == Shape::Geometry {
            Some(required_str(obj, STL_PATH, ENTITY)?.to_string())
        } else {
            None
        };

        Ok(Self {
            name: required_str(obj, NAME, ENTITY)?.to_string(),
            uuid: required_str(obj, UUID, ENTITY)?.to_string(),
            shape,
            length_x: meters_to_mm(required_f64(obj, LENGTH_X, ENTITY)?),
            length_y: meters_to_mm(required_f64(obj, LENGTH_Y, ENTITY)?),
            length_z: meters_to_mm(required_f64(obj, LENGTH_Z, ENTITY)?),
            radius: meters_to_mm(required_f64(obj, RADIUS, ENTITY)?),
            color: rgb_to_rgba(color as u32),
            stl_path,
        })
    }

    /// Serialize back to the exchange format (meters, 24-bit RGB).
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(NAME.into(), json!(self.name));
        obj.insert(UUID.into(), json!(self.uuid));
        obj.insert(SHAPE.into(), json!(self.shape.as_str()));
        obj.insert(LENGTH_X.into(), json!(mm_to_meters(self.length_x)));
        obj.insert(LENGTH_Y.into(), json!(mm_to_meters(self.length_y)));
        obj.insert(LENGTH_Z.into(), json!(mm_to_meters(self.length_z)));
        obj.insert(RADIUS.into(), json!(mm_to_meters(self.radius)));
        obj.insert(COLOR.into(), json!(rgba_to_rgb(self.color)));
        if let Some(path) = &self.stl_path {
            obj.insert(STL_PATH.into(), json!(path));
        }
        Value::Object(obj)
    }

    /// Rebuild a part from its attribute table.
    ///
    /// `name`, `uuid` and `shape` are required; missing dimensions default to
    /// zero because not every shape records every dimension.
    pub fn from_attributes(table: &AttributeTable) -> Result<Self> {
        let text = |key: &str| {
            table
                .text(key)
                .map(str::to_string)
                .ok_or_else(|| ModelError::missing(ENTITY, key))
        };
        let number = |key: &str| table.number(key).unwrap_or(0.0);

        let shape: Shape = text(SHAPE)?.parse()?;
        Ok(Self {
            name: text(NAME)?,
            uuid: text(UUID)?,
            shape,
            length_x: number(LENGTH_X),
            length_y: number(LENGTH_Y),
            length_z: number(LENGTH_Z),
            radius: number(RADIUS),
            color: number(COLOR) as u32,
            stl_path: table.text(STL_PATH).map(str::to_string),
        })
    }

    /// Field-wise comparison with a tolerance on the dimensions.
    pub fn approx_eq(&self, other: &Part, epsilon: f64) -> bool {
        self.name == other.name
            && self.uuid == other.uuid
            && self.shape == other.shape
            && self.color == other.color
            && self.stl_path == other.stl_path
            && (self.length_x - other.length_x).abs() <= epsilon
            && (self.length_y - other.length_y).abs() <= epsilon
            && (self.length_z - other.length_z).abs() <= epsilon
            && (self.radius - other.radius).abs() <= epsilon
    }
}

impl Attributed for Part {
    fn write_attributes(&self, table: &mut AttributeTable) {
        table.set_text(NAME, &self.name);
        table.set_text(UUID, &self.uuid);
        table.set_text(SHAPE, self.shape.as_str());
        table.set_number(LENGTH_X, self.length_x, Some("mm"));
        table.set_number(LENGTH_Y, self.length_y, Some("mm"));
        table.set_number(LENGTH_Z, self.length_z, Some("mm"));
        table.set_number(RADIUS, self.radius, Some("mm"));
        table.set_number(COLOR, f64::from(self.color), None);
        if let Some(path) = &self.stl_path {
            table.set_text(STL_PATH, path);
        }
    }
}

//! Typed accessors for Virtual Satellite JSON objects.
//!
//! The exchange schema is fixed, so fields are read by key and each access
//! reports which entity and field failed.

use serde_json::{Map, Value};

use crate::errors::{ModelError, Result};

// Field names of the exchange format.
pub const NAME: &str = "name";
pub const UUID: &str = "uuid";
pub const SHAPE: &str = "shape";
pub const LENGTH_X: &str = "lengthX";
pub const LENGTH_Y: &str = "lengthY";
pub const LENGTH_Z: &str = "lengthZ";
pub const RADIUS: &str = "radius";
pub const COLOR: &str = "color";
pub const STL_PATH: &str = "stlPath";
pub const POS_X: &str = "posX";
pub const POS_Y: &str = "posY";
pub const POS_Z: &str = "posZ";
pub const ROT_X: &str = "rotX";
pub const ROT_Y: &str = "rotY";
pub const ROT_Z: &str = "rotZ";
pub const PART_UUID: &str = "partUuid";
pub const PART_NAME: &str = "partName";
pub const CHILDREN: &str = "children";
pub const PRODUCTS: &str = "Products";
pub const PARTS: &str = "Parts";

/// View a value as a JSON object.
pub fn object<'a>(value: &'a Value, entity: &'static str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ModelError::invalid_type(entity, "object"))
}

pub fn required<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    entity: &'static str,
) -> Result<&'a Value> {
    obj.get(key).ok_or_else(|| ModelError::missing(entity, key))
}

pub fn required_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    entity: &'static str,
) -> Result<&'a str> {
    required(obj, key, entity)?
        .as_str()
        .ok_or_else(|| ModelError::invalid_type(key, "string"))
}

pub fn required_f64(obj: &Map<String, Value>, key: &str, entity: &'static str) -> Result<f64> {
    required(obj, key, entity)?
        .as_f64()
        .ok_or_else(|| ModelError::invalid_type(key, "number"))
}

pub fn required_u64(obj: &Map<String, Value>, key: &str, entity: &'static str) -> Result<u64> {
    required(obj, key, entity)?
        .as_u64()
        .ok_or_else(|| ModelError::invalid_type(key, "unsigned integer"))
}

/// Read an optional string; present-but-null counts as absent.
pub fn optional_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ModelError::invalid_type(key, "string")),
    }
}

/// The `children` array of a node, empty when absent or null.
pub fn children(obj: &Map<String, Value>) -> Result<&[Value]> {
    match obj.get(CHILDREN) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(ModelError::invalid_type(CHILDREN, "array")),
    }
}

use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

/// A 3-component numeric vector, one of the primitive kinds host stores
/// commonly support natively.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// [PropValue] is the closed set of value kinds a host store entry may hold.
///
/// "Absent" is represented as `Option<PropValue>::None` at the host
/// boundary; writing `None` deletes the entry.
#[derive(Debug, Clone, PartialEq, EnumAsInner, Serialize, Deserialize)]
pub enum PropValue {
    Bool(bool),
    Double(f64),
    String(String),
    Vec3(Vector3),
}

impl PropValue {
    /// Size of this value in the host's byte accounting.
    pub fn byte_size(&self) -> usize {
        match self {
            PropValue::Bool(_) => 1,
            PropValue::Double(_) => 8,
            PropValue::String(s) => s.len(),
            PropValue::Vec3(_) => 24,
        }
    }

    /// Short kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PropValue::Bool(_) => "bool",
            PropValue::Double(_) => "double",
            PropValue::String(_) => "string",
            PropValue::Vec3(_) => "vec3",
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Double(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::String(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::String(v)
    }
}

impl From<Vector3> for PropValue {
    fn from(v: Vector3) -> Self {
        PropValue::Vec3(v)
    }
}

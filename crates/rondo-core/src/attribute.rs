//! Uniform attribute records produced by the options registry

use serde::Serialize;

/// One decoded operator attribute, e.g. `{ "padding", "SAME" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(name: &'static str, value: impl Into<AttrValue>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Attribute value in a form that survives text editing.
///
/// Enum-typed fields are carried as `Str` holding the symbolic name
/// (e.g. `"RELU6"`) so a round trip through the edit protocol maps
/// back onto the wire integer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    IntVec(Vec<i64>),
    FloatVec(Vec<f64>),
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v as f64)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<&[i32]> for AttrValue {
    fn from(v: &[i32]) -> Self {
        AttrValue::IntVec(v.iter().map(|&x| x as i64).collect())
    }
}

impl From<&[f32]> for AttrValue {
    fn from(v: &[f32]) -> Self {
        AttrValue::FloatVec(v.iter().map(|&x| x as f64).collect())
    }
}

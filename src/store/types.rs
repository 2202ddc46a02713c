use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The runtime representation class of a variable's value.
///
/// Connected variables must share a kind: a `float` unknown cannot feed an
/// `ndarray` parameter even when both hold a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Float,
    Int,
    Array,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Float => "float",
            ValueKind::Int => "int",
            ValueKind::Array => "ndarray",
        })
    }
}

/// `dims` does not describe `data`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Array dims {dims:?} do not fit {len} values")]
pub struct DimsMismatch {
    pub dims: Vec<usize>,
    pub len: usize,
}

/// Wire form of [`ArrayValue`], checked on the way in.
#[derive(Deserialize)]
struct RawArrayValue {
    data: Vec<f64>,
    dims: Vec<usize>,
}

impl TryFrom<RawArrayValue> for ArrayValue {
    type Error = DimsMismatch;

    fn try_from(raw: RawArrayValue) -> Result<Self, Self::Error> {
        ArrayValue::new(raw.data, raw.dims)
    }
}

/// A dense row-major array with its runtime dimensions.
///
/// The product of `dims` always equals the number of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArrayValue")]
pub struct ArrayValue {
    data: Vec<f64>,
    dims: Vec<usize>,
}

impl ArrayValue {
    pub fn new(data: Vec<f64>, dims: Vec<usize>) -> Result<Self, DimsMismatch> {
        if dims.iter().product::<usize>() != data.len() {
            return Err(DimsMismatch { dims, len: data.len() });
        }
        Ok(Self { data, dims })
    }

    /// A one-dimensional array shaped `[data.len()]`.
    pub fn from_vec(data: Vec<f64>) -> Self {
        let dims = vec![data.len()];
        Self { data, dims }
    }

    pub fn data(&self) -> &[f64] { &self.data }
    pub fn dims(&self) -> &[usize] { &self.dims }
}

/// The initial content of a variable. Opaque to resolution except for its
/// kind and, for arrays, its runtime dimensions.
///
/// JSON: integers map to `Int`, other numbers to `Float`, and objects
/// `{"data": [...], "dims": [...]}` to `Array`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Int(i64),
    Float(f64),
    Array(ArrayValue),
}

impl VarValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            VarValue::Int(_) => ValueKind::Int,
            VarValue::Float(_) => ValueKind::Float,
            VarValue::Array(_) => ValueKind::Array,
        }
    }

    /// An `Int` holding `v`, if `v` is a whole number within the `i64` range.
    pub fn exact_int(v: f64) -> Option<Self> {
        // 2^63 is exactly representable; every f64 below it converts without saturating.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if !v.is_finite() || v.fract() != 0.0 || v < -LIMIT || v >= LIMIT {
            return None;
        }
        Some(VarValue::Int(v as i64))
    }

    /// Runtime dimensions. Scalars are zero-dimensional.
    pub fn dims(&self) -> &[usize] {
        match self {
            VarValue::Int(_) | VarValue::Float(_) => &[],
            VarValue::Array(a) => &a.dims,
        }
    }
}

impl From<f64> for VarValue {
    fn from(v: f64) -> Self { VarValue::Float(v) }
}

impl From<i64> for VarValue {
    fn from(v: i64) -> Self { VarValue::Int(v) }
}

impl From<ArrayValue> for VarValue {
    fn from(v: ArrayValue) -> Self { VarValue::Array(v) }
}

/// Everything a component declares about one of its variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDescriptor {
    pub value: VarValue,
    /// Declared shape, if the component stated one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<usize>>,
    /// Name under which the variable is visible from the root; drives
    /// implicit connections. `None` keeps the variable out of name matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted: Option<String>,
}

impl VarDescriptor {
    pub fn new(value: impl Into<VarValue>) -> Self {
        Self { value: value.into(), shape: None, promoted: None }
    }

    pub fn with_shape(mut self, shape: Vec<usize>) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_promoted(mut self, name: impl Into<String>) -> Self {
        self.promoted = Some(name.into());
        self
    }
}

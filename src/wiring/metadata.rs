//! Projects raw descriptors into the records the compatibility rules consume.
use super::error::VarSummary;
use crate::store::{ValueKind, VarDescriptor, VarValue};

/// Whether a component declared a shape for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredShape<'a> {
    Declared(&'a [usize]),
    Absent,
}

impl<'a> DeclaredShape<'a> {
    pub fn as_option(&self) -> Option<&'a [usize]> {
        match *self {
            DeclaredShape::Declared(dims) => Some(dims),
            DeclaredShape::Absent => None,
        }
    }
}

/// A normalized, borrowed view of one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableMetadata<'a> {
    pub path: &'a str,
    pub value: &'a VarValue,
    pub kind: ValueKind,
    pub shape: DeclaredShape<'a>,
}

impl VariableMetadata<'_> {
    pub fn summary(&self) -> VarSummary {
        VarSummary {
            path: self.path.to_string(),
            kind: self.kind,
            shape: self.shape.as_option().map(<[usize]>::to_vec),
        }
    }
}

/// Pure projection: no validation happens here.
pub fn extract<'a>(path: &'a str, desc: &'a VarDescriptor) -> VariableMetadata<'a> {
    VariableMetadata {
        path,
        value: &desc.value,
        kind: desc.value.kind(),
        shape: match desc.shape.as_deref() {
            Some(dims) => DeclaredShape::Declared(dims),
            None => DeclaredShape::Absent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ArrayValue;

    #[test]
    fn test_extract_with_shape() {
        let desc = VarDescriptor::new(ArrayValue::from_vec(vec![1.0, 2.0, 3.0])).with_shape(vec![3]);
        let meta = extract("G:C1:x", &desc);
        assert_eq!(meta.path, "G:C1:x");
        assert_eq!(meta.kind, ValueKind::Array);
        assert_eq!(meta.shape, DeclaredShape::Declared(&[3]));
        assert_eq!(meta.value.dims(), &[3]);
    }

    #[test]
    fn test_extract_without_shape_records_absent() {
        let desc = VarDescriptor::new(2.0);
        let meta = extract("y", &desc);
        assert_eq!(meta.kind, ValueKind::Float);
        assert_eq!(meta.shape, DeclaredShape::Absent);
        assert_eq!(meta.summary().shape, None);
    }
}

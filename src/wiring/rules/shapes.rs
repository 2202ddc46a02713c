//! Rule for shape compatibility between the two ends of a connection.
use crate::wiring::error::ConnectError;
use crate::wiring::metadata::{DeclaredShape, VariableMetadata};

/// Outcome of a shape check that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeCheck {
    Checked,
    /// The target declares no shape, so there is nothing to compare against.
    Unchecked,
}

/// Dispatches on which ends declared a shape.
///
/// A target with a declared shape is a hard contract: the source must either
/// declare the same shape or, when it declares none, carry an initial value
/// with those dimensions. An unshaped target is never checked, whatever the
/// source declares.
pub(crate) fn check_shapes_match(
    src: &VariableMetadata,
    tgt: &VariableMetadata,
) -> Result<ShapeCheck, ConnectError> {
    match (src.shape, tgt.shape) {
        (DeclaredShape::Declared(src_dims), DeclaredShape::Declared(tgt_dims)) => {
            if src_dims != tgt_dims {
                return Err(ConnectError::ShapeMismatch { src: src.summary(), tgt: tgt.summary() });
            }
            Ok(ShapeCheck::Checked)
        }
        (DeclaredShape::Absent, DeclaredShape::Declared(tgt_dims)) => {
            let value_dims = src.value.dims();
            if value_dims != tgt_dims {
                return Err(ConnectError::ValueShapeMismatch {
                    src: src.summary(),
                    value_dims: value_dims.to_vec(),
                    tgt: tgt.summary(),
                });
            }
            Ok(ShapeCheck::Checked)
        }
        (DeclaredShape::Declared(_), DeclaredShape::Absent)
        | (DeclaredShape::Absent, DeclaredShape::Absent) => Ok(ShapeCheck::Unchecked),
    }
}

//! Rule for runtime type compatibility between the two ends of a connection.
use crate::wiring::error::ConnectError;
use crate::wiring::metadata::VariableMetadata;

/// The source and target must share a value representation; no implicit
/// conversion happens during data transfer.
pub(crate) fn check_types_match(
    src: &VariableMetadata,
    tgt: &VariableMetadata,
) -> Result<(), ConnectError> {
    if src.kind != tgt.kind {
        return Err(ConnectError::TypeMismatch { src: src.summary(), tgt: tgt.summary() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ArrayValue, VarDescriptor};
    use crate::wiring::metadata::extract;

    #[test]
    fn test_same_kind_passes() {
        let u = VarDescriptor::new(1.0);
        let p = VarDescriptor::new(0.0);
        assert!(check_types_match(&extract("u", &u), &extract("p", &p)).is_ok());
    }

    #[test]
    fn test_float_to_array_fails() {
        let u = VarDescriptor::new(1.0);
        let p = VarDescriptor::new(ArrayValue::from_vec(vec![0.0]));
        let err = check_types_match(&extract("u", &u), &extract("p", &p)).unwrap_err();
        assert!(matches!(err, ConnectError::TypeMismatch { .. }));
        let msg = err.to_string();
        assert!(msg.contains("'u'") && msg.contains("'p'"), "Msg: {}", msg);
        assert!(msg.contains("float") && msg.contains("ndarray"), "Msg: {}", msg);
    }

    #[test]
    fn test_int_to_float_fails() {
        let u = VarDescriptor::new(1_i64);
        let p = VarDescriptor::new(1.0);
        assert!(check_types_match(&extract("u", &u), &extract("p", &p)).is_err());
    }
}

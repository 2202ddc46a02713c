//! Infers connections between params and unknowns that share a promoted name.
use super::error::WiringError;
use super::reconcile::ConnectionMap;
use crate::store::VariableTable;
use std::collections::BTreeMap;
use tracing::debug;

/// Connects every param to the unknown promoted under the same name.
///
/// An unknown's promoted name must be unique across the tree; otherwise any
/// param using that name would have several candidate sources. Variables
/// without a promoted name do not take part.
pub fn infer_implicit(
    params: &VariableTable,
    unknowns: &VariableTable,
) -> Result<ConnectionMap, WiringError> {
    let mut unknowns_by_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (path, desc) in unknowns.iter() {
        if let Some(name) = desc.promoted.as_deref() {
            unknowns_by_name.entry(name).or_default().push(path);
        }
    }

    if let Some((name, paths)) = unknowns_by_name.iter().find(|(_, paths)| paths.len() > 1) {
        return Err(WiringError::AmbiguousPromotion {
            name: name.to_string(),
            unknowns: paths.iter().map(|p| p.to_string()).collect(),
        });
    }

    let mut connections = ConnectionMap::new();
    for (path, desc) in params.iter() {
        let Some(name) = desc.promoted.as_deref() else { continue };
        if let Some(&[source]) = unknowns_by_name.get(name).map(Vec::as_slice) {
            connections.insert(path.to_string(), source.to_string());
        }
    }

    debug!(inferred = connections.len(), "implicit connections inferred");
    Ok(connections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::VarDescriptor;

    fn table(entries: &[(&str, Option<&str>)]) -> VariableTable {
        let mut t = VariableTable::new();
        for (path, promoted) in entries {
            let mut d = VarDescriptor::new(1.0);
            if let Some(name) = promoted {
                d = d.with_promoted(*name);
            }
            t.insert(*path, d).unwrap();
        }
        t
    }

    #[test]
    fn test_matching_promoted_names_connect() {
        let params = table(&[("G:C1:x", Some("x")), ("G:C3:x", Some("x")), ("G:C1:z", Some("z"))]);
        let unknowns = table(&[("G:C2:x", Some("x"))]);
        let conns = infer_implicit(&params, &unknowns).unwrap();
        assert_eq!(conns.len(), 2);
        assert_eq!(conns["G:C1:x"], "G:C2:x");
        assert_eq!(conns["G:C3:x"], "G:C2:x");
        assert!(!conns.contains_key("G:C1:z"));
    }

    #[test]
    fn test_unpromoted_variables_are_ignored() {
        let params = table(&[("G:C1:x", None)]);
        let unknowns = table(&[("G:C2:x", None)]);
        assert!(infer_implicit(&params, &unknowns).unwrap().is_empty());
    }

    #[test]
    fn test_ambiguous_unknown_name_fails() {
        let params = table(&[("G:C1:x", Some("x"))]);
        let unknowns = table(&[("G:C2:x", Some("x")), ("G:C3:x", Some("x"))]);
        let err = infer_implicit(&params, &unknowns).unwrap_err();
        assert_eq!(
            err,
            WiringError::AmbiguousPromotion {
                name: "x".into(),
                unknowns: vec!["G:C2:x".into(), "G:C3:x".into()],
            }
        );
    }
}

use super::types::VarDescriptor;
use crate::wiring::WiringError;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Absolute path -> descriptor for every param (or every unknown) in the tree.
///
/// Paths are unique within a table; `insert` and deserialization both reject
/// duplicates rather than letting a later declaration shadow an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableTable {
    vars: BTreeMap<String, VarDescriptor>,
}

impl VariableTable {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.vars.len() }
    pub fn is_empty(&self) -> bool { self.vars.is_empty() }

    pub fn insert(&mut self, path: impl Into<String>, desc: VarDescriptor) -> Result<(), WiringError> {
        let path = path.into();
        if self.vars.contains_key(&path) {
            return Err(WiringError::DuplicateVariable { path });
        }
        self.vars.insert(path, desc);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&VarDescriptor> { self.vars.get(path) }
    pub fn contains(&self, path: &str) -> bool { self.vars.contains_key(path) }

    /// Paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarDescriptor)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl<'de> Deserialize<'de> for VariableTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = VariableTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of absolute variable path to descriptor")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut table = VariableTable::new();
                while let Some((path, desc)) = map.next_entry::<String, VarDescriptor>()? {
                    table.insert(path, desc).map_err(de::Error::custom)?;
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::VarValue;

    #[test]
    fn test_duplicate_path_rejected() {
        let mut table = VariableTable::new();
        table.insert("G:C1:x", VarDescriptor::new(1.0)).unwrap();
        let err = table.insert("G:C1:x", VarDescriptor::new(2.0)).unwrap_err();
        assert_eq!(err, WiringError::DuplicateVariable { path: "G:C1:x".into() });
        // The first declaration is kept.
        assert_eq!(table.get("G:C1:x").map(|d| &d.value), Some(&VarValue::Float(1.0)));
    }

    #[test]
    fn test_json_duplicate_key_rejected() {
        let err = VariableTable::from_json_str(r#"{"a": {"value": 1.0}, "a": {"value": 2.0}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("'a'"), "Msg: {}", err);
    }

    #[test]
    fn test_json_round_trip_keeps_sorted_paths() {
        let table = VariableTable::from_json_str(
            r#"{"G:C2:y": {"value": 1.0}, "G:C1:x": {"value": 2.0, "shape": [1]}}"#,
        )
        .unwrap();
        assert_eq!(table.paths().collect::<Vec<_>>(), vec!["G:C1:x", "G:C2:y"]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(VariableTable::from_json_str(&json).unwrap(), table);
    }
}

//! Merges explicitly declared connections with name-inferred ones.
use super::error::WiringError;
use std::collections::BTreeMap;
use tracing::debug;

/// Target (param path) -> source (unknown path). Keyed by target, so a
/// parameter can never have two sources. Iterates in sorted target order.
pub type ConnectionMap = BTreeMap<String, String>;

/// Where a pending connection came from. Only meaningful until reconciliation
/// finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOrigin {
    Explicit,
    Implicit,
}

/// Returns the union of both connection sets.
///
/// A target present in both with the same source is a single connection. A
/// target present in both with different sources is a wiring mistake and is
/// never resolved silently in favour of either side.
pub fn reconcile(
    explicit: &ConnectionMap,
    implicit: &ConnectionMap,
) -> Result<ConnectionMap, WiringError> {
    let mut pending: BTreeMap<&str, (&str, ConnectionOrigin)> = explicit
        .iter()
        .map(|(tgt, src)| (tgt.as_str(), (src.as_str(), ConnectionOrigin::Explicit)))
        .collect();

    for (tgt, src) in implicit {
        match pending.get(tgt.as_str()) {
            Some(&(existing, ConnectionOrigin::Explicit)) if existing != src.as_str() => {
                return Err(WiringError::Conflict {
                    target: tgt.clone(),
                    explicit: existing.to_string(),
                    implicit: src.clone(),
                });
            }
            Some(_) => {}
            None => {
                pending.insert(tgt.as_str(), (src.as_str(), ConnectionOrigin::Implicit));
            }
        }
    }

    debug!(
        explicit = explicit.len(),
        implicit = implicit.len(),
        merged = pending.len(),
        "connections reconciled"
    );

    Ok(pending
        .into_iter()
        .map(|(tgt, (src, _))| (tgt.to_string(), src.to_string()))
        .collect())
}

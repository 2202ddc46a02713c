//! Detects hanging parameters: params with no resolved source.
use super::error::WiringError;
use super::reconcile::ConnectionMap;
use std::collections::BTreeSet;

/// Fails listing every unconnected param, sorted, so the whole wiring defect
/// can be fixed in one pass.
pub fn check_complete<'a>(
    params: impl IntoIterator<Item = &'a str>,
    connections: &ConnectionMap,
) -> Result<(), WiringError> {
    let hanging: BTreeSet<&str> = params
        .into_iter()
        .filter(|p| !connections.contains_key(*p))
        .collect();

    if hanging.is_empty() {
        Ok(())
    } else {
        Err(WiringError::IncompleteWiring {
            params: hanging.into_iter().map(str::to_string).collect(),
        })
    }
}

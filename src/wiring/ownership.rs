//! Assigns each data transfer to the tree node that performs it.
use super::reconcile::ConnectionMap;
use crate::namespace::NamespacePath;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Owner system path -> param paths whose incoming transfer that system
/// performs before its own computation runs. `""` is the tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnershipAssignment {
    owners: BTreeMap<String, Vec<String>>,
}

impl OwnershipAssignment {
    pub fn len(&self) -> usize { self.owners.len() }
    pub fn is_empty(&self) -> bool { self.owners.is_empty() }

    /// Targets owned by `owner`, in target order.
    pub fn targets(&self, owner: &str) -> Option<&[String]> {
        self.owners.get(owner).map(Vec::as_slice)
    }

    pub fn owner_of(&self, target: &str) -> Option<&str> {
        self.owners
            .iter()
            .find(|(_, targets)| targets.iter().any(|t| t == target))
            .map(|(owner, _)| owner.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.owners.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> { self.owners }
}

/// The owner is the nearest common ancestor of target and source: the only
/// node with both ends in scope.
fn owner_for(target: &str, source: &str, delimiter: char) -> String {
    let tgt = NamespacePath::parse(target, delimiter);
    let src = NamespacePath::parse(source, delimiter);
    tgt.common_ancestor(&src).join(delimiter)
}

/// Groups connections by owner. Connections are visited in target order, so
/// each owner's list is sorted.
pub fn assign_owners(connections: &ConnectionMap, delimiter: char) -> OwnershipAssignment {
    let mut owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (tgt, src) in connections {
        owners.entry(owner_for(tgt, src, delimiter)).or_default().push(tgt.clone());
    }
    debug!(connections = connections.len(), owners = owners.len(), "owners assigned");
    OwnershipAssignment { owners }
}

/// Same grouping as [`assign_owners`], computed on the rayon pool.
///
/// Partial groupings are merged by per-owner concatenation and each list is
/// sorted afterwards, so the result does not depend on scheduling.
pub fn assign_owners_parallel(connections: &ConnectionMap, delimiter: char) -> OwnershipAssignment {
    let mut owners = connections
        .par_iter()
        .fold(BTreeMap::<String, Vec<String>>::new, |mut acc, (tgt, src)| {
            acc.entry(owner_for(tgt, src, delimiter)).or_default().push(tgt.clone());
            acc
        })
        .reduce(BTreeMap::new, |mut left, right| {
            for (owner, mut targets) in right {
                left.entry(owner).or_default().append(&mut targets);
            }
            left
        });
    for targets in owners.values_mut() {
        targets.sort();
    }
    debug!(connections = connections.len(), owners = owners.len(), "owners assigned");
    OwnershipAssignment { owners }
}

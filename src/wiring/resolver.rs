//! The resolution pipeline: reconcile, validate, check completeness, assign owners.
use super::checker::CompatibilityChecker;
use super::completeness::check_complete;
use super::error::WiringError;
use super::ownership::{assign_owners, assign_owners_parallel, OwnershipAssignment};
use super::reconcile::{reconcile, ConnectionMap};
use crate::config::{ConfigError, ResolveOptions};
use crate::store::VariableTable;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything the vector-setup and execution layers need from resolution.
/// Rebuilt from scratch on every `setup`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedWiring {
    pub connections: ConnectionMap,
    pub owners: OwnershipAssignment,
}

impl ResolvedWiring {
    pub fn source_of(&self, target: &str) -> Option<&str> {
        self.connections.get(target).map(String::as_str)
    }

    /// Params fed by `source`, in target order.
    pub fn targets_of<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.connections
            .iter()
            .filter(move |(_, src)| src.as_str() == source)
            .map(|(tgt, _)| tgt.as_str())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the resolution stages in order, stopping at the first stage that fails.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolveOptions,
}

impl Resolver {
    /// Fails if the options do not pass [`ResolveOptions::validate`].
    pub fn new(options: ResolveOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &ResolveOptions { &self.options }

    pub fn resolve(
        &self,
        explicit: &ConnectionMap,
        implicit: &ConnectionMap,
        params: &VariableTable,
        unknowns: &VariableTable,
    ) -> Result<ResolvedWiring, WiringError> {
        debug!(params = params.len(), unknowns = unknowns.len(), "resolving connections");

        let connections = reconcile(explicit, implicit)?;

        CompatibilityChecker::new(params, unknowns)
            .with_mode(self.options.error_mode)
            .with_parallel(self.options.parallel)
            .validate(&connections)?;

        check_complete(params.paths(), &connections)?;

        let owners = if self.options.parallel {
            assign_owners_parallel(&connections, self.options.delimiter)
        } else {
            assign_owners(&connections, self.options.delimiter)
        };

        info!(connections = connections.len(), owners = owners.len(), "wiring resolved");
        Ok(ResolvedWiring { connections, owners })
    }
}

/// Resolves with default options.
pub fn resolve_and_validate(
    explicit: &ConnectionMap,
    implicit: &ConnectionMap,
    params: &VariableTable,
    unknowns: &VariableTable,
) -> Result<ResolvedWiring, WiringError> {
    Resolver::default().resolve(explicit, implicit, params, unknowns)
}

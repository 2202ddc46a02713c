//! The central checker that runs the compatibility rules over every connection.
use super::error::{ConnectError, WiringError};
use super::metadata::extract;
use super::reconcile::ConnectionMap;
use super::rules::shapes::{self, ShapeCheck};
use super::rules::types;
use crate::config::ErrorMode;
use crate::store::VariableTable;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Validates resolved connections against the param and unknown tables.
///
/// Rules are local to a single connection, so connections are independent of
/// each other and may be checked in parallel. Reported errors are always in
/// target order regardless of how the work was scheduled.
pub struct CompatibilityChecker<'a> {
    params: &'a VariableTable,
    unknowns: &'a VariableTable,
    mode: ErrorMode,
    parallel: bool,
}

impl<'a> CompatibilityChecker<'a> {
    pub fn new(params: &'a VariableTable, unknowns: &'a VariableTable) -> Self {
        Self { params, unknowns, mode: ErrorMode::FailFast, parallel: false }
    }

    pub fn with_mode(mut self, mode: ErrorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks every connection.
    ///
    /// # Returns
    /// - `Ok(())` if all connections are compatible.
    /// - In `FailFast` mode, the first failure in target order.
    /// - In `Collect` mode, a connection naming an undeclared variable is
    ///   reported on its own; otherwise every `ConnectError` is returned
    ///   together.
    pub fn validate(&self, connections: &ConnectionMap) -> Result<(), WiringError> {
        debug!(connections = connections.len(), parallel = self.parallel, "checking compatibility");

        match self.mode {
            ErrorMode::FailFast => {
                let first = if self.parallel {
                    connections
                        .par_iter()
                        .find_map_first(|(tgt, src)| self.check_connection(tgt, src).err())
                } else {
                    connections
                        .iter()
                        .find_map(|(tgt, src)| self.check_connection(tgt, src).err())
                };
                first.map_or(Ok(()), Err)
            }
            ErrorMode::Collect => {
                let errors: Vec<WiringError> = if self.parallel {
                    connections
                        .par_iter()
                        .filter_map(|(tgt, src)| self.check_connection(tgt, src).err())
                        .collect()
                } else {
                    connections
                        .iter()
                        .filter_map(|(tgt, src)| self.check_connection(tgt, src).err())
                        .collect()
                };
                Self::merge_errors(errors)
            }
        }
    }

    fn merge_errors(errors: Vec<WiringError>) -> Result<(), WiringError> {
        let mut connect_errors: Vec<ConnectError> = Vec::with_capacity(errors.len());
        for err in errors {
            match err {
                WiringError::Connect(e) => connect_errors.push(e),
                other => return Err(other),
            }
        }
        match connect_errors.len() {
            0 => Ok(()),
            1 => Err(WiringError::Connect(connect_errors.remove(0))),
            _ => Err(WiringError::ConnectMany(connect_errors)),
        }
    }

    fn check_connection(&self, target: &str, source: &str) -> Result<(), WiringError> {
        let tgt_desc = self.params.get(target).ok_or_else(|| WiringError::MissingParam {
            target: target.to_string(),
            unknown: source.to_string(),
        })?;
        let src_desc = self.unknowns.get(source).ok_or_else(|| WiringError::MissingUnknown {
            target: target.to_string(),
            unknown: source.to_string(),
        })?;

        let src = extract(source, src_desc);
        let tgt = extract(target, tgt_desc);

        types::check_types_match(&src, &tgt)?;
        if shapes::check_shapes_match(&src, &tgt)? == ShapeCheck::Unchecked {
            trace!(target_path = target, source_path = source, "shape not checked: target declares none");
        }
        Ok(())
    }
}

//! The top-level object that prepares a component tree for execution.
use crate::config::{ConfigError, ResolveOptions};
use crate::store::{VarValue, VariableTable};
use crate::wiring::{infer_implicit, ConnectionMap, ResolvedWiring, Resolver, WiringError};
use tracing::{debug, warn};

/// The component/group tree, as seen by `Problem::setup`.
pub trait ModelTree {
    /// Gives every system its absolute pathname below `parent_path`.
    fn setup_paths(&mut self, parent_path: &str);

    /// Returns every param and every unknown in the tree, keyed by absolute path.
    fn setup_variables(&mut self) -> (VariableTable, VariableTable);

    /// Connections stated by the model author, with absolute paths.
    fn explicit_connections(&self) -> ConnectionMap;

    /// Allocates storage and transfer plans for the resolved wiring.
    fn setup_vectors(&mut self, wiring: &ResolvedWiring);

    /// Current value of an unknown, looked up by name.
    fn get(&self, name: &str) -> Option<VarValue>;
}

/// Drives execution of a set-up tree (e.g. a single pass or an optimizer loop).
pub trait Driver<T: ModelTree> {
    fn run(&mut self, root: &mut T, wiring: &ResolvedWiring);
}

pub struct Problem<T, D> {
    root: T,
    driver: D,
    resolver: Resolver,
    wiring: Option<ResolvedWiring>,
}

impl<T: ModelTree, D: Driver<T>> Problem<T, D> {
    pub fn new(root: T, driver: D) -> Self {
        Self { root, driver, resolver: Resolver::default(), wiring: None }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Result<Self, ConfigError> {
        self.resolver = Resolver::new(options)?;
        Ok(self)
    }

    /// Resolves and validates all connections, then hands the result to the
    /// tree for vector setup. Any wiring defect aborts setup and leaves the
    /// problem un-runnable.
    pub fn setup(&mut self) -> Result<&ResolvedWiring, WiringError> {
        self.wiring = None;

        self.root.setup_paths("");
        let (params, unknowns) = self.root.setup_variables();
        let explicit = self.root.explicit_connections();
        debug!(explicit = explicit.len(), "collected explicit connections");

        let wiring = infer_implicit(&params, &unknowns)
            .and_then(|implicit| self.resolver.resolve(&explicit, &implicit, &params, &unknowns))
            .map_err(|e| {
                warn!(error = %e, "setup failed");
                e
            })?;

        self.root.setup_vectors(&wiring);
        Ok(&*self.wiring.insert(wiring))
    }

    pub fn run(&mut self) -> Result<(), WiringError> {
        let wiring = self.wiring.as_ref().ok_or(WiringError::NotSetUp)?;
        self.driver.run(&mut self.root, wiring);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<VarValue> { self.root.get(name) }

    /// The wiring from the last successful `setup`.
    pub fn wiring(&self) -> Option<&ResolvedWiring> { self.wiring.as_ref() }

    pub fn root(&self) -> &T { &self.root }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ArrayValue, VarDescriptor};
    use std::collections::BTreeMap;

    /// Two components under group `G`: `C1` consumes `x`, `C2` produces `x` and `y`.
    #[derive(Default)]
    struct TwoComponentTree {
        explicit: ConnectionMap,
        extra_param: bool,
        root_path: Option<String>,
        vectors: Option<ResolvedWiring>,
        values: BTreeMap<String, VarValue>,
        runs: usize,
    }

    impl ModelTree for TwoComponentTree {
        fn setup_paths(&mut self, parent_path: &str) {
            self.root_path = Some(parent_path.to_string());
        }

        fn setup_variables(&mut self) -> (VariableTable, VariableTable) {
            let shaped = || VarDescriptor::new(ArrayValue::from_vec(vec![0.0; 3])).with_shape(vec![3]);
            let mut params = VariableTable::new();
            params.insert("G:C1:x", shaped().with_promoted("x")).unwrap();
            if self.extra_param {
                params.insert("G:C1:w", shaped()).unwrap();
            }
            let mut unknowns = VariableTable::new();
            unknowns.insert("G:C2:x", shaped().with_promoted("x")).unwrap();
            unknowns.insert("G:C2:y", shaped().with_promoted("y")).unwrap();
            (params, unknowns)
        }

        fn explicit_connections(&self) -> ConnectionMap { self.explicit.clone() }

        fn setup_vectors(&mut self, wiring: &ResolvedWiring) {
            self.vectors = Some(wiring.clone());
        }

        fn get(&self, name: &str) -> Option<VarValue> { self.values.get(name).cloned() }
    }

    struct CopyOnce;

    impl Driver<TwoComponentTree> for CopyOnce {
        fn run(&mut self, root: &mut TwoComponentTree, wiring: &ResolvedWiring) {
            root.runs += 1;
            for (tgt, src) in &wiring.connections {
                if let Some(v) = root.values.get(src).cloned() {
                    root.values.insert(tgt.clone(), v);
                }
            }
        }
    }

    #[test]
    fn test_setup_uses_implicit_connections() {
        let mut problem = Problem::new(TwoComponentTree::default(), CopyOnce);
        let wiring = problem.setup().unwrap().clone();
        assert_eq!(wiring.source_of("G:C1:x"), Some("G:C2:x"));
        assert_eq!(wiring.owners.owner_of("G:C1:x"), Some("G"));
        assert_eq!(problem.root().root_path.as_deref(), Some(""));
        assert_eq!(problem.root().vectors.as_ref(), Some(&wiring));
    }

    #[test]
    fn test_explicit_connection_contradicting_promotion_fails() {
        let tree = TwoComponentTree {
            explicit: [("G:C1:x".to_string(), "G:C2:y".to_string())].into_iter().collect(),
            ..Default::default()
        };
        let mut problem = Problem::new(tree, CopyOnce);
        let err = problem.setup().unwrap_err();
        assert_eq!(
            err,
            WiringError::Conflict {
                target: "G:C1:x".into(),
                explicit: "G:C2:y".into(),
                implicit: "G:C2:x".into(),
            }
        );
        assert!(problem.wiring().is_none());
        assert!(problem.root().vectors.is_none());
    }

    #[test]
    fn test_hanging_param_blocks_run() {
        let tree = TwoComponentTree { extra_param: true, ..Default::default() };
        let mut problem = Problem::new(tree, CopyOnce);
        assert_eq!(
            problem.setup().unwrap_err(),
            WiringError::IncompleteWiring { params: vec!["G:C1:w".into()] }
        );
        assert_eq!(problem.run().unwrap_err(), WiringError::NotSetUp);
        assert_eq!(problem.root().runs, 0);
    }

    #[test]
    fn test_invalid_options_are_refused() {
        let options = ResolveOptions { delimiter: ' ', ..Default::default() };
        let result = Problem::new(TwoComponentTree::default(), CopyOnce).with_options(options);
        assert!(matches!(result, Err(ConfigError::InvalidDelimiter(' '))));
    }

    #[test]
    fn test_run_after_setup_transfers_data() {
        let mut tree = TwoComponentTree::default();
        tree.values.insert("G:C2:x".into(), VarValue::Float(4.0));
        let mut problem = Problem::new(tree, CopyOnce).with_options(ResolveOptions::default()).unwrap();
        problem.setup().unwrap();
        problem.run().unwrap();
        assert_eq!(problem.root().runs, 1);
        assert_eq!(problem.get("G:C1:x"), Some(VarValue::Float(4.0)));
    }
}

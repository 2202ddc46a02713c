// wiring_core: connection resolution for hierarchical component models.
//
// The Rust core resolves, validates and partitions the connections of a
// component tree before it runs. With the `python` feature, the `_core`
// module below exposes it to Python.

pub mod config;
pub mod namespace;
pub mod problem;
pub mod store;
pub mod wiring;

#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use config::{ConfigError, ErrorMode, ResolveOptions};
pub use problem::{Driver, ModelTree, Problem};
pub use store::{VarDescriptor, VarValue, VariableTable};
pub use wiring::{resolve_and_validate, ConnectionMap, OwnershipAssignment, ResolvedWiring, WiringError};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// --- Module Definition ---
/// Defines the `_core` Python module.
/// The name `_core` is chosen to indicate it's an internal, compiled component.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    bindings::python::register(m)
}

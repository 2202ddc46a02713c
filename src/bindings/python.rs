use crate::config::{ErrorMode, ResolveOptions};
use crate::store::{ArrayValue, VarDescriptor, VarValue, VariableTable};
use crate::wiring::{infer_implicit, ConnectionMap, Resolver, WiringError};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::BTreeMap;

mod exceptions {
    use pyo3::exceptions::PyException;

    pyo3::create_exception!(_core, WiringError, PyException, "A model's wiring cannot be resolved.");
    pyo3::create_exception!(_core, ConflictError, WiringError, "Explicit and implicit connections disagree.");
    pyo3::create_exception!(_core, ConnectError, WiringError, "A connection joins incompatible variables.");
}

fn to_py_err(e: WiringError) -> PyErr {
    match &e {
        WiringError::Conflict { .. } => exceptions::ConflictError::new_err(e.to_string()),
        WiringError::Connect(_) | WiringError::ConnectMany(_) => {
            exceptions::ConnectError::new_err(e.to_string())
        }
        _ => exceptions::WiringError::new_err(e.to_string()),
    }
}

#[pyfunction]
fn rust_core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Variables and explicit connections collected from a Python model tree.
#[pyclass(name = "_WiringModel")]
#[derive(Debug, Clone, Default)]
pub struct PyWiringModel {
    params: VariableTable,
    unknowns: VariableTable,
    explicit: ConnectionMap,
    options: ResolveOptions,
}

impl PyWiringModel {
    fn build_descriptor(
        value: Vec<f64>,
        kind: Option<&str>,
        dims: Option<Vec<usize>>,
        shape: Option<Vec<usize>>,
        promoted: Option<String>,
    ) -> PyResult<VarDescriptor> {
        let scalar = |value: &[f64]| match value {
            [v] => Ok(*v),
            _ => Err(PyValueError::new_err(format!(
                "Scalar variables need exactly one value, got {}",
                value.len()
            ))),
        };
        let value = match kind.unwrap_or("ndarray") {
            "float" => VarValue::Float(scalar(&value)?),
            "int" => {
                let v = scalar(&value)?;
                VarValue::exact_int(v).ok_or_else(|| {
                    PyValueError::new_err(format!("Integer variables need a whole number, got {}", v))
                })?
            }
            "ndarray" => {
                let dims = dims.unwrap_or_else(|| vec![value.len()]);
                let array = ArrayValue::new(value, dims).map_err(|e| PyValueError::new_err(e.to_string()))?;
                VarValue::Array(array)
            }
            other => return Err(PyValueError::new_err(format!("Invalid kind: '{}'", other))),
        };
        Ok(VarDescriptor { value, shape, promoted })
    }
}

#[pymethods]
impl PyWiringModel {
    #[new]
    #[pyo3(signature = (delimiter = ':', parallel = false, collect_errors = false))]
    pub fn new(delimiter: char, parallel: bool, collect_errors: bool) -> PyResult<Self> {
        let options = ResolveOptions {
            delimiter,
            parallel,
            error_mode: if collect_errors { ErrorMode::Collect } else { ErrorMode::FailFast },
        };
        options.validate().map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { options, ..Default::default() })
    }

    #[pyo3(signature = (path, value, kind = None, dims = None, shape = None, promoted = None))]
    pub fn add_param(
        &mut self,
        path: String,
        value: Vec<f64>,
        kind: Option<String>,
        dims: Option<Vec<usize>>,
        shape: Option<Vec<usize>>,
        promoted: Option<String>,
    ) -> PyResult<()> {
        let desc = Self::build_descriptor(value, kind.as_deref(), dims, shape, promoted)?;
        self.params.insert(path, desc).map_err(to_py_err)
    }

    #[pyo3(signature = (path, value, kind = None, dims = None, shape = None, promoted = None))]
    pub fn add_unknown(
        &mut self,
        path: String,
        value: Vec<f64>,
        kind: Option<String>,
        dims: Option<Vec<usize>>,
        shape: Option<Vec<usize>>,
        promoted: Option<String>,
    ) -> PyResult<()> {
        let desc = Self::build_descriptor(value, kind.as_deref(), dims, shape, promoted)?;
        self.unknowns.insert(path, desc).map_err(to_py_err)
    }

    /// Explicitly connects `source` (an unknown) to `target` (a param).
    pub fn connect(&mut self, source: String, target: String) -> PyResult<()> {
        match self.explicit.get(&target) {
            Some(existing) if *existing != source => Err(PyValueError::new_err(format!(
                "'{}' is already connected to '{}'",
                target, existing
            ))),
            _ => {
                self.explicit.insert(target, source);
                Ok(())
            }
        }
    }

    /// Resolves the wiring. Without `implicit`, connections are inferred from promoted names.
    ///
    /// Returns `(connections, owners)`.
    #[pyo3(signature = (implicit = None))]
    pub fn resolve(
        &self,
        implicit: Option<BTreeMap<String, String>>,
    ) -> PyResult<(BTreeMap<String, String>, BTreeMap<String, Vec<String>>)> {
        let implicit = match implicit {
            Some(conns) => conns,
            None => infer_implicit(&self.params, &self.unknowns).map_err(to_py_err)?,
        };
        let wiring = Resolver::new(self.options.clone())
            .map_err(|e| PyValueError::new_err(e.to_string()))?
            .resolve(&self.explicit, &implicit, &self.params, &self.unknowns)
            .map_err(to_py_err)?;
        Ok((wiring.connections, wiring.owners.into_inner()))
    }

    pub fn param_count(&self) -> usize { self.params.len() }
    pub fn unknown_count(&self) -> usize { self.unknowns.len() }
}

pub(crate) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(rust_core_version, m)?)?;
    m.add_class::<PyWiringModel>()?;
    let py = m.py();
    m.add("WiringError", py.get_type::<exceptions::WiringError>())?;
    m.add("ConflictError", py.get_type::<exceptions::ConflictError>())?;
    m.add("ConnectError", py.get_type::<exceptions::ConnectError>())?;
    Ok(())
}

//! Defines the error types for connection resolution.
use crate::store::ValueKind;
use thiserror::Error;

/// The part of a variable's metadata that a connect error reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSummary {
    pub path: String,
    pub kind: ValueKind,
    /// Declared shape, `None` when the component did not declare one.
    pub shape: Option<Vec<usize>>,
}

impl VarSummary {
    fn shape_str(&self) -> String {
        match &self.shape {
            Some(dims) => fmt_dims(dims),
            None => "None".to_string(),
        }
    }
}

/// Formats dimensions as a tuple, e.g. `(3,)` or `(2, 2)`.
fn fmt_dims(dims: &[usize]) -> String {
    match dims {
        [single] => format!("({},)", single),
        _ => format!(
            "({})",
            dims.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn join_connect_errors(errors: &[ConnectError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n- ")
}

/// A resolved connection whose two ends cannot exchange data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error(
        "Type '{}' of source '{}' (shape {}) must be the same as type '{}' of target '{}' (shape {})",
        .src.kind, .src.path, .src.shape_str(), .tgt.kind, .tgt.path, .tgt.shape_str()
    )]
    TypeMismatch { src: VarSummary, tgt: VarSummary },

    #[error(
        "Shape {} of the source '{}' (type '{}') must match the shape {} of the target '{}' (type '{}')",
        .src.shape_str(), .src.path, .src.kind, .tgt.shape_str(), .tgt.path, .tgt.kind
    )]
    ShapeMismatch { src: VarSummary, tgt: VarSummary },

    /// The source declares no shape, so its initial value's dimensions were compared instead.
    #[error(
        "Shape of the initial value {} of source '{}' (type '{}', declared shape {}) must match the shape {} of the target '{}' (type '{}')",
        fmt_dims(.value_dims), .src.path, .src.kind, .src.shape_str(), .tgt.shape_str(), .tgt.path, .tgt.kind
    )]
    ValueShapeMismatch { src: VarSummary, value_dims: Vec<usize>, tgt: VarSummary },
}

impl ConnectError {
    /// Path of the parameter end of the failed connection.
    pub fn target(&self) -> &str {
        match self {
            ConnectError::TypeMismatch { tgt, .. }
            | ConnectError::ShapeMismatch { tgt, .. }
            | ConnectError::ValueShapeMismatch { tgt, .. } => &tgt.path,
        }
    }
}

/// Every way resolution can reject a model. None of these are recoverable:
/// a model with any wiring defect must not run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    #[error("'{target}' is explicitly connected to '{explicit}' but implicitly connected to '{implicit}'")]
    Conflict { target: String, explicit: String, implicit: String },

    #[error("Promoted name '{name}' matches multiple unknowns: {unknowns:?}")]
    AmbiguousPromotion { name: String, unknowns: Vec<String> },

    #[error("'{target}' is connected to '{unknown}', which is not a declared unknown")]
    MissingUnknown { target: String, unknown: String },

    #[error("'{target}' is connected to '{unknown}' but is not a declared parameter")]
    MissingParam { target: String, unknown: String },

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("{} connection errors:\n- {}", .0.len(), join_connect_errors(.0))]
    ConnectMany(Vec<ConnectError>),

    #[error("Parameters {params:?} have no associated unknowns.")]
    IncompleteWiring { params: Vec<String> },

    #[error("Duplicate variable path '{path}'")]
    DuplicateVariable { path: String },

    #[error("setup() must complete successfully before the model can run")]
    NotSetUp,
}

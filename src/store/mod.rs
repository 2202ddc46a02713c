//! Variable descriptors and the per-kind (param / unknown) tables that hold them.
pub mod registry;
pub mod types;

pub use registry::VariableTable;
pub use types::{ArrayValue, DimsMismatch, ValueKind, VarDescriptor, VarValue};

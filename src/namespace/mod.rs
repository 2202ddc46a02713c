//! Hierarchical namespace paths for the component tree.
pub mod path;

pub use path::{NamespacePath, DEFAULT_DELIMITER};

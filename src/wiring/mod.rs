//! Connection resolution for the component tree.
//!
//! Runs once per `setup`, before anything executes: explicit and implicit
//! connections are reconciled, every resolved connection is checked for type
//! and shape compatibility, hanging parameters are reported, and each data
//! transfer is assigned to the tree node that owns it.

pub use self::checker::CompatibilityChecker;
pub use self::completeness::check_complete;
pub use self::error::{ConnectError, VarSummary, WiringError};
pub use self::implicit::infer_implicit;
pub use self::metadata::{extract, DeclaredShape, VariableMetadata};
pub use self::ownership::{assign_owners, assign_owners_parallel, OwnershipAssignment};
pub use self::reconcile::{reconcile, ConnectionMap, ConnectionOrigin};
pub use self::resolver::{resolve_and_validate, ResolvedWiring, Resolver};

// --- MODULE DECLARATIONS ---
mod checker;
mod completeness;
mod error;
mod implicit;
mod metadata;
mod ownership;
mod reconcile;
mod resolver;
mod rules {
    pub mod shapes;
    pub mod types;
}

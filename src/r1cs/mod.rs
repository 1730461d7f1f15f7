//! Minimal rank-1 constraint-system substrate for the pairing gadgets.
//!
//! The gadgets in [`crate::circuits`] are two-phase: constraint generation
//! records a fixed topology over symbolic variables, and witness generation
//! later stores a concrete field value for every allocated variable. This
//! module provides the variable/linear-combination vocabulary ([`ops`]) and
//! the constraint recorder plus witness store ([`system`]).

pub mod ops;
pub mod system;

pub use ops::{Term, Variable, LC};
pub use system::{Constraint, ConstraintSystem};

use thiserror::Error;

/// Fatal errors raised while declaring constraints or assigning witnesses.
/// None of these are recoverable by retry; they abort construction of the
/// enclosing circuit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// A witness value was read before it was assigned.
    #[error("witness value for variable v{0} has not been assigned")]
    AssignmentMissing(usize),
    /// A gadget was driven out of phase order (e.g. witness assignment
    /// before constraint declaration) or asked to assign a value to a
    /// derived linear combination.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),
    /// Curve constants inconsistent with the extension-field tower the
    /// gadgets are built over. Detected at construction time.
    #[error("curve parameter mismatch: {0}")]
    ParameterMismatch(&'static str),
}

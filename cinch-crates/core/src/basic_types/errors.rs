use thiserror::Error;

#[cfg(doc)]
use crate::Solver;

/// Misuse of the modelling interface. These are never recovered from by the search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("variable {0} belongs to a different solver")]
    ForeignVariable(String),
    #[error("expected {expected} elements but {actual} were provided")]
    ScopeMismatch { expected: usize, actual: usize },
    #[error("row {row} of the table has {actual} values, expected {expected}")]
    MalformedTable {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("'{0}' is not a known relation")]
    UnknownRelation(String),
    #[error("a variable named '{0}' already exists")]
    DuplicateName(String),
    #[error("the bounds [{lower}, {upper}] do not describe a valid domain")]
    InvalidBounds { lower: String, upper: String },
    #[error("{0}")]
    InvalidArgument(String),
}

/// Errors related to adding constraints to the [`Solver`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// Adding the propagator led to infeasibility at the root.
    #[error("Adding the constraint failed because it is infeasible at the root")]
    InfeasiblePropagator,
    /// A constraint was added while the [`Solver`] was in an infeasible state.
    #[error("Adding constraint failed because the solver is in an infeasible state")]
    InfeasibleState,
    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),
}

/// Errors which stop a search before it reached a conclusion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("the model was misused during search: {0}")]
    ContractViolation(#[from] ContractViolation),
}

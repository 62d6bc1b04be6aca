mod errors;
mod inconsistency;
mod solution;
pub(crate) mod trail;

pub use errors::ConstraintOperationError;
pub use errors::ContractViolation;
pub use errors::SolverError;
pub use inconsistency::EmptyDomain;
pub use inconsistency::Inconsistency;
pub use inconsistency::PropagationStatus;
pub use solution::Solution;
pub use solution::Value;
pub use solution::Variable;
pub use trail::TrailMark;

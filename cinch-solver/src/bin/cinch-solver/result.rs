use cinch_solver::ContractViolation;
use cinch_solver::SolverError;
use thiserror::Error;

pub(crate) type CinchResult<T> = Result<T, CinchError>;

#[derive(Error, Debug)]
pub(crate) enum CinchError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The model could not be built: {0}")]
    InvalidModel(#[from] ContractViolation),
    #[error("The search failed: {0}")]
    Search(#[from] SolverError),
}

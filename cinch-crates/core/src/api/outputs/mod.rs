use crate::basic_types::Solution;
#[cfg(doc)]
use crate::search::termination::TerminationCondition;
#[cfg(doc)]
use crate::Solver;

/// The result of a call to [`Solver::find_solution`] or [`Solver::solve`].
#[derive(Clone, Debug)]
pub enum SatisfactionResult {
    /// A solution was found.
    Satisfiable(Solution),
    /// There is no solution to the satisfaction problem.
    Unsatisfiable,
    /// It is not known whether a solution exists. This is likely due to a
    /// [`TerminationCondition`] triggering.
    Unknown,
}

impl SatisfactionResult {
    /// The solution, if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SatisfactionResult::Satisfiable(solution) => Some(solution),
            SatisfactionResult::Unsatisfiable | SatisfactionResult::Unknown => None,
        }
    }
}

/// The result of a call to [`Solver::find_optimal_solution`].
#[derive(Clone, Debug)]
pub enum OptimisationResult {
    /// An optimal solution has been found and proven to be optimal.
    Optimal(Solution),
    /// A solution was found, but the search stopped before proving that it is optimal. The
    /// solution is the best one known to the solver.
    Satisfiable(Solution),
    /// There is no solution to the problem.
    Unsatisfiable,
    /// It is not known whether a solution exists. This is likely due to a
    /// [`TerminationCondition`] triggering.
    Unknown,
}

impl OptimisationResult {
    /// The best solution, if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            OptimisationResult::Optimal(solution) | OptimisationResult::Satisfiable(solution) => {
                Some(solution)
            }
            OptimisationResult::Unsatisfiable | OptimisationResult::Unknown => None,
        }
    }
}

/// Whether the objective of [`Solver::find_optimal_solution`] is minimised or maximised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OptimisationDirection {
    #[default]
    Minimise,
    Maximise,
}

/// The solutions enumerated by [`Solver::find_all_solutions`], in the order the search found
/// them.
#[derive(Clone, Debug, Default)]
pub struct AllSolutions {
    pub solutions: Vec<Solution>,
    /// `false` if the search was stopped before the search space was exhausted.
    pub is_complete: bool,
}

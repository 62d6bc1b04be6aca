//! The models which the `cinch-solver` binary can run. Each model posts its variables and
//! constraints into a [`Solver`] and knows how to print a solution.
mod knapsack;
mod queens;
mod send_more_money;
mod two_machine_schedule;

use std::io::Write;

pub use knapsack::*;
pub use queens::*;
pub use send_more_money::*;
pub use two_machine_schedule::*;

use crate::results::OptimisationDirection;
use crate::results::Solution;
use crate::search::Goal;
use crate::variables::DomainId;
use crate::Solver;

/// A problem posted into a [`Solver`].
pub trait Model {
    /// The goal which searches for solutions of the model.
    fn goal(&self, solver: &Solver) -> Goal {
        solver.default_goal()
    }

    /// The objective of the model, if it is an optimisation problem.
    fn objective(&self) -> Option<(OptimisationDirection, DomainId)> {
        None
    }

    fn write_solution(&self, solution: &Solution, output: &mut dyn Write) -> std::io::Result<()>;
}

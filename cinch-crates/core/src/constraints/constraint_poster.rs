use log::warn;

use super::Constraint;
use super::NegatableConstraint;
use crate::basic_types::ConstraintOperationError;
use crate::engine::variables::Literal;
use crate::Solver;

/// A temporary structure which is responsible for actually adding created constraints to the
/// solver. For an example on how to use this, see [`Solver::add_constraint`].
#[derive(Debug)]
pub struct ConstraintPoster<'solver, ConstraintImpl> {
    solver: &'solver mut Solver,
    constraint: Option<ConstraintImpl>,
}

impl<'a, ConstraintImpl> ConstraintPoster<'a, ConstraintImpl> {
    pub(crate) fn new(solver: &'a mut Solver, constraint: ConstraintImpl) -> Self {
        ConstraintPoster {
            solver,
            constraint: Some(constraint),
        }
    }
}

impl<ConstraintImpl: Constraint> ConstraintPoster<'_, ConstraintImpl> {
    /// Add the constraint to the solver.
    pub fn post(mut self) -> Result<(), ConstraintOperationError> {
        match self.constraint.take() {
            Some(constraint) => self.solver.add_to_root(|state| constraint.post(state)),
            None => Ok(()),
        }
    }

    /// Add the half-reified version of the constraint to the solver. I.e. post the constraint
    /// `r -> Self` where `r` is a reification literal.
    pub fn implied_by(
        mut self,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        match self.constraint.take() {
            Some(constraint) => self
                .solver
                .add_to_root(|state| constraint.implied_by(state, reification_literal)),
            None => Ok(()),
        }
    }
}

impl<ConstraintImpl: NegatableConstraint> ConstraintPoster<'_, ConstraintImpl> {
    /// Add the reified version of the constraint to the solver. I.e. post the constraint
    /// `r <-> Self` where `r` is a reification literal.
    pub fn reify(mut self, reification_literal: Literal) -> Result<(), ConstraintOperationError> {
        match self.constraint.take() {
            Some(constraint) => self
                .solver
                .add_to_root(|state| constraint.reify(state, reification_literal)),
            None => Ok(()),
        }
    }

    /// Creates the truth variable of the constraint; i.e. a new literal `r` together with
    /// `r <-> Self`.
    pub fn as_bool(mut self) -> Result<Literal, ConstraintOperationError> {
        let literal = self.solver.new_literal();
        match self.constraint.take() {
            Some(constraint) => self
                .solver
                .add_to_root(|state| constraint.reify(state, literal))
                .map(|_| literal),
            None => Ok(literal),
        }
    }
}

impl<ConstraintImpl> Drop for ConstraintPoster<'_, ConstraintImpl> {
    fn drop(&mut self) {
        if self.constraint.is_some() {
            warn!("A constraint poster is never used, this is likely a mistake.");
        }
    }
}

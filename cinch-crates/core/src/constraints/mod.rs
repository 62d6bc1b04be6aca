//! Defines the constraints that cinch provides out of the box which can be added to the
//! [`Solver`].
//!
//! A constraint is a relation over variables. In the solver, constraints are enforced through
//! propagators, and therefore constraints can be viewed as a collection of propagators.
//!
//! # Example
//! ```
//! # use cinch_core::constraints;
//! # use cinch_core::Solver;
//! let mut solver = Solver::default();
//!
//! let a = solver.new_bounded_integer(0, 3);
//! let b = solver.new_bounded_integer(0, 3);
//!
//! solver
//!     .add_constraint(constraints::equals([a, b], 0))
//!     .post()
//!     .expect("a = 0 and b = 0 is a solution");
//! ```
//!
//! Constraints only hold handles to variables, so they can be posted more than once; this is
//! what allows a [`Goal`] to post a constraint on every branch it is executed on.

mod all_different;
mod arithmetic;
mod boolean;
mod constraint_poster;
mod count;
mod cumulative;
mod element;
mod real;
mod table;

pub use all_different::*;
pub use arithmetic::*;
pub use boolean::*;
pub use constraint_poster::*;
pub use count::*;
pub use cumulative::*;
pub use element::*;
pub use real::*;
pub use table::*;

use crate::basic_types::ConstraintOperationError;
use crate::engine::variables::Literal;
use crate::engine::State;
use crate::propagation::PropagatorConstructor;
use crate::propagators::ReifiedPropagatorArgs;
#[cfg(doc)]
use crate::search::Goal;
#[cfg(doc)]
use crate::Solver;

/// A [`Constraint`] is a relation over variables. It disqualifies certain partial assignments of
/// making it into a solution of the problem.
///
/// For example, the constraint `a = b` over two variables `a` and `b` only allows assignments to
/// `a` and `b` of the same value, and rejects any assignment where `a` and `b` differ.
pub trait Constraint {
    /// Add the [`Constraint`] to the state.
    ///
    /// This method returns a [`ConstraintOperationError`] if the addition of the [`Constraint`] led
    /// to a conflict, or if it refers to variables which were not created by this state.
    fn post(&self, state: &mut State) -> Result<(), ConstraintOperationError>;

    /// Add the half-reified version of the [`Constraint`] to the state; i.e. post the constraint
    /// `r -> constraint` where `r` is a reification literal.
    fn implied_by(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError>;
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(&self, state: &mut State) -> Result<(), ConstraintOperationError> {
        self.iter().try_for_each(|c| c.post(state))
    }

    fn implied_by(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        self.iter()
            .try_for_each(|c| c.implied_by(state, reification_literal))
    }
}

/// A [`Constraint`] which has a well-defined negation.
///
/// Having a negation means the [`Constraint`] can be fully reified; i.e., a constraint `C` can be
/// turned into `r <-> C` where `r` is a reification literal.
///
/// For example, the negation of the [`Constraint`] `a = b` is (well-)defined as `a != b`.
pub trait NegatableConstraint: Constraint {
    type NegatedConstraint: NegatableConstraint + 'static;

    fn negation(&self) -> Self::NegatedConstraint;

    /// Add the reified version of the [`Constraint`] to the state; i.e. post the constraint
    /// `r <-> constraint` where `r` is a reification literal.
    fn reify(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        self.implied_by(state, reification_literal)?;
        self.negation().implied_by(state, !reification_literal)
    }

    /// Creates the truth variable of the [`Constraint`]: a fresh literal which is true exactly
    /// when the constraint holds.
    ///
    /// Like every variable, the truth variable can only be created before searching.
    fn as_bool(&self, state: &mut State) -> Result<Literal, ConstraintOperationError> {
        let literal = state.new_literal();
        self.reify(state, literal)?;
        Ok(literal)
    }
}

/// Adds `propagator` to the state, wrapped in its half-reified version when a reification literal
/// is given.
fn add_propagator<Args>(
    state: &mut State,
    propagator: Args,
    reification_literal: Option<Literal>,
) -> Result<(), ConstraintOperationError>
where
    Args: PropagatorConstructor,
{
    let _ = match reification_literal {
        Some(reification_literal) => state.add_propagator(ReifiedPropagatorArgs {
            propagator,
            reification_literal,
        })?,
        None => state.add_propagator(propagator)?,
    };

    Ok(())
}

use super::add_propagator;
use super::Constraint;
use super::Relation;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::ContractViolation;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::RealVariable;
use crate::engine::State;
use crate::propagators::IntegerChannelArgs;
use crate::propagators::RealLinearLessOrEqualArgs;

/// Creates the [`Constraint`] `\sum coefficient_i * variable_i <relation> rhs` over real
/// variables.
///
/// Real domains are only narrowed up to the real precision of the solver, so the strict relations
/// are treated as their non-strict counterparts. [`Relation::NotEqual`] cannot be expressed over
/// real bounds and is rejected when the constraint is posted.
pub fn real_linear(
    terms: impl IntoIterator<Item = (f64, RealVariable)>,
    relation: Relation,
    rhs: f64,
) -> RealLinear {
    RealLinear {
        terms: terms.into_iter().collect(),
        relation,
        rhs,
    }
}

#[derive(Clone, Debug)]
pub struct RealLinear {
    terms: Box<[(f64, RealVariable)]>,
    relation: Relation,
    rhs: f64,
}

impl RealLinear {
    fn check_arguments(&self) -> Result<(), ContractViolation> {
        if self.relation == Relation::NotEqual {
            return Err(ContractViolation::InvalidArgument(
                "real linear constraints do not support '!='".to_owned(),
            ));
        }

        if !self.rhs.is_finite() || self.terms.iter().any(|(c, _)| !c.is_finite()) {
            return Err(ContractViolation::InvalidArgument(
                "real linear constraints require finite coefficients".to_owned(),
            ));
        }

        Ok(())
    }

    fn at_most(&self) -> RealLinearLessOrEqualArgs {
        RealLinearLessOrEqualArgs {
            terms: self.terms.clone(),
            rhs: self.rhs,
        }
    }

    fn at_least(&self) -> RealLinearLessOrEqualArgs {
        RealLinearLessOrEqualArgs {
            terms: self
                .terms
                .iter()
                .map(|&(coefficient, variable)| (-coefficient, variable))
                .collect(),
            rhs: -self.rhs,
        }
    }

    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        self.check_arguments()?;
        state.check_real_ownership(self.terms.iter().map(|(_, variable)| variable))?;
        state.check_ownership(reification_literal.iter())?;

        match self.relation {
            Relation::LessThanOrEqual | Relation::LessThan => {
                add_propagator(state, self.at_most(), reification_literal)
            }
            Relation::GreaterThanOrEqual | Relation::GreaterThan => {
                add_propagator(state, self.at_least(), reification_literal)
            }
            Relation::Equal => {
                add_propagator(state, self.at_most(), reification_literal)?;
                add_propagator(state, self.at_least(), reification_literal)
            }
            Relation::NotEqual => unreachable!("rejected by the argument check"),
        }
    }
}

impl Constraint for RealLinear {
    fn post(&self, state: &mut State) -> Result<(), ConstraintOperationError> {
        self.add(state, None)
    }

    fn implied_by(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        self.add(state, Some(reification_literal))
    }
}

/// Creates the [`Constraint`] `real = integer`, which links a real variable to an integer one.
pub fn channel<Var: IntegerVariable>(integer: Var, real: RealVariable) -> Channel<Var> {
    Channel { integer, real }
}

#[derive(Clone, Debug)]
pub struct Channel<Var> {
    integer: Var,
    real: RealVariable,
}

impl<Var: IntegerVariable> Channel<Var> {
    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        state.check_ownership([&self.integer])?;
        state.check_real_ownership([&self.real])?;
        state.check_ownership(reification_literal.iter())?;

        add_propagator(
            state,
            IntegerChannelArgs {
                integer: self.integer.clone(),
                real: self.real,
            },
            reification_literal,
        )
    }
}

impl<Var: IntegerVariable> Constraint for Channel<Var> {
    fn post(&self, state: &mut State) -> Result<(), ConstraintOperationError> {
        self.add(state, None)
    }

    fn implied_by(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        self.add(state, Some(reification_literal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::ReadDomains;

    #[test]
    fn equality_over_reals_narrows_both_sides() {
        let mut state = State::new(1e-6);
        let x = state.new_real_variable(0.0, 10.0);
        let y = state.new_real_variable(0.0, 10.0);

        real_linear([(1.0, x), (1.0, y)], Relation::Equal, 4.0)
            .post(&mut state)
            .expect("feasible");
        state.post_real_lower_bound(x, 1.5).expect("non-empty");
        state.propagate().expect("feasible");

        assert!((state.real_upper_bound(y) - 2.5).abs() < 1e-6);
        assert!(state.real_upper_bound(x) <= 4.0 + 1e-6);
    }

    #[test]
    fn not_equal_is_rejected() {
        let mut state = State::new(1e-6);
        let x = state.new_real_variable(0.0, 10.0);

        let result = real_linear([(1.0, x)], Relation::NotEqual, 4.0).post(&mut state);

        assert!(matches!(
            result,
            Err(ConstraintOperationError::ContractViolation(
                ContractViolation::InvalidArgument(_)
            ))
        ));
    }

    #[test]
    fn channel_rounds_real_bounds_inwards() {
        let mut state = State::new(1e-6);
        let integer = state.new_interval_variable(0, 10);
        let real = state.new_real_variable(1.5, 7.2);

        channel(integer, real).post(&mut state).expect("feasible");

        assert_eq!(2, state.lower_bound(&integer));
        assert_eq!(7, state.upper_bound(&integer));
        assert!((state.real_lower_bound(real) - 2.0).abs() < 1e-6);
    }
}

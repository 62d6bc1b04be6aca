use super::add_propagator;
use super::Constraint;
use crate::basic_types::ConstraintOperationError;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::State;
use crate::propagators::AllDifferentArgs;

/// Creates the [`Constraint`] that enforces that all the given `variables` are distinct.
pub fn all_different<Var: IntegerVariable>(
    variables: impl Into<Box<[Var]>>,
) -> AllDifferent<Var> {
    AllDifferent {
        variables: variables.into(),
    }
}

#[derive(Clone, Debug)]
pub struct AllDifferent<Var> {
    variables: Box<[Var]>,
}

impl<Var: IntegerVariable> AllDifferent<Var> {
    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        state.check_ownership(self.variables.iter())?;
        state.check_ownership(reification_literal.iter())?;

        add_propagator(
            state,
            AllDifferentArgs {
                variables: self.variables.clone(),
            },
            reification_literal,
        )
    }
}

impl<Var: IntegerVariable> Constraint for AllDifferent<Var> {
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
    fn pigeonhole_is_detected_at_the_root() {
        let mut state = State::new(1e-6);
        let variables = (0..4)
            .map(|_| state.new_interval_variable(1, 3))
            .collect::<Vec<_>>();

        let result = all_different(variables).post(&mut state);

        assert_eq!(Err(ConstraintOperationError::InfeasiblePropagator), result);
    }

    #[test]
    fn implied_all_different_waits_for_the_literal() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(1, 1);
        let y = state.new_interval_variable(1, 2);
        let literal = state.new_literal();

        all_different([x, y])
            .implied_by(&mut state, literal)
            .expect("feasible");
        assert_eq!(1, state.lower_bound(&y));

        state.post(literal.get_true_predicate()).expect("non-empty");
        state.propagate().expect("feasible");
        assert_eq!(Some(2), state.fixed_value(&y));
    }
}

use super::add_propagator;
use super::Constraint;
use crate::basic_types::ConstraintOperationError;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::State;
use crate::propagators::CountArgs;

/// Creates the cardinality [`Constraint`] `|{ i | variables_i = value }| = rhs`.
pub fn count<Var: IntegerVariable, Rhs: IntegerVariable>(
    variables: impl Into<Box<[Var]>>,
    value: i32,
    rhs: Rhs,
) -> Count<Var, Rhs> {
    Count {
        variables: variables.into(),
        value,
        rhs,
    }
}

#[derive(Clone, Debug)]
pub struct Count<Var, Rhs> {
    variables: Box<[Var]>,
    value: i32,
    rhs: Rhs,
}

impl<Var: IntegerVariable, Rhs: IntegerVariable> Count<Var, Rhs> {
    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        state.check_ownership(self.variables.iter())?;
        state.check_ownership([&self.rhs])?;
        state.check_ownership(reification_literal.iter())?;

        add_propagator(
            state,
            CountArgs {
                variables: self.variables.clone(),
                value: self.value,
                rhs: self.rhs.clone(),
            },
            reification_literal,
        )
    }
}

impl<Var: IntegerVariable, Rhs: IntegerVariable> Constraint for Count<Var, Rhs> {
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
    fn count_of_a_fixed_assignment() {
        let mut state = State::new(1e-6);
        let variables = [
            state.new_interval_variable(2, 2),
            state.new_interval_variable(3, 3),
            state.new_interval_variable(2, 2),
        ];
        let rhs = state.new_interval_variable(0, 10);

        count(variables, 2, rhs).post(&mut state).expect("feasible");

        assert_eq!(Some(2), state.fixed_value(&rhs));
    }
}

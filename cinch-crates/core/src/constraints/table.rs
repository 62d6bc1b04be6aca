use super::add_propagator;
use super::Constraint;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::ContractViolation;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::State;
use crate::propagators::TableArgs;

/// Creates the [`Constraint`] which restricts `variables` to one of the rows of `tuples`.
///
/// Each row must contain exactly one value per variable; this is checked when the constraint is
/// posted.
pub fn table<Var: IntegerVariable>(
    variables: impl Into<Box<[Var]>>,
    tuples: impl IntoIterator<Item = Vec<i32>>,
) -> Table<Var> {
    Table {
        variables: variables.into(),
        tuples: tuples.into_iter().map(Vec::into_boxed_slice).collect(),
    }
}

#[derive(Clone, Debug)]
pub struct Table<Var> {
    variables: Box<[Var]>,
    tuples: Box<[Box<[i32]>]>,
}

impl<Var: IntegerVariable> Table<Var> {
    fn check_rows(&self) -> Result<(), ContractViolation> {
        let expected = self.variables.len();

        match self
            .tuples
            .iter()
            .position(|tuple| tuple.len() != expected)
        {
            Some(row) => Err(ContractViolation::MalformedTable {
                row,
                expected,
                actual: self.tuples[row].len(),
            }),
            None => Ok(()),
        }
    }

    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        self.check_rows()?;
        state.check_ownership(self.variables.iter())?;
        state.check_ownership(reification_literal.iter())?;

        add_propagator(
            state,
            TableArgs {
                variables: self.variables.clone(),
                tuples: self.tuples.clone(),
            },
            reification_literal,
        )
    }
}

impl<Var: IntegerVariable> Constraint for Table<Var> {
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
    fn rows_of_the_wrong_length_are_rejected() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 5);
        let y = state.new_interval_variable(0, 5);

        let result = table([x, y], [vec![1, 2], vec![3]]).post(&mut state);

        assert_eq!(
            Err(ConstraintOperationError::ContractViolation(
                ContractViolation::MalformedTable {
                    row: 1,
                    expected: 2,
                    actual: 1
                }
            )),
            result
        );
        assert_eq!(0, state.num_propagators());
    }

    #[test]
    fn unsupported_values_are_removed() {
        let mut state = State::new(1e-6);
        let x = state.new_sparse_variable((0..=5).collect());
        let y = state.new_sparse_variable((0..=5).collect());

        table([x, y], [vec![1, 2], vec![3, 4]])
            .post(&mut state)
            .expect("feasible");

        assert_eq!(1, state.lower_bound(&x));
        assert_eq!(3, state.upper_bound(&x));
        assert!(!state.contains(&x, 2));
        assert!(!state.contains(&y, 3));
    }
}

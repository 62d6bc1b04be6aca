use super::add_propagator;
use super::Constraint;
use crate::basic_types::ConstraintOperationError;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::State;
use crate::propagators::ElementArgs;

/// Creates the [`Constraint`] `array[index] = rhs`. The array is indexed from zero.
pub fn element<ElementVar, Index, Rhs>(
    index: Index,
    array: impl IntoIterator<Item = ElementVar>,
    rhs: Rhs,
) -> Element<ElementVar, Index, Rhs>
where
    ElementVar: IntegerVariable,
    Index: IntegerVariable,
    Rhs: IntegerVariable,
{
    Element {
        array: array.into_iter().collect(),
        index,
        rhs,
    }
}

#[derive(Clone, Debug)]
pub struct Element<ElementVar, Index, Rhs> {
    array: Box<[ElementVar]>,
    index: Index,
    rhs: Rhs,
}

impl<ElementVar, Index, Rhs> Element<ElementVar, Index, Rhs>
where
    ElementVar: IntegerVariable,
    Index: IntegerVariable,
    Rhs: IntegerVariable,
{
    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        state.check_ownership(self.array.iter())?;
        state.check_ownership([&self.index])?;
        state.check_ownership([&self.rhs])?;
        state.check_ownership(reification_literal.iter())?;

        add_propagator(
            state,
            ElementArgs {
                array: self.array.clone(),
                index: self.index.clone(),
                rhs: self.rhs.clone(),
            },
            reification_literal,
        )
    }
}

impl<ElementVar, Index, Rhs> Constraint for Element<ElementVar, Index, Rhs>
where
    ElementVar: IntegerVariable,
    Index: IntegerVariable,
    Rhs: IntegerVariable,
{
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
    fn index_is_restricted_to_matching_elements() {
        let mut state = State::new(1e-6);
        let array = [
            state.new_interval_variable(5, 5),
            state.new_interval_variable(7, 7),
            state.new_interval_variable(9, 9),
        ];
        let index = state.new_interval_variable(-3, 10);
        let rhs = state.new_interval_variable(6, 9);

        element(index, array, rhs)
            .post(&mut state)
            .expect("feasible");

        assert_eq!(1, state.lower_bound(&index));
        assert_eq!(2, state.upper_bound(&index));
        assert_eq!(7, state.lower_bound(&rhs));
    }
}

use crate::basic_types::PropagationStatus;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainEvents;
use crate::predicate;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

#[derive(Clone, Debug)]
pub(crate) struct CountArgs<Var, Rhs> {
    pub(crate) variables: Box<[Var]>,
    pub(crate) value: i32,
    pub(crate) rhs: Rhs,
}

impl<Var, Rhs> PropagatorConstructor for CountArgs<Var, Rhs>
where
    Var: IntegerVariable,
    Rhs: IntegerVariable,
{
    type PropagatorImpl = CountPropagator<Var, Rhs>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let CountArgs {
            variables,
            value,
            rhs,
        } = self;

        for (index, variable) in variables.iter().enumerate() {
            context.register(
                variable.clone(),
                DomainEvents::ANY_INT,
                LocalId::from(index as u32),
            );
        }
        context.register(
            rhs.clone(),
            DomainEvents::BOUNDS,
            LocalId::from(variables.len() as u32),
        );

        CountPropagator {
            variables,
            value,
            rhs,
        }
    }
}

/// Propagator for `rhs = |{ i | x_i = value }|`.
#[derive(Clone, Debug)]
pub(crate) struct CountPropagator<Var, Rhs> {
    variables: Box<[Var]>,
    value: i32,
    rhs: Rhs,
}

impl<Var, Rhs> Propagator for CountPropagator<Var, Rhs>
where
    Var: IntegerVariable,
    Rhs: IntegerVariable,
{
    fn name(&self) -> &str {
        "Count"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let value = self.value;

        let num_fixed_to_value = self
            .variables
            .iter()
            .filter(|variable| context.fixed_value(*variable) == Some(value))
            .count() as i32;
        let num_possible = self
            .variables
            .iter()
            .filter(|variable| context.contains(*variable, value))
            .count() as i32;

        let rhs = &self.rhs;
        context.post(predicate![rhs >= num_fixed_to_value])?;
        context.post(predicate![rhs <= num_possible])?;

        if num_fixed_to_value == num_possible {
            return Ok(());
        }

        if context.upper_bound(&self.rhs) == num_fixed_to_value {
            // All occurrences are accounted for; no other variable can take the value.
            for variable in self.variables.iter() {
                if !context.is_fixed(variable) {
                    context.post(predicate![variable != value])?;
                }
            }
        } else if context.lower_bound(&self.rhs) == num_possible {
            // Every variable which can take the value has to.
            for variable in self.variables.iter() {
                if context.contains(variable, value) {
                    context.post(predicate![variable == value])?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn rhs_is_bounded_by_fixed_and_possible_occurrences() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 2);
        let y = solver.new_variable(0, 5);
        let z = solver.new_variable(3, 5);
        let rhs = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(CountArgs {
                variables: [x, y, z].into(),
                value: 2,
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(rhs, 1, 2);
    }

    #[test]
    fn saturated_count_removes_the_value_elsewhere() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 2);
        let y = solver.new_sparse_variable(vec![1, 2, 3]);
        let z = solver.new_variable(2, 5);
        let rhs = solver.new_variable(1, 1);

        let _ = solver
            .new_propagator(CountArgs {
                variables: [x, y, z].into(),
                value: 2,
                rhs,
            })
            .expect("no empty domains");

        assert!(!solver.contains(y, 2));
        solver.assert_bounds(z, 3, 5);
    }

    #[test]
    fn required_count_forces_the_value() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 1);
        let y = solver.new_variable(1, 4);
        let z = solver.new_variable(5, 6);
        let rhs = solver.new_variable(2, 3);

        let _ = solver
            .new_propagator(CountArgs {
                variables: [x, y, z].into(),
                value: 1,
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(x, 1, 1);
        solver.assert_bounds(y, 1, 1);
        solver.assert_bounds(rhs, 2, 2);
    }

    #[test]
    fn repropagation_at_the_fixed_point_changes_nothing() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 2);
        let y = solver.new_sparse_variable(vec![1, 2, 3]);
        let z = solver.new_variable(0, 5);
        let rhs = solver.new_variable(0, 3);

        let _ = solver
            .new_propagator(CountArgs {
                variables: [x, y, z].into(),
                value: 2,
                rhs,
            })
            .expect("no empty domains");
        solver.set_upper_bound(rhs, 1).expect("non-empty domain");

        solver.assert_repropagation_changes_nothing();
    }
}

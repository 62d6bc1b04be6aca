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
pub(crate) struct MaximumArgs<ElementVar, Rhs> {
    pub(crate) array: Box<[ElementVar]>,
    pub(crate) rhs: Rhs,
}

impl<ElementVar, Rhs> PropagatorConstructor for MaximumArgs<ElementVar, Rhs>
where
    ElementVar: IntegerVariable,
    Rhs: IntegerVariable,
{
    type PropagatorImpl = MaximumPropagator<ElementVar, Rhs>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let MaximumArgs { array, rhs } = self;

        for (idx, var) in array.iter().enumerate() {
            context.register(var.clone(), DomainEvents::BOUNDS, LocalId::from(idx as u32));
        }

        context.register(
            rhs.clone(),
            DomainEvents::BOUNDS,
            LocalId::from(array.len() as u32),
        );

        MaximumPropagator { array, rhs }
    }
}

/// Bounds-consistent propagator which enforces `max(array) = rhs`. Can be constructed through
/// [`MaximumArgs`].
#[derive(Clone, Debug)]
pub(crate) struct MaximumPropagator<ElementVar, Rhs> {
    array: Box<[ElementVar]>,
    rhs: Rhs,
}

impl<ElementVar, Rhs> Propagator for MaximumPropagator<ElementVar, Rhs>
where
    ElementVar: IntegerVariable,
    Rhs: IntegerVariable,
{
    fn priority(&self) -> Priority {
        Priority::High
    }

    fn name(&self) -> &str {
        "Maximum"
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        // max(a_0, a_1, ..., a_{n-1}) = rhs
        let rhs_ub = context.upper_bound(&self.rhs);
        let mut max_ub = i32::MIN;
        let mut max_lb = i32::MIN;
        for var in self.array.iter() {
            // UB(a_i) <= UB(rhs)
            context.post(predicate![var <= rhs_ub])?;

            max_lb = max_lb.max(context.lower_bound(var));
            max_ub = max_ub.max(context.upper_bound(var));
        }

        // LB(rhs) >= max{LB(a_i)}
        let rhs = &self.rhs;
        context.post(predicate![rhs >= max_lb])?;

        // UB(rhs) <= max{UB(a_i)}, which also detects that no element can reach LB(rhs).
        context.post(predicate![rhs <= max_ub])?;

        // If exactly one element can reach LB(rhs), that element must be the maximum.
        let rhs_lb = context.lower_bound(&self.rhs);
        let mut candidates = self
            .array
            .iter()
            .filter(|var| context.upper_bound(*var) >= rhs_lb);
        if let (Some(propagating_variable), None) = (candidates.next(), candidates.next()) {
            context.post(predicate![propagating_variable >= rhs_lb])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn upper_bound_of_rhs_bounds_the_array() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(1, 3);
        let b = solver.new_variable(2, 4);
        let c = solver.new_variable(3, 5);

        let rhs = solver.new_variable(0, 4);

        let _ = solver
            .new_propagator(MaximumArgs {
                array: [a, b, c].into(),
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(a, 1, 3);
        solver.assert_bounds(b, 2, 4);
        solver.assert_bounds(c, 3, 4);
        solver.assert_bounds(rhs, 3, 4);
    }

    #[test]
    fn single_supporting_element_takes_the_lower_bound_of_rhs() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(1, 2);
        let b = solver.new_variable(0, 9);
        let rhs = solver.new_variable(5, 9);

        let _ = solver
            .new_propagator(MaximumArgs {
                array: [a, b].into(),
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(b, 5, 9);
    }

    #[test]
    fn unreachable_rhs_fails() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(1, 2);
        let b = solver.new_variable(0, 3);
        let rhs = solver.new_variable(4, 9);

        let result = solver.new_propagator(MaximumArgs {
            array: [a, b].into(),
            rhs,
        });

        assert!(result.is_err());
    }
}

//! Contains the propagator for the [Element](https://sofdem.github.io/gccat/gccat/Celement.html)
//! constraint.
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
pub(crate) struct ElementArgs<VX, VI, VE> {
    pub(crate) array: Box<[VX]>,
    pub(crate) index: VI,
    pub(crate) rhs: VE,
}

const ID_INDEX: LocalId = LocalId::from(0);
const ID_RHS: LocalId = LocalId::from(1);

// local ids of array vars are shifted by ID_X_OFFSET
const ID_X_OFFSET: u32 = 2;

impl<VX, VI, VE> PropagatorConstructor for ElementArgs<VX, VI, VE>
where
    VX: IntegerVariable,
    VI: IntegerVariable,
    VE: IntegerVariable,
{
    type PropagatorImpl = ElementPropagator<VX, VI, VE>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let ElementArgs { array, index, rhs } = self;

        for (i, x_i) in array.iter().enumerate() {
            context.register(
                x_i.clone(),
                DomainEvents::BOUNDS,
                LocalId::from(i as u32 + ID_X_OFFSET),
            );
        }

        context.register(index.clone(), DomainEvents::ANY_INT, ID_INDEX);
        context.register(rhs.clone(), DomainEvents::BOUNDS, ID_RHS);

        ElementPropagator { array, index, rhs }
    }
}

/// Bounds propagator for `element([x_1, ..., x_n], i, e)`, which holds iff `x_i = e`.
///
/// Note that this propagator is 0-indexed.
#[derive(Clone, Debug)]
pub(crate) struct ElementPropagator<VX, VI, VE> {
    array: Box<[VX]>,
    index: VI,
    rhs: VE,
}

impl<VX, VI, VE> Propagator for ElementPropagator<VX, VI, VE>
where
    VX: IntegerVariable,
    VI: IntegerVariable,
    VE: IntegerVariable,
{
    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn name(&self) -> &str {
        "Element"
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.propagate_index_bounds_within_array(&mut context)?;

        self.propagate_index_based_on_intersection_with_rhs(&mut context)?;

        self.propagate_rhs_bounds_based_on_array(&mut context)?;

        if let Some(idx) = context.fixed_value(&self.index) {
            self.propagate_equality(&mut context, idx)?;
        }

        Ok(())
    }
}

impl<VX, VI, VE> ElementPropagator<VX, VI, VE>
where
    VX: IntegerVariable,
    VI: IntegerVariable,
    VE: IntegerVariable,
{
    /// Propagate the bounds of `self.index` to be in the range `[0, self.array.len())`.
    fn propagate_index_bounds_within_array(
        &self,
        context: &mut PropagationContext<'_>,
    ) -> PropagationStatus {
        let index = &self.index;
        context.post(predicate![index >= 0])?;
        context.post(predicate![index <= self.array.len() as i32 - 1])?;
        Ok(())
    }

    /// An index is removed when the bounds of its element do not intersect the bounds of the
    /// right-hand side.
    fn propagate_index_based_on_intersection_with_rhs(
        &self,
        context: &mut PropagationContext<'_>,
    ) -> PropagationStatus {
        let rhs_lb = context.lower_bound(&self.rhs);
        let rhs_ub = context.upper_bound(&self.rhs);

        for (i, element) in self.array.iter().enumerate() {
            let i = i as i32;
            if !context.contains(&self.index, i) {
                continue;
            }

            if context.upper_bound(element) < rhs_lb || context.lower_bound(element) > rhs_ub {
                let index = &self.index;
                context.post(predicate![index != i])?;
            }
        }

        Ok(())
    }

    /// The lower bound (resp. upper bound) of the right-hand side can be the minimum lower
    /// bound (res. maximum upper bound) of the elements.
    fn propagate_rhs_bounds_based_on_array(
        &self,
        context: &mut PropagationContext<'_>,
    ) -> PropagationStatus {
        let (rhs_lb, rhs_ub) = self
            .array
            .iter()
            .enumerate()
            .filter(|(idx, _)| context.contains(&self.index, *idx as i32))
            .fold((i32::MAX, i32::MIN), |(rhs_lb, rhs_ub), (_, element)| {
                (
                    i32::min(rhs_lb, context.lower_bound(element)),
                    i32::max(rhs_ub, context.upper_bound(element)),
                )
            });

        let rhs = &self.rhs;
        context.post(predicate![rhs >= rhs_lb])?;
        context.post(predicate![rhs <= rhs_ub])?;

        Ok(())
    }

    /// Once the index is fixed, the selected element and the right-hand side share bounds.
    fn propagate_equality(
        &self,
        context: &mut PropagationContext<'_>,
        index: i32,
    ) -> PropagationStatus {
        let element = &self.array[index as usize];
        let rhs = &self.rhs;

        let rhs_lb = context.lower_bound(rhs);
        let rhs_ub = context.upper_bound(rhs);
        context.post(predicate![element >= rhs_lb])?;
        context.post(predicate![element <= rhs_ub])?;

        let element_lb = context.lower_bound(element);
        let element_ub = context.upper_bound(element);
        context.post(predicate![rhs >= element_lb])?;
        context.post(predicate![rhs <= element_ub])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn index_is_restricted_to_the_array() {
        let mut solver = TestSolver::default();
        let array = [solver.new_variable(0, 9), solver.new_variable(0, 9)];
        let index = solver.new_variable(-5, 5);
        let rhs = solver.new_variable(0, 9);

        let _ = solver
            .new_propagator(ElementArgs {
                array: array.into(),
                index,
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(index, 0, 1);
    }

    #[test]
    fn rhs_is_bounded_by_the_selectable_elements() {
        let mut solver = TestSolver::default();
        let array = [
            solver.new_variable(3, 3),
            solver.new_variable(5, 7),
            solver.new_variable(20, 30),
        ];
        let index = solver.new_variable(0, 1);
        let rhs = solver.new_variable(0, 100);

        let _ = solver
            .new_propagator(ElementArgs {
                array: array.into(),
                index,
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(rhs, 3, 7);
    }

    #[test]
    fn incompatible_elements_are_removed_from_the_index() {
        let mut solver = TestSolver::default();
        let array = [
            solver.new_variable(3, 3),
            solver.new_variable(5, 7),
            solver.new_variable(20, 30),
        ];
        let index = solver.new_sparse_variable(vec![0, 1, 2]);
        let rhs = solver.new_variable(6, 25);

        let _ = solver
            .new_propagator(ElementArgs {
                array: array.into(),
                index,
                rhs,
            })
            .expect("no empty domains");

        assert!(!solver.contains(index, 0));
        assert!(solver.contains(index, 1));
        assert!(solver.contains(index, 2));
    }

    #[test]
    fn fixed_index_links_element_and_rhs() {
        let mut solver = TestSolver::default();
        let array = [solver.new_variable(0, 10), solver.new_variable(0, 10)];
        let index = solver.new_variable(1, 1);
        let rhs = solver.new_variable(4, 6);

        let _ = solver
            .new_propagator(ElementArgs {
                array: array.into(),
                index,
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(array[1], 4, 6);
        solver.assert_bounds(array[0], 0, 10);
    }

    #[test]
    fn repropagation_at_the_fixed_point_changes_nothing() {
        let mut solver = TestSolver::default();
        let array = [
            solver.new_variable(3, 3),
            solver.new_variable(5, 7),
            solver.new_variable(20, 30),
        ];
        let index = solver.new_variable(0, 2);
        let rhs = solver.new_variable(0, 100);

        let _ = solver
            .new_propagator(ElementArgs {
                array: array.into(),
                index,
                rhs,
            })
            .expect("no empty domains");
        solver.set_upper_bound(rhs, 10).expect("non-empty domain");

        solver.assert_repropagation_changes_nothing();
    }
}

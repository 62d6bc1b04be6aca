use crate::basic_types::Inconsistency;
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
pub(crate) struct AllDifferentArgs<Var> {
    pub(crate) variables: Box<[Var]>,
}

impl<Var: IntegerVariable> PropagatorConstructor for AllDifferentArgs<Var> {
    type PropagatorImpl = AllDifferentPropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for (index, variable) in self.variables.iter().enumerate() {
            context.register(
                variable.clone(),
                DomainEvents::ANY_INT,
                LocalId::from(index as u32),
            );
        }

        AllDifferentPropagator {
            variables: self.variables,
        }
    }
}

/// Propagator for `x_i != x_j` for all `i != j`.
///
/// Values of fixed variables are removed from all other variables until no more variables become
/// fixed. Afterwards the bounds are filtered with Hall intervals: if `k` variables have their
/// domains inside an interval of `k` values, the other variables are pushed out of that interval.
#[derive(Clone, Debug)]
pub(crate) struct AllDifferentPropagator<Var> {
    variables: Box<[Var]>,
}

impl<Var: IntegerVariable> AllDifferentPropagator<Var> {
    /// Removes the values of fixed variables from the other variables. Returns whether anything
    /// changed.
    fn propagate_singletons(&self, context: &mut PropagationContext) -> Result<bool, Inconsistency> {
        let mut changed = false;
        let mut processed = vec![false; self.variables.len()];

        loop {
            let Some((index, value)) = self
                .variables
                .iter()
                .enumerate()
                .filter(|(index, _)| !processed[*index])
                .find_map(|(index, variable)| {
                    context.fixed_value(variable).map(|value| (index, value))
                })
            else {
                return Ok(changed);
            };
            processed[index] = true;

            for (other_index, other) in self.variables.iter().enumerate() {
                if other_index == index || !context.contains(other, value) {
                    continue;
                }
                if context.is_fixed(other) {
                    return Err(Inconsistency::Failure);
                }

                context.post(predicate![other != value])?;
                changed = true;
            }
        }
    }

    /// Filters bounds using the Hall intervals spanned by the bounds of the variables. Returns
    /// whether anything changed.
    fn propagate_hall_intervals(
        &self,
        context: &mut PropagationContext,
    ) -> Result<bool, Inconsistency> {
        let bounds = self
            .variables
            .iter()
            .map(|variable| (context.lower_bound(variable), context.upper_bound(variable)))
            .collect::<Vec<_>>();

        for &(interval_lower, _) in bounds.iter() {
            for &(_, interval_upper) in bounds.iter() {
                if interval_upper < interval_lower {
                    continue;
                }

                let capacity = interval_upper as i64 - interval_lower as i64 + 1;
                let num_inside = bounds
                    .iter()
                    .filter(|(lb, ub)| *lb >= interval_lower && *ub <= interval_upper)
                    .count() as i64;

                if num_inside > capacity {
                    return Err(Inconsistency::Failure);
                }
                if num_inside < capacity {
                    continue;
                }

                let mut changed = false;
                for (variable, &(lb, ub)) in self.variables.iter().zip(bounds.iter()) {
                    if lb >= interval_lower && ub <= interval_upper {
                        continue;
                    }

                    if lb >= interval_lower && lb <= interval_upper {
                        context.post(predicate![variable >= interval_upper + 1])?;
                        changed = true;
                    }
                    if ub >= interval_lower && ub <= interval_upper {
                        context.post(predicate![variable <= interval_lower - 1])?;
                        changed = true;
                    }
                }

                if changed {
                    // The bounds are stale; the caller restarts from the new domains.
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }
}

impl<Var: IntegerVariable> Propagator for AllDifferentPropagator<Var> {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        loop {
            let singletons_changed = self.propagate_singletons(&mut context)?;
            let bounds_changed = self.propagate_hall_intervals(&mut context)?;

            if !singletons_changed && !bounds_changed {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn fixed_values_are_removed_from_other_variables() {
        let mut solver = TestSolver::default();
        let x = solver.new_sparse_variable(vec![1, 2, 3]);
        let y = solver.new_sparse_variable(vec![1, 2, 3]);
        let z = solver.new_variable(2, 2);

        let _ = solver
            .new_propagator(AllDifferentArgs {
                variables: [x, y, z].into(),
            })
            .expect("no empty domains");

        assert!(!solver.contains(x, 2));
        assert!(!solver.contains(y, 2));
    }

    #[test]
    fn singletons_cascade_to_a_fixed_point() {
        let mut solver = TestSolver::default();
        let x = solver.new_sparse_variable(vec![1, 2]);
        let y = solver.new_sparse_variable(vec![2, 3]);
        let z = solver.new_variable(1, 1);

        let _ = solver
            .new_propagator(AllDifferentArgs {
                variables: [x, y, z].into(),
            })
            .expect("no empty domains");

        solver.assert_bounds(x, 2, 2);
        solver.assert_bounds(y, 3, 3);
    }

    #[test]
    fn hall_interval_pushes_other_bounds() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 2);
        let y = solver.new_variable(1, 2);
        let z = solver.new_variable(1, 4);

        let _ = solver
            .new_propagator(AllDifferentArgs {
                variables: [x, y, z].into(),
            })
            .expect("no empty domains");

        solver.assert_bounds(z, 3, 4);
    }

    #[test]
    fn pigeonhole_is_detected() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 2);
        let y = solver.new_variable(1, 2);
        let z = solver.new_variable(1, 2);

        let result = solver.new_propagator(AllDifferentArgs {
            variables: [x, y, z].into(),
        });

        assert!(result.is_err());
    }

    #[test]
    fn equal_fixed_values_fail() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let y = solver.new_variable(0, 5);

        let _ = solver
            .new_propagator(AllDifferentArgs {
                variables: [x, y].into(),
            })
            .expect("no empty domains");

        solver.set_lower_bound(x, 5).expect("non-empty domain");
        solver.assert_bounds(y, 0, 4);
        assert!(solver.set_lower_bound(y, 4).is_ok());
        assert!(solver.set_upper_bound(y, 3).is_err());
    }

    #[test]
    fn repropagation_at_the_fixed_point_changes_nothing() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 2);
        let y = solver.new_variable(1, 2);
        let z = solver.new_variable(1, 4);
        let w = solver.new_sparse_variable(vec![1, 3, 5]);

        let _ = solver
            .new_propagator(AllDifferentArgs {
                variables: [x, y, z, w].into(),
            })
            .expect("no empty domains");
        solver.set_lower_bound(z, 4).expect("non-empty domain");

        solver.assert_repropagation_changes_nothing();
    }
}

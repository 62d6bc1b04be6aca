use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::RealVariable;
use crate::engine::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::HasDomains;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`RealLinearLessOrEqualPropagator`].
#[derive(Clone, Debug)]
pub(crate) struct RealLinearLessOrEqualArgs {
    pub(crate) terms: Box<[(f64, RealVariable)]>,
    pub(crate) rhs: f64,
}

impl PropagatorConstructor for RealLinearLessOrEqualArgs {
    type PropagatorImpl = RealLinearLessOrEqualPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for (index, &(_, variable)) in self.terms.iter().enumerate() {
            context.register_real(variable, DomainEvents::BOUNDS, LocalId::from(index as u32));
        }

        RealLinearLessOrEqualPropagator {
            terms: self.terms,
            rhs: self.rhs,
        }
    }
}

/// Propagator for `\sum a_i * r_i <= rhs` over real variables.
#[derive(Clone, Debug)]
pub(crate) struct RealLinearLessOrEqualPropagator {
    terms: Box<[(f64, RealVariable)]>,
    rhs: f64,
}

impl RealLinearLessOrEqualPropagator {
    /// The smallest value `coefficient * variable` can take.
    fn minimum_of_term<Context: ReadDomains>(
        context: &Context,
        coefficient: f64,
        variable: RealVariable,
    ) -> f64 {
        if coefficient >= 0.0 {
            coefficient * context.real_lower_bound(variable)
        } else {
            coefficient * context.real_upper_bound(variable)
        }
    }

    fn minimum_left_hand_side<Context: ReadDomains>(&self, context: &Context) -> f64 {
        self.terms
            .iter()
            .map(|&(coefficient, variable)| Self::minimum_of_term(context, coefficient, variable))
            .sum()
    }
}

impl Propagator for RealLinearLessOrEqualPropagator {
    fn name(&self) -> &str {
        "RealLinearLeq"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn detect_inconsistency(&self, domains: Domains) -> Option<Inconsistency> {
        let tolerance = domains.domain_store().real_precision();
        (self.minimum_left_hand_side(&domains) > self.rhs + tolerance)
            .then_some(Inconsistency::Failure)
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if let Some(inconsistency) = self.detect_inconsistency(context.domains()) {
            return Err(inconsistency);
        }

        let minimum = self.minimum_left_hand_side(&context);

        for &(coefficient, variable) in self.terms.iter() {
            if coefficient == 0.0 {
                continue;
            }

            let slack =
                self.rhs - (minimum - Self::minimum_of_term(&context, coefficient, variable));
            let bound = slack / coefficient;

            if coefficient > 0.0 {
                context.set_real_upper_bound(variable, bound)?;
            } else {
                context.set_real_lower_bound(variable, bound)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    fn assert_close(expected: f64, actual: f64) {
        assert!(
            (expected - actual).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn upper_bounds_are_propagated() {
        let mut solver = TestSolver::default();
        let x = solver.new_real_variable(1.0, 5.0);
        let y = solver.new_real_variable(0.0, 10.0);

        // x + 2y <= 7
        let _ = solver
            .new_propagator(RealLinearLessOrEqualArgs {
                terms: [(1.0, x), (2.0, y)].into(),
                rhs: 7.0,
            })
            .expect("no empty domains");

        let (_, x_ub) = solver.real_bounds(x);
        let (_, y_ub) = solver.real_bounds(y);
        assert_close(5.0, x_ub);
        assert_close(3.0, y_ub);
    }

    #[test]
    fn negative_coefficients_propagate_lower_bounds() {
        let mut solver = TestSolver::default();
        let x = solver.new_real_variable(0.0, 4.0);
        let y = solver.new_real_variable(0.0, 10.0);

        // x - y <= -2.5
        let _ = solver
            .new_propagator(RealLinearLessOrEqualArgs {
                terms: [(1.0, x), (-1.0, y)].into(),
                rhs: -2.5,
            })
            .expect("no empty domains");

        let (y_lb, _) = solver.real_bounds(y);
        assert_close(2.5, y_lb);
        let (_, x_ub) = solver.real_bounds(x);
        assert_close(4.0, x_ub);
    }

    #[test]
    fn infeasible_sum_fails() {
        let mut solver = TestSolver::default();
        let x = solver.new_real_variable(3.0, 5.0);
        let y = solver.new_real_variable(3.0, 10.0);

        let result = solver.new_propagator(RealLinearLessOrEqualArgs {
            terms: [(1.0, x), (1.0, y)].into(),
            rhs: 5.0,
        });

        assert!(result.is_err());
    }
}

use crate::basic_types::PropagationStatus;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::RealVariable;
use crate::engine::DomainEvents;
use crate::predicate;
use crate::propagation::HasDomains;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

#[derive(Clone, Debug)]
pub(crate) struct IntegerChannelArgs<Var> {
    pub(crate) integer: Var,
    pub(crate) real: RealVariable,
}

const ID_INTEGER: LocalId = LocalId::from(0);
const ID_REAL: LocalId = LocalId::from(1);

impl<Var: IntegerVariable> PropagatorConstructor for IntegerChannelArgs<Var> {
    type PropagatorImpl = IntegerChannelPropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.integer.clone(), DomainEvents::BOUNDS, ID_INTEGER);
        context.register_real(self.real, DomainEvents::BOUNDS, ID_REAL);

        IntegerChannelPropagator {
            integer: self.integer,
            real: self.real,
        }
    }
}

/// Propagator for `real = integer`, linking the bounds of a real variable to those of an integer
/// variable.
#[derive(Clone, Debug)]
pub(crate) struct IntegerChannelPropagator<Var> {
    integer: Var,
    real: RealVariable,
}

impl<Var: IntegerVariable> Propagator for IntegerChannelPropagator<Var> {
    fn name(&self) -> &str {
        "IntegerChannel"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let precision = context.domain_store().real_precision();

        // Real bounds within the precision of an integer round to that integer.
        let lower_bound = (context.real_lower_bound(self.real) - precision).ceil();
        let upper_bound = (context.real_upper_bound(self.real) + precision).floor();
        let integer = &self.integer;
        if lower_bound > i32::MIN as f64 {
            context.post(predicate![integer >= lower_bound.min(i32::MAX as f64) as i32])?;
        }
        if upper_bound < i32::MAX as f64 {
            context.post(predicate![integer <= upper_bound.max(i32::MIN as f64) as i32])?;
        }

        let integer_lower_bound = context.lower_bound(&self.integer) as f64;
        let integer_upper_bound = context.upper_bound(&self.integer) as f64;
        context.set_real_lower_bound(self.real, integer_lower_bound)?;
        context.set_real_upper_bound(self.real, integer_upper_bound)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn real_bounds_are_rounded_into_the_integer() {
        let mut solver = TestSolver::default();
        let integer = solver.new_variable(-10, 10);
        let real = solver.new_real_variable(-2.5, 3.7);

        let _ = solver
            .new_propagator(IntegerChannelArgs { integer, real })
            .expect("no empty domains");

        solver.assert_bounds(integer, -2, 3);
        assert_eq!((-2.0, 3.0), solver.real_bounds(real));
    }

    #[test]
    fn integer_changes_reach_the_real() {
        let mut solver = TestSolver::default();
        let integer = solver.new_variable(0, 10);
        let real = solver.new_real_variable(0.0, 10.0);

        let _ = solver
            .new_propagator(IntegerChannelArgs { integer, real })
            .expect("no empty domains");

        solver.set_lower_bound(integer, 4).expect("non-empty domain");
        assert_eq!((4.0, 10.0), solver.real_bounds(real));
    }

    #[test]
    fn real_without_integer_values_fails() {
        let mut solver = TestSolver::default();
        let integer = solver.new_variable(0, 10);
        let real = solver.new_real_variable(2.2, 2.8);

        let result = solver.new_propagator(IntegerChannelArgs { integer, real });

        assert!(result.is_err());
    }
}

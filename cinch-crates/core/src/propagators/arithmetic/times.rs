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
pub(crate) struct TimesArgs<VA, VB, VC> {
    pub(crate) a: VA,
    pub(crate) b: VB,
    pub(crate) c: VC,
}

const ID_A: LocalId = LocalId::from(0);
const ID_B: LocalId = LocalId::from(1);
const ID_C: LocalId = LocalId::from(2);

impl<VA, VB, VC> PropagatorConstructor for TimesArgs<VA, VB, VC>
where
    VA: IntegerVariable,
    VB: IntegerVariable,
    VC: IntegerVariable,
{
    type PropagatorImpl = TimesPropagator<VA, VB, VC>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let TimesArgs { a, b, c } = self;

        context.register(a.clone(), DomainEvents::BOUNDS, ID_A);
        context.register(b.clone(), DomainEvents::BOUNDS, ID_B);
        context.register(c.clone(), DomainEvents::BOUNDS, ID_C);

        TimesPropagator { a, b, c }
    }
}

/// Bounds propagator for `a * b = c`, using interval arithmetic over all sign combinations.
#[derive(Clone, Debug)]
pub(crate) struct TimesPropagator<VA, VB, VC> {
    a: VA,
    b: VB,
    c: VC,
}

impl<VA, VB, VC> Propagator for TimesPropagator<VA, VB, VC>
where
    VA: IntegerVariable,
    VB: IntegerVariable,
    VC: IntegerVariable,
{
    fn name(&self) -> &str {
        "IntTimes"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let a = (context.lower_bound(&self.a), context.upper_bound(&self.a));
        let b = (context.lower_bound(&self.b), context.upper_bound(&self.b));

        let (product_min, product_max) = product(a, b);
        let c = &self.c;
        context.post(predicate![c >= to_bound(product_min)?])?;
        context.post(predicate![c <= to_bound(product_max)?])?;

        let c_bounds = (context.lower_bound(&self.c), context.upper_bound(&self.c));

        if let Some((min, max)) = quotient(c_bounds, b) {
            let a = &self.a;
            context.post(predicate![a >= to_bound(min)?])?;
            context.post(predicate![a <= to_bound(max)?])?;
        }

        let a_bounds = (context.lower_bound(&self.a), context.upper_bound(&self.a));
        if let Some((min, max)) = quotient(c_bounds, a_bounds) {
            let b = &self.b;
            context.post(predicate![b >= to_bound(min)?])?;
            context.post(predicate![b <= to_bound(max)?])?;
        }

        Ok(())
    }
}

/// Clamps a bound computed in `i64` to the domain of `i32`; a bound which does not fit at all
/// means no value is possible.
fn to_bound(value: i64) -> Result<i32, Inconsistency> {
    if value > i32::MAX as i64 || value < i32::MIN as i64 {
        return Err(Inconsistency::Failure);
    }
    Ok(value as i32)
}

fn product((a_min, a_max): (i32, i32), (b_min, b_max): (i32, i32)) -> (i64, i64) {
    let corners = [
        a_min as i64 * b_min as i64,
        a_min as i64 * b_max as i64,
        a_max as i64 * b_min as i64,
        a_max as i64 * b_max as i64,
    ];

    (
        corners.iter().copied().min().unwrap_or(0),
        corners.iter().copied().max().unwrap_or(0),
    )
}

/// The integer hull of `numerator / denominator`, or [`None`] when the denominator interval
/// contains zero.
fn quotient(
    (n_min, n_max): (i32, i32),
    (d_min, d_max): (i32, i32),
) -> Option<(i64, i64)> {
    if d_min <= 0 && d_max >= 0 {
        return None;
    }

    let mut min = i64::MAX;
    let mut max = i64::MIN;
    for numerator in [n_min as i64, n_max as i64] {
        for denominator in [d_min as i64, d_max as i64] {
            min = min.min(div_ceil(numerator, denominator));
            max = max.max(div_floor(numerator, denominator));
        }
    }

    Some((min, max))
}

fn div_floor(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if numerator % denominator != 0 && ((numerator < 0) != (denominator < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

fn div_ceil(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if numerator % denominator != 0 && ((numerator < 0) == (denominator < 0)) {
        quotient + 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn product_bounds_are_propagated() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(2, 3);
        let b = solver.new_variable(-4, 5);
        let c = solver.new_variable(-100, 100);

        let _ = solver
            .new_propagator(TimesArgs { a, b, c })
            .expect("no empty domains");

        solver.assert_bounds(c, -12, 15);
    }

    #[test]
    fn factors_are_tightened_by_division() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 10);
        let b = solver.new_variable(3, 4);
        let c = solver.new_variable(7, 9);

        let _ = solver
            .new_propagator(TimesArgs { a, b, c })
            .expect("no empty domains");

        // 7 / 4 rounds up to 2, 9 / 3 rounds down to 3.
        solver.assert_bounds(a, 2, 3);
        solver.assert_bounds(b, 3, 4);
        solver.assert_bounds(c, 7, 9);
    }

    #[test]
    fn negative_factors_are_handled() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(-5, -1);
        let b = solver.new_variable(2, 2);
        let c = solver.new_variable(-3, 20);

        let _ = solver
            .new_propagator(TimesArgs { a, b, c })
            .expect("no empty domains");

        solver.assert_bounds(a, -1, -1);
        solver.assert_bounds(c, -2, -2);
    }

    #[test]
    fn wrong_fixed_product_fails() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(3, 3);
        let b = solver.new_variable(4, 4);
        let c = solver.new_variable(11, 11);

        let result = solver.new_propagator(TimesArgs { a, b, c });

        assert!(result.is_err());
    }

    #[test]
    fn rounding_division() {
        assert_eq!(-2, div_floor(-3, 2));
        assert_eq!(-1, div_ceil(-3, 2));
        assert_eq!(2, div_ceil(3, 2));
        assert_eq!(1, div_floor(3, 2));
        assert_eq!(-2, div_floor(3, -2));
    }
}

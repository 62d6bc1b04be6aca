use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainEvents;
use crate::predicate;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`LinearNotEqualPropagator`].
#[derive(Clone, Debug)]
pub(crate) struct LinearNotEqualPropagatorArgs<Var> {
    pub(crate) terms: Box<[Var]>,
    pub(crate) rhs: i32,
}

impl<Var> PropagatorConstructor for LinearNotEqualPropagatorArgs<Var>
where
    Var: IntegerVariable,
{
    type PropagatorImpl = LinearNotEqualPropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for (i, x_i) in self.terms.iter().enumerate() {
            context.register(x_i.clone(), DomainEvents::ASSIGN, LocalId::from(i as u32));
        }

        LinearNotEqualPropagator {
            terms: self.terms,
            rhs: self.rhs as i64,
        }
    }
}

/// Propagator for the constraint `\sum x_i != rhs`.
///
/// Nothing can be deduced until all but one of the terms are fixed; the last term then loses the
/// single value which would make the sum equal to `rhs`.
#[derive(Clone, Debug)]
pub(crate) struct LinearNotEqualPropagator<Var> {
    terms: Box<[Var]>,
    rhs: i64,
}

impl<Var: IntegerVariable> LinearNotEqualPropagator<Var> {
    /// Returns the sum of the fixed terms, and the index of the only unfixed term if there is
    /// exactly one. `None` means there are at least two unfixed terms.
    fn fixed_sum(&self, domains: &Domains) -> Option<(i64, Option<usize>)> {
        let mut sum = 0_i64;
        let mut unfixed = None;

        for (index, term) in self.terms.iter().enumerate() {
            match domains.fixed_value(term) {
                Some(value) => sum += value as i64,
                None if unfixed.is_none() => unfixed = Some(index),
                None => return None,
            }
        }

        Some((sum, unfixed))
    }
}

impl<Var> Propagator for LinearNotEqualPropagator<Var>
where
    Var: IntegerVariable,
{
    fn name(&self) -> &str {
        "LinearNe"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn detect_inconsistency(&self, domains: Domains) -> Option<Inconsistency> {
        match self.fixed_sum(&domains) {
            Some((sum, None)) if sum == self.rhs => Some(Inconsistency::Failure),
            _ => None,
        }
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let fixed_sum = self.fixed_sum(&context.domains());
        match fixed_sum {
            Some((sum, None)) if sum == self.rhs => Err(Inconsistency::Failure),
            Some((sum, Some(index))) => {
                let Ok(value) = i32::try_from(self.rhs - sum) else {
                    return Ok(());
                };
                let term = &self.terms[index];
                context.post(predicate![term != value])?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

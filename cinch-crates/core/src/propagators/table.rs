use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::containers::HashSet;
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

#[derive(Clone, Debug)]
pub(crate) struct TableArgs<Var> {
    pub(crate) variables: Box<[Var]>,
    /// Every row has exactly one value per variable.
    pub(crate) tuples: Box<[Box<[i32]>]>,
}

impl<Var: IntegerVariable> PropagatorConstructor for TableArgs<Var> {
    type PropagatorImpl = TablePropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for (index, variable) in self.variables.iter().enumerate() {
            context.register(
                variable.clone(),
                DomainEvents::ANY_INT,
                LocalId::from(index as u32),
            );
        }

        TablePropagator {
            variables: self.variables,
            tuples: self.tuples,
        }
    }
}

/// Propagator which restricts the variables to the supported rows of a table.
///
/// A row is supported when each of its values is still in the domain of the corresponding
/// variable; every value without a supported row is removed.
#[derive(Clone, Debug)]
pub(crate) struct TablePropagator<Var> {
    variables: Box<[Var]>,
    tuples: Box<[Box<[i32]>]>,
}

impl<Var: IntegerVariable> TablePropagator<Var> {
    fn is_supported(&self, domains: &Domains, tuple: &[i32]) -> bool {
        self.variables
            .iter()
            .zip(tuple)
            .all(|(variable, value)| domains.contains(variable, *value))
    }
}

impl<Var: IntegerVariable> Propagator for TablePropagator<Var> {
    fn name(&self) -> &str {
        "Table"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn detect_inconsistency(&self, domains: Domains) -> Option<Inconsistency> {
        let has_support = self
            .tuples
            .iter()
            .any(|tuple| self.is_supported(&domains, tuple));

        (!has_support).then_some(Inconsistency::Failure)
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let mut supports: Vec<HashSet<i32>> = vec![HashSet::default(); self.variables.len()];
        {
            let domains = context.domains();
            for tuple in self
                .tuples
                .iter()
                .filter(|tuple| self.is_supported(&domains, tuple))
            {
                for (support, value) in supports.iter_mut().zip(tuple.iter()) {
                    let _ = support.insert(*value);
                }
            }
        }

        for (variable, support) in self.variables.iter().zip(supports.iter()) {
            let (Some(&min), Some(&max)) = (support.iter().min(), support.iter().max()) else {
                return Err(Inconsistency::Failure);
            };

            context.post(predicate![variable >= min])?;
            context.post(predicate![variable <= max])?;

            let unsupported = context
                .iterate_domain(variable)
                .filter(|value| !support.contains(value))
                .collect::<Vec<_>>();
            for value in unsupported {
                context.post(predicate![variable != value])?;
            }
        }

        Ok(())
    }
}

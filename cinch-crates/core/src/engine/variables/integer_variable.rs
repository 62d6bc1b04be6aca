use std::fmt::Debug;

use enumset::EnumSet;

use super::ContextId;
use super::TransformableVariable;
use crate::basic_types::Solution;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::DomainEvent;
use crate::engine::DomainStore;
use crate::engine::Watchers;

/// A trait specifying the required behaviour of an integer variable such as retrieving a
/// lower-bound ([`IntegerVariable::lower_bound`]).
pub trait IntegerVariable:
    Clone + Debug + PredicateConstructor<Value = i32> + TransformableVariable<Self::AffineView> + 'static
{
    type AffineView: IntegerVariable;

    /// Get the lower bound of the variable.
    fn lower_bound(&self, domains: &DomainStore) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, domains: &DomainStore) -> i32;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, domains: &DomainStore, value: i32) -> bool;

    /// Iterate over the values of the domain.
    fn iterate_domain(&self, domains: &DomainStore) -> impl Iterator<Item = i32>;

    /// Register a watch for this variable on the given domain events.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>);

    /// Translate the events of the underlying domain into events of this variable.
    fn unpack_event(&self, events: EnumSet<DomainEvent>) -> EnumSet<DomainEvent>;

    /// The solver which created the underlying domain.
    fn context(&self) -> ContextId;

    /// The value of this variable in the given solution, if it is fixed there.
    fn solution_value(&self, solution: &Solution) -> Option<i32>;
}

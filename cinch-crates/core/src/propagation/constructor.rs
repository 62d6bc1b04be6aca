use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::RealVariable;
use crate::engine::DomainEvents;
use crate::engine::DomainStore;
use crate::engine::TrailedInteger;
use crate::engine::WatchLists;
use crate::engine::Watchers;
use crate::propagation::HasDomains;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be
/// enqueued. Additionally, the propagator can be initialized with values that come from the state
/// of the solver.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator + 'static;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// [`PropagatorConstructorContext`] is used when [`Propagator`]s are initialised after creation.
///
/// Propagators use it to register to domain changes of variables, to retrieve the current bounds
/// of variables, and to create trailed integers for their incremental state.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    domains: &'a mut DomainStore,
    watch_lists: &'a mut WatchLists,
    pub(crate) propagator_id: PropagatorId,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        domains: &'a mut DomainStore,
        watch_lists: &'a mut WatchLists,
    ) -> Self {
        PropagatorConstructorContext {
            domains,
            watch_lists,
            propagator_id,
        }
    }

    /// Subscribes the propagator to the given [`DomainEvents`].
    ///
    /// The domain events determine when [`Propagator::notify()`] will be called on the propagator.
    /// Each variable *must* have a unique [`LocalId`]; most often this is the index of the
    /// variable in the internal array of variables.
    pub fn register(
        &mut self,
        var: impl IntegerVariable,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };

        let mut watchers = Watchers::new(propagator_var, self.watch_lists, self.domains);
        var.watch_all(&mut watchers, domain_events.events());
    }

    /// Subscribes the propagator to the bounds of a real variable.
    pub fn register_real(
        &mut self,
        var: RealVariable,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };

        let mut watchers = Watchers::new(propagator_var, self.watch_lists, self.domains);
        watchers.watch_real(var, domain_events.events());
    }

    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.domains.new_trailed_integer(initial_value)
    }

    /// Reborrow the current context to a new value with a shorter lifetime. Should be used when
    /// passing `Self` to another function that takes ownership, but the value is still needed
    /// afterwards.
    pub fn reborrow(&mut self) -> PropagatorConstructorContext<'_> {
        PropagatorConstructorContext {
            domains: self.domains,
            watch_lists: self.watch_lists,
            propagator_id: self.propagator_id,
        }
    }
}

impl HasDomains for PropagatorConstructorContext<'_> {
    fn domain_store(&self) -> &DomainStore {
        self.domains
    }
}

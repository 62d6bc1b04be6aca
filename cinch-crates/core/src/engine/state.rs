use std::fmt::Debug;
use std::fmt::Formatter;

use log::trace;

use super::domain_store::Event;
use super::DomainStore;
use super::PropagatorQueue;
use super::WatchLists;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::ContractViolation;
use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagationStatus;
use crate::basic_types::TrailMark;
use crate::cinch_assert_simple;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::engine::predicates::Predicate;
use crate::engine::variables::ContextId;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::RealVariable;
use crate::propagation::EnqueueDecision;
use crate::propagation::HasDomains;
use crate::propagation::NotificationContext;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorId;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters kept by the propagation loop.
    StateStatistics {
        /// The number of times a propagator was run.
        num_propagations: u64,
        /// The number of times propagation ended in an inconsistency.
        num_inconsistencies: u64,
    }
);

/// The domains, the propagators attached to them, and the machinery which runs the propagators to
/// a fixed point.
///
/// Every change is trailed; [`State::undo_to`] restores the exact state at a [`TrailMark`],
/// including detaching the propagators which were added after it.
pub struct State {
    pub(crate) domains: DomainStore,
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    watch_lists: WatchLists,
    propagator_queue: PropagatorQueue,
    /// Set while a search is running; variables cannot be created then.
    pub(crate) is_searching: bool,
    statistics: StateStatistics,
}

impl Debug for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("domains", &self.domains)
            .field(
                "propagators",
                &self
                    .propagators
                    .iter()
                    .map(|propagator| propagator.name())
                    .collect::<Vec<_>>(),
            )
            .field("is_searching", &self.is_searching)
            .finish()
    }
}

impl State {
    pub fn new(real_precision: f64) -> State {
        State {
            domains: DomainStore::new(ContextId::fresh(), real_precision),
            propagators: KeyedVec::default(),
            watch_lists: WatchLists::default(),
            propagator_queue: PropagatorQueue::default(),
            is_searching: false,
            statistics: StateStatistics::default(),
        }
    }

    pub fn context(&self) -> ContextId {
        self.domains.context()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    pub(crate) fn statistics(&self) -> StateStatistics {
        self.statistics
    }

    /// Creates an integer variable with domain `[lower_bound, upper_bound]`.
    pub fn new_interval_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.assert_not_searching();
        self.domains.grow(lower_bound, upper_bound)
    }

    /// Creates an integer variable which can take exactly the given values.
    pub fn new_sparse_variable(&mut self, mut values: Vec<i32>) -> DomainId {
        self.assert_not_searching();
        values.sort_unstable();
        values.dedup();
        self.domains.grow_enumerated(&values)
    }

    pub fn new_literal(&mut self) -> Literal {
        Literal::new(self.new_interval_variable(0, 1))
    }

    pub fn new_real_variable(&mut self, lower_bound: f64, upper_bound: f64) -> RealVariable {
        self.assert_not_searching();
        self.domains.grow_real(lower_bound, upper_bound)
    }

    fn assert_not_searching(&self) {
        cinch_assert_simple!(
            !self.is_searching,
            "variables cannot be created while searching"
        );
    }

    /// Checks that every variable was created by this state.
    pub fn check_ownership<'a, Var: IntegerVariable>(
        &self,
        variables: impl IntoIterator<Item = &'a Var>,
    ) -> Result<(), ContractViolation> {
        for variable in variables {
            if variable.context() != self.context() {
                return Err(ContractViolation::ForeignVariable(format!("{variable:?}")));
            }
        }

        Ok(())
    }

    pub fn check_real_ownership<'a>(
        &self,
        variables: impl IntoIterator<Item = &'a RealVariable>,
    ) -> Result<(), ContractViolation> {
        for variable in variables {
            if !self.domains.owns_real(*variable) {
                return Err(ContractViolation::ForeignVariable(variable.to_string()));
            }
        }

        Ok(())
    }

    /// Adds a propagator and runs the propagation loop, starting with the new propagator.
    ///
    /// While searching, the propagator is detached again when the search backtracks to before
    /// this call.
    pub fn add_propagator<Constructor: PropagatorConstructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorId, ConstraintOperationError> {
        let propagator_id = self.propagators.next_key();
        self.domains.record_attachment();

        let context = PropagatorConstructorContext::new(
            propagator_id,
            &mut self.domains,
            &mut self.watch_lists,
        );
        let propagator = constructor.create(context);
        let priority = propagator.priority();
        trace!("attached propagator {} as {propagator_id}", propagator.name());

        let pushed_id = self.propagators.push(Box::new(propagator));
        cinch_assert_simple!(pushed_id == propagator_id);

        self.propagator_queue
            .enqueue_propagator(propagator_id, priority);
        self.propagate()
            .map_err(|_| ConstraintOperationError::InfeasiblePropagator)?;

        Ok(propagator_id)
    }

    /// Makes `predicate` true without propagating.
    pub fn post(&mut self, predicate: Predicate) -> Result<(), EmptyDomain> {
        let _ = self.domains.apply(predicate)?;
        Ok(())
    }

    pub fn post_real_lower_bound(
        &mut self,
        variable: RealVariable,
        bound: f64,
    ) -> Result<(), EmptyDomain> {
        let _ = self.domains.tighten_real_lower_bound(variable, bound)?;
        Ok(())
    }

    pub fn post_real_upper_bound(
        &mut self,
        variable: RealVariable,
        bound: f64,
    ) -> Result<(), EmptyDomain> {
        let _ = self.domains.tighten_real_upper_bound(variable, bound)?;
        Ok(())
    }

    /// Runs propagators until no more events are pending.
    ///
    /// On an inconsistency the remaining events and queued propagators are discarded; the domains
    /// are left as they were at that moment and should be restored by backtracking.
    pub fn propagate(&mut self) -> PropagationStatus {
        loop {
            while let Some(event) = self.domains.pop_event() {
                self.notify_watchers(event);
            }

            let Some(propagator_id) = self.propagator_queue.pop() else {
                return Ok(());
            };

            self.statistics.num_propagations += 1;
            let context = PropagationContext::new(&mut self.domains, propagator_id);
            if let Err(inconsistency) = self.propagators[propagator_id].propagate(context) {
                trace!(
                    "{} ({propagator_id}) reported {inconsistency:?}",
                    self.propagators[propagator_id].name()
                );
                self.statistics.num_inconsistencies += 1;
                self.propagator_queue.clear();
                self.domains.clear_events();
                return Err(inconsistency);
            }
        }
    }

    fn notify_watchers(&mut self, event: Event) {
        for watcher in self.watch_lists.watchers(event.subject) {
            let relevant_events = watcher.events.intersection(event.events);
            if relevant_events.is_empty() {
                continue;
            }

            let propagator_id = watcher.propagator_var.propagator;
            let propagator = &mut self.propagators[propagator_id];
            let decision = propagator.notify(
                NotificationContext::new(&mut self.domains),
                watcher.propagator_var.variable,
                relevant_events,
            );

            if decision == EnqueueDecision::Enqueue {
                self.propagator_queue
                    .enqueue_propagator(propagator_id, propagator.priority());
            }
        }
    }

    pub fn mark(&self) -> TrailMark {
        self.domains.mark()
    }

    /// Restores the state at `mark`, detaching the propagators added since.
    pub fn undo_to(&mut self, mark: TrailMark) {
        let num_detached = self.domains.undo_to(mark);

        for _ in 0..num_detached {
            if let Some((propagator_id, propagator)) = self.propagators.pop() {
                trace!("detached propagator {} ({propagator_id})", propagator.name());
                self.watch_lists.detach(propagator_id);
            }
        }

        self.propagator_queue.clear();
    }

    /// Runs `propagator_id` once more, although none of its variables changed.
    #[cfg(test)]
    pub(crate) fn repropagate(&mut self, propagator_id: PropagatorId) -> PropagationStatus {
        let priority = self.propagators[propagator_id].priority();
        self.propagator_queue
            .enqueue_propagator(propagator_id, priority);
        self.propagate()
    }

    #[cfg(test)]
    pub(crate) fn propagator_ids(&self) -> Vec<PropagatorId> {
        self.propagators.keys().collect()
    }

    pub(crate) fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger.clone());

        for (index, propagator) in self.propagators.iter().enumerate() {
            propagator.log_statistics(
                statistic_logger.attach_to_prefix(format!("{}_{index}", propagator.name())),
            );
        }
    }
}

impl HasDomains for State {
    fn domain_store(&self) -> &DomainStore {
        &self.domains
    }
}

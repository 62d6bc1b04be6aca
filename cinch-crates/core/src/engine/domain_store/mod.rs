//! The store of all domains of a solver, together with the trail which makes every change to them
//! reversible and the queue of domain events which drives propagation.
mod integer_domain;
mod real_domain;

use std::collections::VecDeque;

use enumset::EnumSet;
use integer_domain::IntegerDomain;
use real_domain::RealDomain;

use crate::basic_types::trail::Trail;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Solution;
use crate::basic_types::TrailMark;
use crate::cinch_assert_simple;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateType;
use crate::engine::variables::ContextId;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::RealVariable;
use crate::engine::DomainEvent;

/// A reversible integer, used by propagators to keep incremental state which is restored on
/// backtracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrailedInteger(u32);

/// The variable a domain event is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Subject {
    Integer(DomainId),
    Real(RealVariable),
}

/// A change to a single domain, described by all the aspects of the change at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Event {
    pub(crate) subject: Subject,
    pub(crate) events: EnumSet<DomainEvent>,
}

/// Everything that is needed to reverse one primitive mutation.
#[derive(Clone, Copy, Debug)]
enum UndoRecord {
    LowerBound { domain: u32, previous: i32 },
    UpperBound { domain: u32, previous: i32 },
    Removal { domain: u32, value: i32 },
    RealLowerBound { variable: u32, previous: f64 },
    RealUpperBound { variable: u32, previous: f64 },
    TrailedInteger { id: u32, previous: i64 },
    Interest { subject: Subject, previous: EnumSet<DomainEvent> },
    /// A propagator was added. Undoing this detaches the propagator and drops the trailed integers
    /// which were created after it.
    Attach { num_trailed_values: usize },
}

#[derive(Clone, Debug)]
pub struct DomainStore {
    context: ContextId,
    integer_domains: Vec<IntegerDomain>,
    real_domains: Vec<RealDomain>,
    /// The events which at least one watcher of the variable is interested in.
    integer_interest: Vec<EnumSet<DomainEvent>>,
    real_interest: Vec<EnumSet<DomainEvent>>,
    trailed_values: Vec<i64>,
    trail: Trail<UndoRecord>,
    events: VecDeque<Event>,
    real_precision: f64,
}

impl DomainStore {
    pub(crate) fn new(context: ContextId, real_precision: f64) -> DomainStore {
        DomainStore {
            context,
            integer_domains: Vec::default(),
            real_domains: Vec::default(),
            integer_interest: Vec::default(),
            real_interest: Vec::default(),
            trailed_values: Vec::default(),
            trail: Trail::default(),
            events: VecDeque::default(),
            real_precision,
        }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Real bounds only move when they are tightened by more than this amount.
    pub fn real_precision(&self) -> f64 {
        self.real_precision
    }

    pub fn num_integer_domains(&self) -> usize {
        self.integer_domains.len()
    }

    pub fn num_real_domains(&self) -> usize {
        self.real_domains.len()
    }

    /// Iterates over all integer domains, in creation order.
    pub fn integer_domains(&self) -> impl Iterator<Item = DomainId> + '_ {
        (0..self.integer_domains.len() as u32).map(|id| DomainId::new(self.context, id))
    }

    pub fn real_variables(&self) -> impl Iterator<Item = RealVariable> + '_ {
        (0..self.real_domains.len() as u32).map(|id| RealVariable::new(self.context, id))
    }

    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        cinch_assert_simple!(lower_bound <= upper_bound);
        self.push_integer_domain(IntegerDomain::bounds(lower_bound, upper_bound))
    }

    /// Creates an enumerated domain; `values` must be non-empty, sorted and without duplicates.
    pub(crate) fn grow_enumerated(&mut self, values: &[i32]) -> DomainId {
        cinch_assert_simple!(!values.is_empty());
        self.push_integer_domain(IntegerDomain::enumerated(values))
    }

    fn push_integer_domain(&mut self, domain: IntegerDomain) -> DomainId {
        let id = DomainId::new(self.context, self.integer_domains.len() as u32);
        self.integer_domains.push(domain);
        self.integer_interest.push(EnumSet::empty());
        id
    }

    pub(crate) fn grow_real(&mut self, lower_bound: f64, upper_bound: f64) -> RealVariable {
        cinch_assert_simple!(lower_bound.is_finite() && upper_bound.is_finite());
        cinch_assert_simple!(lower_bound <= upper_bound);

        let variable = RealVariable::new(self.context, self.real_domains.len() as u32);
        self.real_domains
            .push(RealDomain::new(lower_bound, upper_bound));
        self.real_interest.push(EnumSet::empty());
        variable
    }

    /// Whether `domain` was created by this store.
    pub fn owns(&self, domain: DomainId) -> bool {
        domain.context() == self.context && domain.index() < self.integer_domains.len()
    }

    pub fn owns_real(&self, variable: RealVariable) -> bool {
        variable.context() == self.context && variable.index() < self.real_domains.len()
    }

    pub fn lower_bound(&self, domain: DomainId) -> i32 {
        self.integer_domains[domain.index()].lower_bound
    }

    pub fn upper_bound(&self, domain: DomainId) -> i32 {
        self.integer_domains[domain.index()].upper_bound
    }

    pub fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.integer_domains[domain.index()].contains(value)
    }

    pub fn is_fixed(&self, domain: DomainId) -> bool {
        self.integer_domains[domain.index()].is_fixed()
    }

    pub fn fixed_value(&self, domain: DomainId) -> Option<i32> {
        let domain = &self.integer_domains[domain.index()];
        domain.is_fixed().then_some(domain.lower_bound)
    }

    /// The number of values left in the domain.
    pub fn domain_size(&self, domain: DomainId) -> usize {
        self.integer_domains[domain.index()].size()
    }

    pub fn is_enumerated(&self, domain: DomainId) -> bool {
        self.integer_domains[domain.index()].is_enumerated()
    }

    pub fn iterate_domain(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.integer_domains[domain.index()].iter()
    }

    pub fn real_lower_bound(&self, variable: RealVariable) -> f64 {
        self.real_domains[variable.index()].lower_bound
    }

    pub fn real_upper_bound(&self, variable: RealVariable) -> f64 {
        self.real_domains[variable.index()].upper_bound
    }

    /// A real variable counts as fixed once its interval is no wider than the real precision.
    pub fn is_real_fixed(&self, variable: RealVariable) -> bool {
        self.real_domains[variable.index()].width() <= self.real_precision
    }

    /// Returns whether the predicate is certainly true or false given the current domains, or
    /// [`None`] if that is not yet known.
    pub fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        match predicate {
            Predicate::TriviallyTrue => Some(true),
            Predicate::TriviallyFalse => Some(false),
            Predicate::Atomic {
                domain,
                predicate_type,
                value,
            } => {
                let lower_bound = self.lower_bound(domain);
                let upper_bound = self.upper_bound(domain);
                match predicate_type {
                    PredicateType::LowerBound if lower_bound >= value => Some(true),
                    PredicateType::LowerBound if upper_bound < value => Some(false),
                    PredicateType::UpperBound if upper_bound <= value => Some(true),
                    PredicateType::UpperBound if lower_bound > value => Some(false),
                    PredicateType::Equal | PredicateType::NotEqual => {
                        let is_equal = if !self.contains(domain, value) {
                            Some(false)
                        } else if lower_bound == upper_bound {
                            Some(true)
                        } else {
                            None
                        };

                        if predicate_type == PredicateType::Equal {
                            is_equal
                        } else {
                            is_equal.map(|is_equal| !is_equal)
                        }
                    }
                    _ => None,
                }
            }
        }
    }

    /// Makes the predicate true. Returns whether a domain changed.
    pub(crate) fn apply(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        match predicate {
            Predicate::TriviallyTrue => Ok(false),
            Predicate::TriviallyFalse => Err(EmptyDomain),
            Predicate::Atomic {
                domain,
                predicate_type,
                value,
            } => match predicate_type {
                PredicateType::LowerBound => self.tighten_lower_bound(domain, value),
                PredicateType::UpperBound => self.tighten_upper_bound(domain, value),
                PredicateType::NotEqual => self.remove_value(domain, value),
                PredicateType::Equal => self.make_assignment(domain, value),
            },
        }
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let current = &self.integer_domains[domain.index()];
        if value <= current.lower_bound {
            return Ok(false);
        }

        let new_lower_bound = current.member_at_or_above(value).ok_or(EmptyDomain)?;

        self.trail.push(UndoRecord::LowerBound {
            domain: domain.id(),
            previous: current.lower_bound,
        });
        let current = &mut self.integer_domains[domain.index()];
        current.lower_bound = new_lower_bound;

        let mut events = DomainEvent::LowerBound | DomainEvent::Removal;
        if current.is_fixed() {
            events |= DomainEvent::Assign;
        }
        self.notify(Subject::Integer(domain), events);

        Ok(true)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let current = &self.integer_domains[domain.index()];
        if value >= current.upper_bound {
            return Ok(false);
        }

        let new_upper_bound = current.member_at_or_below(value).ok_or(EmptyDomain)?;

        self.trail.push(UndoRecord::UpperBound {
            domain: domain.id(),
            previous: current.upper_bound,
        });
        let current = &mut self.integer_domains[domain.index()];
        current.upper_bound = new_upper_bound;

        let mut events = DomainEvent::UpperBound | DomainEvent::Removal;
        if current.is_fixed() {
            events |= DomainEvent::Assign;
        }
        self.notify(Subject::Integer(domain), events);

        Ok(true)
    }

    /// Reduces the domain to the single value `value`, which has to be in the domain.
    pub(crate) fn make_assignment(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let current = &self.integer_domains[domain.index()];
        if !current.contains(value) {
            return Err(EmptyDomain);
        }
        if current.is_fixed() {
            return Ok(false);
        }

        let mut events = DomainEvent::Assign | DomainEvent::Removal;
        let (lower_bound, upper_bound) = (current.lower_bound, current.upper_bound);

        if value > lower_bound {
            self.trail.push(UndoRecord::LowerBound {
                domain: domain.id(),
                previous: lower_bound,
            });
            events |= DomainEvent::LowerBound;
        }
        if value < upper_bound {
            self.trail.push(UndoRecord::UpperBound {
                domain: domain.id(),
                previous: upper_bound,
            });
            events |= DomainEvent::UpperBound;
        }

        let current = &mut self.integer_domains[domain.index()];
        current.lower_bound = value;
        current.upper_bound = value;
        self.notify(Subject::Integer(domain), events);

        Ok(true)
    }

    /// Removes `value` from the domain.
    ///
    /// A bounds domain cannot represent holes; removing an interior value from it does nothing.
    pub(crate) fn remove_value(&mut self, domain: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let current = &self.integer_domains[domain.index()];
        if !current.contains(value) {
            return Ok(false);
        }
        if current.is_fixed() {
            return Err(EmptyDomain);
        }

        if value == current.lower_bound {
            return self.tighten_lower_bound(domain, value + 1);
        }
        if value == current.upper_bound {
            return self.tighten_upper_bound(domain, value - 1);
        }
        if !current.is_enumerated() {
            return Ok(false);
        }

        self.trail.push(UndoRecord::Removal {
            domain: domain.id(),
            value,
        });
        self.integer_domains[domain.index()].remove_member(value);
        self.notify(Subject::Integer(domain), EnumSet::only(DomainEvent::Removal));

        Ok(true)
    }

    pub(crate) fn tighten_real_lower_bound(
        &mut self,
        variable: RealVariable,
        value: f64,
    ) -> Result<bool, EmptyDomain> {
        cinch_assert_simple!(!value.is_nan(), "real bounds cannot be NaN");

        let current = self.real_domains[variable.index()];
        if value <= current.lower_bound + self.real_precision {
            return Ok(false);
        }
        if value > current.upper_bound + self.real_precision {
            return Err(EmptyDomain);
        }

        self.trail.push(UndoRecord::RealLowerBound {
            variable: variable.id(),
            previous: current.lower_bound,
        });
        let current = &mut self.real_domains[variable.index()];
        current.lower_bound = value.min(current.upper_bound);

        let mut events = DomainEvent::LowerBound | DomainEvent::Removal;
        if current.width() <= self.real_precision {
            events |= DomainEvent::Assign;
        }
        self.notify(Subject::Real(variable), events);

        Ok(true)
    }

    pub(crate) fn tighten_real_upper_bound(
        &mut self,
        variable: RealVariable,
        value: f64,
    ) -> Result<bool, EmptyDomain> {
        cinch_assert_simple!(!value.is_nan(), "real bounds cannot be NaN");

        let current = self.real_domains[variable.index()];
        if value >= current.upper_bound - self.real_precision {
            return Ok(false);
        }
        if value < current.lower_bound - self.real_precision {
            return Err(EmptyDomain);
        }

        self.trail.push(UndoRecord::RealUpperBound {
            variable: variable.id(),
            previous: current.upper_bound,
        });
        let current = &mut self.real_domains[variable.index()];
        current.upper_bound = value.max(current.lower_bound);

        let mut events = DomainEvent::UpperBound | DomainEvent::Removal;
        if current.width() <= self.real_precision {
            events |= DomainEvent::Assign;
        }
        self.notify(Subject::Real(variable), events);

        Ok(true)
    }

    pub(crate) fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.push(initial_value);
        TrailedInteger(self.trailed_values.len() as u32 - 1)
    }

    pub fn read_trailed_integer(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values[trailed_integer.0 as usize]
    }

    pub(crate) fn assign_trailed_integer(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let previous = self.trailed_values[trailed_integer.0 as usize];
        if previous == value {
            return;
        }

        self.trail.push(UndoRecord::TrailedInteger {
            id: trailed_integer.0,
            previous,
        });
        self.trailed_values[trailed_integer.0 as usize] = value;
    }

    pub(crate) fn add_assign_trailed_integer(
        &mut self,
        trailed_integer: TrailedInteger,
        addition: i64,
    ) {
        let value = self.read_trailed_integer(trailed_integer) + addition;
        self.assign_trailed_integer(trailed_integer, value);
    }

    /// Widens the set of events which are worth reporting for `subject`.
    pub(crate) fn add_interest(&mut self, subject: Subject, events: EnumSet<DomainEvent>) {
        let interest = match subject {
            Subject::Integer(domain) => &mut self.integer_interest[domain.index()],
            Subject::Real(variable) => &mut self.real_interest[variable.index()],
        };

        let previous = *interest;
        if previous.is_superset(events) {
            return;
        }

        *interest = previous | events;
        self.trail.push(UndoRecord::Interest { subject, previous });
    }

    fn notify(&mut self, subject: Subject, events: EnumSet<DomainEvent>) {
        let interest = match subject {
            Subject::Integer(domain) => self.integer_interest[domain.index()],
            Subject::Real(variable) => self.real_interest[variable.index()],
        };

        if interest.is_disjoint(events) {
            return;
        }

        self.events.push_back(Event { subject, events });
    }

    pub(crate) fn pop_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn mark(&self) -> TrailMark {
        self.trail.mark()
    }

    /// Records that a propagator was added, so that undoing past this point detaches it again.
    pub(crate) fn record_attachment(&mut self) {
        self.trail.push(UndoRecord::Attach {
            num_trailed_values: self.trailed_values.len(),
        });
    }

    /// Reverses every mutation made after `mark`, newest first. Returns how many propagators were
    /// attached after the mark; they have to be detached by the caller.
    pub(crate) fn undo_to(&mut self, mark: TrailMark) -> usize {
        let mut num_detached = 0;

        for record in self.trail.undo_to(mark) {
            match record {
                UndoRecord::LowerBound { domain, previous } => {
                    self.integer_domains[domain as usize].lower_bound = previous;
                }
                UndoRecord::UpperBound { domain, previous } => {
                    self.integer_domains[domain as usize].upper_bound = previous;
                }
                UndoRecord::Removal { domain, value } => {
                    self.integer_domains[domain as usize].restore_member(value);
                }
                UndoRecord::RealLowerBound { variable, previous } => {
                    self.real_domains[variable as usize].lower_bound = previous;
                }
                UndoRecord::RealUpperBound { variable, previous } => {
                    self.real_domains[variable as usize].upper_bound = previous;
                }
                UndoRecord::TrailedInteger { id, previous } => {
                    self.trailed_values[id as usize] = previous;
                }
                UndoRecord::Interest { subject, previous } => match subject {
                    Subject::Integer(domain) => self.integer_interest[domain.index()] = previous,
                    Subject::Real(variable) => self.real_interest[variable.index()] = previous,
                },
                UndoRecord::Attach { num_trailed_values } => {
                    self.trailed_values.truncate(num_trailed_values);
                    num_detached += 1;
                }
            }
        }

        self.events.clear();
        num_detached
    }

    /// Takes an immutable copy of all bounds.
    pub(crate) fn snapshot(&self) -> Solution {
        Solution::new(
            self.context,
            self.integer_domains
                .iter()
                .map(|domain| (domain.lower_bound, domain.upper_bound))
                .collect(),
            self.real_domains
                .iter()
                .map(|domain| (domain.lower_bound, domain.upper_bound))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DomainEvents;
    use crate::predicate;

    fn store() -> DomainStore {
        DomainStore::new(ContextId::fresh(), 1e-6)
    }

    #[test]
    fn undo_restores_domains_exactly() {
        let mut store = store();
        let x = store.grow(0, 10);
        let y = store.grow_enumerated(&[1, 3, 5, 7]);

        let _ = store.tighten_lower_bound(x, 2).unwrap();
        let mark = store.mark();

        let _ = store.tighten_upper_bound(x, 6).unwrap();
        let _ = store.remove_value(y, 3).unwrap();
        let _ = store.make_assignment(y, 5).unwrap();

        assert_eq!(0, store.undo_to(mark));

        assert_eq!(2, store.lower_bound(x));
        assert_eq!(10, store.upper_bound(x));
        assert_eq!(vec![1, 3, 5, 7], store.iterate_domain(y).collect::<Vec<_>>());
    }

    #[test]
    fn failed_narrowing_leaves_the_domain_untouched() {
        let mut store = store();
        let x = store.grow(0, 5);
        let y = store.grow(0, 5);

        assert_eq!(Err(EmptyDomain), store.tighten_lower_bound(x, 6));
        assert_eq!(Err(EmptyDomain), store.make_assignment(y, 9));

        assert_eq!((0, 5), (store.lower_bound(x), store.upper_bound(x)));
        assert_eq!((0, 5), (store.lower_bound(y), store.upper_bound(y)));
    }

    #[test]
    fn enumerated_bounds_are_rounded_to_members() {
        let mut store = store();
        let x = store.grow_enumerated(&[1, 4, 6, 9]);

        let _ = store.tighten_lower_bound(x, 2).unwrap();
        let _ = store.tighten_upper_bound(x, 8).unwrap();

        assert_eq!(4, store.lower_bound(x));
        assert_eq!(6, store.upper_bound(x));
        assert_eq!(2, store.domain_size(x));
    }

    #[test]
    fn interior_removal_from_bounds_domain_is_ignored() {
        let mut store = store();
        let x = store.grow(0, 5);

        assert_eq!(Ok(false), store.remove_value(x, 3));
        assert_eq!(Ok(true), store.remove_value(x, 0));

        assert_eq!(1, store.lower_bound(x));
        assert!(store.contains(x, 3));
    }

    #[test]
    fn removing_the_last_value_fails() {
        let mut store = store();
        let x = store.grow(4, 4);

        assert_eq!(Err(EmptyDomain), store.remove_value(x, 4));
        assert_eq!(Ok(false), store.remove_value(x, 3));
    }

    #[test]
    fn events_without_interest_are_not_queued() {
        let mut store = store();
        let x = store.grow(0, 10);
        let y = store.grow(0, 10);
        store.add_interest(Subject::Integer(y), DomainEvents::UPPER_BOUND.events());

        let _ = store.tighten_lower_bound(x, 3).unwrap();
        let _ = store.tighten_lower_bound(y, 3).unwrap();
        assert_eq!(None, store.pop_event());

        let _ = store.tighten_upper_bound(y, 3).unwrap();
        assert_eq!(
            Some(Event {
                subject: Subject::Integer(y),
                events: DomainEvent::UpperBound | DomainEvent::Removal | DomainEvent::Assign,
            }),
            store.pop_event()
        );
    }

    #[test]
    fn removal_leaving_one_value_is_an_assignment() {
        let mut store = store();
        let x = store.grow_enumerated(&[2, 7]);
        store.add_interest(Subject::Integer(x), DomainEvents::ASSIGN.events());

        let _ = store.remove_value(x, 7).unwrap();

        let event = store.pop_event().unwrap();
        assert!(event.events.contains(DomainEvent::Assign));
        assert_eq!(Some(2), store.fixed_value(x));
    }

    #[test]
    fn interest_is_restored_on_undo() {
        let mut store = store();
        let x = store.grow(0, 10);
        let mark = store.mark();

        store.add_interest(Subject::Integer(x), DomainEvents::ANY_INT.events());
        let _ = store.undo_to(mark);

        let _ = store.tighten_lower_bound(x, 1).unwrap();
        assert_eq!(None, store.pop_event());
    }

    #[test]
    fn real_bounds_only_move_beyond_the_precision() {
        let mut store = store();
        let r = store.grow_real(0.0, 1.0);

        assert_eq!(Ok(false), store.tighten_real_lower_bound(r, 1e-7));
        assert_eq!(Ok(true), store.tighten_real_lower_bound(r, 0.5));
        assert_eq!(Err(EmptyDomain), store.tighten_real_upper_bound(r, 0.25));

        assert_eq!(0.5, store.real_lower_bound(r));
        assert_eq!(1.0, store.real_upper_bound(r));
    }

    #[test]
    fn trailed_integers_are_restored_and_dropped_with_their_attachment() {
        let mut store = store();
        let counter = store.new_trailed_integer(3);
        let mark = store.mark();

        store.add_assign_trailed_integer(counter, 4);
        store.record_attachment();
        let _ = store.new_trailed_integer(10);
        assert_eq!(7, store.read_trailed_integer(counter));

        assert_eq!(1, store.undo_to(mark));
        assert_eq!(3, store.read_trailed_integer(counter));
        assert_eq!(1, store.trailed_values.len());
    }

    #[test]
    fn predicates_are_evaluated_against_the_current_domain() {
        let mut store = store();
        let x = store.grow(0, 10);
        let _ = store.tighten_lower_bound(x, 5).unwrap();

        assert_eq!(Some(true), store.evaluate_predicate(predicate![x >= 3]));
        assert_eq!(Some(false), store.evaluate_predicate(predicate![x <= 4]));
        assert_eq!(None, store.evaluate_predicate(predicate![x == 7]));
        assert_eq!(Some(true), store.evaluate_predicate(predicate![x != 2]));
    }
}

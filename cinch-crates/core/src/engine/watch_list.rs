use enumset::EnumSet;

use super::domain_store::Subject;
use super::DomainEvent;
use super::DomainStore;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::variables::RealVariable;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorVarId;

/// A subscription of a propagator to a set of events of one variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Watcher {
    pub(crate) propagator_var: PropagatorVarId,
    pub(crate) events: EnumSet<DomainEvent>,
}

/// For every variable, the watchers in registration order.
#[derive(Clone, Debug, Default)]
pub(crate) struct WatchLists {
    integer: Vec<Vec<Watcher>>,
    real: Vec<Vec<Watcher>>,
    /// The variables each propagator watches, used to detach it again.
    registrations: KeyedVec<PropagatorId, Vec<Subject>>,
}

impl WatchLists {
    pub(crate) fn watchers(&self, subject: Subject) -> &[Watcher] {
        let list = match subject {
            Subject::Integer(domain) => self.integer.get(domain.index()),
            Subject::Real(variable) => self.real.get(variable.index()),
        };

        list.map_or(&[], |list| list.as_slice())
    }

    fn add(&mut self, subject: Subject, watcher: Watcher) {
        let list = match subject {
            Subject::Integer(domain) => {
                if self.integer.len() <= domain.index() {
                    self.integer.resize(domain.index() + 1, Vec::default());
                }
                &mut self.integer[domain.index()]
            }
            Subject::Real(variable) => {
                if self.real.len() <= variable.index() {
                    self.real.resize(variable.index() + 1, Vec::default());
                }
                &mut self.real[variable.index()]
            }
        };
        list.push(watcher);

        let propagator = watcher.propagator_var.propagator;
        self.registrations.accomodate(propagator, Vec::default());
        self.registrations[propagator].push(subject);
    }

    /// Removes all watchers of `propagator`. Propagators are detached in the reverse order of
    /// attachment, so its watchers are always at the end of the lists.
    pub(crate) fn detach(&mut self, propagator: PropagatorId) {
        let Some(subjects) = self.registrations.get(propagator).cloned() else {
            return;
        };

        for subject in subjects {
            let list = match subject {
                Subject::Integer(domain) => &mut self.integer[domain.index()],
                Subject::Real(variable) => &mut self.real[variable.index()],
            };
            while list
                .last()
                .is_some_and(|watcher| watcher.propagator_var.propagator == propagator)
            {
                let _ = list.pop();
            }
        }

        self.registrations[propagator].clear();
    }
}

/// Used by variables to register a propagator on their underlying domains.
#[derive(Debug)]
pub struct Watchers<'a> {
    propagator_var: PropagatorVarId,
    watch_lists: &'a mut WatchLists,
    domains: &'a mut DomainStore,
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(
        propagator_var: PropagatorVarId,
        watch_lists: &'a mut WatchLists,
        domains: &'a mut DomainStore,
    ) -> Self {
        Watchers {
            propagator_var,
            watch_lists,
            domains,
        }
    }

    pub(crate) fn watch_all(&mut self, domain: DomainId, events: EnumSet<DomainEvent>) {
        self.watch(Subject::Integer(domain), events);
    }

    pub(crate) fn watch_real(&mut self, variable: RealVariable, events: EnumSet<DomainEvent>) {
        self.watch(Subject::Real(variable), events);
    }

    fn watch(&mut self, subject: Subject, events: EnumSet<DomainEvent>) {
        self.watch_lists.add(
            subject,
            Watcher {
                propagator_var: self.propagator_var,
                events,
            },
        );
        self.domains.add_interest(subject, events);
    }
}

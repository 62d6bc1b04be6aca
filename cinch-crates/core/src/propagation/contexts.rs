use crate::basic_types::EmptyDomain;
use crate::engine::predicates::Predicate;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::RealVariable;
use crate::engine::DomainStore;
use crate::engine::TrailedInteger;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::PropagatorId;

/// Gives access to a [`DomainStore`]; every such type can read domains through [`ReadDomains`].
pub trait HasDomains {
    fn domain_store(&self) -> &DomainStore;
}

/// Read access to the domains of variables.
pub trait ReadDomains: HasDomains {
    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.domain_store())
    }

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.domain_store())
    }

    fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(self.domain_store(), value)
    }

    fn is_fixed<Var: IntegerVariable>(&self, var: &Var) -> bool {
        self.lower_bound(var) == self.upper_bound(var)
    }

    fn fixed_value<Var: IntegerVariable>(&self, var: &Var) -> Option<i32> {
        self.is_fixed(var).then(|| self.lower_bound(var))
    }

    fn iterate_domain<Var: IntegerVariable>(&self, var: &Var) -> impl Iterator<Item = i32> {
        var.iterate_domain(self.domain_store())
    }

    fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        self.domain_store().evaluate_predicate(predicate)
    }

    fn is_literal_true(&self, literal: &Literal) -> bool {
        literal.is_true(self.domain_store())
    }

    fn is_literal_false(&self, literal: &Literal) -> bool {
        literal.is_false(self.domain_store())
    }

    fn real_lower_bound(&self, var: RealVariable) -> f64 {
        self.domain_store().real_lower_bound(var)
    }

    fn real_upper_bound(&self, var: RealVariable) -> f64 {
        self.domain_store().real_upper_bound(var)
    }

    fn value(&self, trailed_integer: TrailedInteger) -> i64 {
        self.domain_store().read_trailed_integer(trailed_integer)
    }
}

impl<T: HasDomains> ReadDomains for T {}

/// A read-only view on the domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    store: &'a DomainStore,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(store: &'a DomainStore) -> Self {
        Domains { store }
    }
}

impl HasDomains for Domains<'_> {
    fn domain_store(&self) -> &DomainStore {
        self.store
    }
}

/// Provided to the propagator when it is notified of a domain event.
///
/// The difference with [`PropagationContext`] is that it is not possible to change domains in the
/// notify callback; only trailed integers can be updated.
#[derive(Debug)]
pub struct NotificationContext<'a> {
    store: &'a mut DomainStore,
}

impl<'a> NotificationContext<'a> {
    pub(crate) fn new(store: &'a mut DomainStore) -> Self {
        NotificationContext { store }
    }

    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.store)
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.store.assign_trailed_integer(trailed_integer, value);
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.store.add_assign_trailed_integer(trailed_integer, addition);
    }
}

impl HasDomains for NotificationContext<'_> {
    fn domain_store(&self) -> &DomainStore {
        self.store
    }
}

/// Provides information about the state of the solver to a propagator.
///
/// Domains can be read through the implementation of [`ReadDomains`], and changes to the state can
/// be made via [`Self::post`].
#[derive(Debug)]
pub struct PropagationContext<'a> {
    store: &'a mut DomainStore,
    pub(crate) propagator_id: PropagatorId,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(store: &'a mut DomainStore, propagator_id: PropagatorId) -> Self {
        PropagationContext {
            store,
            propagator_id,
        }
    }

    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.store)
    }

    /// Makes `predicate` true by narrowing the domain it is about.
    pub fn post(&mut self, predicate: Predicate) -> Result<(), EmptyDomain> {
        let _ = self.store.apply(predicate)?;
        Ok(())
    }

    pub fn set_real_lower_bound(&mut self, var: RealVariable, bound: f64) -> Result<(), EmptyDomain> {
        let _ = self.store.tighten_real_lower_bound(var, bound)?;
        Ok(())
    }

    pub fn set_real_upper_bound(&mut self, var: RealVariable, bound: f64) -> Result<(), EmptyDomain> {
        let _ = self.store.tighten_real_upper_bound(var, bound)?;
        Ok(())
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.store.assign_trailed_integer(trailed_integer, value);
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.store.add_assign_trailed_integer(trailed_integer, addition);
    }

    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            store: self.store,
            propagator_id: self.propagator_id,
        }
    }
}

impl HasDomains for PropagationContext<'_> {
    fn domain_store(&self) -> &DomainStore {
        self.store
    }
}

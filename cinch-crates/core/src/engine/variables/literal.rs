use std::ops::Not;

use enumset::EnumSet;

use super::AffineView;
use super::ContextId;
use super::DomainId;
use super::IntegerVariable;
use super::TransformableVariable;
use crate::basic_types::Solution;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::DomainEvent;
use crate::engine::DomainStore;
use crate::engine::Watchers;
use crate::predicate;

/// A truth variable: an integer variable with domain `{0, 1}`, where `1` means true.
///
/// The negation of a literal is the view `1 - b` on the same domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    integer_variable: AffineView<DomainId>,
}

impl Literal {
    pub(crate) fn new(domain_id: DomainId) -> Literal {
        Literal {
            integer_variable: domain_id.scaled(1),
        }
    }

    pub fn get_integer_variable(&self) -> AffineView<DomainId> {
        self.integer_variable
    }

    pub fn get_true_predicate(&self) -> Predicate {
        self.lower_bound_predicate(1)
    }

    pub fn get_false_predicate(&self) -> Predicate {
        self.upper_bound_predicate(0)
    }

    pub fn is_true(&self, domains: &DomainStore) -> bool {
        self.lower_bound(domains) == 1
    }

    pub fn is_false(&self, domains: &DomainStore) -> bool {
        self.upper_bound(domains) == 0
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            integer_variable: self.integer_variable.scaled(-1).offset(1),
        }
    }
}

impl IntegerVariable for Literal {
    type AffineView = AffineView<Self>;

    fn lower_bound(&self, domains: &DomainStore) -> i32 {
        self.integer_variable.lower_bound(domains)
    }

    fn upper_bound(&self, domains: &DomainStore) -> i32 {
        self.integer_variable.upper_bound(domains)
    }

    fn contains(&self, domains: &DomainStore, value: i32) -> bool {
        self.integer_variable.contains(domains, value)
    }

    fn iterate_domain(&self, domains: &DomainStore) -> impl Iterator<Item = i32> {
        self.integer_variable.iterate_domain(domains)
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        self.integer_variable.watch_all(watchers, events)
    }

    fn unpack_event(&self, events: EnumSet<DomainEvent>) -> EnumSet<DomainEvent> {
        self.integer_variable.unpack_event(events)
    }

    fn context(&self) -> ContextId {
        self.integer_variable.context()
    }

    fn solution_value(&self, solution: &Solution) -> Option<i32> {
        self.integer_variable.solution_value(solution)
    }
}

impl PredicateConstructor for Literal {
    type Value = i32;

    fn lower_bound_predicate(&self, bound: Self::Value) -> Predicate {
        let integer_variable = self.integer_variable;
        predicate![integer_variable >= bound]
    }

    fn upper_bound_predicate(&self, bound: Self::Value) -> Predicate {
        let integer_variable = self.integer_variable;
        predicate![integer_variable <= bound]
    }

    fn equality_predicate(&self, bound: Self::Value) -> Predicate {
        let integer_variable = self.integer_variable;
        predicate![integer_variable == bound]
    }

    fn disequality_predicate(&self, bound: Self::Value) -> Predicate {
        let integer_variable = self.integer_variable;
        predicate![integer_variable != bound]
    }
}

impl TransformableVariable<AffineView<Literal>> for Literal {
    fn scaled(&self, scale: i32) -> AffineView<Literal> {
        AffineView::new(*self, scale, 0)
    }

    fn offset(&self, offset: i32) -> AffineView<Literal> {
        AffineView::new(*self, 1, offset)
    }
}

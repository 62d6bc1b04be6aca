//! This module exposes helpers that aid testing of propagators. The [`TestSolver`] allows setting
//! up specific scenarios under which to test the various operations of a propagator.
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationStatus;
use crate::basic_types::TrailMark;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::RealVariable;
use crate::engine::State;
use crate::predicate;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorId;
use crate::propagation::ReadDomains;

/// A container for variables and propagators, which can be used to test propagators.
#[derive(Debug)]
pub(crate) struct TestSolver {
    pub(crate) state: State,
}

impl Default for TestSolver {
    fn default() -> Self {
        TestSolver {
            state: State::new(1e-6),
        }
    }
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.new_interval_variable(lb, ub)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        self.state.new_sparse_variable(values)
    }

    pub(crate) fn new_literal(&mut self) -> Literal {
        self.state.new_literal()
    }

    pub(crate) fn new_real_variable(&mut self, lb: f64, ub: f64) -> RealVariable {
        self.state.new_real_variable(lb, ub)
    }

    /// Adds the propagator and propagates to a fixed point.
    pub(crate) fn new_propagator<Constructor: PropagatorConstructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorId, ConstraintOperationError> {
        self.state.add_propagator(constructor)
    }

    pub(crate) fn lower_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        self.state.lower_bound(&var)
    }

    pub(crate) fn upper_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        self.state.upper_bound(&var)
    }

    pub(crate) fn contains<Var: IntegerVariable>(&self, var: Var, value: i32) -> bool {
        self.state.contains(&var, value)
    }

    pub(crate) fn assert_bounds<Var: IntegerVariable>(&self, var: Var, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var.clone());
        let actual_ub = self.upper_bound(var.clone());

        assert_eq!(
            (lb, ub),
            (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}] of {var:?}"
        );
    }

    pub(crate) fn real_bounds(&self, var: RealVariable) -> (f64, f64) {
        (self.state.real_lower_bound(var), self.state.real_upper_bound(var))
    }

    /// Applies the predicate and propagates.
    pub(crate) fn post_and_propagate(&mut self, predicate: Predicate) -> PropagationStatus {
        self.state.post(predicate)?;
        self.state.propagate()
    }

    pub(crate) fn set_lower_bound(&mut self, var: DomainId, bound: i32) -> PropagationStatus {
        self.post_and_propagate(predicate![var >= bound])
    }

    pub(crate) fn set_upper_bound(&mut self, var: DomainId, bound: i32) -> PropagationStatus {
        self.post_and_propagate(predicate![var <= bound])
    }

    pub(crate) fn set_literal(&mut self, literal: Literal, truth_value: bool) -> PropagationStatus {
        let predicate = if truth_value {
            literal.get_true_predicate()
        } else {
            literal.get_false_predicate()
        };
        self.post_and_propagate(predicate)
    }

    pub(crate) fn mark(&self) -> TrailMark {
        self.state.mark()
    }

    pub(crate) fn undo_to(&mut self, mark: TrailMark) {
        self.state.undo_to(mark)
    }

    /// Runs every propagator once more and asserts that none of them narrows a domain or touches
    /// the trail.
    pub(crate) fn assert_repropagation_changes_nothing(&mut self) {
        for propagator_id in self.state.propagator_ids() {
            let domains = self.integer_domains();
            let mark = self.mark();

            self.state
                .repropagate(propagator_id)
                .expect("a fixed point is consistent");

            assert_eq!(
                domains,
                self.integer_domains(),
                "{propagator_id} narrowed a domain at a fixed point"
            );
            assert_eq!(
                mark,
                self.mark(),
                "{propagator_id} changed the trail at a fixed point"
            );
        }
    }

    fn integer_domains(&self) -> Vec<Vec<i32>> {
        let domains = &self.state.domains;
        domains
            .integer_domains()
            .map(|domain| domains.iterate_domain(domain).collect())
            .collect()
    }
}

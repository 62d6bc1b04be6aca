use std::rc::Rc;
use std::time::Instant;

use log::debug;
use log::info;
use log::trace;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::choice_point::ChoicePoint;
use super::choice_point::Continuation;
use super::choice_point::MinimizationFrame;
use super::choice_point::Step;
use super::termination::TerminationCondition;
use super::Decision;
use super::Goal;
use super::MinimizationStrategy;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::Solution;
use crate::basic_types::SolverError;
use crate::basic_types::TrailMark;
use crate::create_statistics_struct;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateType;
use crate::engine::State;
use crate::predicate;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters of one search invocation.
    SearchStatistics {
        /// The number of branching decisions.
        num_decisions: u64,
        /// The number of times the search backtracked to a choice point.
        num_failures: u64,
        /// The number of solutions, including every improving solution of a minimisation.
        num_solutions: u64,
        /// The number of times a minimisation restarted from its origin.
        num_restarts: u64,
        /// The largest number of open choice points.
        peak_depth: u64,
        /// The number of propagator calls made during the search.
        num_propagations: u64,
        time_spent_in_search_ms: u128,
    }
);

/// The result of running the [`SearchEngine`] until it stops.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    /// The goal succeeded; the solution is a snapshot of the domains at that moment.
    Solution(Solution),
    /// No choice point is left to try.
    Exhausted,
    /// The termination condition triggered. Carries the best solution of a minimisation, if one
    /// was found.
    TimedOut(Option<Solution>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    NotStarted,
    Running,
    AtSolution,
    Finished,
}

/// Executes a [`Goal`] depth-first over a [`State`].
///
/// The engine keeps a stack of [`ChoicePoint`]s; on a failure the state is restored to the trail
/// mark of the most recent choice point and the search continues with its alternative. When the
/// engine is dropped, the state is restored to how it was before the search started.
#[derive(Debug)]
pub struct SearchEngine<'state> {
    state: &'state mut State,
    status: Status,
    root: TrailMark,
    pending: Continuation,
    choice_points: Vec<ChoicePoint>,
    /// The minimisations whose guard choice point is still on the stack, innermost last.
    frames: Vec<Rc<MinimizationFrame>>,
    rng: SmallRng,
    incumbent: Option<Solution>,
    statistics: SearchStatistics,
    started_at: Instant,
    propagations_at_start: u64,
}

impl<'state> SearchEngine<'state> {
    /// Prepares the execution of `goal`. The seed determines the choices of
    /// [`ValueSelection::Random`](super::ValueSelection::Random).
    pub fn new(state: &'state mut State, goal: Goal, seed: u64) -> Self {
        state.is_searching = true;
        let root = state.mark();
        let propagations_at_start = state.statistics().num_propagations;

        SearchEngine {
            state,
            status: Status::NotStarted,
            root,
            pending: Continuation::default().push(Step::Goal(Rc::new(goal))),
            choice_points: vec![],
            frames: vec![],
            rng: SmallRng::seed_from_u64(seed),
            incumbent: None,
            statistics: SearchStatistics::default(),
            started_at: Instant::now(),
            propagations_at_start,
        }
    }

    pub fn state(&self) -> &State {
        self.state
    }

    pub fn statistics(&self) -> SearchStatistics {
        let mut statistics = self.statistics;
        statistics.num_propagations =
            self.state.statistics().num_propagations - self.propagations_at_start;
        statistics.time_spent_in_search_ms = self.started_at.elapsed().as_millis();
        statistics
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics().log(statistic_logger);
    }

    /// Runs until the goal succeeds, the search space is exhausted, or `termination` triggers.
    ///
    /// After a solution, calling this again backtracks into the remaining choice points to find
    /// the next solution.
    pub fn next_solution(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<SearchOutcome, SolverError> {
        match self.status {
            Status::Finished => return Ok(SearchOutcome::Exhausted),
            Status::NotStarted => {
                self.status = Status::Running;
                if self.state.propagate().is_err() {
                    debug!("the root is inconsistent");
                    return Ok(self.exhaust());
                }
            }
            Status::AtSolution => {
                self.status = Status::Running;
                if !self.backtrack() {
                    return Ok(self.exhaust());
                }
            }
            Status::Running => {}
        }

        loop {
            if termination.should_stop() {
                debug!("search stopped by its termination condition");
                return Ok(SearchOutcome::TimedOut(self.incumbent.clone()));
            }

            let Some((step, rest)) = self.pending.pop() else {
                self.statistics.num_solutions += 1;
                self.status = Status::AtSolution;
                return Ok(SearchOutcome::Solution(self.state.domains.snapshot()));
            };
            self.pending = rest;

            if self.execute(step, termination)?.is_err() && !self.backtrack() {
                return Ok(self.exhaust());
            }
        }
    }

    fn exhaust(&mut self) -> SearchOutcome {
        self.status = Status::Finished;
        self.choice_points.clear();
        self.frames.clear();
        self.state.undo_to(self.root);
        SearchOutcome::Exhausted
    }

    /// Restores the most recent choice point at which the search can continue. Returns `false`
    /// when there is none.
    fn backtrack(&mut self) -> bool {
        while let Some(choice_point) = self.choice_points.pop() {
            self.statistics.num_failures += 1;
            self.state.undo_to(choice_point.mark);

            let depth = self.choice_points.len();
            self.frames.retain(|frame| frame.guard < depth);
            self.pending = choice_point.alternative;

            if self.impose_fast_bounds().is_ok() {
                return true;
            }
        }

        false
    }

    /// Bounds the objective of every fast minimisation by its incumbent.
    fn impose_fast_bounds(&mut self) -> PropagationStatus {
        for frame in self
            .frames
            .iter()
            .filter(|frame| frame.strategy == MinimizationStrategy::Fast)
        {
            if let Some(best) = frame.best.get() {
                let objective = frame.objective;
                self.state.post(predicate![objective <= best - 1])?;
            }
        }

        self.state.propagate()
    }

    fn execute(
        &mut self,
        step: Step,
        termination: &mut impl TerminationCondition,
    ) -> Result<PropagationStatus, SolverError> {
        match step {
            Step::Goal(goal) => self.execute_goal(goal, termination),
            Step::Improve(frame) => Ok(self.improve(frame)),
            Step::Exhausted(frame) => Ok(self.conclude(&frame)),
        }
    }

    fn execute_goal(
        &mut self,
        goal: Rc<Goal>,
        termination: &mut impl TerminationCondition,
    ) -> Result<PropagationStatus, SolverError> {
        match &*goal {
            Goal::Succeed => Ok(Ok(())),
            Goal::Fail => Ok(Err(Inconsistency::Failure)),
            Goal::Generate {
                variables,
                variable_selection,
                value_selection,
            } => {
                self.state.check_ownership(variables.iter())?;

                let Some(variable) = variable_selection.select(&self.state.domains, variables)
                else {
                    return Ok(Ok(()));
                };
                let decision = value_selection.select(&self.state.domains, variable, &mut self.rng);
                let alternative = self.exclusion(decision);

                Ok(self.branch(
                    Decision::Integer(decision),
                    alternative,
                    Step::Goal(Rc::clone(&goal)),
                    termination,
                ))
            }
            Goal::Decide(decision) => {
                self.check_decision(decision)?;
                Ok(self.apply(*decision))
            }
            Goal::SplitReal {
                variable,
                precision,
            } => {
                self.state.check_real_ownership([variable])?;

                let lower_bound = self.state.real_lower_bound(*variable);
                let upper_bound = self.state.real_upper_bound(*variable);
                // Narrowing by less than the real precision is not observable.
                let precision = precision.max(2.0 * self.state.domains.real_precision());
                if upper_bound - lower_bound <= precision {
                    return Ok(Ok(()));
                }

                let middle = lower_bound + (upper_bound - lower_bound) / 2.0;
                Ok(self.branch(
                    Decision::RealUpperBound(*variable, middle),
                    Goal::decide(Decision::RealLowerBound(*variable, middle)),
                    Step::Goal(Rc::clone(&goal)),
                    termination,
                ))
            }
            Goal::Post(constraint) => match constraint.post(self.state) {
                Ok(()) => Ok(Ok(())),
                Err(ConstraintOperationError::ContractViolation(violation)) => {
                    Err(violation.into())
                }
                Err(_) => Ok(Err(Inconsistency::Failure)),
            },
            Goal::And(first, second) => {
                self.pending = self
                    .pending
                    .push(Step::Goal(Rc::clone(second)))
                    .push(Step::Goal(Rc::clone(first)));
                Ok(Ok(()))
            }
            Goal::Or(first, second) => {
                let alternative = self.pending.push(Step::Goal(Rc::clone(second)));
                self.push_choice_point(alternative);
                self.pending = self.pending.push(Step::Goal(Rc::clone(first)));
                Ok(Ok(()))
            }
            Goal::Minimize {
                goal: inner,
                objective,
                strategy,
            } => {
                self.state.check_ownership([objective])?;

                let frame = Rc::new(MinimizationFrame {
                    goal: Rc::clone(inner),
                    objective: *objective,
                    strategy: *strategy,
                    mark: self.state.mark(),
                    guard: self.choice_points.len(),
                    best: Default::default(),
                    continuation: self.pending.clone(),
                });

                self.push_choice_point(
                    Continuation::default().push(Step::Exhausted(Rc::clone(&frame))),
                );
                self.frames.push(Rc::clone(&frame));
                self.pending = Continuation::default()
                    .push(Step::Improve(Rc::clone(&frame)))
                    .push(Step::Goal(Rc::clone(inner)));
                Ok(Ok(()))
            }
            Goal::Log(message) => {
                info!("{message}");
                Ok(Ok(()))
            }
        }
    }

    fn check_decision(&self, decision: &Decision) -> Result<(), SolverError> {
        match decision {
            Decision::Integer(predicate) => {
                self.state.check_ownership(predicate.domain().iter())?
            }
            Decision::RealLowerBound(variable, _) | Decision::RealUpperBound(variable, _) => {
                self.state.check_real_ownership([variable])?
            }
        }

        Ok(())
    }

    fn push_choice_point(&mut self, alternative: Continuation) {
        self.choice_points.push(ChoicePoint {
            mark: self.state.mark(),
            alternative,
        });
        self.statistics.peak_depth = self
            .statistics
            .peak_depth
            .max(self.choice_points.len() as u64);
    }

    /// The branch taken once `decision` failed.
    ///
    /// A bounds domain cannot lose an interior value, so the alternative of assigning one is to
    /// search below it and then above it.
    fn exclusion(&self, decision: Predicate) -> Goal {
        if let Predicate::Atomic {
            domain,
            predicate_type: PredicateType::Equal,
            value,
        } = decision
        {
            let domains = &self.state.domains;
            if !domains.is_enumerated(domain)
                && domains.lower_bound(domain) < value
                && value < domains.upper_bound(domain)
            {
                return Goal::or(
                    Goal::decide(predicate![domain <= value - 1]),
                    Goal::decide(predicate![domain >= value + 1]),
                );
            }
        }

        Goal::decide(!decision)
    }

    /// Takes `decision`, leaving a choice point which executes `alternative`; both branches
    /// continue with `then`.
    fn branch(
        &mut self,
        decision: Decision,
        alternative: Goal,
        then: Step,
        termination: &mut impl TerminationCondition,
    ) -> PropagationStatus {
        self.statistics.num_decisions += 1;
        termination.decision_has_been_made();
        trace!("deciding {decision:?}");

        self.pending = self.pending.push(then);
        let alternative = self.pending.push(Step::Goal(Rc::new(alternative)));
        self.push_choice_point(alternative);

        self.apply(decision)
    }

    fn apply(&mut self, decision: Decision) -> PropagationStatus {
        match decision {
            Decision::Integer(predicate) => self.state.post(predicate)?,
            Decision::RealLowerBound(variable, bound) => {
                self.state.post_real_lower_bound(variable, bound)?
            }
            Decision::RealUpperBound(variable, bound) => {
                self.state.post_real_upper_bound(variable, bound)?
            }
        }

        self.state.propagate()
    }

    /// Records the solution of the goal of a minimisation as the new incumbent.
    fn improve(&mut self, frame: Rc<MinimizationFrame>) -> PropagationStatus {
        let objective = frame.objective;
        let value = self.state.lower_bound(&objective);

        frame.best.set(Some(value));
        self.statistics.num_solutions += 1;
        self.incumbent = Some(self.state.domains.snapshot());
        debug!("new incumbent with objective value {value}");

        match frame.strategy {
            MinimizationStrategy::Fast => Err(Inconsistency::Failure),
            MinimizationStrategy::Restart => {
                self.statistics.num_restarts += 1;
                self.choice_points.truncate(frame.guard + 1);
                self.frames.retain(|other| other.guard <= frame.guard);
                self.state.undo_to(frame.mark);

                self.pending = Continuation::default()
                    .push(Step::Improve(Rc::clone(&frame)))
                    .push(Step::Goal(Rc::clone(&frame.goal)));

                self.state.post(predicate![objective <= value - 1])?;
                self.state.propagate()
            }
        }
    }

    /// Restores the best solution of an exhausted minimisation by executing its goal once more
    /// with the objective fixed.
    fn conclude(&mut self, frame: &MinimizationFrame) -> PropagationStatus {
        let Some(best) = frame.best.get() else {
            debug!("minimisation exhausted without a solution");
            return Err(Inconsistency::Failure);
        };
        debug!("minimisation exhausted, the optimum is {best}");

        self.pending = frame
            .continuation
            .push(Step::Goal(Rc::clone(&frame.goal)));

        let objective = frame.objective;
        self.state.post(predicate![objective == best])?;
        self.state.propagate()
    }
}

impl Drop for SearchEngine<'_> {
    fn drop(&mut self) {
        self.state.undo_to(self.root);
        self.state.is_searching = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints;
    use crate::constraints::Constraint;
    use crate::engine::variables::DomainId;
    use crate::engine::variables::TransformableVariable;
    use crate::search::termination::DecisionBudget;
    use crate::search::termination::Indefinite;
    use crate::search::ValueSelection;
    use crate::search::VariableSelection;

    fn solutions(state: &mut State, goal: Goal, variables: &[DomainId]) -> Vec<Vec<i32>> {
        let mut engine = SearchEngine::new(state, goal, 0);
        let mut found = vec![];

        while let SearchOutcome::Solution(solution) = engine
            .next_solution(&mut Indefinite)
            .expect("no contract violations")
        {
            found.push(
                variables
                    .iter()
                    .map(|&variable| solution.integer_value(variable).expect("fixed"))
                    .collect(),
            );
        }

        found
    }

    #[test]
    fn generate_enumerates_in_value_order() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 1);
        let y = state.new_interval_variable(0, 1);

        let found = solutions(
            &mut state,
            Goal::generate_with([x, y], VariableSelection::InputOrder, ValueSelection::Min),
            &[x, y],
        );

        assert_eq!(vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]], found);
    }

    #[test]
    fn every_value_selection_enumerates_each_value_once() {
        for value_selection in [
            ValueSelection::Min,
            ValueSelection::Max,
            ValueSelection::Middle,
            ValueSelection::Split,
            ValueSelection::ReverseSplit,
            ValueSelection::Random,
        ] {
            let mut state = State::new(1e-6);
            let x = state.new_interval_variable(0, 4);

            let mut found = solutions(
                &mut state,
                Goal::generate_with([x], VariableSelection::InputOrder, value_selection),
                &[x],
            );
            found.sort();

            assert_eq!(
                vec![vec![0], vec![1], vec![2], vec![3], vec![4]],
                found,
                "{value_selection:?}"
            );
        }
    }

    #[test]
    fn middle_searches_below_then_above_the_middle() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 4);

        let found = solutions(
            &mut state,
            Goal::generate_with([x], VariableSelection::InputOrder, ValueSelection::Middle),
            &[x],
        );

        assert_eq!(vec![vec![2], vec![0], vec![1], vec![3], vec![4]], found);
    }

    #[test]
    fn or_tries_the_second_branch_after_the_first() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 5);

        let goal = Goal::or(
            Goal::decide(predicate![x == 2]),
            Goal::decide(predicate![x == 4]),
        );

        assert_eq!(vec![vec![2], vec![4]], solutions(&mut state, goal, &[x]));
    }

    #[test]
    fn posted_constraints_are_removed_on_backtrack() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 3);

        let goal = Goal::or(
            Goal::post(constraints::greater_than_or_equals([x], 3)),
            Goal::post(constraints::less_than_or_equals([x], 0)),
        )
        .and_then(Goal::generate([x]));

        assert_eq!(vec![vec![3], vec![0]], solutions(&mut state, goal, &[x]));
        assert_eq!(0, state.num_propagators());
    }

    #[test]
    fn the_state_is_restored_after_the_search() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 3);
        let y = state.new_interval_variable(0, 3);
        constraints::binary_less_than(x, y)
            .post(&mut state)
            .expect("feasible");

        let _ = solutions(&mut state, Goal::generate([x, y]), &[x, y]);

        assert_eq!((0, 2), (state.lower_bound(&x), state.upper_bound(&x)));
        assert_eq!((1, 3), (state.lower_bound(&y), state.upper_bound(&y)));
        assert!(!state.is_searching);
    }

    #[test]
    fn fail_without_choice_points_exhausts() {
        let mut state = State::new(1e-6);
        let mut engine = SearchEngine::new(&mut state, Goal::Fail, 0);

        let outcome = engine.next_solution(&mut Indefinite).expect("no violation");

        assert!(matches!(outcome, SearchOutcome::Exhausted));
    }

    #[test]
    fn both_minimization_strategies_find_the_optimum() {
        for strategy in [MinimizationStrategy::Restart, MinimizationStrategy::Fast] {
            let mut state = State::new(1e-6);
            let x = state.new_interval_variable(0, 5);
            let y = state.new_interval_variable(0, 5);
            let objective = state.new_interval_variable(0, 20);
            // objective = 2x - y + 10, with x + y >= 4
            constraints::equals(
                [x.scaled(2), y.scaled(-1), objective.scaled(-1)],
                -10,
            )
            .post(&mut state)
            .expect("feasible");
            constraints::greater_than_or_equals([x, y], 4)
                .post(&mut state)
                .expect("feasible");

            let goal = Goal::minimize_with(
                Goal::generate_with([x, y], VariableSelection::InputOrder, ValueSelection::Max),
                objective,
                strategy,
            );

            let found = solutions(&mut state, goal, &[x, y, objective]);
            assert_eq!(vec![0, 5, 5], found[0], "{strategy:?}");
        }
    }

    #[test]
    fn minimization_without_solutions_fails() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 5);

        let goal = Goal::minimize(Goal::Fail, x);

        assert!(solutions(&mut state, goal, &[x]).is_empty());
    }

    #[test]
    fn decision_budget_times_out() {
        let mut state = State::new(1e-6);
        let variables = (0..10)
            .map(|_| state.new_interval_variable(0, 9))
            .collect::<Vec<_>>();
        let mut engine = SearchEngine::new(&mut state, Goal::generate(variables), 0);

        let outcome = engine
            .next_solution(&mut DecisionBudget::new(3))
            .expect("no violation");

        assert!(matches!(outcome, SearchOutcome::TimedOut(None)));
        assert_eq!(3, engine.statistics().num_decisions);
    }

    #[test]
    fn real_variables_are_split_to_the_requested_precision() {
        let mut state = State::new(1e-6);
        let r = state.new_real_variable(0.0, 1.0);
        let mut engine = SearchEngine::new(&mut state, Goal::split_real(r, 0.1), 0);

        let SearchOutcome::Solution(solution) =
            engine.next_solution(&mut Indefinite).expect("no violation")
        else {
            panic!("splitting a real variable always succeeds");
        };

        let (lower_bound, upper_bound) = solution.real_bounds(r).expect("owned");
        assert!(upper_bound - lower_bound <= 0.1);
        assert_eq!(0.0, lower_bound);
    }

    #[test]
    fn foreign_variables_are_a_contract_violation() {
        let mut state = State::new(1e-6);
        let mut other = State::new(1e-6);
        let foreign = other.new_interval_variable(0, 1);
        let mut engine = SearchEngine::new(&mut state, Goal::generate([foreign]), 0);

        let result = engine.next_solution(&mut Indefinite);

        assert!(matches!(result, Err(SolverError::ContractViolation(_))));
    }
}

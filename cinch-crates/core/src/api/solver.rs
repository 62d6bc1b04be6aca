use std::sync::Arc;

use log::debug;

use super::results::AllSolutions;
use super::results::OptimisationDirection;
use super::results::OptimisationResult;
use super::results::SatisfactionResult;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::ContractViolation;
use crate::basic_types::SolverError;
use crate::basic_types::Variable;
use crate::constraints::ConstraintPoster;
use crate::containers::HashMap;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::RealVariable;
use crate::engine::variables::TransformableVariable;
use crate::engine::State;
use crate::propagation::ReadDomains;
use crate::search::termination::TerminationCondition;
use crate::search::Goal;
use crate::search::MinimizationStrategy;
use crate::search::SearchEngine;
use crate::search::SearchOutcome;
use crate::search::SearchStatistics;
use crate::search::ValueSelection;
use crate::search::VariableSelection;
use crate::statistics::log_statistic_postfix;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// Options which influence how the [`Solver`] searches.
#[derive(Clone, Copy, Debug)]
pub struct SolverOptions {
    /// Real bounds only change when they tighten by more than this amount.
    pub real_precision: f64,
    /// The seed of [`ValueSelection::Random`].
    pub random_seed: u64,
    /// The variable selection of the goal used by [`Solver::find_solution`] and
    /// [`Solver::find_optimal_solution`].
    pub default_variable_selection: VariableSelection,
    /// The value selection of the goal used by [`Solver::find_solution`] and
    /// [`Solver::find_optimal_solution`].
    pub default_value_selection: ValueSelection,
    /// How [`Solver::find_optimal_solution`] continues after an improving solution.
    pub minimization_strategy: MinimizationStrategy,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            real_precision: 1e-6,
            random_seed: 42,
            default_variable_selection: VariableSelection::default(),
            default_value_selection: ValueSelection::default(),
            minimization_strategy: MinimizationStrategy::default(),
        }
    }
}

/// The main interaction point which allows the creation of variables, the addition of
/// constraints, and solving problems.
///
/// # Creating Variables
/// ```rust
/// # use cinch_core::Solver;
/// # use cinch_core::variables::TransformableVariable;
/// let mut solver = Solver::default();
///
/// // An integer variable with a domain in the range [0, 10]
/// let x = solver.new_bounded_integer(0, 10);
///
/// // Named variables can be looked up in a solution by their name
/// let y = solver
///     .new_named_bounded_integer(0, 10, "y")
///     .expect("the name is not used yet");
///
/// // An integer variable with holes in its domain
/// let z = solver.new_sparse_integer(vec![0, 3, 5]);
///
/// // A view over a variable with both a scale and an offset
/// let view = x.scaled(-1).offset(15);
///
/// // A boolean variable
/// let literal = solver.new_literal();
///
/// // A real variable with a domain in the range [0.0, 2.5]
/// let r = solver.new_real(0.0, 2.5);
/// ```
///
/// # Solving
/// ```rust
/// # use cinch_core::constraints;
/// # use cinch_core::results::SatisfactionResult;
/// # use cinch_core::termination::Indefinite;
/// # use cinch_core::Solver;
/// let mut solver = Solver::default();
/// let x = solver.new_bounded_integer(0, 5);
/// let y = solver.new_bounded_integer(0, 5);
///
/// solver
///     .add_constraint(constraints::linear([x, y], "=".parse().unwrap(), 7))
///     .post()
///     .expect("the constraint is satisfiable");
///
/// let result = solver
///     .find_solution(&mut Indefinite)
///     .expect("the model is well-formed");
///
/// let SatisfactionResult::Satisfiable(solution) = result else {
///     panic!("x = 2 and y = 5 is a solution");
/// };
/// assert_eq!(solution.integer_value(x), Some(2));
/// assert_eq!(solution.integer_value(y), Some(5));
/// ```
#[derive(Debug)]
pub struct Solver {
    state: State,
    options: SolverOptions,
    names: Arc<HashMap<String, Variable>>,
    /// Set once a constraint turned out to be infeasible at the root.
    is_infeasible: bool,
    search_statistics: SearchStatistics,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::with_options(SolverOptions::default())
    }
}

impl Solver {
    pub fn with_options(options: SolverOptions) -> Self {
        Solver {
            state: State::new(options.real_precision),
            options,
            names: Arc::default(),
            is_infeasible: false,
            search_statistics: SearchStatistics::default(),
        }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// The root state of the solver, after propagation of the posted constraints.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Whether a constraint has already been found to be infeasible at the root.
    pub fn is_infeasible(&self) -> bool {
        self.is_infeasible
    }

    /// The statistics of the most recent search.
    pub fn search_statistics(&self) -> SearchStatistics {
        self.search_statistics
    }

    /// Logs the statistics of the propagators and of the most recent search.
    pub fn log_statistics(&self) {
        let statistic_logger = StatisticLogger::default();
        self.search_statistics
            .log(statistic_logger.attach_to_prefix("search"));
        self.state
            .log_statistics(statistic_logger.attach_to_prefix("propagation"));
        log_statistic_postfix();
    }
}

/// Functions to create and retrieve variables.
impl Solver {
    /// Create a new integer variable with the given bounds.
    ///
    /// # Panics
    /// If `lower_bound > upper_bound`. Use [`Solver::new_named_bounded_integer`] to get an error
    /// instead.
    pub fn new_bounded_integer(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.state.new_interval_variable(lower_bound, upper_bound)
    }

    /// Create a new named integer variable with the given bounds.
    pub fn new_named_bounded_integer(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: impl Into<String>,
    ) -> Result<DomainId, ContractViolation> {
        let name = self.check_name(name.into())?;
        if lower_bound > upper_bound {
            return Err(ContractViolation::InvalidBounds {
                lower: lower_bound.to_string(),
                upper: upper_bound.to_string(),
            });
        }

        let domain = self.new_bounded_integer(lower_bound, upper_bound);
        self.register_name(name, Variable::Integer(domain));
        Ok(domain)
    }

    /// Create a new integer variable which has a domain of predefined values. Duplicates are
    /// ignored.
    ///
    /// # Panics
    /// If `values` is empty.
    pub fn new_sparse_integer(&mut self, values: impl Into<Vec<i32>>) -> DomainId {
        self.state.new_sparse_variable(values.into())
    }

    /// Create a new named integer variable which has a domain of predefined values.
    pub fn new_named_sparse_integer(
        &mut self,
        values: impl Into<Vec<i32>>,
        name: impl Into<String>,
    ) -> Result<DomainId, ContractViolation> {
        let name = self.check_name(name.into())?;
        let values = values.into();
        if values.is_empty() {
            return Err(ContractViolation::InvalidArgument(format!(
                "the domain of '{name}' has no values"
            )));
        }

        let domain = self.new_sparse_integer(values);
        self.register_name(name, Variable::Integer(domain));
        Ok(domain)
    }

    /// Create a fresh boolean variable and return the literal which is true when the variable
    /// is 1.
    pub fn new_literal(&mut self) -> Literal {
        self.state.new_literal()
    }

    pub fn new_named_literal(
        &mut self,
        name: impl Into<String>,
    ) -> Result<Literal, ContractViolation> {
        let name = self.check_name(name.into())?;
        let literal = self.new_literal();
        self.register_name(name, Variable::Integer(*literal.get_integer_variable().inner()));
        Ok(literal)
    }

    /// Returns an infinite iterator of fresh literals.
    pub fn new_literals(&mut self) -> impl Iterator<Item = Literal> + '_ {
        std::iter::from_fn(|| Some(self.new_literal()))
    }

    /// Create a new real variable with the given bounds.
    ///
    /// # Panics
    /// If the bounds are not finite or `lower_bound > upper_bound`.
    pub fn new_real(&mut self, lower_bound: f64, upper_bound: f64) -> RealVariable {
        self.state.new_real_variable(lower_bound, upper_bound)
    }

    pub fn new_named_real(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        name: impl Into<String>,
    ) -> Result<RealVariable, ContractViolation> {
        let name = self.check_name(name.into())?;
        if !lower_bound.is_finite() || !upper_bound.is_finite() || lower_bound > upper_bound {
            return Err(ContractViolation::InvalidBounds {
                lower: lower_bound.to_string(),
                upper: upper_bound.to_string(),
            });
        }

        let variable = self.new_real(lower_bound, upper_bound);
        self.register_name(name, Variable::Real(variable));
        Ok(variable)
    }

    pub fn variable_named(&self, name: &str) -> Option<Variable> {
        self.names.get(name).copied()
    }

    /// Get the lower-bound of the given [`IntegerVariable`] at the root (after propagation).
    pub fn lower_bound(&self, variable: &impl IntegerVariable) -> i32 {
        self.state.lower_bound(variable)
    }

    /// Get the upper-bound of the given [`IntegerVariable`] at the root (after propagation).
    pub fn upper_bound(&self, variable: &impl IntegerVariable) -> i32 {
        self.state.upper_bound(variable)
    }

    /// Get the bounds of the given [`RealVariable`] at the root (after propagation).
    pub fn real_bounds(&self, variable: RealVariable) -> (f64, f64) {
        (
            self.state.real_lower_bound(variable),
            self.state.real_upper_bound(variable),
        )
    }

    fn check_name(&self, name: String) -> Result<String, ContractViolation> {
        if self.names.contains_key(&name) {
            return Err(ContractViolation::DuplicateName(name));
        }

        Ok(name)
    }

    fn register_name(&mut self, name: String, variable: Variable) {
        let _ = Arc::make_mut(&mut self.names).insert(name, variable);
    }
}

/// Functions for adding new constraints to the solver.
impl Solver {
    /// Add a constraint to the solver. This returns a [`ConstraintPoster`] which enables control
    /// on whether to add the constraint as-is, or whether to (half) reify it.
    ///
    /// If none of the methods on [`ConstraintPoster`] are used, the constraint _is not_ actually
    /// added to the solver. In this case, a warning is emitted.
    ///
    /// # Example
    /// ```
    /// # use cinch_core::constraints;
    /// # use cinch_core::Solver;
    /// let mut solver = Solver::default();
    ///
    /// let a = solver.new_bounded_integer(0, 3);
    /// let b = solver.new_bounded_integer(0, 3);
    ///
    /// solver
    ///     .add_constraint(constraints::equals([a, b], 0))
    ///     .post()
    ///     .expect("the constraint is satisfiable");
    /// ```
    pub fn add_constraint<Constraint>(
        &mut self,
        constraint: Constraint,
    ) -> ConstraintPoster<'_, Constraint> {
        ConstraintPoster::new(self, constraint)
    }

    /// Applies `add` to the root state and propagates.
    ///
    /// If the solver is already in an infeasible state, nothing is added and
    /// [`ConstraintOperationError::InfeasibleState`] is returned. If `add` turns out to be
    /// infeasible, the solver becomes infeasible.
    pub(crate) fn add_to_root(
        &mut self,
        add: impl FnOnce(&mut State) -> Result<(), ConstraintOperationError>,
    ) -> Result<(), ConstraintOperationError> {
        if self.is_infeasible {
            return Err(ConstraintOperationError::InfeasibleState);
        }

        let result = add(&mut self.state).and_then(|_| {
            self.state
                .propagate()
                .map_err(|_| ConstraintOperationError::InfeasiblePropagator)
        });

        if matches!(result, Err(ConstraintOperationError::InfeasiblePropagator)) {
            debug!("the model became infeasible at the root");
            self.is_infeasible = true;
        }

        result
    }
}

/// Functions for solving with the constraints that have been added to the [`Solver`].
impl Solver {
    /// The goal which [`Solver::find_solution`] executes: assign every integer variable using
    /// the default selection policies of the [`SolverOptions`].
    ///
    /// Real variables are not branched on; they are reported with the bounds propagation left
    /// them with.
    pub fn default_goal(&self) -> Goal {
        Goal::generate_with(
            self.state.domains.integer_domains(),
            self.options.default_variable_selection,
            self.options.default_value_selection,
        )
    }

    /// Searches for a solution which assigns every integer variable.
    pub fn find_solution(
        &mut self,
        termination: &mut impl TerminationCondition,
    ) -> Result<SatisfactionResult, SolverError> {
        let goal = self.default_goal();
        self.solve(goal, termination)
    }

    /// Executes `goal` until it succeeds for the first time.
    ///
    /// The state of the solver is restored after the search; the returned solution is a
    /// snapshot. If the search stops before a solution is found, the best solution of a
    /// minimisation inside `goal` is reported, if there is one.
    pub fn solve(
        &mut self,
        goal: Goal,
        termination: &mut impl TerminationCondition,
    ) -> Result<SatisfactionResult, SolverError> {
        if self.is_infeasible {
            return Ok(SatisfactionResult::Unsatisfiable);
        }

        let outcome = self.run(goal, termination, |engine, termination| {
            engine.next_solution(termination)
        })?;

        Ok(match outcome {
            SearchOutcome::Solution(solution) => {
                SatisfactionResult::Satisfiable(solution.with_names(Arc::clone(&self.names)))
            }
            SearchOutcome::Exhausted => SatisfactionResult::Unsatisfiable,
            SearchOutcome::TimedOut(Some(solution)) => {
                SatisfactionResult::Satisfiable(solution.with_names(Arc::clone(&self.names)))
            }
            SearchOutcome::TimedOut(None) => SatisfactionResult::Unknown,
        })
    }

    /// Searches for a solution which is optimal with respect to `objective`, using
    /// branch-and-bound over the default goal.
    ///
    /// # Example
    /// ```rust
    /// # use cinch_core::constraints;
    /// # use cinch_core::results::OptimisationDirection;
    /// # use cinch_core::results::OptimisationResult;
    /// # use cinch_core::termination::Indefinite;
    /// # use cinch_core::Solver;
    /// let mut solver = Solver::default();
    /// let x = solver.new_bounded_integer(0, 10);
    /// let y = solver.new_bounded_integer(0, 10);
    /// let objective = solver.new_bounded_integer(0, 20);
    ///
    /// solver
    ///     .add_constraint(constraints::linear([x, y], "<=".parse().unwrap(), 12))
    ///     .post()
    ///     .expect("the constraint is satisfiable");
    /// solver
    ///     .add_constraint(constraints::binary_equals(objective, x))
    ///     .post()
    ///     .expect("the constraint is satisfiable");
    ///
    /// let result = solver
    ///     .find_optimal_solution(&mut Indefinite, OptimisationDirection::Maximise, objective)
    ///     .expect("the model is well-formed");
    ///
    /// let OptimisationResult::Optimal(solution) = result else {
    ///     panic!("the search runs to completion");
    /// };
    /// assert_eq!(solution.integer_value(objective), Some(10));
    /// ```
    pub fn find_optimal_solution<Var>(
        &mut self,
        termination: &mut impl TerminationCondition,
        direction: OptimisationDirection,
        objective: Var,
    ) -> Result<OptimisationResult, SolverError>
    where
        Var: IntegerVariable + TransformableVariable<AffineView<DomainId>>,
    {
        let goal = self.default_goal();
        self.optimise(goal, termination, direction, objective)
    }

    /// Searches for the solution of `goal` which is optimal with respect to `objective`, using
    /// branch-and-bound.
    pub fn optimise<Var>(
        &mut self,
        goal: Goal,
        termination: &mut impl TerminationCondition,
        direction: OptimisationDirection,
        objective: Var,
    ) -> Result<OptimisationResult, SolverError>
    where
        Var: IntegerVariable + TransformableVariable<AffineView<DomainId>>,
    {
        if self.is_infeasible {
            return Ok(OptimisationResult::Unsatisfiable);
        }

        let scale = match direction {
            OptimisationDirection::Minimise => 1,
            OptimisationDirection::Maximise => -1,
        };
        let objective = TransformableVariable::<AffineView<DomainId>>::scaled(&objective, scale);
        let goal = Goal::minimize_with(goal, objective, self.options.minimization_strategy);

        let outcome = self.run(goal, termination, |engine, termination| {
            engine.next_solution(termination)
        })?;

        Ok(match outcome {
            SearchOutcome::Solution(solution) => {
                OptimisationResult::Optimal(solution.with_names(Arc::clone(&self.names)))
            }
            SearchOutcome::Exhausted => OptimisationResult::Unsatisfiable,
            SearchOutcome::TimedOut(Some(solution)) => {
                OptimisationResult::Satisfiable(solution.with_names(Arc::clone(&self.names)))
            }
            SearchOutcome::TimedOut(None) => OptimisationResult::Unknown,
        })
    }

    /// Enumerates every solution of `goal`, in the order in which the search finds them.
    pub fn find_all_solutions(
        &mut self,
        goal: Goal,
        termination: &mut impl TerminationCondition,
    ) -> Result<AllSolutions, SolverError> {
        if self.is_infeasible {
            return Ok(AllSolutions {
                solutions: vec![],
                is_complete: true,
            });
        }

        let names = Arc::clone(&self.names);
        self.run(goal, termination, |engine, termination| {
            let mut all_solutions = AllSolutions::default();

            loop {
                match engine.next_solution(termination)? {
                    SearchOutcome::Solution(solution) => all_solutions
                        .solutions
                        .push(solution.with_names(Arc::clone(&names))),
                    SearchOutcome::Exhausted => {
                        all_solutions.is_complete = true;
                        return Ok(all_solutions);
                    }
                    SearchOutcome::TimedOut(_) => return Ok(all_solutions),
                }
            }
        })
    }

    /// Runs `search` on a fresh [`SearchEngine`] for `goal`, keeping its statistics once it is
    /// done. The state is back at the root afterwards.
    fn run<T, Termination: TerminationCondition>(
        &mut self,
        goal: Goal,
        termination: &mut Termination,
        search: impl FnOnce(&mut SearchEngine<'_>, &mut Termination) -> Result<T, SolverError>,
    ) -> Result<T, SolverError> {
        let mut engine = SearchEngine::new(&mut self.state, goal, self.options.random_seed);
        let result = search(&mut engine, termination);
        self.search_statistics = engine.statistics();
        drop(engine);

        debug!(
            "search finished after {} decisions and {} failures",
            self.search_statistics.num_decisions, self.search_statistics.num_failures
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints;
    use crate::search::termination::DecisionBudget;
    use crate::search::termination::Indefinite;

    #[test]
    fn named_variables_must_be_unique() {
        let mut solver = Solver::default();
        let _ = solver
            .new_named_bounded_integer(0, 3, "x")
            .expect("fresh name");

        let result = solver.new_named_literal("x");

        assert_eq!(
            result,
            Err(ContractViolation::DuplicateName("x".to_owned()))
        );
    }

    #[test]
    fn invalid_bounds_are_reported_for_named_variables() {
        let mut solver = Solver::default();

        assert!(matches!(
            solver.new_named_bounded_integer(5, 3, "x"),
            Err(ContractViolation::InvalidBounds { .. })
        ));
        assert!(matches!(
            solver.new_named_real(0.0, f64::INFINITY, "r"),
            Err(ContractViolation::InvalidBounds { .. })
        ));
        assert!(solver.variable_named("x").is_none());
    }

    #[test]
    fn solutions_can_be_queried_by_name() {
        let mut solver = Solver::default();
        let x = solver
            .new_named_bounded_integer(3, 3, "x")
            .expect("fresh name");

        let result = solver.find_solution(&mut Indefinite).expect("no misuse");
        let solution = result.solution().expect("x = 3 is a solution");

        assert_eq!(solution.variable_named("x"), Some(Variable::Integer(x)));
        assert_eq!(solution.value_of("x"), Some(crate::basic_types::Value::Integer(3)));
    }

    #[test]
    fn infeasible_constraints_make_the_solver_infeasible() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 3);

        let result = solver
            .add_constraint(constraints::greater_than_or_equals([x], 5))
            .post();
        assert_eq!(result, Err(ConstraintOperationError::InfeasiblePropagator));

        let result = solver
            .add_constraint(constraints::less_than_or_equals([x], 2))
            .post();
        assert_eq!(result, Err(ConstraintOperationError::InfeasibleState));

        assert!(matches!(
            solver.find_solution(&mut Indefinite),
            Ok(SatisfactionResult::Unsatisfiable)
        ));
    }

    #[test]
    fn root_bounds_reflect_propagation() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 10);
        let y = solver.new_bounded_integer(0, 10);

        solver
            .add_constraint(constraints::binary_less_than(x, y))
            .post()
            .expect("feasible");

        assert_eq!(solver.upper_bound(&x), 9);
        assert_eq!(solver.lower_bound(&y), 1);
    }

    #[test]
    fn searching_leaves_the_root_untouched() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 10);

        let _ = solver.find_solution(&mut Indefinite).expect("no misuse");

        assert_eq!(solver.lower_bound(&x), 0);
        assert_eq!(solver.upper_bound(&x), 10);
    }

    #[test]
    fn maximisation_finds_the_largest_objective() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 4);
        let y = solver.new_bounded_integer(0, 4);
        solver
            .add_constraint(constraints::not_equals([x, y], 4))
            .post()
            .expect("feasible");

        let result = solver
            .find_optimal_solution(&mut Indefinite, OptimisationDirection::Maximise, x)
            .expect("no misuse");

        let OptimisationResult::Optimal(solution) = result else {
            panic!("expected an optimal solution, got {result:?}");
        };
        assert_eq!(solution.integer_value(x), Some(4));
        assert_ne!(solution.integer_value(y), Some(0));
    }

    #[test]
    fn all_solutions_are_enumerated() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 2);
        let y = solver.new_bounded_integer(0, 2);
        solver
            .add_constraint(constraints::binary_less_than(x, y))
            .post()
            .expect("feasible");

        let all_solutions = solver
            .find_all_solutions(
                Goal::generate_with([x, y], VariableSelection::InputOrder, ValueSelection::Min),
                &mut Indefinite,
            )
            .expect("no misuse");

        let pairs = all_solutions
            .solutions
            .iter()
            .map(|solution| (solution.integer_value(x), solution.integer_value(y)))
            .collect::<Vec<_>>();
        assert!(all_solutions.is_complete);
        assert_eq!(
            pairs,
            vec![(Some(0), Some(1)), (Some(0), Some(2)), (Some(1), Some(2))]
        );
    }

    #[test]
    fn an_exhausted_budget_gives_an_unknown_result() {
        let mut solver = Solver::default();
        let variables = (0..4)
            .map(|_| solver.new_bounded_integer(0, 3))
            .collect::<Vec<_>>();
        solver
            .add_constraint(constraints::all_different(variables.clone()))
            .post()
            .expect("feasible");
        solver
            .add_constraint(constraints::less_than_or_equals(variables, 5))
            .post()
            .expect("no immediate conflict");

        let result = solver
            .find_solution(&mut DecisionBudget::new(1))
            .expect("no misuse");

        assert!(matches!(result, SatisfactionResult::Unknown));
    }
}

use std::fmt::Debug;
use std::fmt::Formatter;
use std::rc::Rc;

use log::warn;

use super::ValueSelection;
use super::VariableSelection;
use crate::constraints::Constraint;
use crate::engine::predicates::Predicate;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::RealVariable;
use crate::engine::variables::TransformableVariable;

/// A single narrowing which the search takes as a decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    Integer(Predicate),
    RealLowerBound(RealVariable, f64),
    RealUpperBound(RealVariable, f64),
}

impl From<Predicate> for Decision {
    fn from(predicate: Predicate) -> Self {
        Decision::Integer(predicate)
    }
}

/// How a [`Goal::Minimize`] continues after it found an improving solution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum MinimizationStrategy {
    /// Restart the goal from the position where the minimization started, with the objective
    /// bounded by the new incumbent.
    #[default]
    Restart,
    /// Continue from the current position; the bound on the objective is imposed again every time
    /// the search backtracks to a choice point.
    Fast,
}

/// A composable unit of search, executed by the [`SearchEngine`](super::SearchEngine).
///
/// Goals are pure descriptions: executing a goal never changes it, so the same goal can be
/// executed on many branches of the search tree. Children are reference counted for this reason.
///
/// # Example
/// ```
/// # use cinch_core::constraints;
/// # use cinch_core::search::Goal;
/// # use cinch_core::Solver;
/// let mut solver = Solver::default();
/// let x = solver.new_bounded_integer(0, 10);
/// let y = solver.new_bounded_integer(0, 10);
///
/// // Either x + y = 7 with x < 3, or y = 10.
/// let goal = Goal::or(
///     Goal::and(
///         Goal::post(constraints::equals([x, y], 7)),
///         Goal::post(constraints::less_than([x], 3)),
///     ),
///     Goal::post(constraints::equals([y], 10)),
/// )
/// .and_then(Goal::generate([x, y]));
/// ```
#[derive(Clone)]
pub enum Goal {
    /// Succeeds without doing anything.
    Succeed,
    /// Fails, the search backtracks to the most recent choice point.
    Fail,
    /// Assigns every variable, branching on one decision at a time.
    Generate {
        variables: Rc<[DomainId]>,
        variable_selection: VariableSelection,
        value_selection: ValueSelection,
    },
    /// Applies the decision and propagates.
    Decide(Decision),
    /// Bisects the interval of a real variable until it is at most `precision` wide.
    SplitReal {
        variable: RealVariable,
        precision: f64,
    },
    /// Posts the constraint on the current branch; it is removed again when the search backtracks
    /// past this point.
    Post(Rc<dyn Constraint>),
    /// Executes the first goal and then the second.
    And(Rc<Goal>, Rc<Goal>),
    /// Executes the first goal; if that fails, the second goal is executed from the same state.
    Or(Rc<Goal>, Rc<Goal>),
    /// Branch-and-bound over the solutions of `goal`, minimising `objective`.
    ///
    /// Once no better solution exists, the goal succeeds with the state of the best solution, or
    /// fails if `goal` has no solution at all.
    Minimize {
        goal: Rc<Goal>,
        objective: AffineView<DomainId>,
        strategy: MinimizationStrategy,
    },
    /// Writes a message to the log and succeeds.
    Log(String),
}

impl Goal {
    /// Assigns the variables with the default policies: first-fail with the smallest value.
    pub fn generate(variables: impl IntoIterator<Item = DomainId>) -> Goal {
        Goal::generate_with(
            variables,
            VariableSelection::default(),
            ValueSelection::default(),
        )
    }

    pub fn generate_with(
        variables: impl IntoIterator<Item = DomainId>,
        variable_selection: VariableSelection,
        value_selection: ValueSelection,
    ) -> Goal {
        let variables: Rc<[DomainId]> = variables.into_iter().collect();
        if variables.is_empty() {
            warn!("a generator without variables succeeds immediately");
        }

        Goal::Generate {
            variables,
            variable_selection,
            value_selection,
        }
    }

    /// Assigns the domains underlying the literals, trying `1` before `0`.
    pub fn generate_literals(literals: impl IntoIterator<Item = Literal>) -> Goal {
        Goal::generate_with(
            literals
                .into_iter()
                .map(|literal| *literal.get_integer_variable().inner()),
            VariableSelection::InputOrder,
            ValueSelection::Max,
        )
    }

    pub fn decide(decision: impl Into<Decision>) -> Goal {
        Goal::Decide(decision.into())
    }

    pub fn split_real(variable: RealVariable, precision: f64) -> Goal {
        Goal::SplitReal {
            variable,
            precision,
        }
    }

    pub fn post(constraint: impl Constraint + 'static) -> Goal {
        Goal::Post(Rc::new(constraint))
    }

    pub fn and(first: Goal, second: Goal) -> Goal {
        Goal::And(Rc::new(first), Rc::new(second))
    }

    pub fn or(first: Goal, second: Goal) -> Goal {
        Goal::Or(Rc::new(first), Rc::new(second))
    }

    /// Executes `next` after `self`.
    pub fn and_then(self, next: Goal) -> Goal {
        Goal::and(self, next)
    }

    /// The conjunction of all goals; [`Goal::Succeed`] when there are none.
    pub fn all(goals: impl IntoIterator<Item = Goal>) -> Goal {
        let goals = goals.into_iter().collect::<Vec<_>>();
        goals
            .into_iter()
            .rev()
            .reduce(|rest, goal| Goal::and(goal, rest))
            .unwrap_or(Goal::Succeed)
    }

    /// The disjunction of all goals, tried in order; [`Goal::Fail`] when there are none.
    pub fn any(goals: impl IntoIterator<Item = Goal>) -> Goal {
        let goals = goals.into_iter().collect::<Vec<_>>();
        goals
            .into_iter()
            .rev()
            .reduce(|rest, goal| Goal::or(goal, rest))
            .unwrap_or(Goal::Fail)
    }

    pub fn minimize<Var>(goal: Goal, objective: Var) -> Goal
    where
        Var: IntegerVariable + TransformableVariable<AffineView<DomainId>>,
    {
        Goal::minimize_with(goal, objective, MinimizationStrategy::Restart)
    }

    pub fn maximize<Var>(goal: Goal, objective: Var) -> Goal
    where
        Var: IntegerVariable + TransformableVariable<AffineView<DomainId>>,
    {
        Goal::minimize_with(
            goal,
            TransformableVariable::<AffineView<DomainId>>::scaled(&objective, -1),
            MinimizationStrategy::Restart,
        )
    }

    pub fn fast_minimize<Var>(goal: Goal, objective: Var) -> Goal
    where
        Var: IntegerVariable + TransformableVariable<AffineView<DomainId>>,
    {
        Goal::minimize_with(goal, objective, MinimizationStrategy::Fast)
    }

    pub fn minimize_with<Var>(goal: Goal, objective: Var, strategy: MinimizationStrategy) -> Goal
    where
        Var: IntegerVariable + TransformableVariable<AffineView<DomainId>>,
    {
        Goal::Minimize {
            goal: Rc::new(goal),
            objective: TransformableVariable::<AffineView<DomainId>>::scaled(&objective, 1),
            strategy,
        }
    }

    pub fn log(message: impl Into<String>) -> Goal {
        Goal::Log(message.into())
    }
}

impl Debug for Goal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Goal::Succeed => write!(f, "Succeed"),
            Goal::Fail => write!(f, "Fail"),
            Goal::Generate { variables, .. } => write!(f, "Generate({} variables)", variables.len()),
            Goal::Decide(decision) => write!(f, "Decide({decision:?})"),
            Goal::SplitReal { variable, .. } => write!(f, "SplitReal({variable})"),
            Goal::Post(_) => write!(f, "Post"),
            Goal::And(first, second) => write!(f, "And({first:?}, {second:?})"),
            Goal::Or(first, second) => write!(f, "Or({first:?}, {second:?})"),
            Goal::Minimize {
                goal, objective, ..
            } => write!(f, "Minimize({goal:?}, {objective:?})"),
            Goal::Log(message) => write!(f, "Log({message:?})"),
        }
    }
}

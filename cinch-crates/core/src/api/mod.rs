mod outputs;
pub(crate) mod solver;

pub mod results {
    //! Contains the outputs of solving using the [`Solver`].
    //!
    //! We differentiate between the result of a **satisfaction** problem
    //! ([`SatisfactionResult`]), the result of an **optimisation** problem
    //! ([`OptimisationResult`]), and the enumeration of all solutions ([`AllSolutions`]).
    pub use crate::api::outputs::AllSolutions;
    pub use crate::api::outputs::OptimisationDirection;
    pub use crate::api::outputs::OptimisationResult;
    pub use crate::api::outputs::SatisfactionResult;
    pub use crate::basic_types::Solution;
    pub use crate::basic_types::Value;
    pub use crate::basic_types::Variable;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod variables {
    //! Contains the variables which are used by the [`Solver`].
    //!
    //! A variable, in the context of the solver, is a view onto a domain. It may forward domain
    //! information unaltered, or apply transformations which can be performed without the need of
    //! constraints.
    //!
    //! We define 3 kinds of variables:
    //! - Integer Variables ([`IntegerVariable`]) - These are represented by [`DomainId`]s when
    //!   interacting with the [`Solver`]. They are created with [`Solver::new_bounded_integer`]
    //!   or, when the domain has holes, with [`Solver::new_sparse_integer`]. These variables can
    //!   be transformed (according to the trait [`TransformableVariable`]) to create an
    //!   [`AffineView`].
    //! - Boolean Variables ([`Literal`]) - 0/1 integer variables, created with
    //!   [`Solver::new_literal`]. They are the truth variables of reified constraints.
    //! - Real Variables ([`RealVariable`]) - Intervals of floating point values, created with
    //!   [`Solver::new_real`].
    pub use crate::engine::variables::AffineView;
    pub use crate::engine::variables::DomainId;
    pub use crate::engine::variables::IntegerVariable;
    pub use crate::engine::variables::Literal;
    pub use crate::engine::variables::RealVariable;
    pub use crate::engine::variables::TransformableVariable;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod options {
    //! Contains the options which can be passed to the [`Solver`].
    //!
    //! These influence the following aspects:
    //! - The precision of real domains
    //! - The branching of the default search
    //! - The way optimal solutions are searched for
    pub use crate::api::solver::SolverOptions;
    pub use crate::search::MinimizationStrategy;
    pub use crate::search::ValueSelection;
    pub use crate::search::VariableSelection;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod termination {
    //! Contains the conditions which are used to determine when the [`Solver`] should terminate
    //! even when the state of the satisfaction/optimisation problem is unknown.
    //!
    //! The main [`TerminationCondition`] is a condition which is polled by the [`Solver`] during
    //! the search process. The most common example would be [`TimeBudget`], which terminates the
    //! [`Solver`] whenever the time budget is exceeded.
    pub use crate::search::termination::*;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod predicates {
    //! Contains the atomic constraints `[x >= v]`, `[x <= v]`, `[x == v]` and `[x != v]` over
    //! integer variables. They are the decisions of the search and the narrowings applied by
    //! propagators.
    pub use crate::engine::predicates::*;
}

pub use crate::api::solver::Solver;
pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::ContractViolation;
pub use crate::basic_types::SolverError;

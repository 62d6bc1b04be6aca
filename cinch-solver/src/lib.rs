//! # cinch
//! cinch is a constraint programming engine: variables with trailed domains, propagators which
//! narrow them, and a depth-first search driven by composable goals. A scheduling layer models
//! activities and resources on top of the same substrate.
//!
//! This crate re-exports the engine and bundles the models which the `cinch-solver` binary can
//! run.
//!
//! # Using cinch
//! ```rust
//! # use cinch_solver::constraints;
//! # use cinch_solver::results::OptimisationDirection;
//! # use cinch_solver::results::OptimisationResult;
//! # use cinch_solver::termination::Indefinite;
//! # use cinch_solver::Solver;
//! let mut solver = Solver::default();
//!
//! let x = solver.new_bounded_integer(5, 10);
//! let y = solver.new_bounded_integer(-3, 15);
//! let z = solver.new_bounded_integer(7, 25);
//! let objective = solver.new_bounded_integer(-10, 30);
//!
//! solver
//!     .add_constraint(constraints::all_different(vec![x, y, z]))
//!     .post()
//!     .expect("the constraint is satisfiable");
//! solver
//!     .add_constraint(constraints::maximum(vec![x, y, z], objective))
//!     .post()
//!     .expect("the constraint is satisfiable");
//!
//! let result = solver
//!     .find_optimal_solution(&mut Indefinite, OptimisationDirection::Minimise, objective)
//!     .expect("the model is well-formed");
//!
//! let OptimisationResult::Optimal(solution) = result else {
//!     panic!("the search runs to completion");
//! };
//! assert_eq!(solution.integer_value(objective), Some(7));
//! ```
pub mod models;

pub use cinch_core as core;
pub use cinch_core::*;

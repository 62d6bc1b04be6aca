//! The core of cinch: a constraint programming engine built from a trailed domain store, a
//! queue-driven propagation loop and a depth-first search over composable [`search::Goal`]s.
//! On top of these sits a [`scheduling`] layer which compiles activities and resources to
//! ordinary variables and constraints.
//!
//! # Example
//! ```
//! # use cinch_core::constraints;
//! # use cinch_core::results::SatisfactionResult;
//! # use cinch_core::termination::Indefinite;
//! # use cinch_core::Solver;
//! let mut solver = Solver::default();
//! let x = solver.new_bounded_integer(1, 3);
//! let y = solver.new_bounded_integer(1, 3);
//! let z = solver.new_bounded_integer(1, 3);
//!
//! solver
//!     .add_constraint(constraints::all_different(vec![x, y, z]))
//!     .post()
//!     .expect("the constraint is satisfiable");
//! solver
//!     .add_constraint(constraints::binary_less_than(z, x))
//!     .post()
//!     .expect("the constraint is satisfiable");
//!
//! let result = solver
//!     .find_solution(&mut Indefinite)
//!     .expect("the model is well-formed");
//! let SatisfactionResult::Satisfiable(solution) = result else {
//!     panic!("the model has a solution");
//! };
//!
//! let x_value = solution.integer_value(x).expect("every variable is assigned");
//! let z_value = solution.integer_value(z).expect("every variable is assigned");
//! assert!(z_value < x_value);
//! ```
pub mod asserts;
pub mod basic_types;
pub mod containers;
pub mod engine;
pub mod propagation;
pub(crate) mod propagators;

pub mod constraints;
pub mod scheduling;
pub mod search;
pub mod statistics;

pub use convert_case;
pub use rand;

// We declare a private module with public use, so that all exports from API are exports directly
// from the crate.
//
// Example:
// `use cinch_core::Solver;`
// vs.
// `use cinch_core::api::Solver;`
mod api;

pub use api::*;

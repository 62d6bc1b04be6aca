//! Search is driven by [`Goal`]s: composable descriptions of what to do at a node of the search
//! tree. The [`SearchEngine`] executes a goal depth-first, maintaining a stack of choice points
//! over the trail of the [`State`](crate::engine::State).
//!
//! Failures, either explicit through [`Goal::Fail`] or by propagation emptying a domain, make the
//! engine backtrack to the most recent choice point. Only misuse of the modelling interface is
//! reported as an error.

mod choice_point;
mod engine;
mod goal;
mod selection;
pub mod termination;

pub use engine::SearchEngine;
pub use engine::SearchOutcome;
pub use engine::SearchStatistics;
pub use goal::Decision;
pub use goal::Goal;
pub use goal::MinimizationStrategy;
pub use selection::ValueSelection;
pub use selection::VariableSelection;

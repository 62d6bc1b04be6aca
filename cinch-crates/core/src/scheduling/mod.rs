//! Scheduling entities which compile down to ordinary variables, constraints and goals.
//!
//! A [`Schedule`] owns a planning horizon `[0, horizon)`, a set of [`Activity`]s and a set of
//! resources. Every activity gets a start variable over `[0, horizon - duration]`. Requirements
//! link activities to resources:
//! - Discrete and consumable resources are enforced by a time-table over their
//!   [`CapacityProfile`]: at every time point the summed demand must not exceed the capacity.
//! - Disjunctive resources additionally order every pair of activities using them through two
//!   ordering literals, one of which has to hold.
//!
//! # Example
//! ```rust
//! # use cinch_core::results::SatisfactionResult;
//! # use cinch_core::scheduling::ResourceKind;
//! # use cinch_core::scheduling::Schedule;
//! # use cinch_core::search::Goal;
//! # use cinch_core::termination::Indefinite;
//! # use cinch_core::Solver;
//! let mut solver = Solver::default();
//! let mut schedule = Schedule::new(10).expect("the horizon is positive");
//!
//! let machine = schedule
//!     .add_resource(ResourceKind::Disjunctive, 1)
//!     .expect("valid capacity");
//! let a = schedule.add_activity(&mut solver, 4).expect("fits in the horizon");
//! let b = schedule.add_activity(&mut solver, 3).expect("fits in the horizon");
//! schedule.requires(a, machine, 1).expect("known ids");
//! schedule.requires(b, machine, 1).expect("known ids");
//! schedule.post(&mut solver).expect("the schedule is feasible");
//!
//! let goal = Goal::and(schedule.schedule_activities(), schedule.assign_resources());
//! let result = solver.solve(goal, &mut Indefinite).expect("no misuse");
//! let SatisfactionResult::Satisfiable(solution) = result else {
//!     panic!("both activities fit on the machine");
//! };
//!
//! let times = schedule.activity_times(&solution);
//! assert_eq!(times[0].start, 0);
//! assert_eq!(times[1].start, 4);
//! ```
mod activity;
mod resource;
mod schedule;

pub use activity::*;
pub use resource::*;
pub use schedule::*;

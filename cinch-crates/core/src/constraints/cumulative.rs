use super::add_propagator;
use super::Constraint;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::ContractViolation;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::State;
use crate::propagation::ReadDomains;
use crate::propagators::ArgTask;
use crate::propagators::TimeTablePerPointArgs;

/// Creates the Cumulative [`Constraint`](https://sofdem.github.io/gccat/gccat/Ccumulative.html).
///
/// This constraint ensures that at no point in time, the cumulative resource usage of the tasks
/// exceeds `capacity`. Task `i` starts at `start_times[i]`, runs for `durations[i]` and uses
/// `resource_requirements[i]` of the resource while it runs.
///
/// The time-table is built over the horizon `[0, h)`, where `h` is the latest end of any task
/// when the constraint is posted. Start times must therefore be non-negative.
///
/// # Example
/// ```rust
/// # use cinch_core::constraints;
/// # use cinch_core::Solver;
/// let mut solver = Solver::default();
///
/// let start_0 = solver.new_bounded_integer(0, 4);
/// let start_1 = solver.new_bounded_integer(0, 4);
/// let start_2 = solver.new_bounded_integer(0, 5);
///
/// solver
///     .add_constraint(constraints::cumulative(
///         [start_0, start_1, start_2],
///         [5, 2, 5],
///         [1, 1, 2],
///         2,
///     ))
///     .post()
///     .expect("a schedule exists");
/// ```
pub fn cumulative<Var: IntegerVariable>(
    start_times: impl Into<Box<[Var]>>,
    durations: impl Into<Box<[i32]>>,
    resource_requirements: impl Into<Box<[i32]>>,
    capacity: i32,
) -> Cumulative<Var> {
    Cumulative {
        start_times: start_times.into(),
        durations: durations.into(),
        resource_requirements: resource_requirements.into(),
        capacity: Capacity::Constant(capacity),
    }
}

/// Creates the Cumulative [`Constraint`] over a capacity which varies over time; the capacity at
/// time `t` is `capacity_profile[t]` and the horizon is the length of the profile.
pub fn cumulative_with_profile<Var: IntegerVariable>(
    start_times: impl Into<Box<[Var]>>,
    durations: impl Into<Box<[i32]>>,
    resource_requirements: impl Into<Box<[i32]>>,
    capacity_profile: impl Into<Box<[i32]>>,
) -> Cumulative<Var> {
    Cumulative {
        start_times: start_times.into(),
        durations: durations.into(),
        resource_requirements: resource_requirements.into(),
        capacity: Capacity::Profile(capacity_profile.into()),
    }
}

#[derive(Clone, Debug)]
enum Capacity {
    Constant(i32),
    Profile(Box<[i32]>),
}

#[derive(Clone, Debug)]
pub struct Cumulative<Var> {
    start_times: Box<[Var]>,
    durations: Box<[i32]>,
    resource_requirements: Box<[i32]>,
    capacity: Capacity,
}

impl<Var: IntegerVariable> Cumulative<Var> {
    fn check_arguments(&self, state: &State) -> Result<(), ContractViolation> {
        let num_tasks = self.start_times.len();
        for length in [self.durations.len(), self.resource_requirements.len()] {
            if length != num_tasks {
                return Err(ContractViolation::ScopeMismatch {
                    expected: num_tasks,
                    actual: length,
                });
            }
        }

        if self
            .durations
            .iter()
            .chain(self.resource_requirements.iter())
            .any(|&value| value < 0)
        {
            return Err(ContractViolation::InvalidArgument(
                "durations and resource requirements cannot be negative".to_owned(),
            ));
        }

        if self
            .start_times
            .iter()
            .any(|start_time| state.lower_bound(start_time) < 0)
        {
            return Err(ContractViolation::InvalidArgument(
                "start times of cumulative tasks cannot be negative".to_owned(),
            ));
        }

        Ok(())
    }

    fn capacity_profile(&self, state: &State) -> Box<[i32]> {
        match &self.capacity {
            Capacity::Profile(profile) => profile.clone(),
            Capacity::Constant(capacity) => {
                let horizon = self
                    .start_times
                    .iter()
                    .zip(self.durations.iter())
                    .map(|(start_time, duration)| state.upper_bound(start_time) + duration)
                    .max()
                    .unwrap_or(0);

                vec![*capacity; horizon as usize].into()
            }
        }
    }

    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        state.check_ownership(self.start_times.iter())?;
        state.check_ownership(reification_literal.iter())?;
        self.check_arguments(state)?;

        let tasks = self
            .start_times
            .iter()
            .zip(self.durations.iter())
            .zip(self.resource_requirements.iter())
            .map(|((start_time, &duration), &resource_usage)| ArgTask {
                start_time: start_time.clone(),
                duration,
                resource_usage,
                presence: None,
                until_horizon: false,
            })
            .collect();

        add_propagator(
            state,
            TimeTablePerPointArgs {
                tasks,
                capacity: self.capacity_profile(state),
            },
            reification_literal,
        )
    }
}

impl<Var: IntegerVariable> Constraint for Cumulative<Var> {
    fn post(&self, state: &mut State) -> Result<(), ConstraintOperationError> {
        self.add(state, None)
    }

    fn implied_by(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        self.add(state, Some(reification_literal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut state = State::new(1e-6);
        let s = state.new_interval_variable(0, 5);

        let result = cumulative([s], [1, 2], [1], 1).post(&mut state);

        assert_eq!(
            Err(ConstraintOperationError::ContractViolation(
                ContractViolation::ScopeMismatch {
                    expected: 1,
                    actual: 2
                }
            )),
            result
        );
    }

    #[test]
    fn unary_resource_orders_tasks() {
        let mut state = State::new(1e-6);
        let s1 = state.new_interval_variable(0, 0);
        let s2 = state.new_interval_variable(0, 10);

        cumulative([s1, s2], [3, 2], [1, 1], 1)
            .post(&mut state)
            .expect("feasible");

        assert_eq!(3, state.lower_bound(&s2));
    }

    #[test]
    fn capacity_profile_blocks_time_points() {
        let mut state = State::new(1e-6);
        let s = state.new_interval_variable(0, 4);

        cumulative_with_profile([s], [2], [1], [0, 0, 1, 1, 1, 1])
            .post(&mut state)
            .expect("feasible");

        assert_eq!(2, state.lower_bound(&s));
        assert_eq!(4, state.upper_bound(&s));
    }
}

use super::ArgTask;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainEvents;
use crate::predicate;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`PropagatorConstructor`] for the [`TimeTablePerPointPropagator`].
#[derive(Clone, Debug)]
pub(crate) struct TimeTablePerPointArgs<Var> {
    pub(crate) tasks: Box<[ArgTask<Var>]>,
    /// The capacity at every time point of the horizon `[0, capacity.len())`.
    pub(crate) capacity: Box<[i32]>,
}

impl<Var: IntegerVariable> PropagatorConstructor for TimeTablePerPointArgs<Var> {
    type PropagatorImpl = TimeTablePerPointPropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let num_tasks = self.tasks.len() as u32;
        for (index, task) in self.tasks.iter().enumerate() {
            context.register(
                task.start_time.clone(),
                DomainEvents::BOUNDS,
                LocalId::from(index as u32),
            );
            if let Some(presence) = task.presence {
                context.register(
                    presence,
                    DomainEvents::BOUNDS,
                    LocalId::from(num_tasks + index as u32),
                );
            }
        }

        TimeTablePerPointPropagator {
            tasks: self.tasks,
            capacity: self.capacity,
            statistics: CumulativeStatistics::default(),
        }
    }
}

create_statistics_struct!(CumulativeStatistics {
    num_profile_conflicts: u64,
    num_absent_tasks: u64,
});

/// Propagator responsible for using time-table reasoning to propagate the cumulative constraint.
/// The time-table is created per time point of the horizon.
#[derive(Clone, Debug)]
pub(crate) struct TimeTablePerPointPropagator<Var> {
    tasks: Box<[ArgTask<Var>]>,
    capacity: Box<[i32]>,
    statistics: CumulativeStatistics,
}

/// The usage at every time point of the horizon, together with the compulsory part each task
/// contributed to it.
struct TimeTable {
    usage: Vec<i64>,
    compulsory_parts: Vec<Option<(i32, i32)>>,
}

impl<Var: IntegerVariable> TimeTablePerPointPropagator<Var> {
    fn horizon(&self) -> i32 {
        self.capacity.len() as i32
    }

    /// The interval `[from, to)` which the task certainly uses, if it is present.
    fn compulsory_part<Context: ReadDomains>(
        &self,
        context: &Context,
        task: &ArgTask<Var>,
    ) -> Option<(i32, i32)> {
        if task.is_void() {
            return None;
        }

        let from = context.upper_bound(&task.start_time).max(0);
        let to = task
            .end_when_started_at(context.lower_bound(&task.start_time), self.horizon())
            .min(self.horizon());

        (from < to).then_some((from, to))
    }

    /// Sums the compulsory parts of the tasks which are known to be present.
    fn create_time_table<Context: ReadDomains>(&self, context: &Context) -> TimeTable {
        let mut usage = vec![0_i64; self.capacity.len()];
        let mut compulsory_parts = Vec::with_capacity(self.tasks.len());

        for task in self.tasks.iter() {
            let part = if task.is_present(context) {
                self.compulsory_part(context, task)
            } else {
                None
            };

            if let Some((from, to)) = part {
                for usage_at_time in &mut usage[from as usize..to as usize] {
                    *usage_at_time += task.resource_usage as i64;
                }
            }
            compulsory_parts.push(part);
        }

        TimeTable {
            usage,
            compulsory_parts,
        }
    }

    fn has_overload(&self, time_table: &TimeTable) -> bool {
        time_table
            .usage
            .iter()
            .zip(self.capacity.iter())
            .any(|(&usage, &capacity)| usage > capacity as i64)
    }

    /// Whether the task does not fit on top of the time-table at `time`.
    fn conflicts_at(
        &self,
        time_table: &TimeTable,
        own_part: Option<(i32, i32)>,
        task: &ArgTask<Var>,
        time: i32,
    ) -> bool {
        let own_usage = match own_part {
            Some((from, to)) if from <= time && time < to => task.resource_usage as i64,
            _ => 0,
        };

        time_table.usage[time as usize] - own_usage + task.resource_usage as i64
            > self.capacity[time as usize] as i64
    }

    /// The earliest start in `[lower_bound, upper_bound]` at which the task fits.
    fn earliest_feasible_start(
        &self,
        time_table: &TimeTable,
        own_part: Option<(i32, i32)>,
        task: &ArgTask<Var>,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Option<i32> {
        let upper_bound = upper_bound.min(self.horizon() - task.duration);
        let mut start = lower_bound.max(0);

        while start <= upper_bound {
            let end = task.end_when_started_at(start, self.horizon());
            // Every start up to the last conflicting point overlaps it as well.
            match (start..end)
                .rev()
                .find(|&time| self.conflicts_at(time_table, own_part, task, time))
            {
                None => return Some(start),
                Some(conflict) => start = conflict + 1,
            }
        }

        None
    }

    /// The latest start in `[lower_bound, upper_bound]` at which the task fits.
    fn latest_feasible_start(
        &self,
        time_table: &TimeTable,
        own_part: Option<(i32, i32)>,
        task: &ArgTask<Var>,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Option<i32> {
        let mut start = upper_bound.min(self.horizon() - task.duration);
        let lower_bound = lower_bound.max(0);

        while start >= lower_bound {
            let end = task.end_when_started_at(start, self.horizon());
            match (start..end).find(|&time| self.conflicts_at(time_table, own_part, task, time)) {
                None => return Some(start),
                // Earlier starts keep using the resource at the conflicting point.
                Some(_) if task.until_horizon => return None,
                Some(conflict) => start = conflict - task.duration,
            }
        }

        None
    }
}

impl<Var: IntegerVariable> Propagator for TimeTablePerPointPropagator<Var> {
    fn name(&self) -> &str {
        "CumulativeTimeTablePerPoint"
    }

    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    fn detect_inconsistency(&self, domains: Domains) -> Option<Inconsistency> {
        let time_table = self.create_time_table(&domains);
        self.has_overload(&time_table)
            .then_some(Inconsistency::Failure)
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let time_table = self.create_time_table(&context);
        if self.has_overload(&time_table) {
            self.statistics.num_profile_conflicts += 1;
            return Err(Inconsistency::Failure);
        }

        for (task, &own_part) in self.tasks.iter().zip(time_table.compulsory_parts.iter()) {
            if task.is_void() || task.is_absent(&context) {
                continue;
            }

            let is_present = task.is_present(&context);
            let lower_bound = context.lower_bound(&task.start_time);
            let upper_bound = context.upper_bound(&task.start_time);

            let Some(earliest) =
                self.earliest_feasible_start(&time_table, own_part, task, lower_bound, upper_bound)
            else {
                match task.presence {
                    Some(presence) if !is_present => {
                        self.statistics.num_absent_tasks += 1;
                        context.post(presence.get_false_predicate())?;
                        continue;
                    }
                    _ => {
                        self.statistics.num_profile_conflicts += 1;
                        return Err(Inconsistency::Failure);
                    }
                }
            };

            if !is_present {
                // The start of an optional task is only restricted once it is known to be present.
                continue;
            }

            let latest = self
                .latest_feasible_start(&time_table, own_part, task, earliest, upper_bound)
                .unwrap_or(earliest);

            let start_time = &task.start_time;
            context.post(predicate![start_time >= earliest])?;
            context.post(predicate![start_time <= latest])?;
        }

        Ok(())
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::engine::variables::DomainId;

    fn task(start_time: DomainId, duration: i32, usage: i32) -> ArgTask<DomainId> {
        ArgTask {
            start_time,
            duration,
            resource_usage: usage,
            presence: None,
            until_horizon: false,
        }
    }

    #[test]
    fn tasks_are_pushed_past_the_compulsory_part() {
        let mut solver = TestSolver::default();
        let s1 = solver.new_variable(1, 1);
        let s2 = solver.new_variable(0, 6);

        let _ = solver
            .new_propagator(TimeTablePerPointArgs {
                tasks: [task(s1, 4, 1), task(s2, 3, 1)].into(),
                capacity: vec![1; 10].into(),
            })
            .expect("no empty domains");

        solver.assert_bounds(s2, 5, 6);
    }

    #[test]
    fn latest_start_is_pulled_before_the_compulsory_part() {
        let mut solver = TestSolver::default();
        let s1 = solver.new_variable(6, 6);
        let s2 = solver.new_variable(0, 5);

        let _ = solver
            .new_propagator(TimeTablePerPointArgs {
                tasks: [task(s1, 3, 1), task(s2, 2, 1)].into(),
                capacity: vec![1; 10].into(),
            })
            .expect("no empty domains");

        solver.assert_bounds(s2, 0, 4);
    }

    #[test]
    fn overloaded_profile_fails() {
        let mut solver = TestSolver::default();
        let s1 = solver.new_variable(0, 1);
        let s2 = solver.new_variable(0, 1);

        let result = solver.new_propagator(TimeTablePerPointArgs {
            tasks: [task(s1, 4, 2), task(s2, 4, 2)].into(),
            capacity: vec![3; 8].into(),
        });

        assert!(result.is_err());
    }

    #[test]
    fn capacity_varies_over_time() {
        let mut solver = TestSolver::default();
        let s = solver.new_variable(0, 7);

        let mut capacity = vec![2; 10];
        capacity[2] = 0;
        capacity[3] = 0;
        let _ = solver
            .new_propagator(TimeTablePerPointArgs {
                tasks: [task(s, 2, 1)].into(),
                capacity: capacity.into(),
            })
            .expect("no empty domains");

        // Starting at 0 fits, starting at 1 to 3 overlaps the maintenance window.
        solver.assert_bounds(s, 0, 7);
        solver.set_lower_bound(s, 1).expect("non-empty domain");
        solver.assert_bounds(s, 4, 7);
    }

    #[test]
    fn optional_task_without_room_becomes_absent() {
        let mut solver = TestSolver::default();
        let s1 = solver.new_variable(0, 0);
        let s2 = solver.new_variable(0, 2);
        let presence = solver.new_literal();

        let mut optional = task(s2, 3, 1);
        optional.presence = Some(presence);
        let _ = solver
            .new_propagator(TimeTablePerPointArgs {
                tasks: [task(s1, 5, 1), optional].into(),
                capacity: vec![1; 5].into(),
            })
            .expect("no empty domains");

        assert!(solver.state.is_literal_false(&presence));
    }

    #[test]
    fn depletion_lasts_until_the_horizon() {
        let mut solver = TestSolver::default();
        let s1 = solver.new_variable(3, 3);
        let s2 = solver.new_variable(0, 9);

        let mut consumer = task(s1, 1, 2);
        consumer.until_horizon = true;
        let _ = solver
            .new_propagator(TimeTablePerPointArgs {
                tasks: [consumer, task(s2, 2, 2)].into(),
                capacity: vec![3; 10].into(),
            })
            .expect("no empty domains");

        // From time 3 on only one unit is left.
        solver.assert_bounds(s2, 0, 1);
    }

    #[test]
    fn repropagation_at_the_fixed_point_changes_nothing() {
        let mut solver = TestSolver::default();
        let s1 = solver.new_variable(1, 1);
        let s2 = solver.new_variable(0, 6);
        let s3 = solver.new_variable(0, 8);

        let _ = solver
            .new_propagator(TimeTablePerPointArgs {
                tasks: [task(s1, 4, 1), task(s2, 3, 1), task(s3, 2, 1)].into(),
                capacity: vec![1; 10].into(),
            })
            .expect("no empty domains");

        solver.assert_repropagation_changes_nothing();
    }
}

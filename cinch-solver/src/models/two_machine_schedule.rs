use std::io::Write;

use super::Model;
use crate::results::OptimisationDirection;
use crate::results::Solution;
use crate::scheduling::ActivityId;
use crate::scheduling::ResourceId;
use crate::scheduling::ResourceKind;
use crate::scheduling::Schedule;
use crate::search::Goal;
use crate::variables::DomainId;
use crate::ConstraintOperationError;
use crate::Solver;

/// The durations of the three activities.
pub const DURATIONS: [i32; 3] = [3, 2, 4];

/// Three activities on two disjunctive machines. The first activity runs on the first machine,
/// the third on the second, and the second needs both. The second activity precedes the first,
/// which precedes the third, so no schedule is shorter than 9.
#[derive(Clone, Debug)]
pub struct TwoMachineSchedule {
    pub schedule: Schedule,
    pub activities: [ActivityId; 3],
    pub machines: [ResourceId; 2],
    pub makespan: DomainId,
}

impl TwoMachineSchedule {
    pub fn post(
        solver: &mut Solver,
        horizon: i32,
    ) -> Result<TwoMachineSchedule, ConstraintOperationError> {
        let mut schedule = Schedule::new(horizon)?;

        let machines = [
            schedule.add_resource(ResourceKind::Disjunctive, 1)?,
            schedule.add_resource(ResourceKind::Disjunctive, 1)?,
        ];
        let activities = [
            schedule.add_activity(solver, DURATIONS[0])?,
            schedule.add_activity(solver, DURATIONS[1])?,
            schedule.add_activity(solver, DURATIONS[2])?,
        ];

        schedule.requires(activities[0], machines[0], 1)?;
        schedule.requires(activities[1], machines[0], 1)?;
        schedule.requires(activities[1], machines[1], 1)?;
        schedule.requires(activities[2], machines[1], 1)?;

        schedule.end_before_start(solver, activities[1], activities[0])?;
        schedule.end_before_start(solver, activities[0], activities[2])?;
        let makespan = schedule.makespan(solver)?;

        schedule.post(solver)?;

        Ok(TwoMachineSchedule {
            schedule,
            activities,
            machines,
            makespan,
        })
    }
}

impl Model for TwoMachineSchedule {
    fn goal(&self, _solver: &Solver) -> Goal {
        Goal::and(
            self.schedule.schedule_activities(),
            self.schedule.assign_resources(),
        )
    }

    fn objective(&self) -> Option<(OptimisationDirection, DomainId)> {
        Some((OptimisationDirection::Minimise, self.makespan))
    }

    fn write_solution(&self, solution: &Solution, output: &mut dyn Write) -> std::io::Result<()> {
        for scheduled in self.schedule.activity_times(solution) {
            writeln!(
                output,
                "{}: [{}, {})",
                scheduled.activity, scheduled.start, scheduled.end
            )?;
        }

        for &machine in &self.machines {
            if let Ok(usage) = self.schedule.usage_profile(machine, solution) {
                let profile = usage
                    .iter()
                    .map(|&used| if used > 0 { '#' } else { '.' })
                    .collect::<String>();
                writeln!(output, "{machine}: {profile}")?;
            }
        }

        if let Some(makespan) = solution.integer_value(self.makespan) {
            writeln!(output, "makespan = {makespan}")?;
        }

        Ok(())
    }
}

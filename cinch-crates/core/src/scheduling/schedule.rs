use log::debug;

use super::Activity;
use super::ActivityId;
use super::CapacityProfile;
use super::Requirement;
use super::Resource;
use super::ResourceId;
use super::ResourceKind;
use super::ScheduledActivity;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::ContractViolation;
use crate::basic_types::Solution;
use crate::constraints;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::variables::TransformableVariable;
use crate::propagators::ArgTask;
use crate::propagators::TimeTablePerPointArgs;
use crate::search::Goal;
use crate::search::ValueSelection;
use crate::search::VariableSelection;
use crate::Solver;

/// Activities and resources over the planning horizon `[0, horizon)`.
///
/// Activities and precedences are added to the [`Solver`] immediately. Resource requirements
/// are collected and only turned into constraints by [`Schedule::post`], so that capacity
/// profiles can be shaped until then.
#[derive(Clone, Debug)]
pub struct Schedule {
    horizon: i32,
    activities: KeyedVec<ActivityId, Activity>,
    resources: KeyedVec<ResourceId, Resource>,
    /// The choice literals of [`Schedule::requires_one_of`].
    choice_literals: Vec<Literal>,
    /// The ordering literals of the activities on disjunctive resources.
    ordering_literals: Vec<Literal>,
    is_posted: bool,
}

impl Schedule {
    pub fn new(horizon: i32) -> Result<Schedule, ContractViolation> {
        if horizon <= 0 {
            return Err(ContractViolation::InvalidArgument(format!(
                "the horizon must be positive, got {horizon}"
            )));
        }

        Ok(Schedule {
            horizon,
            activities: KeyedVec::default(),
            resources: KeyedVec::default(),
            choice_literals: vec![],
            ordering_literals: vec![],
            is_posted: false,
        })
    }

    pub fn horizon(&self) -> i32 {
        self.horizon
    }

    pub fn activity(&self, activity: ActivityId) -> Result<&Activity, ContractViolation> {
        self.activities
            .get(activity)
            .ok_or_else(|| ContractViolation::InvalidArgument(format!("unknown {activity}")))
    }

    pub fn activities(&self) -> impl Iterator<Item = (ActivityId, &Activity)> + '_ {
        self.activities.keys().zip(self.activities.iter())
    }

    pub fn capacity_profile(
        &self,
        resource: ResourceId,
    ) -> Result<&CapacityProfile, ContractViolation> {
        self.resource(resource).map(|resource| &resource.profile)
    }

    fn resource(&self, resource: ResourceId) -> Result<&Resource, ContractViolation> {
        self.resources
            .get(resource)
            .ok_or_else(|| ContractViolation::InvalidArgument(format!("unknown {resource}")))
    }

    fn resource_mut(&mut self, resource: ResourceId) -> Result<&mut Resource, ContractViolation> {
        let _ = self.resource(resource)?;
        Ok(&mut self.resources[resource])
    }

    fn check_not_posted(&self) -> Result<(), ContractViolation> {
        if self.is_posted {
            return Err(ContractViolation::InvalidArgument(
                "the schedule has already been posted".to_owned(),
            ));
        }

        Ok(())
    }

    /// Creates an activity whose start variable ranges over `[0, horizon - duration]`.
    pub fn add_activity(
        &mut self,
        solver: &mut Solver,
        duration: i32,
    ) -> Result<ActivityId, ContractViolation> {
        self.check_not_posted()?;
        if duration < 0 || duration > self.horizon {
            return Err(ContractViolation::InvalidArgument(format!(
                "an activity of duration {duration} does not fit in the horizon {}",
                self.horizon
            )));
        }

        let start = solver.new_bounded_integer(0, self.horizon - duration);
        Ok(self.activities.push(Activity { start, duration }))
    }

    /// Creates a resource with a constant capacity. The capacity of a disjunctive resource is
    /// at most 1.
    pub fn add_resource(
        &mut self,
        kind: ResourceKind,
        capacity: i32,
    ) -> Result<ResourceId, ContractViolation> {
        self.check_not_posted()?;
        if capacity < 0 {
            return Err(ContractViolation::InvalidArgument(format!(
                "the capacity of a resource cannot be negative, got {capacity}"
            )));
        }

        let capacity = if kind == ResourceKind::Disjunctive {
            capacity.min(1)
        } else {
            capacity
        };

        Ok(self.resources.push(Resource {
            kind,
            profile: CapacityProfile::constant(self.horizon, capacity),
            requirements: vec![],
        }))
    }

    /// Sets the capacity of `resource` during `[from, to)`.
    pub fn set_capacity_max(
        &mut self,
        resource: ResourceId,
        from: i32,
        to: i32,
        capacity: i32,
    ) -> Result<(), ContractViolation> {
        self.check_not_posted()?;
        if from < 0 || to > self.horizon || from > to {
            return Err(ContractViolation::InvalidArgument(format!(
                "[{from}, {to}) is not a range within the horizon {}",
                self.horizon
            )));
        }
        if capacity < 0 {
            return Err(ContractViolation::InvalidArgument(format!(
                "the capacity of a resource cannot be negative, got {capacity}"
            )));
        }

        let resource = self.resource_mut(resource)?;
        let capacity = if resource.kind == ResourceKind::Disjunctive {
            capacity.min(1)
        } else {
            capacity
        };
        resource.profile.set_capacity_max(from, to, capacity);

        Ok(())
    }

    /// `activity` uses `quantity` units of `resource` while it executes.
    pub fn requires(
        &mut self,
        activity: ActivityId,
        resource: ResourceId,
        quantity: i32,
    ) -> Result<(), ContractViolation> {
        self.add_requirement(resource, activity, quantity, None, false)
    }

    /// `activity` uses `quantity` units of exactly one of `resources` while it executes.
    ///
    /// Returns the choice literals, one per candidate in the given order; the literal of a
    /// candidate is true when the activity uses it.
    pub fn requires_one_of(
        &mut self,
        solver: &mut Solver,
        activity: ActivityId,
        resources: &[ResourceId],
        quantity: i32,
    ) -> Result<Vec<Literal>, ConstraintOperationError> {
        self.check_not_posted()?;
        if resources.is_empty() {
            return Err(ContractViolation::InvalidArgument(format!(
                "{activity} requires one of an empty set of resources"
            ))
            .into());
        }
        let _ = self.activity(activity)?;
        for &resource in resources {
            let _ = self.resource(resource)?;
        }

        let choices = solver.new_literals().take(resources.len()).collect::<Vec<_>>();
        for (&resource, &choice) in resources.iter().zip(choices.iter()) {
            self.add_requirement(resource, activity, quantity, Some(choice), false)?;
        }
        self.choice_literals.extend(choices.iter().copied());

        solver
            .add_constraint(constraints::equals(choices.clone(), 1))
            .post()?;

        Ok(choices)
    }

    /// `activity` depletes `quantity` units of the consumable `resource` from its start until
    /// the end of the horizon.
    pub fn consumes(
        &mut self,
        activity: ActivityId,
        resource: ResourceId,
        quantity: i32,
    ) -> Result<(), ContractViolation> {
        if self.resource(resource)?.kind != ResourceKind::Consumable {
            return Err(ContractViolation::InvalidArgument(format!(
                "{resource} is not consumable"
            )));
        }

        self.add_requirement(resource, activity, quantity, None, true)
    }

    fn add_requirement(
        &mut self,
        resource: ResourceId,
        activity: ActivityId,
        quantity: i32,
        choice: Option<Literal>,
        until_horizon: bool,
    ) -> Result<(), ContractViolation> {
        self.check_not_posted()?;
        let _ = self.activity(activity)?;
        if quantity < 0 {
            return Err(ContractViolation::InvalidArgument(format!(
                "{activity} cannot require a negative quantity"
            )));
        }

        self.resource_mut(resource)?.requirements.push(Requirement {
            activity,
            quantity,
            choice,
            until_horizon,
        });

        Ok(())
    }

    /// `before` ends no later than `after` starts.
    pub fn end_before_start(
        &self,
        solver: &mut Solver,
        before: ActivityId,
        after: ActivityId,
    ) -> Result<(), ConstraintOperationError> {
        let end = self.activity(before)?.end();
        let start = self.activity(after)?.start.scaled(1);

        solver
            .add_constraint(constraints::binary_less_than_or_equals(end, start))
            .post()
    }

    /// `before` starts no later than `after` starts.
    pub fn start_before_start(
        &self,
        solver: &mut Solver,
        before: ActivityId,
        after: ActivityId,
    ) -> Result<(), ConstraintOperationError> {
        let first = self.activity(before)?.start;
        let second = self.activity(after)?.start;

        solver
            .add_constraint(constraints::binary_less_than_or_equals(first, second))
            .post()
    }

    /// Creates the variable which is the latest end of any activity.
    pub fn makespan(&self, solver: &mut Solver) -> Result<DomainId, ConstraintOperationError> {
        let makespan = solver.new_bounded_integer(0, self.horizon);
        let ends = self
            .activities
            .iter()
            .map(Activity::end)
            .collect::<Vec<_>>();

        if ends.is_empty() {
            solver
                .add_constraint(constraints::equals([makespan], 0))
                .post()?;
        } else {
            solver
                .add_constraint(constraints::maximum(ends, makespan))
                .post()?;
        }

        Ok(makespan)
    }

    /// Adds the resource constraints to the solver. After this, the schedule can no longer be
    /// changed.
    pub fn post(&mut self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        self.check_not_posted()?;
        self.is_posted = true;

        for resource in self.resources.iter() {
            self.post_time_table(solver, resource)?;
        }

        let mut ordering_literals = vec![];
        for resource in self
            .resources
            .iter()
            .filter(|resource| resource.kind == ResourceKind::Disjunctive)
        {
            self.post_orderings(solver, resource, &mut ordering_literals)?;
        }
        self.ordering_literals = ordering_literals;

        debug!(
            "posted a schedule of {} activities on {} resources with {} ordering literals",
            self.activities.len(),
            self.resources.len(),
            self.ordering_literals.len()
        );

        Ok(())
    }

    fn post_time_table(
        &self,
        solver: &mut Solver,
        resource: &Resource,
    ) -> Result<(), ConstraintOperationError> {
        let tasks = resource
            .requirements
            .iter()
            .filter(|requirement| requirement.quantity > 0)
            .map(|requirement| {
                let activity = &self.activities[requirement.activity];
                ArgTask {
                    start_time: activity.start,
                    duration: activity.duration,
                    resource_usage: match resource.kind {
                        ResourceKind::Disjunctive => 1,
                        ResourceKind::Discrete | ResourceKind::Consumable => requirement.quantity,
                    },
                    presence: requirement.choice,
                    until_horizon: requirement.until_horizon,
                }
            })
            .collect::<Box<[_]>>();

        if tasks.is_empty() {
            return Ok(());
        }

        let capacity: Box<[i32]> = resource.profile.as_slice().into();
        solver.add_to_root(|state| {
            state
                .add_propagator(TimeTablePerPointArgs { tasks, capacity })
                .map(|_| ())
        })
    }

    /// For every pair of activities on the disjunctive `resource`, one of two ordering literals
    /// must hold when both use the resource. Each ordering literal implies its precedence.
    fn post_orderings(
        &self,
        solver: &mut Solver,
        resource: &Resource,
        ordering_literals: &mut Vec<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        let requirements = resource
            .requirements
            .iter()
            .filter(|requirement| requirement.quantity > 0)
            .collect::<Vec<_>>();

        for (index, first) in requirements.iter().enumerate() {
            for second in &requirements[index + 1..] {
                if first.activity == second.activity {
                    continue;
                }

                let first_activity = self.activities[first.activity];
                let second_activity = self.activities[second.activity];

                let first_before_second = solver.new_literal();
                let second_before_first = solver.new_literal();
                solver
                    .add_constraint(constraints::binary_less_than_or_equals(
                        first_activity.end(),
                        second_activity.start.scaled(1),
                    ))
                    .implied_by(first_before_second)?;
                solver
                    .add_constraint(constraints::binary_less_than_or_equals(
                        second_activity.end(),
                        first_activity.start.scaled(1),
                    ))
                    .implied_by(second_before_first)?;

                let clause = [first.choice, second.choice]
                    .into_iter()
                    .flatten()
                    .map(|choice| !choice)
                    .chain([first_before_second, second_before_first])
                    .collect::<Vec<_>>();
                solver
                    .add_constraint(constraints::disjunction(clause))
                    .post()?;

                ordering_literals.extend([first_before_second, second_before_first]);
            }
        }

        Ok(())
    }

    /// Generates the start of every activity, earliest start first, at its earliest time.
    pub fn schedule_activities(&self) -> Goal {
        Goal::generate_with(
            self.activities.iter().map(Activity::start),
            VariableSelection::Smallest,
            ValueSelection::Min,
        )
    }

    /// Generates the resource choices of alternative requirements, and the orderings on the
    /// disjunctive resources.
    pub fn assign_resources(&self) -> Goal {
        Goal::generate_literals(
            self.choice_literals
                .iter()
                .chain(self.ordering_literals.iter())
                .copied(),
        )
    }

    /// The committed start and end of every activity in `solution`. Activities whose start is
    /// not fixed in the solution are left out.
    pub fn activity_times(&self, solution: &Solution) -> Vec<ScheduledActivity> {
        self.activities()
            .filter_map(|(id, activity)| {
                let start = solution.integer_value(activity.start)?;
                Some(ScheduledActivity {
                    activity: id,
                    start,
                    end: start + activity.duration,
                })
            })
            .collect()
    }

    /// The usage of `resource` at every time point of the horizon in `solution`.
    ///
    /// Requirements whose activity is not fixed, or whose choice literal is not true, are not
    /// counted.
    pub fn usage_profile(
        &self,
        resource: ResourceId,
        solution: &Solution,
    ) -> Result<Vec<i32>, ContractViolation> {
        let resource = self.resource(resource)?;
        let mut usage = vec![0; self.horizon as usize];

        for requirement in &resource.requirements {
            let activity = &self.activities[requirement.activity];
            let Some(start) = solution.integer_value(activity.start) else {
                continue;
            };
            let is_used = requirement
                .choice
                .map_or(true, |choice| solution.literal_value(choice) == Some(true));
            if !is_used {
                continue;
            }

            let end = if requirement.until_horizon {
                self.horizon
            } else {
                start + activity.duration
            };
            for value in &mut usage[start as usize..end as usize] {
                *value += requirement.quantity;
            }
        }

        Ok(usage)
    }
}

use enumset::EnumSet;

use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainEvent;
use crate::engine::DomainEvents;
use crate::engine::TrailedInteger;
use crate::predicate;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::LocalId;
use crate::propagation::NotificationContext;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`LinearLessOrEqualPropagator`].
#[derive(Clone, Debug)]
pub(crate) struct LinearLessOrEqualPropagatorArgs<Var> {
    pub(crate) x: Box<[Var]>,
    pub(crate) c: i64,
}

impl<Var> PropagatorConstructor for LinearLessOrEqualPropagatorArgs<Var>
where
    Var: IntegerVariable,
{
    type PropagatorImpl = LinearLessOrEqualPropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let LinearLessOrEqualPropagatorArgs { x, mut c } = self;

        // Fixed terms are moved to the right-hand side.
        c -= x
            .iter()
            .filter(|var| context.is_fixed(*var))
            .map(|var| context.lower_bound(var) as i64)
            .sum::<i64>();
        let x: Box<[Var]> = x
            .iter()
            .filter(|var| !context.is_fixed(*var))
            .cloned()
            .collect();

        let mut lower_bound_left_hand_side = 0_i64;
        let mut current_bounds = vec![];

        for (i, x_i) in x.iter().enumerate() {
            context.register(
                x_i.clone(),
                DomainEvents::LOWER_BOUND,
                LocalId::from(i as u32),
            );
            lower_bound_left_hand_side += context.lower_bound(x_i) as i64;
            current_bounds.push(context.new_trailed_integer(context.lower_bound(x_i) as i64));
        }

        let lower_bound_left_hand_side = context.new_trailed_integer(lower_bound_left_hand_side);

        LinearLessOrEqualPropagator {
            x,
            c,
            lower_bound_left_hand_side,
            current_bounds: current_bounds.into(),
        }
    }
}

/// Propagator for the constraint `\sum x_i <= c`.
#[derive(Clone, Debug)]
pub(crate) struct LinearLessOrEqualPropagator<Var> {
    x: Box<[Var]>,
    c: i64,

    /// The lower bound of the sum of the left-hand side. This is incremental state.
    lower_bound_left_hand_side: TrailedInteger,
    /// The value at index `i` is the bound for `x[i]`.
    current_bounds: Box<[TrailedInteger]>,
}

impl<Var> Propagator for LinearLessOrEqualPropagator<Var>
where
    Var: IntegerVariable,
{
    fn name(&self) -> &str {
        "LinearLeq"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn detect_inconsistency(&self, domains: Domains) -> Option<Inconsistency> {
        (self.c < domains.value(self.lower_bound_left_hand_side)).then_some(Inconsistency::Failure)
    }

    fn notify(
        &mut self,
        mut context: NotificationContext,
        local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> EnqueueDecision {
        let index = local_id.unpack() as usize;
        let x_i = &self.x[index];

        let old_bound = context.value(self.current_bounds[index]);
        let new_bound = context.lower_bound(x_i) as i64;

        // Several queued events for the same variable are all seen after the last change.
        if old_bound == new_bound {
            return EnqueueDecision::Skip;
        }

        context.add_assign(self.lower_bound_left_hand_side, new_bound - old_bound);
        context.assign(self.current_bounds[index], new_bound);

        EnqueueDecision::Enqueue
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if let Some(inconsistency) = self.detect_inconsistency(context.domains()) {
            return Err(inconsistency);
        }

        let lower_bound_left_hand_side = context.value(self.lower_bound_left_hand_side);

        for x_i in self.x.iter() {
            let slack = self.c - (lower_bound_left_hand_side - context.lower_bound(x_i) as i64);
            // A slack beyond the domain of i32 can never prune.
            let Ok(bound) = i32::try_from(slack) else {
                continue;
            };

            if context.upper_bound(x_i) > bound {
                context.post(predicate![x_i <= bound])?;
            }
        }

        Ok(())
    }
}

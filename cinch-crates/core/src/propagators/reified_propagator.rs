use enumset::EnumSet;

use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::Literal;
use crate::engine::DomainEvent;
use crate::engine::DomainEvents;
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
use crate::statistics::StatisticLogger;

/// A [`PropagatorConstructor`] for the [`ReifiedPropagator`].
#[derive(Clone, Debug)]
pub(crate) struct ReifiedPropagatorArgs<WrappedArgs> {
    pub(crate) propagator: WrappedArgs,
    pub(crate) reification_literal: Literal,
}

/// The local id of the reification literal. The wrapped propagator is expected to use small
/// consecutive ids, which stay below this one.
const REIFICATION_LITERAL_ID: LocalId = LocalId::from(u32::MAX);

impl<WrappedArgs> PropagatorConstructor for ReifiedPropagatorArgs<WrappedArgs>
where
    WrappedArgs: PropagatorConstructor,
{
    type PropagatorImpl = ReifiedPropagator<WrappedArgs::PropagatorImpl>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let ReifiedPropagatorArgs {
            propagator,
            reification_literal,
        } = self;

        let propagator = propagator.create(context.reborrow());

        context.register(
            reification_literal,
            DomainEvents::BOUNDS,
            REIFICATION_LITERAL_ID,
        );

        let name = format!("Reified({})", propagator.name());

        ReifiedPropagator {
            propagator,
            reification_literal,
            name,
        }
    }
}

/// Propagator for the constraint `r -> p`, where `r` is a Boolean literal and `p` is an arbitrary
/// propagator.
///
/// When a propagator is reified, it will only propagate whenever `r` is set to true. However, if
/// the propagator implements [`Propagator::detect_inconsistency`], the result of that method may
/// be used to propagate `r` to false. If that method is not implemented, `r` will never be
/// propagated to false.
#[derive(Clone, Debug)]
pub(crate) struct ReifiedPropagator<WrappedPropagator> {
    propagator: WrappedPropagator,
    reification_literal: Literal,
    /// The formatted name of the propagator.
    name: String,
}

impl<WrappedPropagator: Propagator> Propagator for ReifiedPropagator<WrappedPropagator> {
    fn notify(
        &mut self,
        context: NotificationContext,
        local_id: LocalId,
        events: EnumSet<DomainEvent>,
    ) -> EnqueueDecision {
        if local_id == REIFICATION_LITERAL_ID {
            return EnqueueDecision::Enqueue;
        }

        // The wrapped propagator keeps its incremental state up to date regardless of the
        // literal, but it only needs to run when the literal is not false.
        let literal_is_false = context.is_literal_false(&self.reification_literal);
        let decision = self.propagator.notify(context, local_id, events);
        if literal_is_false {
            EnqueueDecision::Skip
        } else {
            decision
        }
    }

    fn priority(&self) -> Priority {
        self.propagator.priority()
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.propagate_reification(&mut context)?;

        if context.is_literal_true(&self.reification_literal) {
            self.propagator.propagate(context)?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn detect_inconsistency(&self, domains: Domains) -> Option<Inconsistency> {
        if domains.is_literal_true(&self.reification_literal) {
            self.propagator.detect_inconsistency(domains)
        } else {
            None
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.propagator.log_statistics(statistic_logger)
    }
}

impl<Prop: Propagator> ReifiedPropagator<Prop> {
    fn propagate_reification(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        if context.is_literal_true(&self.reification_literal)
            || context.is_literal_false(&self.reification_literal)
        {
            return Ok(());
        }

        if self
            .propagator
            .detect_inconsistency(context.domains())
            .is_some()
        {
            context.post(self.reification_literal.get_false_predicate())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::propagators::LinearLessOrEqualPropagatorArgs;
    use crate::propagators::LinearNotEqualPropagatorArgs;

    #[test]
    fn wrapped_propagator_runs_once_the_literal_is_true() {
        let mut solver = TestSolver::default();
        let reification_literal = solver.new_literal();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(ReifiedPropagatorArgs {
                propagator: LinearLessOrEqualPropagatorArgs {
                    x: [x, y].into(),
                    c: 4,
                },
                reification_literal,
            })
            .expect("no empty domains");
        solver.assert_bounds(x, 0, 10);

        solver
            .set_literal(reification_literal, true)
            .expect("non-empty domain");
        solver.assert_bounds(x, 0, 4);
        solver.assert_bounds(y, 0, 4);
    }

    #[test]
    fn detected_inconsistency_falsifies_the_literal() {
        let mut solver = TestSolver::default();
        let reification_literal = solver.new_literal();
        let x = solver.new_variable(3, 10);
        let y = solver.new_variable(2, 10);

        let _ = solver
            .new_propagator(ReifiedPropagatorArgs {
                propagator: LinearLessOrEqualPropagatorArgs {
                    x: [x, y].into(),
                    c: 4,
                },
                reification_literal,
            })
            .expect("no empty domains");

        assert!(solver.state.is_literal_false(&reification_literal));
    }

    #[test]
    fn inconsistency_after_notification_falsifies_the_literal() {
        let mut solver = TestSolver::default();
        let reification_literal = solver.new_literal();
        let x = solver.new_variable(0, 3);
        let y = solver.new_variable(0, 3);

        let _ = solver
            .new_propagator(ReifiedPropagatorArgs {
                propagator: LinearNotEqualPropagatorArgs {
                    terms: [x, y].into(),
                    rhs: 3,
                },
                reification_literal,
            })
            .expect("no empty domains");
        assert!(!solver.state.is_literal_false(&reification_literal));

        solver.set_lower_bound(x, 3).expect("non-empty domain");
        solver.set_upper_bound(y, 0).expect("non-empty domain");

        assert!(solver.state.is_literal_false(&reification_literal));
    }

    #[test]
    fn true_literal_with_violated_propagator_fails() {
        let mut solver = TestSolver::default();
        let reification_literal = solver.new_literal();
        let x = solver.new_variable(3, 10);
        let y = solver.new_variable(2, 10);

        let _ = solver
            .new_propagator(ReifiedPropagatorArgs {
                propagator: LinearLessOrEqualPropagatorArgs {
                    x: [x, y].into(),
                    c: 8,
                },
                reification_literal,
            })
            .expect("no empty domains");

        solver.set_lower_bound(x, 7).expect("non-empty domain");
        assert!(solver.set_literal(reification_literal, true).is_err());
    }
}

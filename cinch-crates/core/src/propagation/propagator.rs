use enumset::EnumSet;

use super::Domains;
use super::NotificationContext;
use super::PropagationContext;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::engine::DomainEvent;
#[cfg(doc)]
use crate::propagation::PropagatorConstructor;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::LocalId;
use crate::statistics::StatisticLogger;

/// A propagator removes values from domains which will never be in any solution, or signals that
/// the current state is infeasible.
///
/// The only required functions are [`Propagator::name`] and [`Propagator::propagate`]; all other
/// functions have default implementations.
///
/// Propagation has to be idempotent: calling [`Propagator::propagate`] again without any domain
/// having changed should not change anything either. Propagators are not required to propagate
/// until a fixed point; they are called again as long as they are notified of changes.
pub trait Propagator {
    /// Return the name of the propagator.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Removes values from the domains of variables (using [`PropagationContext::post`]) which
    /// cannot be part of any solution given the current domains.
    ///
    /// Returns an [`Inconsistency`] when a domain became empty or when the propagator found the
    /// current domains to be infeasible.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Returns whether the propagator should be enqueued for propagation when a [`DomainEvent`]
    /// happens to one of the variables the propagator is subscribed to (as registered during
    /// creation with [`PropagatorConstructor`] using [`PropagatorConstructorContext::register`]).
    ///
    /// This can be used to incrementally maintain data structures, and should only be used for
    /// computationally cheap logic. Expensive computation should be performed in the
    /// [`Propagator::propagate`] method.
    ///
    /// By default the propagator is always enqueued for every event it is subscribed to.
    fn notify(
        &mut self,
        _context: NotificationContext,
        _local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Returns the [`Priority`] of the propagator, used for determining the order in which
    /// propagators are called.
    ///
    /// By default the priority is set to [`Priority::VeryLow`].
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Returns [`Some`] when this propagator can tell, without propagating, that the current
    /// domains violate it.
    ///
    /// Reified propagators use this to propagate their reification literal. An implementation is
    /// not needed for correctness, as [`Propagator::propagate`] should still detect the
    /// inconsistency as well.
    fn detect_inconsistency(&self, _domains: Domains) -> Option<Inconsistency> {
        None
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The priority of a propagator, used for determining the order in which propagators will be
/// called.
///
/// Propagators with high priority are propagated before propagators with low(er) priority.
/// Propagators with the same priority are run in the order in which they were enqueued.
///
/// Typically, propagators with low computational complexity should be assigned a high
/// priority (i.e., should be propagated before computationally expensive propagators).
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        ((*self) as u8).partial_cmp(&((*other) as u8))
    }
}

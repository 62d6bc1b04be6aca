use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use enumset::EnumSet;

use super::AffineView;
use super::IntegerVariable;
use super::TransformableVariable;
use crate::basic_types::Solution;
use crate::engine::DomainEvent;
use crate::engine::DomainStore;
use crate::engine::Watchers;

static NEXT_CONTEXT: AtomicU32 = AtomicU32::new(0);

/// Identifies the solver which created a variable. Variables of one solver cannot be used in the
/// constraints of another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(u32);

impl ContextId {
    pub(crate) fn fresh() -> ContextId {
        ContextId(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A structure which represents the most basic [`IntegerVariable`]; it is simply the id which links
/// to a domain (hence the name).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainId {
    context: ContextId,
    id: u32,
}

impl DomainId {
    pub(crate) fn new(context: ContextId, id: u32) -> Self {
        DomainId { context, id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn index(&self) -> usize {
        self.id as usize
    }
}

impl IntegerVariable for DomainId {
    type AffineView = AffineView<Self>;

    fn lower_bound(&self, domains: &DomainStore) -> i32 {
        domains.lower_bound(*self)
    }

    fn upper_bound(&self, domains: &DomainStore) -> i32 {
        domains.upper_bound(*self)
    }

    fn contains(&self, domains: &DomainStore, value: i32) -> bool {
        domains.contains(*self, value)
    }

    fn iterate_domain(&self, domains: &DomainStore) -> impl Iterator<Item = i32> {
        domains.iterate_domain(*self)
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        watchers.watch_all(*self, events);
    }

    fn unpack_event(&self, events: EnumSet<DomainEvent>) -> EnumSet<DomainEvent> {
        events
    }

    fn context(&self) -> ContextId {
        self.context
    }

    fn solution_value(&self, solution: &Solution) -> Option<i32> {
        solution
            .integer_bounds(*self)
            .and_then(|(lower_bound, upper_bound)| {
                (lower_bound == upper_bound).then_some(lower_bound)
            })
    }
}

impl TransformableVariable<AffineView<DomainId>> for DomainId {
    fn scaled(&self, scale: i32) -> AffineView<DomainId> {
        AffineView::new(*self, scale, 0)
    }

    fn offset(&self, offset: i32) -> AffineView<DomainId> {
        AffineView::new(*self, 1, offset)
    }
}

impl Display for DomainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

impl Debug for DomainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

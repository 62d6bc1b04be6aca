use crate::containers::StorageKey;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::TransformableVariable;

/// Identifies an [`Activity`] within its [`Schedule`](super::Schedule).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActivityId(u32);

impl std::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "activity {}", self.0)
    }
}

impl StorageKey for ActivityId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ActivityId(index as u32)
    }
}

/// A task of fixed duration which executes during `[start, start + duration)`.
#[derive(Clone, Copy, Debug)]
pub struct Activity {
    pub(super) start: DomainId,
    pub(super) duration: i32,
}

impl Activity {
    pub fn start(&self) -> DomainId {
        self.start
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    /// The view `start + duration`.
    pub fn end(&self) -> AffineView<DomainId> {
        self.start.offset(self.duration)
    }
}

/// The committed times of an activity in a solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledActivity {
    pub activity: ActivityId,
    pub start: i32,
    pub end: i32,
}

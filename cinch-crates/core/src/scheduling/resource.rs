use super::ActivityId;
use crate::containers::StorageKey;
use crate::engine::variables::Literal;

/// Identifies a resource within its [`Schedule`](super::Schedule).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResourceId(u32);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "resource {}", self.0)
    }
}

impl StorageKey for ResourceId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ResourceId(index as u32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Any number of activities can use the resource at the same time, as long as their summed
    /// demand stays within the capacity.
    Discrete,
    /// At most one activity uses the resource at a time.
    Disjunctive,
    /// Like [`ResourceKind::Discrete`], but activities can also deplete the resource for the
    /// rest of the horizon.
    Consumable,
}

/// The capacity of a resource as a step function over the horizon.
///
/// The profile is part of the problem definition; it is not trailed, and changes after the
/// schedule is posted have no effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapacityProfile {
    capacities: Vec<i32>,
}

impl CapacityProfile {
    pub(super) fn constant(horizon: i32, capacity: i32) -> Self {
        CapacityProfile {
            capacities: vec![capacity; horizon as usize],
        }
    }

    /// The capacity during `[time, time + 1)`, or [`None`] outside the horizon.
    pub fn capacity_at(&self, time: i32) -> Option<i32> {
        usize::try_from(time)
            .ok()
            .and_then(|time| self.capacities.get(time))
            .copied()
    }

    /// Sets the capacity during `[from, to)` to `capacity`.
    pub(super) fn set_capacity_max(&mut self, from: i32, to: i32, capacity: i32) {
        for value in &mut self.capacities[from as usize..to as usize] {
            *value = capacity;
        }
    }

    pub fn horizon(&self) -> i32 {
        self.capacities.len() as i32
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.capacities
    }
}

/// A use of a resource by an activity.
#[derive(Clone, Copy, Debug)]
pub(super) struct Requirement {
    pub(super) activity: ActivityId,
    pub(super) quantity: i32,
    /// Set for alternative resources; the requirement only holds when the literal is true.
    pub(super) choice: Option<Literal>,
    /// Whether the activity depletes the resource from its start until the end of the horizon.
    pub(super) until_horizon: bool,
}

#[derive(Clone, Debug)]
pub(super) struct Resource {
    pub(super) kind: ResourceKind,
    pub(super) profile: CapacityProfile,
    pub(super) requirements: Vec<Requirement>,
}

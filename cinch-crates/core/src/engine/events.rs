use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// One aspect of a change to a domain. A single narrowing produces a set of aspects, e.g. tightening
/// the lower bound up to the upper bound is both a [`DomainEvent::LowerBound`] and a
/// [`DomainEvent::Assign`] event.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// The domain has been reduced to a single value.
    Assign,
    /// The lower bound has increased.
    LowerBound,
    /// The upper bound has decreased.
    UpperBound,
    /// At least one value was removed from the domain.
    Removal,
}

/// A set of [`DomainEvent`]s which a propagator subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Every change to an integer domain.
    pub const ANY_INT: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        DomainEvent::Assign
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
    ));
    /// Changes to either of the bounds.
    pub const BOUNDS: DomainEvents = DomainEvents::create_with_int_events(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound
    ));
    pub const LOWER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(DomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(DomainEvent::UpperBound));
    pub const ASSIGN: DomainEvents =
        DomainEvents::create_with_int_events(enum_set!(DomainEvent::Assign));

    pub const fn create_with_int_events(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn events(&self) -> EnumSet<DomainEvent> {
        self.events
    }
}

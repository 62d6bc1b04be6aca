use enumset::EnumSet;

use super::ContextId;
use super::DomainId;
use super::IntegerVariable;
use super::TransformableVariable;
use crate::basic_types::Solution;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateConstructor;
use crate::engine::DomainEvent;
use crate::engine::DomainStore;
use crate::engine::Watchers;

/// Models the constraint `y = ax + b`, by expressing the domain of `y` as a transformation of the
/// domain of `x`.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct AffineView<Inner> {
    inner: Inner,
    scale: i32,
    offset: i32,
}

impl<Inner> AffineView<Inner> {
    pub fn new(inner: Inner, scale: i32, offset: i32) -> Self {
        assert_ne!(scale, 0, "Multiplication by zero is not invertable");
        AffineView {
            inner,
            scale,
            offset,
        }
    }

    pub fn inner(&self) -> &Inner {
        &self.inner
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Apply the inverse transformation of this view on a value, to go from the value in the domain
    /// of `self` to a value in the domain of `self.inner`.
    fn invert(&self, value: i32, rounding: Rounding) -> i32 {
        let inverted_translation = value - self.offset;

        match rounding {
            Rounding::Up => div_ceil(inverted_translation, self.scale),
            Rounding::Down => div_floor(inverted_translation, self.scale),
        }
    }

    fn map(&self, value: i32) -> i32 {
        self.scale * value + self.offset
    }
}

impl<View> IntegerVariable for AffineView<View>
where
    View: IntegerVariable,
{
    type AffineView = Self;

    fn lower_bound(&self, domains: &DomainStore) -> i32 {
        if self.scale < 0 {
            self.map(self.inner.upper_bound(domains))
        } else {
            self.map(self.inner.lower_bound(domains))
        }
    }

    fn upper_bound(&self, domains: &DomainStore) -> i32 {
        if self.scale < 0 {
            self.map(self.inner.lower_bound(domains))
        } else {
            self.map(self.inner.upper_bound(domains))
        }
    }

    fn contains(&self, domains: &DomainStore, value: i32) -> bool {
        if (value - self.offset) % self.scale == 0 {
            let inverted = self.invert(value, Rounding::Up);
            self.inner.contains(domains, inverted)
        } else {
            false
        }
    }

    fn iterate_domain(&self, domains: &DomainStore) -> impl Iterator<Item = i32> {
        self.inner
            .iterate_domain(domains)
            .map(|value| self.map(value))
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, mut events: EnumSet<DomainEvent>) {
        let bound = DomainEvent::LowerBound | DomainEvent::UpperBound;
        let intersection = events.intersection(bound);
        if intersection.len() == 1 && self.scale.is_negative() {
            events = events.symmetric_difference(bound);
        }
        self.inner.watch_all(watchers, events);
    }

    fn unpack_event(&self, events: EnumSet<DomainEvent>) -> EnumSet<DomainEvent> {
        let events = self.inner.unpack_event(events);
        if self.scale.is_negative() {
            events
                .iter()
                .map(|event| match event {
                    DomainEvent::LowerBound => DomainEvent::UpperBound,
                    DomainEvent::UpperBound => DomainEvent::LowerBound,
                    event => event,
                })
                .collect()
        } else {
            events
        }
    }

    fn context(&self) -> ContextId {
        self.inner.context()
    }

    fn solution_value(&self, solution: &Solution) -> Option<i32> {
        self.inner
            .solution_value(solution)
            .map(|value| self.map(value))
    }
}

impl<View> TransformableVariable<AffineView<View>> for AffineView<View>
where
    View: IntegerVariable,
{
    fn scaled(&self, scale: i32) -> AffineView<View> {
        let mut result = self.clone();
        result.scale *= scale;
        result.offset *= scale;
        result
    }

    fn offset(&self, offset: i32) -> AffineView<View> {
        let mut result = self.clone();
        result.offset += offset;
        result
    }
}

impl<Var: std::fmt::Debug> std::fmt::Debug for AffineView<Var> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scale == -1 {
            write!(f, "-")?;
        } else if self.scale != 1 {
            write!(f, "{} * ", self.scale)?;
        }

        write!(f, "({:?})", self.inner)?;

        match self.offset.cmp(&0) {
            std::cmp::Ordering::Less => write!(f, " - {}", -self.offset)?,
            std::cmp::Ordering::Equal => {}
            std::cmp::Ordering::Greater => write!(f, " + {}", self.offset)?,
        }

        Ok(())
    }
}

impl<Var: PredicateConstructor<Value = i32>> PredicateConstructor for AffineView<Var> {
    type Value = Var::Value;

    fn lower_bound_predicate(&self, bound: Self::Value) -> Predicate {
        if self.scale < 0 {
            let inverted_bound = self.invert(bound, Rounding::Down);
            self.inner.upper_bound_predicate(inverted_bound)
        } else {
            let inverted_bound = self.invert(bound, Rounding::Up);
            self.inner.lower_bound_predicate(inverted_bound)
        }
    }

    fn upper_bound_predicate(&self, bound: Self::Value) -> Predicate {
        if self.scale < 0 {
            let inverted_bound = self.invert(bound, Rounding::Up);
            self.inner.lower_bound_predicate(inverted_bound)
        } else {
            let inverted_bound = self.invert(bound, Rounding::Down);
            self.inner.upper_bound_predicate(inverted_bound)
        }
    }

    fn equality_predicate(&self, bound: Self::Value) -> Predicate {
        if (bound - self.offset) % self.scale == 0 {
            let inverted_bound = self.invert(bound, Rounding::Up);
            self.inner.equality_predicate(inverted_bound)
        } else {
            Predicate::trivially_false()
        }
    }

    fn disequality_predicate(&self, bound: Self::Value) -> Predicate {
        if (bound - self.offset) % self.scale == 0 {
            let inverted_bound = self.invert(bound, Rounding::Up);
            self.inner.disequality_predicate(inverted_bound)
        } else {
            Predicate::trivially_true()
        }
    }
}

impl From<DomainId> for AffineView<DomainId> {
    fn from(value: DomainId) -> Self {
        AffineView::new(value, 1, 0)
    }
}

enum Rounding {
    Up,
    Down,
}

pub(crate) fn div_ceil(numerator: i32, denominator: i32) -> i32 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder != 0 && ((remainder > 0) == (denominator > 0)) {
        quotient + 1
    } else {
        quotient
    }
}

pub(crate) fn div_floor(numerator: i32, denominator: i32) -> i32 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder != 0 && ((remainder > 0) != (denominator > 0)) {
        quotient - 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::domain_store::Subject;
    use crate::engine::predicates::PredicateType;
    use crate::engine::variables::ContextId;
    use crate::engine::WatchLists;
    use crate::predicate;
    use crate::propagation::LocalId;
    use crate::propagation::PropagatorId;
    use crate::propagation::PropagatorVarId;

    fn domain() -> DomainId {
        DomainId::new(ContextId::fresh(), 0)
    }

    #[test]
    fn scaling_an_affine_view() {
        let view = AffineView::new(domain(), 3, 4);
        let scaled_view = view.scaled(6);
        assert_eq!(18, scaled_view.scale);
        assert_eq!(24, scaled_view.offset);
    }

    #[test]
    fn offsetting_an_affine_view() {
        let view = AffineView::new(domain(), 3, 4);
        let offset_view = view.offset(6);
        assert_eq!(3, offset_view.scale);
        assert_eq!(10, offset_view.offset);
    }

    #[test]
    fn rounding_division_handles_signs() {
        assert_eq!(2, div_ceil(3, 2));
        assert_eq!(-1, div_ceil(-3, 2));
        assert_eq!(1, div_floor(3, 2));
        assert_eq!(-2, div_floor(-3, 2));
        assert_eq!(-2, div_floor(3, -2));
        assert_eq!(2, div_floor(-4, -2));
    }

    #[test]
    fn bound_predicates_round_optimistically_in_inner_domain() {
        let x = domain();
        let view = AffineView::new(x, 2, 0);

        assert_eq!(predicate![x >= 1], predicate![view >= 1]);
        assert_eq!(predicate![x <= 0], predicate![view <= 1]);
    }

    #[test]
    fn negative_scale_swaps_bound_predicates() {
        let x = domain();
        let view = AffineView::new(x, -1, 0);

        let predicate = predicate![view >= -3];
        assert_eq!(Some(PredicateType::UpperBound), predicate.predicate_type());
        assert_eq!(predicate![x <= 3], predicate);
    }

    #[test]
    fn negative_scale_watches_the_opposite_bound() {
        let mut domains = DomainStore::new(ContextId::fresh(), 1e-6);
        let x = domains.grow(0, 10);
        let mut watch_lists = WatchLists::default();
        let propagator_var = PropagatorVarId {
            propagator: PropagatorId(0),
            variable: LocalId::from(0),
        };

        let view = AffineView::new(x, -1, 0);
        view.watch_all(
            &mut Watchers::new(propagator_var, &mut watch_lists, &mut domains),
            EnumSet::only(DomainEvent::LowerBound),
        );
        let positive = AffineView::new(x, 2, 0);
        positive.watch_all(
            &mut Watchers::new(propagator_var, &mut watch_lists, &mut domains),
            DomainEvent::LowerBound | DomainEvent::Assign,
        );

        let events = watch_lists
            .watchers(Subject::Integer(x))
            .iter()
            .map(|watcher| watcher.events)
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                EnumSet::only(DomainEvent::UpperBound),
                DomainEvent::LowerBound | DomainEvent::Assign,
            ],
            events
        );
    }

    #[test]
    fn equality_with_unreachable_value_is_trivially_false() {
        let view = AffineView::new(domain(), 2, 1);

        assert_eq!(Predicate::trivially_false(), predicate![view == 4]);
        assert_eq!(Predicate::trivially_true(), predicate![view != 4]);
    }

    #[test]
    fn negative_scale_swaps_bound_events() {
        let view = AffineView::new(domain(), -1, 0);
        let unpacked = view.unpack_event(DomainEvent::LowerBound | DomainEvent::Removal);

        assert_eq!(DomainEvent::UpperBound | DomainEvent::Removal, unpacked);
    }
}

use fixedbitset::FixedBitSet;

/// The values an integer variable can still take.
///
/// A bounds domain is an interval. An enumerated domain additionally keeps a bitset of the values
/// inside the interval which are still present, relative to the initial lower bound. The bounds of
/// an enumerated domain are always members of it.
#[derive(Clone, Debug)]
pub(crate) struct IntegerDomain {
    pub(super) lower_bound: i32,
    pub(super) upper_bound: i32,
    initial_lower_bound: i32,
    members: Option<FixedBitSet>,
}

impl IntegerDomain {
    pub(crate) fn bounds(lower_bound: i32, upper_bound: i32) -> IntegerDomain {
        IntegerDomain {
            lower_bound,
            upper_bound,
            initial_lower_bound: lower_bound,
            members: None,
        }
    }

    /// Creates an enumerated domain; `values` must be non-empty, sorted and without duplicates.
    pub(crate) fn enumerated(values: &[i32]) -> IntegerDomain {
        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];

        let mut members = FixedBitSet::with_capacity((upper_bound - lower_bound + 1) as usize);
        for &value in values {
            members.insert((value - lower_bound) as usize);
        }

        IntegerDomain {
            lower_bound,
            upper_bound,
            initial_lower_bound: lower_bound,
            members: Some(members),
        }
    }

    pub(crate) fn is_enumerated(&self) -> bool {
        self.members.is_some()
    }

    fn offset_of(&self, value: i32) -> usize {
        (value - self.initial_lower_bound) as usize
    }

    pub(crate) fn contains(&self, value: i32) -> bool {
        if value < self.lower_bound || value > self.upper_bound {
            return false;
        }

        self.members
            .as_ref()
            .map_or(true, |members| members.contains(self.offset_of(value)))
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }

    pub(crate) fn size(&self) -> usize {
        match &self.members {
            None => (self.upper_bound as i64 - self.lower_bound as i64 + 1) as usize,
            Some(members) => members
                .count_ones(self.offset_of(self.lower_bound)..self.offset_of(self.upper_bound) + 1),
        }
    }

    /// The smallest member which is at least `value`.
    pub(crate) fn member_at_or_above(&self, value: i32) -> Option<i32> {
        let value = value.max(self.lower_bound);
        if value > self.upper_bound {
            return None;
        }

        match &self.members {
            None => Some(value),
            Some(members) => (value..=self.upper_bound)
                .find(|&candidate| members.contains(self.offset_of(candidate))),
        }
    }

    /// The largest member which is at most `value`.
    pub(crate) fn member_at_or_below(&self, value: i32) -> Option<i32> {
        let value = value.min(self.upper_bound);
        if value < self.lower_bound {
            return None;
        }

        match &self.members {
            None => Some(value),
            Some(members) => (self.lower_bound..=value)
                .rev()
                .find(|&candidate| members.contains(self.offset_of(candidate))),
        }
    }

    pub(super) fn remove_member(&mut self, value: i32) {
        let offset = self.offset_of(value);
        if let Some(members) = self.members.as_mut() {
            members.set(offset, false);
        }
    }

    pub(super) fn restore_member(&mut self, value: i32) {
        let offset = self.offset_of(value);
        if let Some(members) = self.members.as_mut() {
            members.insert(offset);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        (self.lower_bound..=self.upper_bound).filter(|&value| self.contains(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerated_size_counts_only_members() {
        let domain = IntegerDomain::enumerated(&[1, 3, 4, 9]);

        assert_eq!(4, domain.size());
        assert!(!domain.contains(2));
        assert!(domain.contains(9));
    }

    #[test]
    fn members_are_found_in_both_directions() {
        let domain = IntegerDomain::enumerated(&[1, 3, 4, 9]);

        assert_eq!(Some(9), domain.member_at_or_above(5));
        assert_eq!(Some(4), domain.member_at_or_below(8));
        assert_eq!(None, domain.member_at_or_above(10));
        assert_eq!(None, domain.member_at_or_below(0));
    }

    #[test]
    fn bounds_domain_contains_every_value_in_range() {
        let domain = IntegerDomain::bounds(-2, 2);

        assert_eq!(5, domain.size());
        assert_eq!(vec![-2, -1, 0, 1, 2], domain.iter().collect::<Vec<_>>());
    }
}

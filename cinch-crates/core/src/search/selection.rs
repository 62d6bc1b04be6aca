//! The policies which a [`Goal::Generate`](super::Goal::Generate) uses to pick the next variable
//! to branch on and the value to branch with.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::engine::DomainStore;
use crate::predicate;

/// Determines which of the unfixed variables of a generator is branched on next. Ties are broken
/// by the order in which the variables were given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum VariableSelection {
    /// The first unfixed variable.
    InputOrder,
    /// The variable with the fewest values left.
    #[default]
    FirstFail,
    /// The variable with the most values left.
    AntiFirstFail,
    /// The variable with the smallest lower bound; for start times this is "earliest start
    /// first".
    Smallest,
    /// The variable with the largest upper bound.
    Largest,
}

impl VariableSelection {
    /// Selects a variable which is not yet fixed, or [`None`] if all of them are.
    pub fn select(self, domains: &DomainStore, variables: &[DomainId]) -> Option<DomainId> {
        let mut unfixed = variables
            .iter()
            .copied()
            .filter(|&variable| !domains.is_fixed(variable));

        match self {
            VariableSelection::InputOrder => unfixed.next(),
            // `min_by_key` keeps the first minimum, so the maximising policies reverse their key.
            VariableSelection::FirstFail => {
                unfixed.min_by_key(|&variable| domains.domain_size(variable))
            }
            VariableSelection::AntiFirstFail => {
                unfixed.min_by_key(|&variable| std::cmp::Reverse(domains.domain_size(variable)))
            }
            VariableSelection::Smallest => {
                unfixed.min_by_key(|&variable| domains.lower_bound(variable))
            }
            VariableSelection::Largest => {
                unfixed.min_by_key(|&variable| std::cmp::Reverse(domains.upper_bound(variable)))
            }
        }
    }
}

/// Determines the decision taken on the selected variable. The alternative branch excludes what
/// the decision imposed: the other half of a split, or every value except the assigned one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ValueSelection {
    /// Assign the smallest value.
    #[default]
    Min,
    /// Assign the largest value.
    Max,
    /// Assign the value closest to the middle of the bounds, preferring the lower value.
    Middle,
    /// Branch on `x <= mid` first.
    Split,
    /// Branch on `x > mid` first.
    ReverseSplit,
    /// Assign a value chosen uniformly at random from the domain.
    Random,
}

impl ValueSelection {
    /// The decision for an unfixed `variable`.
    pub fn select(self, domains: &DomainStore, variable: DomainId, rng: &mut SmallRng) -> Predicate {
        let lower_bound = domains.lower_bound(variable);
        let upper_bound = domains.upper_bound(variable);
        let mid = lower_bound + (upper_bound - lower_bound) / 2;

        match self {
            ValueSelection::Min => predicate![variable == lower_bound],
            ValueSelection::Max => predicate![variable == upper_bound],
            ValueSelection::Middle => {
                let value = (0..=(upper_bound - lower_bound))
                    .flat_map(|offset| [mid - offset, mid + offset])
                    .find(|&value| domains.contains(variable, value))
                    .unwrap_or(lower_bound);
                predicate![variable == value]
            }
            ValueSelection::Split => predicate![variable <= mid],
            ValueSelection::ReverseSplit => predicate![variable >= mid + 1],
            ValueSelection::Random => {
                let values = domains.iterate_domain(variable).collect::<Vec<_>>();
                let value = values[rng.gen_range(0..values.len())];
                predicate![variable == value]
            }
        }
    }
}

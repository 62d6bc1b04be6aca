use std::fmt::Display;
use std::fmt::Formatter;

use crate::engine::variables::DomainId;

/// Representation of a domain operation, also known as an atomic constraint: a triple
/// ([`DomainId`], [`PredicateType`], value), or one of the two constant predicates which views
/// produce for values they cannot take.
///
/// To create a [`Predicate`], use [`Predicate::new`] or the more concise [`predicate!`] macro.
///
/// [`predicate!`]: crate::predicate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Predicate {
    Atomic {
        domain: DomainId,
        predicate_type: PredicateType,
        value: i32,
    },
    TriviallyTrue,
    TriviallyFalse,
}

#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
pub enum PredicateType {
    LowerBound,
    UpperBound,
    NotEqual,
    Equal,
}

impl Predicate {
    pub fn new(domain: DomainId, predicate_type: PredicateType, value: i32) -> Self {
        Predicate::Atomic {
            domain,
            predicate_type,
            value,
        }
    }

    pub fn trivially_true() -> Self {
        Predicate::TriviallyTrue
    }

    pub fn trivially_false() -> Self {
        Predicate::TriviallyFalse
    }

    pub fn domain(&self) -> Option<DomainId> {
        match self {
            Predicate::Atomic { domain, .. } => Some(*domain),
            _ => None,
        }
    }

    pub fn predicate_type(&self) -> Option<PredicateType> {
        match self {
            Predicate::Atomic { predicate_type, .. } => Some(*predicate_type),
            _ => None,
        }
    }

    pub fn right_hand_side(&self) -> Option<i32> {
        match self {
            Predicate::Atomic { value, .. } => Some(*value),
            _ => None,
        }
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        match self {
            Predicate::Atomic {
                domain,
                predicate_type,
                value,
            } => match predicate_type {
                PredicateType::LowerBound => {
                    Predicate::new(domain, PredicateType::UpperBound, value - 1)
                }
                PredicateType::UpperBound => {
                    Predicate::new(domain, PredicateType::LowerBound, value + 1)
                }
                PredicateType::NotEqual => Predicate::new(domain, PredicateType::Equal, value),
                PredicateType::Equal => Predicate::new(domain, PredicateType::NotEqual, value),
            },
            Predicate::TriviallyTrue => Predicate::TriviallyFalse,
            Predicate::TriviallyFalse => Predicate::TriviallyTrue,
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Atomic {
                domain,
                predicate_type,
                value,
            } => match predicate_type {
                PredicateType::LowerBound => write!(f, "[{domain} >= {value}]"),
                PredicateType::UpperBound => write!(f, "[{domain} <= {value}]"),
                PredicateType::NotEqual => write!(f, "[{domain} != {value}]"),
                PredicateType::Equal => write!(f, "[{domain} == {value}]"),
            },
            Predicate::TriviallyTrue => write!(f, "[true]"),
            Predicate::TriviallyFalse => write!(f, "[false]"),
        }
    }
}

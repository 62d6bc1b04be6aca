//! Logical composition of truth variables. Every connective is a linear constraint over the 0/1
//! integer views of the literals, so each of them can be reified in turn.

use super::greater_than_or_equals;
use super::less_than_or_equals;
use super::Linear;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::variables::TransformableVariable;

/// Creates the [`Constraint`](super::Constraint) `/\ literals_i`.
pub fn conjunction(literals: impl IntoIterator<Item = Literal>) -> Linear<AffineView<DomainId>> {
    let terms = integer_views(literals);
    let num_literals = terms.len() as i32;

    greater_than_or_equals(terms, num_literals)
}

/// Creates the [`Constraint`](super::Constraint) `\/ literals_i`.
pub fn disjunction(literals: impl IntoIterator<Item = Literal>) -> Linear<AffineView<DomainId>> {
    greater_than_or_equals(integer_views(literals), 1)
}

/// Creates the [`Constraint`](super::Constraint) `antecedent -> consequent`.
pub fn implies(antecedent: Literal, consequent: Literal) -> Linear<AffineView<DomainId>> {
    less_than_or_equals(
        [
            antecedent.get_integer_variable(),
            consequent.get_integer_variable().scaled(-1),
        ],
        0,
    )
}

/// The truth variable `1 - literal`. No new variable is created.
pub fn negation(literal: Literal) -> Literal {
    !literal
}

fn integer_views(literals: impl IntoIterator<Item = Literal>) -> Box<[AffineView<DomainId>]> {
    literals
        .into_iter()
        .map(|literal| literal.get_integer_variable())
        .collect()
}

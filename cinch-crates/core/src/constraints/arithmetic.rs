use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use super::add_propagator;
use super::Constraint;
use super::NegatableConstraint;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::ContractViolation;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::State;
use crate::propagators::LinearLessOrEqualPropagatorArgs;
use crate::propagators::LinearNotEqualPropagatorArgs;
use crate::propagators::MaximumArgs;
use crate::propagators::TimesArgs;

/// The relation between the left-hand side and the right-hand side of a linear constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    LessThanOrEqual,
    LessThan,
    Equal,
    NotEqual,
    GreaterThanOrEqual,
    GreaterThan,
}

impl Relation {
    /// The relation which holds exactly when `self` does not.
    pub fn negation(self) -> Relation {
        match self {
            Relation::LessThanOrEqual => Relation::GreaterThan,
            Relation::LessThan => Relation::GreaterThanOrEqual,
            Relation::Equal => Relation::NotEqual,
            Relation::NotEqual => Relation::Equal,
            Relation::GreaterThanOrEqual => Relation::LessThan,
            Relation::GreaterThan => Relation::LessThanOrEqual,
        }
    }
}

impl FromStr for Relation {
    type Err = ContractViolation;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol.trim() {
            "<=" => Ok(Relation::LessThanOrEqual),
            "<" => Ok(Relation::LessThan),
            "=" | "==" => Ok(Relation::Equal),
            "!=" => Ok(Relation::NotEqual),
            ">=" => Ok(Relation::GreaterThanOrEqual),
            ">" => Ok(Relation::GreaterThan),
            _ => Err(ContractViolation::UnknownRelation(symbol.to_owned())),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Relation::LessThanOrEqual => "<=",
            Relation::LessThan => "<",
            Relation::Equal => "=",
            Relation::NotEqual => "!=",
            Relation::GreaterThanOrEqual => ">=",
            Relation::GreaterThan => ">",
        };
        write!(f, "{symbol}")
    }
}

/// The [`Constraint`] `\sum terms_i <relation> rhs`.
///
/// Weighted sums are expressed with scaled views on the variables, see [`scalar_product`].
#[derive(Clone, Debug)]
pub struct Linear<Var> {
    terms: Box<[Var]>,
    relation: Relation,
    rhs: i32,
}

/// Creates the [`Constraint`] `\sum terms_i <relation> rhs`.
pub fn linear<Var: IntegerVariable>(
    terms: impl Into<Box<[Var]>>,
    relation: Relation,
    rhs: i32,
) -> Linear<Var> {
    Linear {
        terms: terms.into(),
        relation,
        rhs,
    }
}

/// Creates a linear [`Constraint`] from a symbolic relation such as `"<="` or `"!="`.
pub fn linear_with_symbol<Var: IntegerVariable>(
    terms: impl Into<Box<[Var]>>,
    relation: &str,
    rhs: i32,
) -> Result<Linear<Var>, ContractViolation> {
    Ok(linear(terms, relation.parse()?, rhs))
}

/// Creates the [`Constraint`] `\sum coefficients_i * variables_i <relation> rhs`.
pub fn scalar_product<Var: IntegerVariable>(
    coefficients: &[i32],
    variables: &[Var],
    relation: Relation,
    rhs: i32,
) -> Result<Linear<Var::AffineView>, ContractViolation> {
    if coefficients.len() != variables.len() {
        return Err(ContractViolation::ScopeMismatch {
            expected: coefficients.len(),
            actual: variables.len(),
        });
    }

    let terms = coefficients
        .iter()
        .zip(variables)
        .filter(|(coefficient, _)| **coefficient != 0)
        .map(|(coefficient, variable)| variable.scaled(*coefficient))
        .collect::<Box<[_]>>();

    Ok(linear(terms, relation, rhs))
}

/// Creates the [`Constraint`] `\sum terms_i <= rhs`.
pub fn less_than_or_equals<Var: IntegerVariable>(
    terms: impl Into<Box<[Var]>>,
    rhs: i32,
) -> Linear<Var> {
    linear(terms, Relation::LessThanOrEqual, rhs)
}

/// Creates the [`Constraint`] `\sum terms_i < rhs`.
pub fn less_than<Var: IntegerVariable>(terms: impl Into<Box<[Var]>>, rhs: i32) -> Linear<Var> {
    linear(terms, Relation::LessThan, rhs)
}

/// Creates the [`Constraint`] `\sum terms_i = rhs`.
pub fn equals<Var: IntegerVariable>(terms: impl Into<Box<[Var]>>, rhs: i32) -> Linear<Var> {
    linear(terms, Relation::Equal, rhs)
}

/// Creates the [`Constraint`] `\sum terms_i != rhs`.
pub fn not_equals<Var: IntegerVariable>(terms: impl Into<Box<[Var]>>, rhs: i32) -> Linear<Var> {
    linear(terms, Relation::NotEqual, rhs)
}

/// Creates the [`Constraint`] `\sum terms_i >= rhs`.
pub fn greater_than_or_equals<Var: IntegerVariable>(
    terms: impl Into<Box<[Var]>>,
    rhs: i32,
) -> Linear<Var> {
    linear(terms, Relation::GreaterThanOrEqual, rhs)
}

/// Creates the [`Constraint`] `\sum terms_i > rhs`.
pub fn greater_than<Var: IntegerVariable>(
    terms: impl Into<Box<[Var]>>,
    rhs: i32,
) -> Linear<Var> {
    linear(terms, Relation::GreaterThan, rhs)
}

/// Creates the [`Constraint`] `lhs <= rhs`.
pub fn binary_less_than_or_equals<Var: IntegerVariable>(
    lhs: Var,
    rhs: Var,
) -> Linear<Var::AffineView> {
    less_than_or_equals([lhs.scaled(1), rhs.scaled(-1)], 0)
}

/// Creates the [`Constraint`] `lhs < rhs`.
pub fn binary_less_than<Var: IntegerVariable>(lhs: Var, rhs: Var) -> Linear<Var::AffineView> {
    less_than([lhs.scaled(1), rhs.scaled(-1)], 0)
}

/// Creates the [`Constraint`] `lhs = rhs`.
pub fn binary_equals<Var: IntegerVariable>(lhs: Var, rhs: Var) -> Linear<Var::AffineView> {
    equals([lhs.scaled(1), rhs.scaled(-1)], 0)
}

/// Creates the [`Constraint`] `lhs != rhs`.
pub fn binary_not_equals<Var: IntegerVariable>(lhs: Var, rhs: Var) -> Linear<Var::AffineView> {
    not_equals([lhs.scaled(1), rhs.scaled(-1)], 0)
}

impl<Var: IntegerVariable> Linear<Var> {
    pub fn relation(&self) -> Relation {
        self.relation
    }

    fn negated_terms(&self) -> Box<[Var::AffineView]> {
        self.terms.iter().map(|term| term.scaled(-1)).collect()
    }

    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        state.check_ownership(self.terms.iter())?;
        state.check_ownership(reification_literal.iter())?;

        let rhs = self.rhs as i64;
        let at_most = |c: i64| LinearLessOrEqualPropagatorArgs {
            x: self.terms.clone(),
            c,
        };
        let at_least = |c: i64| LinearLessOrEqualPropagatorArgs {
            x: self.negated_terms(),
            c: -c,
        };

        match self.relation {
            Relation::LessThanOrEqual => add_propagator(state, at_most(rhs), reification_literal),
            Relation::LessThan => add_propagator(state, at_most(rhs - 1), reification_literal),
            Relation::GreaterThanOrEqual => {
                add_propagator(state, at_least(rhs), reification_literal)
            }
            Relation::GreaterThan => add_propagator(state, at_least(rhs + 1), reification_literal),
            Relation::Equal => {
                add_propagator(state, at_most(rhs), reification_literal)?;
                add_propagator(state, at_least(rhs), reification_literal)
            }
            Relation::NotEqual => add_propagator(
                state,
                LinearNotEqualPropagatorArgs {
                    terms: self.terms.clone(),
                    rhs: self.rhs,
                },
                reification_literal,
            ),
        }
    }
}

impl<Var: IntegerVariable> Constraint for Linear<Var> {
    fn post(&self, state: &mut State) -> Result<(), ConstraintOperationError> {
        self.add(state, None)
    }

    fn implied_by(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        self.add(state, Some(reification_literal))
    }
}

impl<Var: IntegerVariable> NegatableConstraint for Linear<Var> {
    type NegatedConstraint = Linear<Var>;

    fn negation(&self) -> Self::NegatedConstraint {
        Linear {
            terms: self.terms.clone(),
            relation: self.relation.negation(),
            rhs: self.rhs,
        }
    }
}

/// The [`Constraint`] `max(array) = rhs`, or `min(array) = rhs` when created through [`minimum`].
#[derive(Clone, Debug)]
pub struct Maximum<ElementVar, Rhs> {
    array: Box<[ElementVar]>,
    rhs: Rhs,
}

/// Creates the [`Constraint`] `max(array) = rhs`.
pub fn maximum<ElementVar: IntegerVariable, Rhs: IntegerVariable>(
    array: impl Into<Box<[ElementVar]>>,
    rhs: Rhs,
) -> Maximum<ElementVar, Rhs> {
    Maximum {
        array: array.into(),
        rhs,
    }
}

/// Creates the [`Constraint`] `min(array) = rhs`.
pub fn minimum<ElementVar: IntegerVariable, Rhs: IntegerVariable>(
    array: impl IntoIterator<Item = ElementVar>,
    rhs: Rhs,
) -> Maximum<ElementVar::AffineView, Rhs::AffineView> {
    // min(array) = rhs is max(-array) = -rhs
    maximum(
        array
            .into_iter()
            .map(|element| element.scaled(-1))
            .collect::<Box<[_]>>(),
        rhs.scaled(-1),
    )
}

impl<ElementVar: IntegerVariable, Rhs: IntegerVariable> Constraint for Maximum<ElementVar, Rhs> {
    fn post(&self, state: &mut State) -> Result<(), ConstraintOperationError> {
        state.check_ownership(self.array.iter())?;
        state.check_ownership([&self.rhs])?;

        add_propagator(
            state,
            MaximumArgs {
                array: self.array.clone(),
                rhs: self.rhs.clone(),
            },
            None,
        )
    }

    fn implied_by(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        state.check_ownership(self.array.iter())?;
        state.check_ownership([&self.rhs])?;
        state.check_ownership([&reification_literal])?;

        add_propagator(
            state,
            MaximumArgs {
                array: self.array.clone(),
                rhs: self.rhs.clone(),
            },
            Some(reification_literal),
        )
    }
}

/// The [`Constraint`] `a * b = c`.
#[derive(Clone, Debug)]
pub struct Times<VA, VB, VC> {
    a: VA,
    b: VB,
    c: VC,
}

/// Creates the [`Constraint`] `a * b = c`.
pub fn times<VA: IntegerVariable, VB: IntegerVariable, VC: IntegerVariable>(
    a: VA,
    b: VB,
    c: VC,
) -> Times<VA, VB, VC> {
    Times { a, b, c }
}

impl<VA, VB, VC> Times<VA, VB, VC>
where
    VA: IntegerVariable,
    VB: IntegerVariable,
    VC: IntegerVariable,
{
    fn add(
        &self,
        state: &mut State,
        reification_literal: Option<Literal>,
    ) -> Result<(), ConstraintOperationError> {
        state.check_ownership([&self.a])?;
        state.check_ownership([&self.b])?;
        state.check_ownership([&self.c])?;
        state.check_ownership(reification_literal.iter())?;

        add_propagator(
            state,
            TimesArgs {
                a: self.a.clone(),
                b: self.b.clone(),
                c: self.c.clone(),
            },
            reification_literal,
        )
    }
}

impl<VA, VB, VC> Constraint for Times<VA, VB, VC>
where
    VA: IntegerVariable,
    VB: IntegerVariable,
    VC: IntegerVariable,
{
    fn post(&self, state: &mut State) -> Result<(), ConstraintOperationError> {
        self.add(state, None)
    }

    fn implied_by(
        &self,
        state: &mut State,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        self.add(state, Some(reification_literal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::ReadDomains;

    #[test]
    fn relations_are_parsed_from_symbols() {
        assert_eq!(Ok(Relation::LessThanOrEqual), "<=".parse());
        assert_eq!(Ok(Relation::Equal), "==".parse());
        assert_eq!(Ok(Relation::NotEqual), " != ".parse());
        assert_eq!(
            Err(ContractViolation::UnknownRelation("=<".to_owned())),
            "=<".parse::<Relation>()
        );
    }

    #[test]
    fn negating_twice_is_the_identity() {
        for relation in [
            Relation::LessThanOrEqual,
            Relation::LessThan,
            Relation::Equal,
            Relation::NotEqual,
            Relation::GreaterThanOrEqual,
            Relation::GreaterThan,
        ] {
            assert_eq!(relation, relation.negation().negation());
        }
    }

    #[test]
    fn strict_relations_are_tightened_by_one() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 10);
        let y = state.new_interval_variable(0, 10);

        greater_than([x], 3).post(&mut state).expect("feasible");
        binary_less_than(y, x).post(&mut state).expect("feasible");
        less_than([x], 10).post(&mut state).expect("feasible");

        assert_eq!(4, state.lower_bound(&x));
        assert_eq!(9, state.upper_bound(&x));
        assert_eq!(8, state.upper_bound(&y));
    }

    #[test]
    fn scalar_product_requires_matching_lengths() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 10);

        let result = scalar_product(&[1, 2], &[x], Relation::Equal, 3);

        assert!(matches!(
            result,
            Err(ContractViolation::ScopeMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn variables_of_other_solvers_are_rejected() {
        let mut state = State::new(1e-6);
        let mut other = State::new(1e-6);
        let x = state.new_interval_variable(0, 10);
        let foreign = other.new_interval_variable(0, 10);

        let result = equals([x, foreign], 3).post(&mut state);

        assert!(matches!(
            result,
            Err(ConstraintOperationError::ContractViolation(
                ContractViolation::ForeignVariable(_)
            ))
        ));
    }

    #[test]
    fn minimum_is_maximum_over_negated_views() {
        let mut state = State::new(1e-6);
        let a = state.new_interval_variable(3, 8);
        let b = state.new_interval_variable(5, 9);
        let rhs = state.new_interval_variable(0, 20);

        minimum([a, b], rhs).post(&mut state).expect("feasible");

        assert_eq!(3, state.lower_bound(&rhs));
        assert_eq!(8, state.upper_bound(&rhs));
    }

    #[test]
    fn reified_equality_follows_the_literal() {
        let mut state = State::new(1e-6);
        let x = state.new_interval_variable(0, 10);
        let literal = state.new_literal();

        equals([x], 4).reify(&mut state, literal).expect("feasible");
        state.post(literal.get_true_predicate()).expect("non-empty");
        state.propagate().expect("feasible");

        assert_eq!(Some(4), state.fixed_value(&x));
    }
}

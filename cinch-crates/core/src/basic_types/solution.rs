use std::sync::Arc;

use crate::containers::HashMap;
use crate::engine::variables::ContextId;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::RealVariable;

/// A handle to any variable of a solver, used to look variables up by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variable {
    Integer(DomainId),
    Real(RealVariable),
}

/// The value of a [`Variable`] in a [`Solution`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Integer(i32),
    /// The midpoint of the remaining interval of the real variable.
    Real(f64),
}

/// An immutable snapshot of the domains at the moment a solution was found.
///
/// A solution never refers to the live state of the solver, so it stays valid after the search
/// continues or backtracks.
#[derive(Clone, Debug)]
pub struct Solution {
    context: ContextId,
    integer_bounds: Vec<(i32, i32)>,
    real_bounds: Vec<(f64, f64)>,
    names: Arc<HashMap<String, Variable>>,
}

impl Solution {
    pub(crate) fn new(
        context: ContextId,
        integer_bounds: Vec<(i32, i32)>,
        real_bounds: Vec<(f64, f64)>,
    ) -> Self {
        Solution {
            context,
            integer_bounds,
            real_bounds,
            names: Arc::default(),
        }
    }

    pub(crate) fn with_names(mut self, names: Arc<HashMap<String, Variable>>) -> Self {
        self.names = names;
        self
    }

    pub fn num_integer_variables(&self) -> usize {
        self.integer_bounds.len()
    }

    pub fn num_real_variables(&self) -> usize {
        self.real_bounds.len()
    }

    /// The bounds of `domain` in this solution, or [`None`] if the domain is not part of it.
    pub fn integer_bounds(&self, domain: DomainId) -> Option<(i32, i32)> {
        if domain.context() != self.context {
            return None;
        }

        self.integer_bounds.get(domain.index()).copied()
    }

    /// The value of an integer variable, or [`None`] when it is not fixed in this solution.
    pub fn integer_value<Var: IntegerVariable>(&self, variable: Var) -> Option<i32> {
        variable.solution_value(self)
    }

    pub fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.integer_value(literal).map(|value| value == 1)
    }

    pub fn real_bounds(&self, variable: RealVariable) -> Option<(f64, f64)> {
        if variable.context() != self.context {
            return None;
        }

        self.real_bounds.get(variable.index()).copied()
    }

    /// The midpoint of the interval of `variable` in this solution.
    pub fn real_value(&self, variable: RealVariable) -> Option<f64> {
        self.real_bounds(variable)
            .map(|(lower_bound, upper_bound)| lower_bound + (upper_bound - lower_bound) / 2.0)
    }

    pub fn variable_named(&self, name: &str) -> Option<Variable> {
        self.names.get(name).copied()
    }

    /// Looks up the value of the variable with the given name.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        match self.variable_named(name)? {
            Variable::Integer(domain) => self.integer_value(domain).map(Value::Integer),
            Variable::Real(variable) => self.real_value(variable).map(Value::Real),
        }
    }
}

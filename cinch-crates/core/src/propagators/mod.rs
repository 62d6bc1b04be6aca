//! Contains propagator implementations that are used in the solver.
//!
//! The public way of using these propagators is through the constructors in
//! [`constraints`](crate::constraints).
mod all_different;
pub(crate) mod arithmetic;
mod count;
pub(crate) mod cumulative;
mod element;
pub(crate) mod real;
mod reified_propagator;
mod table;

pub(crate) use all_different::*;
pub(crate) use arithmetic::*;
pub(crate) use count::*;
pub(crate) use cumulative::*;
pub(crate) use element::*;
pub(crate) use real::*;
pub(crate) use reified_propagator::*;
pub(crate) use table::*;

//! Propagators over real variables. Real domains are intervals, so these propagators only reason
//! about bounds.
mod integer_channel;
mod real_linear_less_or_equal;

pub(crate) use integer_channel::*;
pub(crate) use real_linear_less_or_equal::*;

mod linear_less_or_equal;
mod linear_not_equal;
mod maximum;
mod times;

pub(crate) use linear_less_or_equal::*;
pub(crate) use linear_not_equal::*;
pub(crate) use maximum::*;
pub(crate) use times::*;

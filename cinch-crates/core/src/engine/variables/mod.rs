//! Handles to the domains of a [`State`](crate::engine::State).
//!
//! A [`DomainId`] refers to an integer domain directly, an [`AffineView`] reads and narrows it
//! through `scale * x + offset`, and a [`Literal`] is a 0/1 domain seen as a truth value. Real
//! variables have their own handle, [`RealVariable`], as they only support bounds.

mod affine_view;
mod domain_id;
mod integer_variable;
mod literal;
mod real_variable;
mod transformable_variable;

pub use affine_view::AffineView;
pub use domain_id::ContextId;
pub use domain_id::DomainId;
pub use integer_variable::IntegerVariable;
pub use literal::Literal;
pub use real_variable::RealVariable;
pub use transformable_variable::TransformableVariable;

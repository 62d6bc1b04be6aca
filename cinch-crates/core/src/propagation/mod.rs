//! Contains the main building blocks for propagators.
//!
//! A [`Propagator`] is created from a [`PropagatorConstructor`], which registers the propagator
//! for the [`DomainEvents`] of the variables it needs to be told about. When such an event happens
//! the propagator is notified through [`Propagator::notify`], which decides whether the propagator
//! is enqueued. Enqueued propagators run in order of their [`Priority`] and narrow domains through
//! the [`PropagationContext`].
//!
//! Domains can be read in all of these stages through the [`ReadDomains`] trait.
//!
//! [`DomainEvents`]: crate::engine::DomainEvents
mod constructor;
mod contexts;
mod ids;
mod propagator;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use contexts::Domains;
pub use contexts::HasDomains;
pub use contexts::NotificationContext;
pub use contexts::PropagationContext;
pub use contexts::ReadDomains;
pub use ids::LocalId;
pub use ids::PropagatorId;
pub use ids::PropagatorVarId;
pub use propagator::EnqueueDecision;
pub use propagator::Priority;
pub use propagator::Propagator;

//! The propagation substrate: domains, the trail, variable views, and the loop which runs
//! propagators to a fixed point.
mod domain_store;
mod events;
pub mod predicates;
mod propagator_queue;
mod state;
#[cfg(test)]
pub(crate) mod test_solver;
pub mod variables;
mod watch_list;

pub use domain_store::DomainStore;
pub use domain_store::TrailedInteger;
pub use events::DomainEvent;
pub use events::DomainEvents;
pub(crate) use propagator_queue::PropagatorQueue;
pub use state::State;
pub(crate) use watch_list::WatchLists;
pub use watch_list::Watchers;

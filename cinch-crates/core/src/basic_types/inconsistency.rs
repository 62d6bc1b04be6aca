/// Signals that the current branch of the search cannot lead to a solution.
///
/// This is not an error in the usual sense: the search engine recovers from it by backtracking to
/// the most recent choice point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Inconsistency {
    /// A narrowing operation would have removed every value from a domain.
    EmptyDomain,
    /// A propagator or goal found the current state to be infeasible.
    Failure,
}

/// The result of running a propagator.
pub type PropagationStatus = Result<(), Inconsistency>;

/// Returned by a narrowing operation which would leave a domain without values. The domain is left
/// untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmptyDomain;

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

use std::cell::Cell;
use std::rc::Rc;

use super::Goal;
use super::MinimizationStrategy;
use crate::basic_types::TrailMark;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;

/// A unit of work of the search engine.
#[derive(Clone, Debug)]
pub(crate) enum Step {
    Goal(Rc<Goal>),
    /// The goal of a minimisation found a solution.
    Improve(Rc<MinimizationFrame>),
    /// The search space of a minimisation is exhausted.
    Exhausted(Rc<MinimizationFrame>),
}

/// The steps which remain to be executed, first step first.
///
/// Continuations are immutable linked lists, so pushing onto one shares its tail with every
/// choice point which captured it.
#[derive(Clone, Debug, Default)]
pub(crate) struct Continuation(Option<Rc<Link>>);

#[derive(Debug)]
struct Link {
    step: Step,
    next: Continuation,
}

impl Continuation {
    pub(crate) fn push(&self, step: Step) -> Continuation {
        Continuation(Some(Rc::new(Link {
            step,
            next: self.clone(),
        })))
    }

    pub(crate) fn pop(&self) -> Option<(Step, Continuation)> {
        self.0
            .as_ref()
            .map(|link| (link.step.clone(), link.next.clone()))
    }
}

/// The untried branch of a disjunction.
#[derive(Debug)]
pub(crate) struct ChoicePoint {
    /// The trail position at which the branch was created.
    pub(crate) mark: TrailMark,
    /// The steps to execute when the choice point is resumed.
    pub(crate) alternative: Continuation,
}

/// The bookkeeping of a [`Goal::Minimize`] which is being executed.
#[derive(Debug)]
pub(crate) struct MinimizationFrame {
    pub(crate) goal: Rc<Goal>,
    pub(crate) objective: AffineView<DomainId>,
    pub(crate) strategy: MinimizationStrategy,
    pub(crate) mark: TrailMark,
    /// The index of the choice point which resumes with [`Step::Exhausted`].
    pub(crate) guard: usize,
    /// The objective value of the incumbent.
    pub(crate) best: Cell<Option<i32>>,
    /// What follows the minimisation once it is exhausted.
    pub(crate) continuation: Continuation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushing_does_not_change_shared_tails() {
        let tail = Continuation::default().push(Step::Goal(Rc::new(Goal::Fail)));
        let longer = tail.push(Step::Goal(Rc::new(Goal::Succeed)));

        let (first, rest) = longer.pop().expect("two steps");
        assert!(matches!(first, Step::Goal(goal) if matches!(*goal, Goal::Succeed)));

        let (second, rest) = rest.pop().expect("one step");
        assert!(matches!(second, Step::Goal(goal) if matches!(*goal, Goal::Fail)));
        assert!(rest.pop().is_none());

        assert!(tail.pop().is_some());
    }
}

use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::propagation::ReadDomains;

/// The input of a task to the cumulative propagator.
#[derive(Clone, Debug)]
pub(crate) struct ArgTask<Var> {
    pub(crate) start_time: Var,
    pub(crate) duration: i32,
    pub(crate) resource_usage: i32,
    /// When set, the task only uses the resource if the literal is true.
    pub(crate) presence: Option<Literal>,
    /// Whether the task keeps using the resource until the end of the horizon.
    pub(crate) until_horizon: bool,
}

impl<Var: IntegerVariable> ArgTask<Var> {
    pub(crate) fn is_present<Context: ReadDomains>(&self, context: &Context) -> bool {
        match self.presence {
            Some(literal) => context.is_literal_true(&literal),
            None => true,
        }
    }

    pub(crate) fn is_absent<Context: ReadDomains>(&self, context: &Context) -> bool {
        self.presence
            .is_some_and(|literal| context.is_literal_false(&literal))
    }

    /// The end of the interval `[start, end)` in which the task uses the resource when it starts
    /// at `start`.
    pub(crate) fn end_when_started_at(&self, start: i32, horizon: i32) -> i32 {
        if self.until_horizon {
            horizon
        } else {
            start + self.duration
        }
    }

    /// Whether the task never uses the resource.
    pub(crate) fn is_void(&self) -> bool {
        self.resource_usage == 0 || (self.duration == 0 && !self.until_horizon)
    }
}

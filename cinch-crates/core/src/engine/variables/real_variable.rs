use std::fmt::Display;
use std::fmt::Formatter;

use super::ContextId;

/// A handle to a real-valued variable. Real domains are intervals of `f64` and are only narrowed
/// through their bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RealVariable {
    context: ContextId,
    id: u32,
}

impl RealVariable {
    pub(crate) fn new(context: ContextId, id: u32) -> Self {
        RealVariable { context, id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub(crate) fn index(&self) -> usize {
        self.id as usize
    }
}

impl Display for RealVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.id)
    }
}

/// The interval of values a real variable can still take.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RealDomain {
    pub(super) lower_bound: f64,
    pub(super) upper_bound: f64,
}

impl RealDomain {
    pub(crate) fn new(lower_bound: f64, upper_bound: f64) -> RealDomain {
        RealDomain {
            lower_bound,
            upper_bound,
        }
    }

    pub(crate) fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

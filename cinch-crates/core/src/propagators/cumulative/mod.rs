//! Contains the propagator for the
//! [Cumulative](https://sofdem.github.io/gccat/gccat/Ccumulative.html) constraint over a capacity
//! which can vary over time.
//!
//! Each task uses `resource_usage` units of the resource during `[start, start + duration)`, or,
//! for tasks which deplete the resource, from its start until the end of the horizon. At every
//! time point the summed usage must not exceed the capacity at that point.
//!
//! Propagation is based on the time-table: the profile of the parts of tasks which are executed
//! no matter where the tasks are placed. A task is pushed away from the points where it does not
//! fit on top of the time-table; optional tasks which fit nowhere are made absent.
mod task;
mod time_table_per_point;

pub(crate) use task::ArgTask;
pub(crate) use time_table_per_point::*;

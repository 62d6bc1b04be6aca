use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::cinch_assert_simple;

/// A position on a [`Trail`] to which the trail can later be restored.
///
/// Marks are only meaningful for the trail which handed them out, and a mark is invalidated once
/// the trail is undone to an earlier mark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrailMark(usize);

impl TrailMark {
    /// The number of records on the trail when the mark was taken.
    pub fn position(self) -> usize {
        self.0
    }
}

/// An append-only log of undo records.
///
/// Records are only ever removed in LIFO order, through [`Trail::undo_to`], which hands the
/// removed records to the caller newest first.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    records: Vec<T>,
}

// We explicitly implement the Default and not as a macro, because we want to avoid imposing Default
// on the generic type T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            records: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    /// Returns a checkpoint to which the trail can be restored.
    pub(crate) fn mark(&self) -> TrailMark {
        TrailMark(self.records.len())
    }

    /// Removes every record pushed after `mark`, yielding them newest first.
    ///
    /// The returned iterator should be consumed by the caller to reverse the records; dropping it
    /// still removes them from the trail.
    pub(crate) fn undo_to(&mut self, mark: TrailMark) -> Rev<Drain<'_, T>> {
        cinch_assert_simple!(
            mark.0 <= self.records.len(),
            "cannot undo to a mark beyond the end of the trail"
        );

        self.records.drain(mark.0..).rev()
    }

    pub(crate) fn push(&mut self, record: T) {
        self.records.push(record)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

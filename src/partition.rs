//! Merging two adjacent sorted partitions of one slice.
//!
//! `set[..pivot]` and `set[pivot..]` must each be sorted under the same
//! predicate. Afterwards the whole slice is sorted and the merge is stable:
//! among equivalent elements, those of the first partition come first.
//!
//! Two strategies are provided. The buffered one merges into a scratch
//! vector and writes it back at the end. The in-place one only moves
//! elements by rotating sub-slices and keeps a journal of those rotations so
//! that a failing predicate leaves the slice exactly as it was.

use std::convert::Infallible;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::{
    merge::try_merge_into_by,
    search::try_partition_point,
    subset::Subset,
    visitor::VecWriter,
};

fn infallible<T>(mut precedes: impl FnMut(&T, &T) -> bool)
    -> impl FnMut(&T, &T) -> Result<bool, Infallible>
{
    move |a: &T, b: &T| Ok::<_, Infallible>(precedes(a, b))
}

fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

fn check_pivot(len: usize, pivot: usize) {
    assert!(pivot <= len, "pivot {} out of range for slice of length {}", pivot, len);
}

/*-------- Buffered --------*/

/// Merges the two sorted partitions of `set` around `pivot` through a
/// scratch buffer of `set.len()` elements.
pub fn merge_partitions<T: Ord + Clone>(set: &mut [T], pivot: usize) {
    merge_partitions_by(set, pivot, |a, b| a < b)
}

pub fn merge_partitions_by<T, F>(set: &mut [T], pivot: usize, precedes: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    into_ok(try_merge_partitions_by(set, pivot, infallible(precedes)))
}

/// Buffered merge under a fallible predicate. Nothing is written to `set`
/// unless every comparison succeeded.
///
/// # Panics
///
/// Panics if `pivot > set.len()`.
pub fn try_merge_partitions_by<T, F, E>(
    set: &mut [T],
    pivot: usize,
    mut precedes: F) -> Result<(), E>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<bool, E>,
{
    check_pivot(set.len(), pivot);
    if pivot == 0 || pivot == set.len() {
        return Ok(());
    }

    let mut scratch = VecWriter::with_capacity(set.len());
    {
        let (first, second) = set.split_at(pivot);
        try_merge_into_by(
            first.iter().cloned(),
            second.iter().cloned(),
            Subset::Sum,
            &mut precedes,
            &mut scratch)?;
    }

    let scratch: Vec<T> = scratch.into();
    debug_assert_eq!(scratch.len(), set.len());

    for (slot, value) in set.iter_mut().zip(scratch) {
        *slot = value;
    }
    Ok(())
}

/*-------- In place --------*/

/// `set[low..high]` was rotated left by `shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rotation {
    low: usize,
    high: usize,
    shift: usize,
}

/// Applies rotations to a slice and remembers them until the merge either
/// commits or rolls back. Dropping an uncommitted journal, as happens when
/// the predicate panics, also rolls back.
struct RotationJournal<'a, T> {
    set: &'a mut [T],
    rotations: SmallVec<[Rotation; 16]>,
}

impl<'a, T> RotationJournal<'a, T> {
    fn new(set: &'a mut [T]) -> Self {
        Self {
            set,
            rotations: SmallVec::new(),
        }
    }

    fn set(&self) -> &[T] {
        &self.set[..]
    }

    /// Swaps the blocks `[low, pivot)` and `[pivot, high)`.
    fn rotate(&mut self, low: usize, pivot: usize, high: usize) {
        let rotation = Rotation { low, high, shift: pivot - low };
        trace!("rotating [{}, {}) left by {}", low, high, rotation.shift);

        self.set[low..high].rotate_left(rotation.shift);
        self.rotations.push(rotation);
    }

    fn commit(mut self) {
        self.rotations.clear();
    }

    fn rollback(mut self) {
        self.undo();
    }

    fn undo(&mut self) {
        if !self.rotations.is_empty() {
            debug!("rolling back {} rotation(s)", self.rotations.len());
        }
        while let Some(Rotation { low, high, shift }) = self.rotations.pop() {
            self.set[low..high].rotate_right(shift);
        }
    }
}

impl<'a, T> Drop for RotationJournal<'a, T> {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Merges the two sorted partitions of `set` around `pivot` using only
/// rotations, without a scratch buffer.
pub fn merge_partitions_in_place<T: Ord>(set: &mut [T], pivot: usize) {
    merge_partitions_in_place_by(set, pivot, |a, b| a < b)
}

pub fn merge_partitions_in_place_by<T, F>(set: &mut [T], pivot: usize, precedes: F)
where
    F: FnMut(&T, &T) -> bool,
{
    into_ok(try_merge_partitions_in_place_by(set, pivot, infallible(precedes)))
}

/// In-place merge under a fallible predicate.
///
/// Each step takes the first element of the second partition (the pivot
/// value) and finds `low`, the first element of the first partition that
/// goes strictly after it. If there is none, the slice is sorted. Otherwise
/// the run of second-partition elements strictly before `set[low]` ends at
/// `high`, and swapping the blocks `[low, pivot)` and `[pivot, high)` puts
/// everything up to and including `set[low]` in its final place. The next
/// step merges `[low + (high - pivot), end)` around `high`.
///
/// If the predicate fails, every rotation performed so far is undone in
/// reverse order before the error is returned, so `set` is left unchanged.
///
/// # Panics
///
/// Panics if `pivot > set.len()`.
pub fn try_merge_partitions_in_place_by<T, F, E>(
    set: &mut [T],
    pivot: usize,
    mut precedes: F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<bool, E>,
{
    check_pivot(set.len(), pivot);

    let mut journal = RotationJournal::new(set);
    match merge_steps(&mut journal, pivot, &mut precedes) {
        Ok(()) => {
            journal.commit();
            Ok(())
        }
        Err(e) => {
            journal.rollback();
            Err(e)
        }
    }
}

fn merge_steps<T, E>(
    journal: &mut RotationJournal<'_, T>,
    mut pivot: usize,
    precedes: &mut impl FnMut(&T, &T) -> Result<bool, E>) -> Result<(), E>
{
    let end = journal.set().len();
    let mut start = 0;

    while start < pivot && pivot < end {
        let set = journal.set();

        let pivot_value = &set[pivot];
        let low = start + try_partition_point(&set[start..pivot], |x| {
            precedes(pivot_value, x).map(|after| !after)
        })?;
        if low == pivot {
            break;
        }

        // set[pivot] strictly precedes set[low], so high > pivot.
        let low_value = &set[low];
        let high = pivot + try_partition_point(&set[pivot..end], |x| {
            precedes(x, low_value)
        })?;

        journal.rotate(low, pivot, high);

        start = low + (high - pivot);
        pivot = high;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_rollback_restores_slice() {
        let mut set = [1, 2, 3, 4, 5, 6];
        let mut journal = RotationJournal::new(&mut set);
        journal.rotate(0, 2, 5);
        journal.rotate(1, 3, 6);
        assert_ne!(journal.set(), &[1, 2, 3, 4, 5, 6]);
        journal.rollback();
        assert_eq!(set, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn journal_drop_rolls_back() {
        let mut set = [5, 6, 1, 2];
        {
            let mut journal = RotationJournal::new(&mut set);
            journal.rotate(0, 2, 4);
            assert_eq!(journal.set(), &[1, 2, 5, 6]);
        }
        assert_eq!(set, [5, 6, 1, 2]);
    }

    #[test]
    fn journal_commit_keeps_changes() {
        let mut set = [5, 6, 1, 2];
        let mut journal = RotationJournal::new(&mut set);
        journal.rotate(0, 2, 4);
        journal.commit();
        assert_eq!(set, [1, 2, 5, 6]);
    }

    #[test]
    fn rotation_count_is_linear_in_interleaving() {
        let mut set = [4, 6, 8, 3, 5, 7];
        let mut journal = RotationJournal::new(&mut set);
        merge_steps(&mut journal, 3, &mut |a: &i32, b: &i32| Ok::<_, Infallible>(a < b))
            .unwrap();
        assert_eq!(journal.rotations.len(), 3);
        journal.commit();
        assert_eq!(set, [3, 4, 5, 6, 7, 8]);
    }
}

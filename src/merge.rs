//! Lazy, set-aware merging of two sorted sources.
//!
//! The merge is a zipper over two cursors, each holding at most one element
//! read ahead of the output. At every step the two buffered elements are
//! compared: the strictly smaller one is exclusive to its source at that
//! point, and a pair where neither precedes the other is shared. The
//! [`Subset`] decides which of those categories reach the output.
//! [`Subset::Sum`] keeps everything and breaks ties towards the first source,
//! which makes it a stable merge.
//!
//! Every merge comes in three flavours: natural order ([`merge_sorted`]), an
//! infallible predicate ([`merge_sorted_by`]) and a fallible predicate
//! ([`try_merge_sorted_by`]). The predicate answers "does `a` strictly
//! precede `b`".

use std::{convert::Infallible, fmt, iter::FusedIterator, marker::PhantomData};

use crate::{subset::Subset, visitor::Visitor};

struct Cursor<I: Iterator> {
    iter: I,
    next: Option<I::Item>,
    exhausted: bool,
}

impl<I: Iterator> Cursor<I> {
    fn new(iter: I) -> Self {
        Self {
            iter,
            next: None,
            exhausted: false,
        }
    }

    /// Reads ahead if nothing is buffered. The source is never polled again
    /// once it returned `None`.
    fn refill(&mut self) {
        if self.next.is_none() && !self.exhausted {
            self.next = self.iter.next();
            self.exhausted = self.next.is_none();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = self.next.is_some() as usize;
        if self.exhausted {
            return (buffered, Some(buffered));
        }
        let (lo, hi) = self.iter.size_hint();
        (lo.saturating_add(buffered), hi.and_then(|hi| hi.checked_add(buffered)))
    }
}

impl<I> Clone for Cursor<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            next: self.next.clone(),
            exhausted: self.exhausted,
        }
    }
}

impl<I> fmt::Debug for Cursor<I>
where
    I: Iterator + fmt::Debug,
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("iter", &self.iter)
            .field("next", &self.next)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    First,
    Second,
    Shared,
}

struct MergeCore<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    first: Cursor<A>,
    second: Cursor<B>,
    subset: Subset,
    done: bool,
}

impl<A, B> MergeCore<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    fn new(first: A, second: B, subset: Subset) -> Self {
        Self {
            first: Cursor::new(first),
            second: Cursor::new(second),
            subset,
            done: false,
        }
    }

    fn classify<E>(
        subset: Subset,
        a: &A::Item,
        b: &A::Item,
        precedes: &mut impl FnMut(&A::Item, &A::Item) -> Result<bool, E>)
        -> Result<Category, E>
    {
        // Under `Sum` a tie goes to the first source, so equal runs of the
        // first source come out before those of the second.
        if subset.keeps_duplicates() {
            return Ok(if precedes(b, a)? { Category::Second } else { Category::First });
        }

        if precedes(a, b)? {
            Ok(Category::First)
        }
        else if precedes(b, a)? {
            Ok(Category::Second)
        }
        else {
            Ok(Category::Shared)
        }
    }

    fn try_next<E>(
        &mut self,
        mut precedes: impl FnMut(&A::Item, &A::Item) -> Result<bool, E>)
        -> Result<Option<A::Item>, E>
    {
        loop {
            if self.done {
                return Ok(None);
            }

            self.first.refill();
            self.second.refill();

            let category = match (&self.first.next, &self.second.next) {
                (None, None) => {
                    self.done = true;
                    return Ok(None);
                }
                // One source is exhausted: the other drains without
                // comparisons, or not at all.
                (Some(_), None) => {
                    if !self.subset.emits_exclusives_to_first() {
                        self.done = true;
                        return Ok(None);
                    }
                    Category::First
                }
                (None, Some(_)) => {
                    if !self.subset.emits_exclusives_to_second() {
                        self.done = true;
                        return Ok(None);
                    }
                    Category::Second
                }
                (Some(a), Some(b)) => match Self::classify(self.subset, a, b, &mut precedes) {
                    Ok(category) => category,
                    Err(e) => {
                        self.done = true;
                        return Err(e);
                    }
                },
            };

            match category {
                Category::First => {
                    let value = self.first.next.take();
                    if self.subset.emits_exclusives_to_first() {
                        return Ok(value);
                    }
                }
                Category::Second => {
                    let value = self.second.next.take();
                    if self.subset.emits_exclusives_to_second() {
                        return Ok(value);
                    }
                }
                Category::Shared => {
                    let a = self.first.next.take();
                    let b = self.second.next.take();
                    if !self.subset.emits_shared() {
                        continue;
                    }
                    return Ok(if self.subset.shared_from_second() { b } else { a });
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }

        let (lo_a, hi_a) = self.first.size_hint();
        let (lo_b, hi_b) = self.second.size_hint();

        let lower = match self.subset {
            Subset::Sum => lo_a.saturating_add(lo_b),
            Subset::Union => lo_a.max(lo_b),
            Subset::First => lo_a,
            Subset::Second => lo_b,
            _ => 0,
        };

        let side = |emits: bool, hi: Option<usize>| if emits { hi } else { Some(0) };
        let upper = side(self.subset.emits_from_first(), hi_a)
            .zip(side(self.subset.emits_from_second(), hi_b))
            .and_then(|(a, b)| a.checked_add(b));

        (lower, upper)
    }
}

impl<A, B> Clone for MergeCore<A, B>
where
    A: Iterator + Clone,
    B: Iterator<Item = A::Item> + Clone,
    A::Item: Clone,
{
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            subset: self.subset,
            done: self.done,
        }
    }
}

impl<A, B> fmt::Debug for MergeCore<A, B>
where
    A: Iterator + fmt::Debug,
    B: Iterator<Item = A::Item> + fmt::Debug,
    A::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeCore")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("subset", &self.subset)
            .field("done", &self.done)
            .finish()
    }
}

/// Lazy merge of two sorted sources under an infallible predicate.
///
/// Created by [`merge_sorted`] and [`merge_sorted_by`].
pub struct MergeSorted<A, B, F>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    core: MergeCore<A, B>,
    precedes: F,
}

impl<A, B, F> MergeSorted<A, B, F>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    pub fn subset(&self) -> Subset {
        self.core.subset
    }
}

impl<A, B, F> Iterator for MergeSorted<A, B, F>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
    F: FnMut(&A::Item, &A::Item) -> bool,
{
    type Item = A::Item;

    fn next(&mut self) -> Option<A::Item> {
        let precedes = &mut self.precedes;
        match self.core.try_next(|a, b| Ok::<_, Infallible>(precedes(a, b))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.core.size_hint()
    }
}

impl<A, B, F> FusedIterator for MergeSorted<A, B, F>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
    F: FnMut(&A::Item, &A::Item) -> bool,
{}

impl<A, B, F> Clone for MergeSorted<A, B, F>
where
    A: Iterator + Clone,
    B: Iterator<Item = A::Item> + Clone,
    A::Item: Clone,
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            precedes: self.precedes.clone(),
        }
    }
}

impl<A, B, F> fmt::Debug for MergeSorted<A, B, F>
where
    A: Iterator + fmt::Debug,
    B: Iterator<Item = A::Item> + fmt::Debug,
    A::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeSorted")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

/// Lazy merge of two sorted sources under a fallible predicate.
///
/// Yields `Err` once, at the first failing comparison, and `None` from then
/// on. Created by [`try_merge_sorted_by`].
pub struct TryMergeSorted<A, B, F, E>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    core: MergeCore<A, B>,
    precedes: F,
    _error: PhantomData<fn() -> E>,
}

impl<A, B, F, E> TryMergeSorted<A, B, F, E>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    pub fn subset(&self) -> Subset {
        self.core.subset
    }
}

impl<A, B, F, E> Iterator for TryMergeSorted<A, B, F, E>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
    F: FnMut(&A::Item, &A::Item) -> Result<bool, E>,
{
    type Item = Result<A::Item, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.core.try_next(&mut self.precedes).transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.core.size_hint();
        // A failing comparison ends the merge early.
        (0, upper.map(|upper| upper.saturating_add(1)))
    }
}

impl<A, B, F, E> FusedIterator for TryMergeSorted<A, B, F, E>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
    F: FnMut(&A::Item, &A::Item) -> Result<bool, E>,
{}

impl<A, B, F, E> Clone for TryMergeSorted<A, B, F, E>
where
    A: Iterator + Clone,
    B: Iterator<Item = A::Item> + Clone,
    A::Item: Clone,
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            precedes: self.precedes.clone(),
            _error: PhantomData,
        }
    }
}

impl<A, B, F, E> fmt::Debug for TryMergeSorted<A, B, F, E>
where
    A: Iterator + fmt::Debug,
    B: Iterator<Item = A::Item> + fmt::Debug,
    A::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryMergeSorted")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

pub type NaturalOrder<T> = fn(&T, &T) -> bool;

fn natural_order<T: Ord>(a: &T, b: &T) -> bool {
    a < b
}

/// Merges two sources sorted in ascending order, keeping the categories
/// selected by `subset`.
///
/// ```
/// use mergeops::{merge_sorted, Subset};
///
/// let shared: Vec<_> = merge_sorted(0..7, 3..10, Subset::Intersection).collect();
/// assert_eq!(shared, [3, 4, 5, 6]);
/// ```
pub fn merge_sorted<A, B>(
    first: A,
    second: B,
    subset: Subset) -> MergeSorted<A::IntoIter, B::IntoIter, NaturalOrder<A::Item>>
where
    A: IntoIterator,
    A::Item: Ord,
    B: IntoIterator<Item = A::Item>,
{
    merge_sorted_by(first, second, subset, natural_order::<A::Item> as NaturalOrder<A::Item>)
}

/// Merges two sources sorted by `precedes`, which must be a strict weak
/// ordering answering whether its first argument goes strictly before its
/// second.
pub fn merge_sorted_by<A, B, F>(
    first: A,
    second: B,
    subset: Subset,
    precedes: F) -> MergeSorted<A::IntoIter, B::IntoIter, F>
where
    A: IntoIterator,
    B: IntoIterator<Item = A::Item>,
    F: FnMut(&A::Item, &A::Item) -> bool,
{
    MergeSorted {
        core: MergeCore::new(first.into_iter(), second.into_iter(), subset),
        precedes,
    }
}

/// Same as [`merge_sorted_by`] with a predicate that can fail. The error is
/// yielded unchanged.
pub fn try_merge_sorted_by<A, B, F, E>(
    first: A,
    second: B,
    subset: Subset,
    precedes: F) -> TryMergeSorted<A::IntoIter, B::IntoIter, F, E>
where
    A: IntoIterator,
    B: IntoIterator<Item = A::Item>,
    F: FnMut(&A::Item, &A::Item) -> Result<bool, E>,
{
    TryMergeSorted {
        core: MergeCore::new(first.into_iter(), second.into_iter(), subset),
        precedes,
        _error: PhantomData,
    }
}

/// Eagerly merges two sources sorted in ascending order into `visitor`.
pub fn merge_into<A, B, V>(first: A, second: B, subset: Subset, visitor: &mut V)
where
    A: IntoIterator,
    A::Item: Ord,
    B: IntoIterator<Item = A::Item>,
    V: Visitor<A::Item>,
{
    for value in merge_sorted(first, second, subset) {
        visitor.visit(value);
    }
}

pub fn merge_into_by<A, B, F, V>(
    first: A,
    second: B,
    subset: Subset,
    precedes: F,
    visitor: &mut V)
where
    A: IntoIterator,
    B: IntoIterator<Item = A::Item>,
    F: FnMut(&A::Item, &A::Item) -> bool,
    V: Visitor<A::Item>,
{
    for value in merge_sorted_by(first, second, subset, precedes) {
        visitor.visit(value);
    }
}

/// Eager form of [`try_merge_sorted_by`]. Elements produced before a failing
/// comparison have already been visited when the error is returned.
pub fn try_merge_into_by<A, B, F, E, V>(
    first: A,
    second: B,
    subset: Subset,
    precedes: F,
    visitor: &mut V) -> Result<(), E>
where
    A: IntoIterator,
    B: IntoIterator<Item = A::Item>,
    F: FnMut(&A::Item, &A::Item) -> Result<bool, E>,
    V: Visitor<A::Item>,
{
    for value in try_merge_sorted_by(first, second, subset, precedes) {
        visitor.visit(value?);
    }
    Ok(())
}

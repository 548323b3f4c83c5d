#![allow(dead_code)]
pub mod properties;

use mergeops::Subset;
use quickcheck::Arbitrary;

// Small value domain so that ties between and within runs are common.
const DOMAIN: i32 = 24;

// Arbitrary Sorted Run //
/// Sorted sequence, duplicates allowed.
#[derive(Debug, Clone)]
pub struct SortedRun(Vec<i32>);

impl SortedRun {
    pub fn from_unsorted(mut vec: Vec<i32>) -> Self {
        vec.sort_unstable();
        Self(vec)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<i32> {
        self.0
    }
}

impl From<Vec<i32>> for SortedRun {
    fn from(value: Vec<i32>) -> Self {
        Self::from_unsorted(value)
    }
}

impl AsRef<[i32]> for SortedRun {
    fn as_ref(&self) -> &[i32] {
        &self.0
    }
}

impl quickcheck::Arbitrary for SortedRun {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self::from_unsorted(small_values(g))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self::from_unsorted))
    }
}

fn small_values(g: &mut quickcheck::Gen) -> Vec<i32> {
    Vec::<i32>::arbitrary(g)
        .into_iter()
        .map(|x| x.rem_euclid(DOMAIN))
        .collect()
}

// Arbitrary Subset //
#[derive(Debug, Clone, Copy)]
pub struct AnySubset(pub Subset);

impl quickcheck::Arbitrary for AnySubset {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        AnySubset(*g.choose(Subset::ALL.as_slice()).unwrap())
    }
}

// Keyed elements //
/// Element ordered by `key` only; `origin` is its index before merging, so
/// the relative order of equal keys stays observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyed {
    pub key: i32,
    pub origin: usize,
}

pub fn by_key(a: &Keyed, b: &Keyed) -> bool {
    a.key < b.key
}

pub fn keys(items: &[Keyed]) -> Vec<i32> {
    items.iter().map(|item| item.key).collect()
}

// Arbitrary Partitioned Slice //
/// Two sorted runs laid out back to back, split at `pivot`.
#[derive(Debug, Clone)]
pub struct Partitioned {
    pub items: Vec<Keyed>,
    pub pivot: usize,
}

impl Partitioned {
    pub fn new(first: &[i32], second: &[i32]) -> Self {
        let items = first.iter()
            .chain(second)
            .enumerate()
            .map(|(origin, &key)| Keyed { key, origin })
            .collect();

        Self {
            items,
            pivot: first.len(),
        }
    }
}

impl quickcheck::Arbitrary for Partitioned {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let first = SortedRun::arbitrary(g);
        let second = SortedRun::arbitrary(g);
        Self::new(first.as_slice(), second.as_slice())
    }
}

// Fallible predicates //
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateFailed {
    pub call: usize,
}

/// Key order that succeeds `limit` times and fails on every later call.
pub fn failing_after(limit: usize)
    -> impl FnMut(&Keyed, &Keyed) -> Result<bool, PredicateFailed>
{
    let mut calls = 0;
    move |a: &Keyed, b: &Keyed| {
        calls += 1;
        if calls > limit {
            Err(PredicateFailed { call: calls })
        }
        else {
            Ok(by_key(a, b))
        }
    }
}

/// Number of predicate calls a successful in-place merge of `input` makes.
pub fn in_place_comparisons(input: &Partitioned) -> usize {
    let mut items = input.items.clone();
    let mut calls = 0;
    mergeops::merge_partitions_in_place_by(&mut items, input.pivot, |a, b| {
        calls += 1;
        by_key(a, b)
    });
    calls
}

/// Number of predicate calls a successful buffered merge of `input` makes.
pub fn buffered_comparisons(input: &Partitioned) -> usize {
    let mut items = input.items.clone();
    let mut calls = 0;
    mergeops::merge_partitions_by(&mut items, input.pivot, |a, b| {
        calls += 1;
        by_key(a, b)
    });
    calls
}

use std::{collections::BTreeSet, ops::Range};

use rand::{distributions::Uniform, prelude::Distribution, seq::SliceRandom, thread_rng};

/// Sorted set of `cardinality` distinct values drawn uniformly from `range`.
pub fn uniform_sorted_set(range: Range<u32>, cardinality: usize) -> Vec<u32> {
    let rng = &mut thread_rng();

    let density = cardinality as f64 / range.len() as f64;
    if density < 0.01 {
        let dist = Uniform::from(range);

        let mut set: BTreeSet<u32> = BTreeSet::new();
        while set.len() < cardinality {
            set.insert(dist.sample(rng));
        }
        set.iter().copied().collect()
    } else {
        let mut everything: Vec<u32> = range.collect();
        everything.shuffle(rng);

        let mut result = Vec::from(&everything[0..cardinality]);
        result.sort();
        result
    }
}

/// Sorted sequence of `len` values drawn uniformly from `range`, repeats
/// allowed.
pub fn uniform_sorted_run(range: Range<u32>, len: usize) -> Vec<u32> {
    let rng = &mut thread_rng();
    let dist = Uniform::from(range);

    let mut run: Vec<u32> = dist.sample_iter(rng).take(len).collect();
    run.sort_unstable();
    run
}

/// Two sorted runs laid out back to back, returned with the pivot between
/// them.
pub fn partitioned(range: Range<u32>, first: usize, second: usize) -> (Vec<u32>, usize) {
    let mut set = uniform_sorted_run(range.clone(), first);
    set.extend(uniform_sorted_run(range, second));
    (set, first)
}

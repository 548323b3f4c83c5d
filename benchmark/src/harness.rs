use std::{
    fmt,
    hint,
    str::FromStr,
    time::{Duration, Instant},
};
use mergeops::{
    merge_into, merge_into_by, merge_partitions, merge_partitions_by,
    merge_partitions_in_place, merge_partitions_in_place_by,
    visitor::{Counter, VecWriter},
    Subset,
};
use num::PrimInt;

use crate::{generators::Partitioned, BenchError};

const MERGE_PREFIX: &str = "merge_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Partition merge through a scratch buffer.
    Buffered,
    /// Rotation-based partition merge.
    InPlace,
    /// Stable sort of the whole slice, as a baseline.
    StdSort,
    /// Lazy merge of the two partitions under a subset.
    Merge(Subset),
}

impl FromStr for Algorithm {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buffered" => Ok(Algorithm::Buffered),
            "in_place" => Ok(Algorithm::InPlace),
            "std_sort" => Ok(Algorithm::StdSort),
            _ => s.strip_prefix(MERGE_PREFIX)
                .and_then(|subset| subset.parse().ok())
                .map(Algorithm::Merge)
                .ok_or_else(|| BenchError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Buffered => f.write_str("buffered"),
            Algorithm::InPlace => f.write_str("in_place"),
            Algorithm::StdSort => f.write_str("std_sort"),
            Algorithm::Merge(subset) => write!(f, "{}{}", MERGE_PREFIX, subset),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub time: Duration,
    pub comparisons: u64,
}

fn time<D>(
    warmup: Duration,
    prepare: impl Fn() -> D,
    run: impl Fn(&mut D)) -> (Duration, D)
{
    let warmup_start = Instant::now();
    while warmup_start.elapsed() < warmup {
        let mut data = prepare();
        hint::black_box(run(&mut data));
    }

    let mut data = prepare();

    let start = Instant::now();
    hint::black_box(run(&mut data));
    let elapsed = start.elapsed();

    (elapsed, data)
}

/// Times `algorithm` on `data`, then repeats it once with a counting
/// predicate.
pub fn measure<T: PrimInt>(
    algorithm: Algorithm,
    warmup: Duration,
    data: &Partitioned<T>) -> Result<Measurement, BenchError>
{
    let time = match algorithm {
        Algorithm::Buffered => time_partitions(warmup, data, algorithm, merge_partitions)?,
        Algorithm::InPlace => time_partitions(warmup, data, algorithm, merge_partitions_in_place)?,
        Algorithm::StdSort => time_partitions(warmup, data, algorithm, |set, _| set.sort())?,
        Algorithm::Merge(subset) => time_merge(warmup, data, subset),
    };

    Ok(Measurement {
        time,
        comparisons: count_comparisons(algorithm, data),
    })
}

fn time_partitions<T: PrimInt>(
    warmup: Duration,
    data: &Partitioned<T>,
    algorithm: Algorithm,
    merge: impl Fn(&mut [T], usize)) -> Result<Duration, BenchError>
{
    let prepare = || data.set.clone();
    let run = |set: &mut Vec<T>| merge(set.as_mut_slice(), data.pivot);

    let (elapsed, set) = time(warmup, prepare, run);

    ensure_sorted(algorithm, &set)?;
    Ok(elapsed)
}

fn time_merge<T: PrimInt>(warmup: Duration, data: &Partitioned<T>, subset: Subset)
    -> Duration
{
    let capacity = data.set.len();

    let prepare = || VecWriter::with_capacity(capacity);
    let run = |writer: &mut VecWriter<T>| {
        merge_into(
            data.first().iter().copied(),
            data.second().iter().copied(),
            subset,
            writer)
    };

    let (elapsed, _) = time(warmup, prepare, run);
    elapsed
}

/// Number of predicate calls `algorithm` makes on `data`.
pub fn count_comparisons<T: PrimInt>(algorithm: Algorithm, data: &Partitioned<T>) -> u64 {
    let mut calls = 0;
    let precedes = |a: &T, b: &T| {
        calls += 1;
        a < b
    };

    let mut set = data.set.clone();
    match algorithm {
        Algorithm::Buffered => merge_partitions_by(&mut set, data.pivot, precedes),
        Algorithm::InPlace => merge_partitions_in_place_by(&mut set, data.pivot, precedes),
        Algorithm::StdSort => {
            let mut precedes = precedes;
            set.sort_by(|a, b| {
                if precedes(a, b) {
                    std::cmp::Ordering::Less
                }
                else if precedes(b, a) {
                    std::cmp::Ordering::Greater
                }
                else {
                    std::cmp::Ordering::Equal
                }
            })
        }
        Algorithm::Merge(subset) => merge_into_by(
            data.first().iter().copied(),
            data.second().iter().copied(),
            subset,
            precedes,
            &mut Counter::new()),
    }
    calls
}

fn ensure_sorted<T: PrimInt>(algorithm: Algorithm, set: &[T]) -> Result<(), BenchError> {
    if set.windows(2).all(|w| w[0] <= w[1]) {
        Ok(())
    }
    else {
        Err(BenchError::Unsorted { algorithm: algorithm.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        let mut names = vec!["buffered".to_string(), "in_place".into(), "std_sort".into()];
        names.extend(Subset::ALL.iter().map(|subset| format!("merge_{}", subset)));

        for name in names {
            let algorithm: Algorithm = name.parse().unwrap();
            assert_eq!(algorithm.to_string(), name);
        }
        assert!("merge_everything".parse::<Algorithm>().is_err());
        assert!("galloping".parse::<Algorithm>().is_err());
    }

    #[test]
    fn partition_merges_sort() {
        let data = Partitioned { set: vec![4, 6, 8, 3, 5, 7], pivot: 3 };
        for algorithm in [Algorithm::Buffered, Algorithm::InPlace, Algorithm::StdSort] {
            let measurement = measure(algorithm, Duration::ZERO, &data).unwrap();
            assert!(measurement.comparisons > 0);
        }
    }

    #[test]
    fn in_place_counts_bisection_steps() {
        let data = Partitioned { set: vec![4u32, 6, 8, 3, 5, 7], pivot: 3 };
        assert_eq!(count_comparisons(Algorithm::InPlace, &data), 11);
        assert_eq!(count_comparisons(Algorithm::Merge(Subset::Sum), &data), 5);
    }
}

use crate::{schema::{PartitionInfo, PERCENT, PERCENT_F}, BenchError, Datatype};

use colored::Colorize;
use log::debug;
use num::PrimInt;
use rand::{distributions::Uniform, Rng};

const MIN_PARTITION_LENGTH: usize = 100;

/// A slice made of two sorted partitions split at `pivot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioned<T> {
    pub set: Vec<T>,
    pub pivot: usize,
}

impl<T> Partitioned<T> {
    pub fn first(&self) -> &[T] {
        &self.set[..self.pivot]
    }

    pub fn second(&self) -> &[T] {
        &self.set[self.pivot..]
    }
}

struct GenContext {
    len: usize,
    first_len: usize,
    max_value: u64,
}

impl From<&PartitionInfo> for GenContext {
    fn from(props: &PartitionInfo) -> Self {
        let len = 1usize << props.size;
        // first : second = 2^skew : 1
        let second_len = len / ((1usize << props.skew) + 1);

        let duplicates = props.duplicates.min(PERCENT) as f64 / PERCENT_F;
        let max_value = ((len as f64 * (1.0 - duplicates)) as u64).max(1);

        Self {
            len,
            first_len: len - second_len,
            max_value,
        }
    }
}

/// Generates two sorted partitions with values drawn uniformly from a domain
/// sized by `props.duplicates`.
pub fn gen_partitioned<T: PrimInt>(
    props: &PartitionInfo,
    datatype: Datatype,
    rng: &mut impl Rng) -> Result<Partitioned<T>, BenchError>
{
    let gen: GenContext = props.into();

    let second_len = gen.len - gen.first_len;
    if second_len < MIN_PARTITION_LENGTH {
        warn_partition_len(second_len);
    }

    if gen.max_value > datatype.max() {
        return Err(BenchError::ValueRange { value: gen.max_value, datatype });
    }
    debug!("generating {} + {} values below {}", gen.first_len, second_len, gen.max_value);

    let mut set = sorted_run(gen.first_len, gen.max_value, datatype, rng)?;
    set.extend(sorted_run(second_len, gen.max_value, datatype, rng)?);

    Ok(Partitioned {
        set,
        pivot: gen.first_len,
    })
}

/// Sorted run of `len` values from `0..max_value`, repeats allowed.
fn sorted_run<T: PrimInt>(
    len: usize,
    max_value: u64,
    datatype: Datatype,
    rng: &mut impl Rng) -> Result<Vec<T>, BenchError>
{
    let distribution = Uniform::from(0..max_value);

    let mut run = rng.sample_iter(distribution)
        .take(len)
        .map(|value| T::from(value).ok_or(BenchError::ValueRange { value, datatype }))
        .collect::<Result<Vec<T>, BenchError>>()?;

    run.sort_unstable();
    Ok(run)
}

fn warn_partition_len(len: usize) {
    println!("{}", format!(
        "warning: second partition is of length {}",
        len).yellow());
}
